//! Infrastructure implementations for Colloquy.
//!
//! Concrete backends for the trait seams defined in colloquy-core:
//! SQLite persistence (sqlx), the Gemini provider client (reqwest),
//! the HTTP turn transport used by the CLI session, and configuration
//! loading.

pub mod config;
pub mod llm;
pub mod sqlite;
pub mod transport;
