//! Shared domain types for Colloquy.
//!
//! This crate contains the core domain types used across the Colloquy
//! platform: Chat, Message, caller identity, turn wire types, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod identity;
pub mod session;
pub mod turn;
