//! Business logic for Colloquy.
//!
//! Defines the trait seams (repository, provider, transport) that the
//! infrastructure layer implements, and the three services built on them:
//! the server-side `TurnService` and `ChatService`, and the client-side
//! `SessionController`.

pub mod chat;
pub mod provider;
pub mod session;
pub mod turn;
