//! The server-side turn pipeline.
//!
//! One turn: validate the submitted conversation, generate a reply from
//! the model provider, then best-effort persist the exchange.

pub mod service;

pub use service::TurnService;
