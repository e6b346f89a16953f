//! Chat persistence abstractions and read services.
//!
//! This module defines the `ChatRepository` trait that the infrastructure
//! layer implements, and the `ChatService` that applies owner scoping on
//! the read paths.

pub mod repository;
pub mod service;
