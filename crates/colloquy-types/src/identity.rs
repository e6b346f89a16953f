//! Caller identity for Colloquy.
//!
//! Identity is supplied by an external auth collaborator and passed into
//! each request handler as an explicit value, never read from ambient
//! global state. Absence of identity is the `Guest` caller, which still
//! owns records (scoped under the literal `guest`).

use serde::{Deserialize, Serialize};

/// Sentinel owner id for unauthenticated callers.
pub const GUEST_OWNER: &str = "guest";

/// The identity a request is performed as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Caller {
    /// An authenticated user.
    User(String),
    /// No identity presented.
    Guest,
}

impl Caller {
    /// The owner id records are scoped under for this caller.
    pub fn scope_id(&self) -> &str {
        match self {
            Caller::User(id) => id,
            Caller::Guest => GUEST_OWNER,
        }
    }

    /// The authenticated user id, if any.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Caller::User(id) => Some(id),
            Caller::Guest => None,
        }
    }
}
