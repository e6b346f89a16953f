//! The client-side session: one chat's visible history plus the
//! lifecycle of one outstanding turn at a time.

pub mod controller;
pub mod transport;

pub use controller::SessionController;
pub use transport::TurnTransport;
