//! Observability setup for Colloquy.

pub mod tracing_setup;
