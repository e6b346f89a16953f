//! Google Gemini model provider implementation.
//!
//! This module provides the [`GeminiProvider`] which implements the
//! [`TextProvider`](colloquy_core::provider::TextProvider) trait for the
//! Generative Language API (`generateContent`, non-streaming).

pub mod client;
pub mod types;

pub use client::GeminiProvider;
