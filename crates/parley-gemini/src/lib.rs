//! parley-gemini: wire types and client for the Gemini generateContent API.
//!
//! This crate owns the conversation turn shapes that travel between the
//! chat client, the relay, and Google's endpoint, plus the non-streaming
//! HTTP client the relay forwards through.

pub mod client;
pub mod error;
pub mod types;

pub use client::{DEFAULT_BASE_URL, GeminiClient, GenerateResponse};
pub use error::{Error, Result};
pub use types::{InlineData, Part, Role, Turn};
