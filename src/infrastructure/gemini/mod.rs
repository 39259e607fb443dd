//! Gemini (Generative Language API) client
//!
//! Typed HTTP access to `generateContent` with Google Search grounding and to
//! the model listing endpoint.

pub mod client;
pub mod errors;

pub use client::{GeminiClient, GeminiClientConfig, DEFAULT_BASE_URL};
pub use errors::GeminiApiError;
