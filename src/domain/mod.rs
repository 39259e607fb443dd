//! Domain layer for fanout
//!
//! Core types for prompts and fan-out results, plus the port traits the
//! infrastructure adapters implement.

pub mod models;
pub mod ports;

pub use ports::errors::{CredentialError, GenerationError};
