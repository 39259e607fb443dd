//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the interfaces that infrastructure adapters implement:
//! - GenerativeClient: grounded content generation
//! - CredentialSource: one place an API key may be found
//!
//! These traits keep the fan-out pipeline independent of the HTTP client and
//! of where the key is stored.

pub mod credential_source;
pub mod errors;
pub mod generative_client;

pub use credential_source::{ApiKey, CredentialSource};
pub use errors::{CredentialError, GenerationError};
pub use generative_client::GenerativeClient;
