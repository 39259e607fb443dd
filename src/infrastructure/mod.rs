//! Infrastructure layer module
//!
//! This module contains the adapters behind the domain ports:
//! - Configuration management
//! - Credential sources and resolution
//! - Gemini API client
//! - Prompt input and result export
//! - Logging infrastructure
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod credentials;
pub mod export;
pub mod gemini;
pub mod input;
pub mod logging;
