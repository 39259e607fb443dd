//! Credentials management infrastructure
//!
//! API key lookup over an explicit, ordered list of sources:
//! - Secrets file (TOML)
//! - Environment variable
//! - Interactive terminal input

pub mod resolver;
pub mod sources;

pub use resolver::{CredentialResolution, CredentialResolver, API_KEY_ENV_VAR};
pub use sources::{EnvVarSource, InteractiveSource, SecretsFileSource};
