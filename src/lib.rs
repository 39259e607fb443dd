//! Fanout - search fan-out capture for grounded Gemini answers
//!
//! Sends each prompt to a Gemini model with Google Search grounding enabled and
//! records the web search queries the model issued while answering. Results
//! are shown as a table and exported to a spreadsheet.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Prompts, results, wire types and ports
//! - **Service Layer** (`services`): The fan-out batch workflow
//! - **Infrastructure Layer** (`infrastructure`): Gemini client, credentials,
//!   configuration, logging, CSV input and spreadsheet export
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use fanout::domain::models::{Prompt, TargetMarket};
//! use fanout::domain::ports::ApiKey;
//! use fanout::infrastructure::gemini::{GeminiClient, GeminiClientConfig};
//! use fanout::services::FanOutService;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let key = ApiKey::new("AIza-your-key").unwrap();
//!     let client = GeminiClient::new(GeminiClientConfig::new(key))?;
//!     let service = FanOutService::new(Arc::new(client), "gemini-2.5-flash");
//!     let prompt = Prompt::new("best savings account").unwrap();
//!     let result = service.extract(&prompt, Some(TargetMarket::Denmark)).await;
//!     println!("{}", result.display_text());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Config, FanOutResult, LoggingConfig, Prompt, QueryOutcome, ResultTable, TargetMarket,
};
pub use domain::ports::{ApiKey, CredentialSource, GenerationError, GenerativeClient};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{BatchObserver, BatchReport, FanOutService};
