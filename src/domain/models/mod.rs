pub mod config;
pub mod fan_out;
pub mod generation;
pub mod prompt;

pub use config::{Config, LoggingConfig};
pub use fan_out::{FanOutResult, QueryOutcome, ResultTable, NO_QUERIES_TEXT};
pub use generation::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GroundingMetadata,
    ListModelsResponse, ModelInfo, Part, Tool,
};
pub use prompt::{prompts_from_lines, Prompt, TargetMarket};
