use async_trait::async_trait;

use super::errors::GenerationError;
use crate::domain::models::{GenerateContentRequest, GenerateContentResponse};

/// Port for a hosted generative model that can ground answers in web search.
///
/// The API key is bound into the implementation when it is constructed; callers
/// never pass or read credentials per request.
///
/// # Usage
///
/// ```ignore
/// let request = GenerateContentRequest::grounded("What are the best ETFs?");
/// let response = client.generate_content("gemini-2.5-flash", &request).await?;
/// let queries = response
///     .first_candidate()
///     .and_then(|c| c.grounding_metadata.as_ref())
///     .and_then(|m| m.web_search_queries.clone())
///     .unwrap_or_default();
/// ```
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Submit one request and wait for the complete response.
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenerationError>;
}
