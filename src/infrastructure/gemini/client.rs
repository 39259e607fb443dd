use async_trait::async_trait;
use reqwest::{header, Client as ReqwestClient, Response};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::errors::GeminiApiError;
use crate::domain::models::{
    Config, GenerateContentRequest, GenerateContentResponse, ListModelsResponse, ModelInfo,
};
use crate::domain::ports::{ApiKey, GenerationError, GenerativeClient};
use crate::infrastructure::logging::scrub_secrets;

/// Public Generative Language API endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Configuration for the Gemini HTTP client
#[derive(Debug, Clone)]
pub struct GeminiClientConfig {
    /// API key sent in the `x-goog-api-key` header
    pub api_key: ApiKey,

    /// Base URL for the API
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GeminiClientConfig {
    /// Default endpoint and timeout for `api_key`.
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 120,
        }
    }

    /// Endpoint and timeout taken from the loaded configuration.
    pub fn from_config(config: &Config, api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: config.base_url.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

/// HTTP client for the Gemini `generateContent` and `models` endpoints
///
/// Requests are plain request/response calls; there is no retry and no
/// client-side rate limiting here. Callers pace themselves.
pub struct GeminiClient {
    http_client: ReqwestClient,
    base_url: String,
}

impl GeminiClient {
    /// Create a new Gemini API client
    ///
    /// # Example
    /// ```no_run
    /// use fanout::domain::ports::ApiKey;
    /// use fanout::infrastructure::gemini::{GeminiClient, GeminiClientConfig};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let key = ApiKey::new("AIza-your-key").unwrap();
    /// let client = GeminiClient::new(GeminiClientConfig::new(key))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: GeminiClientConfig) -> Result<Self, GeminiApiError> {
        info!(
            "Initializing Gemini API client: base_url={}, timeout={}s, api_key={}",
            config.base_url, config.timeout_secs, config.api_key
        );

        let mut api_key = header::HeaderValue::from_str(config.api_key.expose())
            .map_err(|e| GeminiApiError::InvalidRequest(format!("Invalid API key: {e}")))?;
        api_key.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert("x-goog-api-key", api_key);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .tcp_nodelay(true)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Send one `generateContent` request.
    #[instrument(skip(self, request), fields(model = %model, tools = request.tools.len()))]
    pub async fn send_generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiApiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url,
            model_id(model)
        );
        debug!("POST {}", url);

        let response = self.http_client.post(&url).json(request).send().await?;
        let body = Self::read_success_body(response).await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "generateContent succeeded: prompt_tokens={}, candidate_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(parsed)
    }

    /// List every model visible to this key, following pagination.
    #[instrument(skip(self))]
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, GeminiApiError> {
        let url = format!("{}/v1beta/models", self.base_url);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.http_client.get(&url).query(&[("pageSize", "100")]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let body = Self::read_success_body(request.send().await?).await?;
            let page: ListModelsResponse = serde_json::from_str(&body)?;
            models.extend(page.models);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!("Listed {} models", models.len());
        Ok(models)
    }

    /// Return the body of a 2xx response, or the classified error.
    async fn read_success_body(response: Response) -> Result<String, GeminiApiError> {
        let status = response.status();
        debug!("Response status: {}", status);

        let body = response.text().await?;
        if status.is_success() {
            return Ok(body);
        }

        let body = scrub_secrets(&body);
        warn!("API error ({}): {}", status, body);
        Err(GeminiApiError::from_status(status, &body))
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenerationError> {
        self.send_generate_content(model, request)
            .await
            .map_err(GenerationError::from)
    }
}

/// Accept both `gemini-2.5-flash` and `models/gemini-2.5-flash`.
fn model_id(model: &str) -> &str {
    model.strip_prefix("models/").unwrap_or(model)
}
