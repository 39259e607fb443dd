use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::models::{
    FanOutResult, GenerateContentRequest, GenerateContentResponse, Prompt, ResultTable,
    TargetMarket,
};
use crate::domain::ports::GenerativeClient;

/// Pause between two successive requests unless configured otherwise.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(2000);

/// Prefix of the batch-level failure message.
pub const CRITICAL_ERROR_PREFIX: &str = "Critical system error: ";

/// Instruction text sent for one prompt.
pub fn build_instruction(prompt: &Prompt, market: TargetMarket) -> String {
    format!(
        "Context: Target market is {market}.\nUser Query: {prompt}\n\n\
         Please perform a comprehensive search to provide a detailed answer. \
         Cover all aspects including intent, competitors, and background."
    )
}

/// Grounded request for one prompt.
pub fn build_request(prompt: &Prompt, market: TargetMarket) -> GenerateContentRequest {
    GenerateContentRequest::grounded(build_instruction(prompt, market))
}

/// Search queries reported by the first candidate, verbatim.
///
/// A missing candidate, grounding block or query list all mean the model
/// answered without searching.
pub fn extract_queries(response: &GenerateContentResponse) -> Vec<String> {
    response
        .first_candidate()
        .and_then(|c| c.grounding_metadata.as_ref())
        .and_then(|m| m.web_search_queries.clone())
        .unwrap_or_default()
}

/// Receives progress while a batch runs.
///
/// Returning an error from [`on_result`](Self::on_result) aborts the batch.
pub trait BatchObserver: Send {
    /// Called once before the first request.
    fn on_start(&mut self, _total: usize) {}

    /// Called before the request for `prompt` is sent.
    fn on_prompt(&mut self, _index: usize, _prompt: &Prompt) {}

    /// Called after each result is appended to the table.
    fn on_result(&mut self, index: usize, result: &FanOutResult) -> Result<()>;
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl BatchObserver for SilentObserver {
    fn on_result(&mut self, _index: usize, _result: &FanOutResult) -> Result<()> {
        Ok(())
    }
}

/// Outcome of one batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Identifier for correlating logs of one run
    pub run_id: Uuid,
    /// Model the requests were sent to
    pub model: String,
    /// Market interpolated into every request
    pub market: TargetMarket,
    /// Results in input order
    pub results: ResultTable,
    /// Batch-level failure; results gathered before it are kept
    pub aborted: Option<String>,
    /// When the first request was about to be sent
    pub started_at: DateTime<Utc>,
    /// When the loop ended
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    /// Whether every prompt was processed.
    pub const fn completed(&self) -> bool {
        self.aborted.is_none()
    }
}

/// Runs prompts through a grounded model and collects the search queries it issued.
///
/// Prompts are processed one at a time in input order with a fixed pause
/// between requests. Per-prompt failures become failed rows; they never stop
/// the batch.
///
/// # Examples
///
/// ```no_run
/// use fanout::domain::models::{Prompt, TargetMarket};
/// use fanout::domain::ports::GenerativeClient;
/// use fanout::services::FanOutService;
/// use std::sync::Arc;
///
/// # async fn example(client: Arc<dyn GenerativeClient>) {
/// let service = FanOutService::new(client, "gemini-2.5-flash");
/// let prompt = Prompt::new("best index funds").unwrap();
/// let result = service.extract(&prompt, Some(TargetMarket::Norway)).await;
/// println!("{}", result.display_text());
/// # }
/// ```
pub struct FanOutService {
    client: Arc<dyn GenerativeClient>,
    model: String,
    delay: Duration,
}

impl FanOutService {
    /// Create a service with the default request delay
    pub fn new(client: Arc<dyn GenerativeClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            delay: DEFAULT_REQUEST_DELAY,
        }
    }

    /// Set the pause between successive requests
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Model requests are sent to.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one prompt and capture the queries, or the error, as a result row.
    ///
    /// A missing market means Denmark.
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    pub async fn extract(&self, prompt: &Prompt, market: Option<TargetMarket>) -> FanOutResult {
        let market = market.unwrap_or_default();
        let request = build_request(prompt, market);

        match self.client.generate_content(&self.model, &request).await {
            Ok(response) => {
                let queries = extract_queries(&response);
                debug!(queries = queries.len(), "fan-out extracted");
                FanOutResult::with_queries(prompt, queries)
            }
            Err(e) => {
                warn!(prompt = %prompt, error = %e, "request failed");
                FanOutResult::failed(prompt, e.to_string())
            }
        }
    }

    /// Process prompts in order, pausing between requests.
    ///
    /// Stops early only when the observer fails; that failure is recorded in
    /// [`BatchReport::aborted`] and the rows gathered so far are kept.
    #[instrument(skip_all, fields(prompts = prompts.len(), market = %market))]
    pub async fn process_batch(
        &self,
        prompts: &[Prompt],
        market: TargetMarket,
        observer: &mut dyn BatchObserver,
    ) -> BatchReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(%run_id, model = %self.model, "starting fan-out batch");

        observer.on_start(prompts.len());
        let mut results = ResultTable::new();
        let mut aborted = None;

        for (index, prompt) in prompts.iter().enumerate() {
            if index > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            observer.on_prompt(index, prompt);
            let result = self.extract(prompt, Some(market)).await;
            results.push(result);

            let latest = &results.rows()[index];
            if let Err(e) = observer.on_result(index, latest) {
                let message = format!("{CRITICAL_ERROR_PREFIX}{e:#}");
                warn!(%run_id, index, "{message}");
                aborted = Some(message);
                break;
            }
        }

        info!(
            %run_id,
            processed = results.len(),
            failed = results.failed_count(),
            queries = results.query_count(),
            "fan-out batch finished"
        );

        BatchReport {
            run_id,
            model: self.model.clone(),
            market,
            results,
            aborted,
            started_at,
            finished_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Candidate, GroundingMetadata, QueryOutcome};
    use crate::domain::ports::GenerationError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Instant;

    /// Returns scripted responses in order and records every request.
    struct ScriptedClient {
        replies: Mutex<VecDeque<Result<GenerateContentResponse, GenerationError>>>,
        requests: Mutex<Vec<(String, GenerateContentRequest)>>,
    }

    impl ScriptedClient {
        fn new(replies: Vec<Result<GenerateContentResponse, GenerationError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn sent(&self) -> Vec<(String, GenerateContentRequest)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerativeClient for ScriptedClient {
        async fn generate_content(
            &self,
            model: &str,
            request: &GenerateContentRequest,
        ) -> Result<GenerateContentResponse, GenerationError> {
            self.requests
                .lock()
                .unwrap()
                .push((model.to_string(), request.clone()));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GenerationError::ApiError("no scripted reply".into())))
        }
    }

    fn grounded(queries: &[&str]) -> GenerateContentResponse {
        GenerateContentResponse {
            candidates: vec![Candidate {
                grounding_metadata: Some(GroundingMetadata {
                    web_search_queries: Some(queries.iter().map(|q| (*q).to_string()).collect()),
                    ..Default::default()
                }),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn prompt(text: &str) -> Prompt {
        Prompt::new(text).unwrap()
    }

    fn service(client: Arc<ScriptedClient>) -> FanOutService {
        FanOutService::new(client, "gemini-2.5-flash").with_delay(Duration::ZERO)
    }

    #[derive(Default)]
    struct Recorder {
        total: Option<usize>,
        seen: Vec<usize>,
        fail_at: Option<usize>,
    }

    impl BatchObserver for Recorder {
        fn on_start(&mut self, total: usize) {
            self.total = Some(total);
        }

        fn on_result(&mut self, index: usize, _result: &FanOutResult) -> Result<()> {
            self.seen.push(index);
            if self.fail_at == Some(index) {
                anyhow::bail!("progress display closed");
            }
            Ok(())
        }
    }

    #[test]
    fn test_build_instruction() {
        let text = build_instruction(&prompt("Billig strøm"), TargetMarket::Norway);
        assert_eq!(
            text,
            "Context: Target market is Norway.\nUser Query: Billig strøm\n\n\
             Please perform a comprehensive search to provide a detailed answer. \
             Cover all aspects including intent, competitors, and background."
        );
    }

    #[test]
    fn test_build_request_attaches_search_tool() {
        let request = build_request(&prompt("x"), TargetMarket::Denmark);
        assert!(request.has_search_tool());
        assert_eq!(request.contents.len(), 1);
    }

    #[test]
    fn test_extract_queries_missing_pieces() {
        assert!(extract_queries(&GenerateContentResponse::default()).is_empty());

        let no_metadata = GenerateContentResponse {
            candidates: vec![Candidate::default()],
            ..Default::default()
        };
        assert!(extract_queries(&no_metadata).is_empty());

        let no_queries = GenerateContentResponse {
            candidates: vec![Candidate {
                grounding_metadata: Some(GroundingMetadata::default()),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(extract_queries(&no_queries).is_empty());
    }

    #[test]
    fn test_extract_queries_verbatim() {
        let response = grounded(&["b", "a", "b"]);
        assert_eq!(extract_queries(&response), vec!["b", "a", "b"]);
    }

    #[tokio::test]
    async fn test_extract_success() {
        let client = ScriptedClient::new(vec![Ok(grounded(&["a", "b", "c"]))]);
        let result = service(client.clone())
            .extract(&prompt("best ETFs"), None)
            .await;

        assert_eq!(result.original_prompt, "best ETFs");
        assert_eq!(result.display_text(), "• a\n• b\n• c");

        let sent = client.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "gemini-2.5-flash");
        let text = sent[0].1.contents[0].parts[0].text.clone().unwrap();
        assert!(text.starts_with("Context: Target market is Denmark."));
    }

    #[tokio::test]
    async fn test_extract_failure_is_captured() {
        let client = ScriptedClient::new(vec![Err(GenerationError::RateLimitExceeded(
            "slow down".into(),
        ))]);
        let result = service(client).extract(&prompt("q"), None).await;

        assert!(result.queries().is_none());
        assert_eq!(
            result.outcome,
            QueryOutcome::Failed("Quota or rate limit exceeded: slow down".into())
        );
    }

    #[tokio::test]
    async fn test_batch_continues_after_failure() {
        let client = ScriptedClient::new(vec![
            Ok(grounded(&["one"])),
            Err(GenerationError::Timeout),
            Ok(GenerateContentResponse::default()),
        ]);
        let prompts = vec![prompt("p1"), prompt("p2"), prompt("p3")];
        let mut recorder = Recorder::default();

        let report = service(client)
            .process_batch(&prompts, TargetMarket::Sweden, &mut recorder)
            .await;

        assert!(report.completed());
        assert_eq!(report.results.len(), 3);
        assert_eq!(report.results.failed_count(), 1);
        let order: Vec<&str> = report
            .results
            .rows()
            .iter()
            .map(|r| r.original_prompt.as_str())
            .collect();
        assert_eq!(order, vec!["p1", "p2", "p3"]);
        assert_eq!(recorder.total, Some(3));
        assert_eq!(recorder.seen, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_observer_failure_aborts_batch() {
        let client = ScriptedClient::new(vec![Ok(grounded(&["a"])), Ok(grounded(&["b"]))]);
        let prompts = vec![prompt("p1"), prompt("p2"), prompt("p3")];
        let mut recorder = Recorder {
            fail_at: Some(1),
            ..Default::default()
        };

        let report = service(client.clone())
            .process_batch(&prompts, TargetMarket::Denmark, &mut recorder)
            .await;

        assert!(!report.completed());
        assert_eq!(
            report.aborted.as_deref(),
            Some("Critical system error: progress display closed")
        );
        assert_eq!(report.results.len(), 2);
        assert_eq!(client.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_delay_only_between_requests() {
        let delay = Duration::from_millis(30);
        let client =
            ScriptedClient::new(vec![Ok(grounded(&[])), Ok(grounded(&[])), Ok(grounded(&[]))]);
        let service = FanOutService::new(client, "m").with_delay(delay);
        let prompts = vec![prompt("a"), prompt("b"), prompt("c")];

        let start = Instant::now();
        let report = service
            .process_batch(&prompts, TargetMarket::Denmark, &mut SilentObserver)
            .await;

        assert_eq!(report.results.len(), 3);
        assert!(start.elapsed() >= delay * 2);
    }

    #[tokio::test]
    async fn test_single_prompt_is_not_delayed() {
        let client = ScriptedClient::new(vec![Ok(grounded(&[]))]);
        let service = FanOutService::new(client, "m").with_delay(Duration::from_secs(60));

        let start = Instant::now();
        service
            .process_batch(&[prompt("only")], TargetMarket::Denmark, &mut SilentObserver)
            .await;

        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
