//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use fanout::domain::ports::ApiKey;
use fanout::infrastructure::gemini::{GeminiClient, GeminiClientConfig};

/// Key accepted by the mock server in every test.
pub const TEST_API_KEY: &str = "AIzaSyIntegrationTestKey0123456789";

/// Path the client posts to for the default model.
pub const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Write `contents` to `name` inside `dir` and return the path.
pub fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("Failed to write fixture");
    path
}

/// Client pointed at a mock server.
pub fn client_for(base_url: &str) -> Arc<GeminiClient> {
    let mut config = GeminiClientConfig::new(ApiKey::new(TEST_API_KEY).unwrap());
    config.base_url = base_url.to_string();
    config.timeout_secs = 5;
    Arc::new(GeminiClient::new(config).expect("Failed to create client"))
}

/// A `generateContent` body whose first candidate searched for `queries`.
pub fn grounded_body(queries: &[&str]) -> String {
    serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": "Here is a detailed answer."}]},
            "finishReason": "STOP",
            "groundingMetadata": {
                "webSearchQueries": queries,
                "groundingChunks": [
                    {"web": {"uri": "https://example.com/a", "title": "example.com"}}
                ]
            }
        }],
        "usageMetadata": {"promptTokenCount": 42, "candidatesTokenCount": 256, "totalTokenCount": 298},
        "modelVersion": "gemini-2.5-flash"
    })
    .to_string()
}

/// A `generateContent` body answered without searching.
pub fn ungrounded_body() -> String {
    serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": "2 + 2 = 4"}]},
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

/// Google's error envelope.
pub fn error_body(code: u16, status: &str, message: &str) -> String {
    serde_json::json!({
        "error": {"code": code, "message": message, "status": status}
    })
    .to_string()
}
