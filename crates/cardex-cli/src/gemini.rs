//! Gemini client for the generative extraction path.
//!
//! The API key is read from the environment variable named in the
//! configuration and sent in the `x-goog-api-key` header. The model is
//! asked for a JSON reply; the pipeline validates it before trusting it.

use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::runtime::Handle;
use tracing::{debug, info};

use cardex_core::error::GenerativeError;
use cardex_core::models::GenerativeConfig;
use cardex_core::{GenerativeExtractor, GenerativeRequest};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Blocking facade over the async HTTP client.
///
/// `generate` must run on a blocking worker of the runtime whose handle
/// was captured at construction.
pub struct GeminiExtractor {
    client: reqwest::Client,
    handle: Handle,
    model: String,
    api_key: String,
}

impl GeminiExtractor {
    /// Build a client when the API key is set; `None` otherwise.
    pub fn from_config(config: &GenerativeConfig) -> anyhow::Result<Option<Self>> {
        let api_key = match std::env::var(&config.api_key_env) {
            Ok(key) if !key.trim().is_empty() => key,
            _ => {
                debug!("{} not set, generative extraction disabled", config.api_key_env);
                return Ok(None);
            }
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        info!("Generative extraction via {}", config.model);

        Ok(Some(Self {
            client,
            handle: Handle::current(),
            model: config.model.clone(),
            api_key,
        }))
    }

    /// POST request for one prompt, with the key in a header.
    fn build_request(&self, prompt: String) -> reqwest::Result<reqwest::Request> {
        self.client
            .post(endpoint(&self.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&serde_json::json!({
                "contents": [
                    {
                        "role": "user",
                        "parts": [{ "text": prompt }]
                    }
                ],
                "generationConfig": {
                    "temperature": 0.1,
                    "responseMimeType": "application/json"
                }
            }))
            .build()
    }

    async fn request(&self, prompt: String) -> Result<String, GenerativeError> {
        let start = Instant::now();

        let request = self.build_request(prompt).map_err(transport_error)?;
        let response = self
            .client
            .execute(request)
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerativeError::Unavailable(format!("{} returned {}: {}", self.model, status, body)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| GenerativeError::InvalidJson(e.without_url().to_string()))?;

        debug!("{} replied in {}ms", self.model, start.elapsed().as_millis());

        reply_text(&body)
            .map(str::to_string)
            .ok_or_else(|| GenerativeError::InvalidJson("no text in candidates".to_string()))
    }
}

impl GenerativeExtractor for GeminiExtractor {
    fn name(&self) -> &str {
        &self.model
    }

    fn generate(&self, request: &GenerativeRequest<'_>) -> Result<String, GenerativeError> {
        self.handle.block_on(self.request(request.prompt()))
    }
}

fn transport_error(e: reqwest::Error) -> GenerativeError {
    GenerativeError::Unavailable(format!("request failed: {}", e.without_url()))
}

/// `generateContent` URL for a model. Carries no credentials.
fn endpoint(model: &str) -> String {
    format!("{}/{}:generateContent", API_BASE, model)
}

/// Text of the first candidate's first part.
fn reply_text(body: &Value) -> Option<&str> {
    body.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_text() {
        let body = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"name\": \"Jane\"}" }] } }]
        });
        assert_eq!(reply_text(&body), Some("{\"name\": \"Jane\"}"));
        assert_eq!(reply_text(&serde_json::json!({ "candidates": [] })), None);
    }

    #[test]
    fn test_endpoint_has_no_key() {
        let url = endpoint("gemini-1.5-flash");
        assert_eq!(
            url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert!(!url.contains("key="));
    }

    #[tokio::test]
    async fn test_key_sent_as_header() {
        let extractor = GeminiExtractor {
            client: reqwest::Client::new(),
            handle: Handle::current(),
            model: "gemini-1.5-flash".to_string(),
            api_key: "secret-key-123".to_string(),
        };

        let request = extractor.build_request("hello".to_string()).unwrap();
        assert!(!request.url().as_str().contains("secret-key-123"));
        assert_eq!(request.headers()["x-goog-api-key"], "secret-key-123");
    }
}
