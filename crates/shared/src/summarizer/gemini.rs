//! Google Gemini backend.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::error::SummarizeError;
use crate::models::{PaperRecord, SummaryResult};

use super::Summarizer;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini speaks the generateContent API; auth rides in a `?key=` query
/// parameter rather than a header.
pub struct GeminiBackend {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiBackend {
    pub fn new(api_key: String, model: String) -> Result<Self, SummarizeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| SummarizeError::Request {
                backend: "Gemini",
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    fn endpoint_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            BASE_URL, self.model, self.api_key
        )
    }

    fn extract_text(body: &Value) -> Result<String, SummarizeError> {
        let parts = body["candidates"]
            .get(0)
            .and_then(|candidate| candidate["content"]["parts"].as_array())
            .ok_or_else(|| SummarizeError::Parse {
                backend: "Gemini",
                message: "missing candidates/content/parts in response".to_string(),
            })?;

        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(SummarizeError::Parse {
                backend: "Gemini",
                message: "response contained no text parts".to_string(),
            });
        }
        Ok(text)
    }
}

#[async_trait]
impl Summarizer for GeminiBackend {
    async fn summarize(
        &self,
        paper: &PaperRecord,
        language: &str,
    ) -> Result<SummaryResult, SummarizeError> {
        let prompt = super::build_prompt(paper, language);

        let body = serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": prompt}]
            }],
            "generationConfig": {
                "maxOutputTokens": 2048,
                "temperature": 0.7
            }
        });

        let response = self
            .client
            .post(self.endpoint_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| SummarizeError::Request {
                backend: "Gemini",
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            return Err(SummarizeError::Api {
                backend: "Gemini",
                message: format!("{} - {}", status, error_text),
            });
        }

        let response_json: Value =
            response.json().await.map_err(|e| SummarizeError::Parse {
                backend: "Gemini",
                message: e.to_string(),
            })?;

        let text = Self::extract_text(&response_json)?;
        super::parse_summary_text(&text)
    }

    fn name(&self) -> &'static str {
        "Gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_url_contains_model_and_key() {
        let backend =
            GeminiBackend::new("test-key".to_string(), "gemini-2.0-flash-lite".to_string())
                .unwrap();
        let url = backend.endpoint_url();

        assert_eq!(
            url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash-lite:generateContent?key=test-key"
        );
    }

    #[test]
    fn test_extract_text_from_candidates() {
        let body = json!({
            "candidates": [{
                "content": {
                    "parts": [{"text": "hello"}],
                    "role": "model"
                },
                "finishReason": "STOP"
            }]
        });

        assert_eq!(GeminiBackend::extract_text(&body).unwrap(), "hello");
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body = json!({
            "candidates": [{
                "content": {
                    "parts": [{"text": "hel"}, {"text": "lo"}]
                }
            }]
        });

        assert_eq!(GeminiBackend::extract_text(&body).unwrap(), "hello");
    }

    #[test]
    fn test_extract_text_missing_candidates() {
        let body = json!({"error": {"message": "quota exceeded"}});

        let err = GeminiBackend::extract_text(&body).unwrap_err();

        assert!(matches!(err, SummarizeError::Parse { .. }));
    }

    #[test]
    fn test_extract_text_empty_parts() {
        let body = json!({
            "candidates": [{
                "content": {"parts": []}
            }]
        });

        let err = GeminiBackend::extract_text(&body).unwrap_err();

        assert!(matches!(err, SummarizeError::Parse { .. }));
    }
}
