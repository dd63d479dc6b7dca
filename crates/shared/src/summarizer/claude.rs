//! Anthropic Claude backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::SummarizeError;
use crate::models::{PaperRecord, SummaryResult};

use super::Summarizer;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_MODEL: &str = "claude-3-5-haiku-20241022";

#[derive(Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ClaudeResponse {
    content: Vec<Content>,
}

#[derive(Deserialize)]
struct Content {
    text: String,
}

/// Claude speaks the Messages API with header auth.
pub struct ClaudeBackend {
    client: Client,
    api_key: String,
    model: String,
}

impl ClaudeBackend {
    pub fn new(api_key: String) -> Result<Self, SummarizeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| SummarizeError::Request {
                backend: "Claude",
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            api_key,
            model: DEFAULT_MODEL.to_string(),
        })
    }
}

#[async_trait]
impl Summarizer for ClaudeBackend {
    async fn summarize(
        &self,
        paper: &PaperRecord,
        language: &str,
    ) -> Result<SummaryResult, SummarizeError> {
        let prompt = super::build_prompt(paper, language);

        let request = ClaudeRequest {
            model: self.model.clone(),
            max_tokens: 2048,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| SummarizeError::Request {
                backend: "Claude",
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            return Err(SummarizeError::Api {
                backend: "Claude",
                message: format!("{} - {}", status, error_text),
            });
        }

        let claude_response =
            response
                .json::<ClaudeResponse>()
                .await
                .map_err(|e| SummarizeError::Parse {
                    backend: "Claude",
                    message: e.to_string(),
                })?;

        let text = claude_response
            .content
            .first()
            .map(|c| c.text.clone())
            .ok_or_else(|| SummarizeError::Parse {
                backend: "Claude",
                message: "response contained no content blocks".to_string(),
            })?;

        super::parse_summary_text(&text)
    }

    fn name(&self) -> &'static str {
        "Claude"
    }
}
