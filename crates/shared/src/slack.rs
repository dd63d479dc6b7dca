//! Slack delivery.
//!
//! Routes a finished payload to the channel mapped for its category and
//! posts it. Delivery is fire-and-forget: a failed post surfaces as an
//! error and is never retried.

use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::DeliverError;
use crate::message::{NotificationPayload, SlackBlock};

const POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

/// Reserved key routing categories that have no entry of their own.
pub const DEFAULT_CHANNEL_KEY: &str = "default";

/// Category-to-channel routing table.
#[derive(Debug, Clone, Default)]
pub struct ChannelMap {
    channels: HashMap<String, String>,
}

impl ChannelMap {
    /// Parse the `SLACK_CHANNELS` format: comma-separated `tag:channel`
    /// entries. A bare entry with no tag sets the default channel.
    ///
    /// `"cs.AI:C01ABC,default:C02DEF"` and `"C02DEF"` are both valid.
    pub fn parse(raw: &str) -> Self {
        let mut channels = HashMap::new();
        for entry in raw.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            match entry.split_once(':') {
                Some((tag, channel)) => {
                    let (tag, channel) = (tag.trim(), channel.trim());
                    if !tag.is_empty() && !channel.is_empty() {
                        channels.insert(tag.to_string(), channel.to_string());
                    }
                }
                None => {
                    channels.insert(DEFAULT_CHANNEL_KEY.to_string(), entry.to_string());
                }
            }
        }
        Self { channels }
    }

    /// Channel for `category`, falling back to the default entry.
    pub fn resolve(&self, category: &str) -> Result<&str, DeliverError> {
        self.channels
            .get(category)
            .or_else(|| self.channels.get(DEFAULT_CHANNEL_KEY))
            .map(String::as_str)
            .ok_or_else(|| DeliverError::NoDestination {
                category: category.to_string(),
            })
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

#[derive(Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    blocks: Option<&'a [SlackBlock]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thread_ts: Option<&'a str>,
}

#[derive(Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    ts: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub struct SlackClient {
    client: Client,
    token: String,
    channels: ChannelMap,
}

impl SlackClient {
    pub fn new(token: String, channels: ChannelMap) -> Result<Self, DeliverError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DeliverError::Request {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            token,
            channels,
        })
    }

    /// Post `payload` to the channel resolved for `category`.
    ///
    /// A short dated parent message goes out first; the payload itself is
    /// posted as a reply in its thread, keeping channel history compact.
    pub async fn dispatch(
        &self,
        payload: &NotificationPayload,
        category: &str,
    ) -> Result<(), DeliverError> {
        let channel = self.channels.resolve(category)?;

        let parent_text = format!("📢 *Latest arXiv paper - {}*", Utc::now().format("%Y-%m-%d"));
        let thread_ts = self
            .post_message(&PostMessageRequest {
                channel,
                text: &parent_text,
                blocks: None,
                thread_ts: None,
            })
            .await?;

        self.post_message(&PostMessageRequest {
            channel,
            text: &payload.text,
            blocks: Some(&payload.blocks),
            thread_ts: Some(&thread_ts),
        })
        .await?;

        Ok(())
    }

    /// Slack reports failures with HTTP 200 and `"ok": false`, so the body
    /// is checked as well as the status.
    async fn post_message(
        &self,
        request: &PostMessageRequest<'_>,
    ) -> Result<String, DeliverError> {
        let response = self
            .client
            .post(POST_MESSAGE_URL)
            .header("Authorization", format!("Bearer {}", self.token))
            .json(request)
            .send()
            .await
            .map_err(|e| DeliverError::Request {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            return Err(DeliverError::Api {
                message: format!("{} - {}", status, error_text),
            });
        }

        let body: PostMessageResponse =
            response.json().await.map_err(|e| DeliverError::Api {
                message: format!("Failed to parse Slack response: {}", e),
            })?;

        if !body.ok {
            return Err(DeliverError::Api {
                message: body.error.unwrap_or_else(|| String::from("unknown error")),
            });
        }

        body.ts.ok_or_else(|| DeliverError::Api {
            message: String::from("Slack response missing message timestamp"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== ChannelMap Tests ====================

    #[test]
    fn test_parse_tagged_entries() {
        let map = ChannelMap::parse("cs.AI:C01ABC,cs.CL:C02DEF");

        assert_eq!(map.resolve("cs.AI").unwrap(), "C01ABC");
        assert_eq!(map.resolve("cs.CL").unwrap(), "C02DEF");
    }

    #[test]
    fn test_parse_bare_entry_becomes_default() {
        let map = ChannelMap::parse("C03GHI");

        assert_eq!(map.resolve("anything").unwrap(), "C03GHI");
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        let map = ChannelMap::parse(" cs.AI : C01ABC , default : C02DEF ");

        assert_eq!(map.resolve("cs.AI").unwrap(), "C01ABC");
        assert_eq!(map.resolve("cs.CV").unwrap(), "C02DEF");
    }

    #[test]
    fn test_parse_empty_string() {
        assert!(ChannelMap::parse("").is_empty());
        assert!(ChannelMap::parse(" , ,").is_empty());
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let map = ChannelMap::parse("cs.AI:C01ABC,default:C00XYZ");

        assert_eq!(map.resolve("cs.AI").unwrap(), "C01ABC");
        assert_eq!(map.resolve("hep-th").unwrap(), "C00XYZ");
    }

    #[test]
    fn test_resolve_without_default_fails() {
        let map = ChannelMap::parse("cs.AI:C01ABC");

        let err = map.resolve("hep-th").unwrap_err();

        assert!(matches!(err, DeliverError::NoDestination { .. }));
        assert!(err.to_string().contains("hep-th"));
    }

    // ==================== Wire Format Tests ====================

    #[test]
    fn test_request_omits_empty_optionals() {
        let request = PostMessageRequest {
            channel: "C01ABC",
            text: "parent",
            blocks: None,
            thread_ts: None,
        };

        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["channel"], "C01ABC");
        assert!(value.get("blocks").is_none());
        assert!(value.get("thread_ts").is_none());
    }

    #[test]
    fn test_request_includes_thread_ts_for_replies() {
        let request = PostMessageRequest {
            channel: "C01ABC",
            text: "reply",
            blocks: None,
            thread_ts: Some("1712345678.000100"),
        };

        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["thread_ts"], "1712345678.000100");
    }

    #[test]
    fn test_response_with_ok_and_ts() {
        let raw = r#"{"ok": true, "channel": "C01ABC", "ts": "1712345678.000100"}"#;

        let response: PostMessageResponse = serde_json::from_str(raw).unwrap();

        assert!(response.ok);
        assert_eq!(response.ts.as_deref(), Some("1712345678.000100"));
    }

    #[test]
    fn test_response_with_error() {
        let raw = r#"{"ok": false, "error": "channel_not_found"}"#;

        let response: PostMessageResponse = serde_json::from_str(raw).unwrap();

        assert!(!response.ok);
        assert_eq!(response.error.as_deref(), Some("channel_not_found"));
    }
}
