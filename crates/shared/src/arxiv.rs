//! arXiv paper fetcher.
//!
//! Queries the arXiv Atom API for the single newest submission in a category.
//! An empty category comes back as `Ok(None)`; only transport, HTTP and feed
//! parse problems surface as [`FetchError`].

use async_trait::async_trait;
use feed_rs::model::Entry;
use reqwest::Client;
use std::time::Duration;

use crate::error::FetchError;
use crate::models::PaperRecord;

const ARXIV_API_BASE: &str = "https://export.arxiv.org/api/query";

/// Source of the newest paper for a category tag.
///
/// The selector walks the priority list through this trait, so tests can swap
/// in a canned source.
#[async_trait]
pub trait PaperSource: Send + Sync {
    async fn fetch_latest(&self, category: &str) -> Result<Option<PaperRecord>, FetchError>;
}

pub struct ArxivClient {
    client: Client,
}

impl ArxivClient {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FetchError::Request {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }

    fn query_url(category: &str) -> String {
        format!(
            "{}?search_query={}&max_results=1&sortBy=submittedDate&sortOrder=descending",
            ARXIV_API_BASE,
            urlencoding::encode(&format!("cat:{}", category))
        )
    }
}

#[async_trait]
impl PaperSource for ArxivClient {
    async fn fetch_latest(&self, category: &str) -> Result<Option<PaperRecord>, FetchError> {
        let url = Self::query_url(category);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| FetchError::Request {
            message: format!("Failed to read response body: {}", e),
        })?;

        let feed = feed_rs::parser::parse(&body[..]).map_err(|e| FetchError::Parse {
            message: e.to_string(),
        })?;

        Ok(feed
            .entries
            .into_iter()
            .next()
            .map(|entry| entry_to_record(entry, category)))
    }
}

fn entry_to_record(entry: Entry, category: &str) -> PaperRecord {
    let authors = entry.authors.iter().map(|a| a.name.clone()).collect();

    // The Atom id doubles as the abstract page URL when no alternate link
    // is present.
    let url = entry
        .links
        .iter()
        .find(|l| l.media_type.as_deref() == Some("text/html"))
        .map(|l| l.href.clone())
        .unwrap_or_else(|| entry.id.clone());

    let published = entry
        .published
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    PaperRecord {
        id: short_id(&entry.id),
        title: entry
            .title
            .map(|t| normalize_whitespace(&t.content))
            .unwrap_or_default(),
        authors,
        summary: entry
            .summary
            .map(|s| normalize_whitespace(&s.content))
            .unwrap_or_default(),
        url,
        published,
        category: category.to_string(),
    }
}

/// Short arXiv identifier (with version suffix) from the entry's id URL.
fn short_id(id_url: &str) -> String {
    match id_url.find("/abs/") {
        Some(pos) => id_url[pos + 5..].to_string(),
        None => id_url.to_string(),
    }
}

/// Collapse the hard-wrapped lines arXiv puts in titles and abstracts.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
