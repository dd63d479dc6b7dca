//! Error types for the notification pipeline.
//!
//! Each stage has its own enum so callers can tell a benign "nothing to do"
//! outcome apart from a genuine failure. The fetcher in particular reports an
//! empty category as `Ok(None)`, never as an error.

use std::path::PathBuf;

/// Errors from querying the arXiv API.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("arXiv API request failed: {message}")]
    Request { message: String },

    #[error("arXiv API returned status {status}")]
    Status { status: u16 },

    #[error("Failed to parse arXiv feed: {message}")]
    Parse { message: String },
}

/// Errors from the AI summarizer backends.
#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("Unknown AI backend '{name}' (expected 'gemini' or 'claude')")]
    UnknownBackend { name: String },

    #[error("No API key configured for the {backend} backend (set {var})")]
    AuthMissing {
        backend: &'static str,
        var: &'static str,
    },

    #[error("{backend} API request failed: {message}")]
    Request {
        backend: &'static str,
        message: String,
    },

    #[error("{backend} API returned an error: {message}")]
    Api {
        backend: &'static str,
        message: String,
    },

    #[error("Failed to parse {backend} response: {message}")]
    Parse {
        backend: &'static str,
        message: String,
    },

    #[error("Summary text is missing the {section} section")]
    MissingSection { section: &'static str },

    #[error("Summary text contains no Q&A pairs")]
    NoQaPairs,
}

/// Errors from delivering a notification to Slack.
#[derive(Debug, thiserror::Error)]
pub enum DeliverError {
    #[error("No Slack channel configured for category '{category}' and no default entry")]
    NoDestination { category: String },

    #[error("Slack API request failed: {message}")]
    Request { message: String },

    #[error("Slack API returned an error: {message}")]
    Api { message: String },
}

/// Errors from reading or replacing the persisted category list.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Category list must contain at least one tag")]
    EmptyList,

    #[error("Category tags cannot be blank")]
    BlankTag,

    #[error("Failed to read category file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write category file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Category file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::Status { status: 503 };
        assert_eq!(err.to_string(), "arXiv API returned status 503");
    }

    #[test]
    fn test_unknown_backend_names_the_backend() {
        let err = SummarizeError::UnknownBackend {
            name: "gpt".to_string(),
        };
        assert!(err.to_string().contains("'gpt'"));
        assert!(err.to_string().contains("gemini"));
    }

    #[test]
    fn test_no_destination_names_the_category() {
        let err = DeliverError::NoDestination {
            category: "cs.AI".to_string(),
        };
        assert!(err.to_string().contains("cs.AI"));
        assert!(err.to_string().contains("default"));
    }

    #[test]
    fn test_store_error_includes_path() {
        let err = StoreError::Read {
            path: PathBuf::from("/tmp/config.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("/tmp/config.json"));
    }
}
