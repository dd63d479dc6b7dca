use serde::{Deserialize, Serialize};

/// One preprint fetched from arXiv.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperRecord {
    /// Short arXiv identifier, e.g. "2503.01234v1".
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    /// Abstract text as published, in the source language.
    pub summary: String,
    /// Link to the abstract page.
    pub url: String,
    /// Submission date formatted as YYYY-MM-DD, or "Unknown".
    pub published: String,
    /// Category tag the paper was fetched under.
    pub category: String,
}

/// What an AI backend produces for one paper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResult {
    pub translated_title: String,
    pub translated_summary: String,
    pub qa_pairs: Vec<QaPair>,
}

/// One question/answer pair highlighting a key point of the paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}
