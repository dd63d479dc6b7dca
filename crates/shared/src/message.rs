//! Notification payload assembly.
//!
//! Pure formatting: given a paper and its summary, produce the exact Slack
//! message that will be posted. Nothing here touches the network or a clock,
//! so the output can be asserted byte for byte.

use serde::Serialize;

use crate::latex::format_latex_for_slack;
use crate::models::{PaperRecord, SummaryResult};

/// A Slack Block Kit section.
#[derive(Debug, Clone, Serialize)]
pub struct SlackBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: SlackText,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlackText {
    #[serde(rename = "type")]
    pub text_type: String,
    pub text: String,
}

impl SlackBlock {
    fn section(text: String) -> Self {
        Self {
            block_type: "section".to_string(),
            text: SlackText {
                text_type: "mrkdwn".to_string(),
                text,
            },
        }
    }
}

/// The composed message handed to the dispatcher.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationPayload {
    /// Plain-text fallback shown in desktop and push notifications.
    pub text: String,
    pub blocks: Vec<SlackBlock>,
}

/// Build the notification message for one summarized paper.
///
/// Layout: translated title as the heading, then the original title, the
/// link, the authors in the order the paper lists them, the publication
/// date, the translated abstract, and finally the Q&A pairs in the order
/// the backend produced them. Two blocks keep each section under Slack's
/// per-block text limit.
pub fn build_payload(paper: &PaperRecord, summary: &SummaryResult) -> NotificationPayload {
    let translated_title = format_latex_for_slack(&summary.translated_title);
    let original_title = format_latex_for_slack(&paper.title);
    let translated_summary = format_latex_for_slack(&summary.translated_summary);

    let body = format!(
        "*【Title】*\n{}\n\n*【Original Title】*\n{}\n\n*【URL】*\n{}\n\n*【Authors】*\n{}\n\n*【Published】*\n{}\n\n*【Summary】*\n{}",
        translated_title,
        original_title,
        paper.url,
        paper.authors.join(", "),
        paper.published,
        translated_summary,
    );

    let qa_text = summary
        .qa_pairs
        .iter()
        .enumerate()
        .map(|(i, pair)| {
            format!(
                "Q{}: {}\nA{}: {}",
                i + 1,
                format_latex_for_slack(&pair.question),
                i + 1,
                format_latex_for_slack(&pair.answer),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    let qa_block = format!("*【Key Q&A】*\n{}", qa_text);

    NotificationPayload {
        text: format!("{} - {}", translated_title, paper.url),
        blocks: vec![SlackBlock::section(body), SlackBlock::section(qa_block)],
    }
}
