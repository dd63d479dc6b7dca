//! Pluggable AI summarizer backends.
//!
//! Every backend receives the same prompt and must hand back the same
//! normalized [`SummaryResult`]. Callers pick a backend once at startup via
//! [`create_summarizer`] and only talk to the [`Summarizer`] trait after
//! that; nothing downstream knows which provider ran.

pub mod claude;
pub mod gemini;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Config;
use crate::error::SummarizeError;
use crate::models::{PaperRecord, QaPair, SummaryResult};

pub use claude::ClaudeBackend;
pub use gemini::GeminiBackend;

/// Uniform contract over the AI providers.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Translate and summarize one paper into `language`.
    async fn summarize(
        &self,
        paper: &PaperRecord,
        language: &str,
    ) -> Result<SummaryResult, SummarizeError>;

    /// Short provider name for progress output.
    fn name(&self) -> &'static str;
}

/// Instantiate the backend named in the configuration.
///
/// An unknown name or a missing API key fails here, before any paper has
/// been fetched.
pub fn create_summarizer(config: &Config) -> Result<Arc<dyn Summarizer>, SummarizeError> {
    match config.backend.as_str() {
        "gemini" => {
            let key = config
                .gemini_api_key
                .as_deref()
                .ok_or(SummarizeError::AuthMissing {
                    backend: "Gemini",
                    var: "GEMINI_API_KEY",
                })?;
            Ok(Arc::new(GeminiBackend::new(
                key.to_string(),
                config.gemini_model.clone(),
            )?))
        }
        "claude" => {
            let key = config
                .anthropic_api_key
                .as_deref()
                .ok_or(SummarizeError::AuthMissing {
                    backend: "Claude",
                    var: "ANTHROPIC_API_KEY",
                })?;
            Ok(Arc::new(ClaudeBackend::new(key.to_string())?))
        }
        other => Err(SummarizeError::UnknownBackend {
            name: other.to_string(),
        }),
    }
}

/// Prompt shared by every backend.
///
/// The numbered sections give the response a parseable shape;
/// [`parse_summary_text`] is the inverse of this format.
fn build_prompt(paper: &PaperRecord, language: &str) -> String {
    format!(
        "Translate and summarize the following academic paper in {language}.\n\n\
        Paper title: {title}\n\
        Authors: {authors}\n\
        Published: {published}\n\n\
        Abstract:\n{abstract_text}\n\n\
        Respond with exactly these three sections:\n\n\
        1. Translated title:\n\
        (the title translated into {language})\n\n\
        2. Translated abstract:\n\
        (a 400-600 character summary of the abstract in {language})\n\n\
        3. Key Q&A:\n\
        Q1: (an important question about the paper)\n\
        A1: (its answer)\n\
        Q2: (another important question)\n\
        A2: (its answer)\n\
        (write 3-5 Q&A pairs, all in {language})\n\n\
        Keep technical terms, proper nouns and acronyms as the paper writes them.",
        language = language,
        title = paper.title,
        authors = paper.authors.join(", "),
        published = paper.published,
        abstract_text = paper.summary,
    )
}

/// Parse a backend's sectioned response into a [`SummaryResult`].
///
/// Walks the text line by line, switching sections at the numbered headers
/// the prompt asked for. Content on the header line after the colon belongs
/// to that section too.
fn parse_summary_text(text: &str) -> Result<SummaryResult, SummarizeError> {
    #[derive(PartialEq)]
    enum Section {
        Preamble,
        Title,
        Summary,
        Qa,
    }

    let mut section = Section::Preamble;
    let mut title_lines: Vec<&str> = Vec::new();
    let mut summary_lines: Vec<&str> = Vec::new();
    let mut qa_lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(rest) = section_header(trimmed, '1') {
            section = Section::Title;
            if !rest.is_empty() {
                title_lines.push(rest);
            }
            continue;
        }
        if let Some(rest) = section_header(trimmed, '2') {
            section = Section::Summary;
            if !rest.is_empty() {
                summary_lines.push(rest);
            }
            continue;
        }
        if let Some(rest) = section_header(trimmed, '3') {
            section = Section::Qa;
            if !rest.is_empty() {
                qa_lines.push(rest);
            }
            continue;
        }
        match section {
            Section::Preamble => {}
            Section::Title => title_lines.push(trimmed),
            Section::Summary => summary_lines.push(trimmed),
            Section::Qa => qa_lines.push(trimmed),
        }
    }

    let translated_title = title_lines.join(" ").trim().to_string();
    if translated_title.is_empty() {
        return Err(SummarizeError::MissingSection { section: "title" });
    }

    let translated_summary = summary_lines.join("\n").trim().to_string();
    if translated_summary.is_empty() {
        return Err(SummarizeError::MissingSection { section: "abstract" });
    }

    let qa_pairs = parse_qa_pairs(&qa_lines);
    if qa_pairs.is_empty() {
        return Err(SummarizeError::NoQaPairs);
    }

    Ok(SummaryResult {
        translated_title,
        translated_summary,
        qa_pairs,
    })
}

/// `"2. Translated abstract: text"` matched against `'2'` yields `"text"`.
/// Lines without the number prefix or without a colon are not headers.
/// Leading markdown emphasis is ignored, since some backends bold the
/// headers they were asked to emit.
fn section_header(line: &str, number: char) -> Option<&str> {
    let probe = line.trim_start_matches(['*', '#']).trim_start();
    let rest = probe.strip_prefix(number)?.strip_prefix('.')?;
    let colon = rest.find(':')?;
    Some(rest[colon + 1..].trim().trim_matches('*').trim())
}

/// Pair up `Q<n>:` and `A<n>:` lines; bare `Q:`/`A:` labels work too.
/// Unlabeled lines continue the pending question or the last answer, since
/// backends wrap long answers.
fn parse_qa_pairs(lines: &[&str]) -> Vec<QaPair> {
    let mut pairs: Vec<QaPair> = Vec::new();
    let mut question: Option<String> = None;

    for line in lines {
        if let Some(q) = qa_label(line, 'Q') {
            question = Some(q.to_string());
        } else if let Some(a) = qa_label(line, 'A') {
            if let Some(q) = question.take() {
                pairs.push(QaPair {
                    question: q,
                    answer: a.to_string(),
                });
            }
        } else if !line.is_empty() {
            if let Some(q) = question.as_mut() {
                q.push(' ');
                q.push_str(line);
            } else if let Some(last) = pairs.last_mut() {
                last.answer.push(' ');
                last.answer.push_str(line);
            }
        }
    }

    pairs.retain(|p| !p.question.is_empty() && !p.answer.is_empty());
    pairs
}

fn qa_label(line: &str, letter: char) -> Option<&str> {
    let rest = line.trim_start_matches('*').trim_start().strip_prefix(letter)?;
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_digit());
    let rest = rest.strip_prefix(':')?;
    Some(rest.trim_start_matches('*').trim())
}
