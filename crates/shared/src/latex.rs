//! LaTeX cleanup for Slack display.
//!
//! arXiv titles and abstracts carry inline math that renders badly in Slack.
//! This pass rewrites simple superscripts to their Unicode forms and strips
//! leftover math-mode dollar signs. Anything more elaborate is passed through
//! untouched rather than half-rendered.

use regex::Regex;
use std::sync::LazyLock;

static BARE_SUPERSCRIPT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\w)\^([123])").unwrap());
static MATHBF_SUPERSCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\mathbf\{(\w+)\}\^(\d+)").unwrap());
static BRACED_MATH_SUPERSCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(\w+)\}\^(\d+)\$").unwrap());
static MATH_SUPERSCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\w+)\^(\d+)\$").unwrap());
static MATH_ENV: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$(.*?)\$").unwrap());

/// Rewrite simple LaTeX constructs in `text` for a Slack message.
pub fn format_latex_for_slack(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = BARE_SUPERSCRIPT.replace_all(text, |caps: &regex::Captures| {
        format!("{}{}", &caps[1], superscript_digits(&caps[2]))
    });
    let text = MATHBF_SUPERSCRIPT.replace_all(&text, |caps: &regex::Captures| {
        format!("{}{}", &caps[1], superscript_digits(&caps[2]))
    });
    let text = BRACED_MATH_SUPERSCRIPT.replace_all(&text, |caps: &regex::Captures| {
        format!("{}{}", &caps[1], superscript_digits(&caps[2]))
    });
    let text = MATH_SUPERSCRIPT.replace_all(&text, |caps: &regex::Captures| {
        format!("{}{}", &caps[1], superscript_digits(&caps[2]))
    });
    // Whatever math remains loses its dollar signs but keeps its body.
    MATH_ENV.replace_all(&text, "$1").into_owned()
}

fn superscript_digits(digits: &str) -> String {
    digits
        .chars()
        .map(|c| match c {
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4' => '⁴',
            '5' => '⁵',
            '6' => '⁶',
            '7' => '⁷',
            '8' => '⁸',
            '9' => '⁹',
            other => other,
        })
        .collect()
}
