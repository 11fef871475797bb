//! Text passes applied to record text before templating and to pages after.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// Literal fixes for known typos and mojibake in the source sheet.
#[derive(Debug, Clone, Default)]
pub struct Tidy {
    replacements: Vec<(String, String)>,
}

impl Tidy {
    pub fn new(replacements: &BTreeMap<String, String>) -> Self {
        Self {
            replacements: replacements
                .iter()
                .filter(|(from, _)| !from.is_empty())
                .map(|(from, to)| (from.clone(), to.clone()))
                .collect(),
        }
    }

    /// Apply every replacement, then unescape `\(` and `\)`.
    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (from, to) in &self.replacements {
            out = out.replace(from.as_str(), to);
        }
        out.replace("\\(", "(").replace("\\)", ")")
    }
}

/// At most `limit` characters, with `...` appended when anything was cut.
pub fn preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Run the page cleanup pipeline on templated markdown.
pub(crate) fn run_pipeline(md: &str) -> String {
    let mut result = normalize_whitespace(md);
    result = clean_blank_lines(&result);
    ensure_trailing_newline(&result)
}

// ---------------------------------------------------------------------------
// Pass 1: Trailing whitespace
// ---------------------------------------------------------------------------

fn normalize_whitespace(md: &str) -> String {
    md.lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// Pass 2: Blank line runs
// ---------------------------------------------------------------------------

/// Collapse runs of blank lines into a single blank line.
fn clean_blank_lines(md: &str) -> String {
    static MULTI_BLANK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

    MULTI_BLANK_RE
        .replace_all(md.trim_start_matches('\n'), "\n\n")
        .to_string()
}

// ---------------------------------------------------------------------------
// Pass 3: Trailing newline
// ---------------------------------------------------------------------------

/// Ensure the file ends with exactly one newline.
fn ensure_trailing_newline(md: &str) -> String {
    let trimmed = md.trim_end_matches('\n');
    format!("{trimmed}\n")
}
