//! Cell-level text cleanup.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Trim, turn line breaks into spaces, and collapse whitespace runs.
pub fn clean_text(text: &str) -> String {
    let flat = text.trim().replace(['\n', '\r'], " ");
    WHITESPACE_RE.replace_all(&flat, " ").into_owned()
}

/// Split a notes cell into bullet items.
///
/// Items are introduced by `"- "`, either on their own lines or run together
/// after [`clean_text`] has flattened them. Hyphens inside words are kept.
pub fn parse_notes(text: &str) -> Vec<String> {
    text.replace("- ", "\n- ")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && *line != "-")
        .map(|line| line.strip_prefix("- ").unwrap_or(line).trim().to_string())
        .filter(|note| !note.is_empty())
        .collect()
}

/// Split a tag cell on commas, semicolons, or line breaks; first occurrence wins.
pub fn split_tags(text: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in text.split([',', ';', '\n', '\r']).map(str::trim) {
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_flattens_whitespace() {
        assert_eq!(clean_text("  hello world  "), "hello world");
        assert_eq!(clean_text("line1\nline2"), "line1 line2");
        assert_eq!(clean_text("text\r\nwith\rreturns"), "text with returns");
        assert_eq!(clean_text("  multiple   spaces  "), "multiple spaces");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn parse_notes_splits_bullets() {
        assert_eq!(parse_notes("- First item- Second item"), vec!["First item", "Second item"]);
        assert_eq!(parse_notes("- Item one\n- Item two"), vec!["Item one", "Item two"]);
        assert_eq!(parse_notes("Single line without dashes"), vec!["Single line without dashes"]);
        assert!(parse_notes("").is_empty());
        assert_eq!(parse_notes("- \n- Valid item\n- "), vec!["Valid item"]);
    }

    #[test]
    fn parse_notes_keeps_hyphenated_words() {
        assert_eq!(
            parse_notes("- Self-developed services\n- Third-party integrations"),
            vec!["Self-developed services", "Third-party integrations"]
        );
        let flattened = clean_text("- Self-developed services\n- Third-party integrations");
        assert_eq!(
            parse_notes(&flattened),
            vec!["Self-developed services", "Third-party integrations"]
        );
    }

    #[test]
    fn split_tags_dedupes() {
        assert_eq!(split_tags("AWS, GCP;AWS\nK8s"), vec!["AWS", "GCP", "K8s"]);
        assert!(split_tags(" , ; ").is_empty());
    }
}
