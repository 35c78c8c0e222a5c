//! Utility functions and helpers.

pub mod http;
pub mod log;

use unicode_segmentation::UnicodeSegmentation;
use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Collapse runs of whitespace into single spaces and trim the ends.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize whitespace, returning None for text that ends up empty.
pub fn clean_text(text: &str) -> Option<String> {
    let cleaned = normalize_whitespace(text);
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Truncate to at most `max_chars` graphemes, appending "..." when cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    let mut graphemes = text.grapheme_indices(true);
    match graphemes.nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://nofluffjobs.com/pl/jobs").unwrap();
        assert_eq!(
            resolve_url(&base, "/pl/job/rust-dev-acme"),
            "https://nofluffjobs.com/pl/job/rust-dev-acme"
        );
        assert_eq!(
            resolve_url(&base, "https://other.com/x"),
            "https://other.com/x"
        );
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(
            clean_text("  Senior \n\t Rust   Engineer "),
            Some("Senior Rust Engineer".to_string())
        );
        assert_eq!(clean_text(" \n "), None);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly", 7), "exactly");
        assert_eq!(truncate("abcdef", 3), "abc...");
        // Multi-byte characters are never split
        assert_eq!(truncate("zażółć gęślą", 4), "zażó...");
    }
}
