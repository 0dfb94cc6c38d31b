// Identifier handling - bare ids and watch URLs

use regex::Regex;

const WATCH_BASE: &str = "https://www.youtube.com/watch?v=";

lazy_static::lazy_static! {
    static ref VIDEO_ID_RE: Regex = Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})").unwrap();
}

/// Build the watch URL handed to yt-dlp
pub fn resolve_locator(identifier: &str) -> String {
    format!("{}{}", WATCH_BASE, identifier)
}

/// Accept a bare id or a watch/short/embed URL.
///
/// URLs yield the 11-character id they carry; anything else is returned
/// trimmed but otherwise untouched.
pub fn normalize_identifier(input: &str) -> String {
    let trimmed = input.trim();
    if !trimmed.contains('/') {
        return trimmed.to_string();
    }

    VIDEO_ID_RE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_locator_is_concatenation() {
        assert_eq!(
            resolve_locator("abc123"),
            "https://www.youtube.com/watch?v=abc123"
        );
        assert_eq!(resolve_locator("abc123"), resolve_locator("abc123"));
    }

    #[test]
    fn test_bare_id_passthrough() {
        assert_eq!(normalize_identifier("abc123"), "abc123");
        assert_eq!(normalize_identifier(" dQw4w9WgXcQ\n"), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_extracts_id_from_urls() {
        assert_eq!(
            normalize_identifier("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42"),
            "dQw4w9WgXcQ"
        );
        assert_eq!(normalize_identifier("https://youtu.be/dQw4w9WgXcQ"), "dQw4w9WgXcQ");
        assert_eq!(
            normalize_identifier("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_unmatched_url_kept_verbatim() {
        assert_eq!(normalize_identifier("https://example.com/x"), "https://example.com/x");
    }
}
