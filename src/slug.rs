//! Slug derivation for naming screenshot and report files.
//!
//! The slug ties together every artifact produced for one page: the capturer
//! names its PNGs with it and the report builder derives the same value, so
//! `screenshots/{slug}.png` and `reports/{slug}.md` always correspond.

use url::Url;

/// Fallback slug used when a URL yields neither host nor path.
pub const FALLBACK_SLUG: &str = "report";

/// Derive a filesystem-safe slug from a page URL.
///
/// The host (with `:` before a port replaced by `_`) and the path (trimmed of
/// slashes, inner slashes replaced by `_`) are joined with a double
/// underscore. A URL with an empty host and path, or one that does not parse
/// at all, yields `"report"`.
///
/// Deterministic: the same URL always produces the same slug.
pub fn slug_from_url(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return FALLBACK_SLUG.to_string();
    };

    let host_part = match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("{}_{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    };

    let path_part = parsed.path().trim_matches('/').replace('/', "_");

    if !path_part.is_empty() {
        format!("{}__{}", host_part, path_part)
    } else if !host_part.is_empty() {
        host_part
    } else {
        FALLBACK_SLUG.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_and_path() {
        assert_eq!(slug_from_url("https://example.com/pricing"), "example.com__pricing");
    }

    #[test]
    fn test_host_only() {
        assert_eq!(slug_from_url("https://example.com"), "example.com");
        assert_eq!(slug_from_url("https://example.com/"), "example.com");
    }

    #[test]
    fn test_nested_path() {
        assert_eq!(
            slug_from_url("https://weimpa.com/deck/2024/q1"),
            "weimpa.com__deck_2024_q1"
        );
    }

    #[test]
    fn test_port_becomes_underscore() {
        assert_eq!(slug_from_url("http://localhost:8080/admin"), "localhost_8080__admin");
    }

    #[test]
    fn test_trailing_slash_ignored() {
        assert_eq!(
            slug_from_url("https://example.com/pricing/"),
            slug_from_url("https://example.com/pricing")
        );
    }

    #[test]
    fn test_unparseable_falls_back() {
        assert_eq!(slug_from_url("not a url"), FALLBACK_SLUG);
        assert_eq!(slug_from_url(""), FALLBACK_SLUG);
    }

    #[test]
    fn test_never_empty() {
        for url in ["https://example.com", "http://a/b", "garbage", ""] {
            assert!(!slug_from_url(url).is_empty());
        }
    }

    #[test]
    fn test_deterministic() {
        let url = "https://example.com/pricing?utm=1#top";
        assert_eq!(slug_from_url(url), slug_from_url(url));
    }
}
