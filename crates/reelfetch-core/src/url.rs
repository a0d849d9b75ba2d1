//! URL helper functions for Instagram posts
//!
//! Provides validation of incoming post URLs and small helpers for
//! shortcodes and media handles.

use url::Url;

use crate::error::{ReelfetchError, Result};

/// Default domain marker a post URL must belong to
pub const DEFAULT_DOMAIN: &str = "instagram.com";

/// Login page used by the authenticated browser path
pub const LOGIN_URL: &str = "https://www.instagram.com/accounts/login/";

/// Path prefixes that carry a post shortcode as the next segment
const POST_PREFIXES: [&str; 4] = ["p", "reel", "reels", "tv"];

/// Validates a raw post URL
///
/// Accepts absolute `http`/`https` URLs whose host equals `domain` or is a
/// subdomain of it. Input without a scheme (`www.instagram.com/p/...`) is
/// read as `https`. The fragment is dropped.
///
/// # Arguments
/// * `raw` - The `url` query parameter as received, if any
/// * `domain` - Domain marker (e.g., "instagram.com")
///
/// # Errors
/// Returns `InvalidUrl` for missing, malformed, or foreign URLs
///
/// # Example
/// ```
/// use reelfetch_core::url::validate_post_url;
/// let url = validate_post_url(Some("https://www.instagram.com/p/ABC/"), "instagram.com").unwrap();
/// assert_eq!(url.host_str(), Some("www.instagram.com"));
/// assert!(validate_post_url(Some("not-a-url"), "instagram.com").is_err());
/// ```
pub fn validate_post_url(raw: Option<&str>, domain: &str) -> Result<Url> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ReelfetchError::InvalidUrl("missing url parameter".to_string()))?;

    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };
    let mut url = Url::parse(&candidate)
        .map_err(|e| ReelfetchError::InvalidUrl(format!("{raw}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ReelfetchError::InvalidUrl(format!(
            "unsupported scheme: {}",
            url.scheme()
        )));
    }

    let host = url
        .host_str()
        .ok_or_else(|| ReelfetchError::InvalidUrl(format!("{raw}: no host")))?;

    if !host_matches(host, domain) {
        return Err(ReelfetchError::InvalidUrl(format!(
            "host {host} is not {domain}"
        )));
    }

    url.set_fragment(None);
    Ok(url)
}

/// Returns `true` if `host` is `domain` or one of its subdomains
fn host_matches(host: &str, domain: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    let domain = domain.to_ascii_lowercase();
    host == domain || host.ends_with(&format!(".{domain}"))
}

/// Extracts the post shortcode from a URL path
///
/// Handles `/p/{code}/`, `/reel/{code}/`, `/reels/{code}/`, `/tv/{code}/`
/// and the `/{username}/p/{code}/` form.
///
/// # Example
/// ```
/// use reelfetch_core::url::extract_shortcode;
/// assert_eq!(extract_shortcode("/reel/Cx1AbC/"), Some("Cx1AbC".to_string()));
/// assert_eq!(extract_shortcode("/explore/"), None);
/// ```
pub fn extract_shortcode(path: &str) -> Option<String> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    segments
        .windows(2)
        .find(|pair| POST_PREFIXES.contains(&pair[0]))
        .map(|pair| pair[1])
        .filter(|code| {
            code.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
        .map(String::from)
}

/// Returns `true` for in-browser media handles that cannot be fetched
pub fn is_transient_handle(src: &str) -> bool {
    src.trim_start().starts_with("blob:")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_validate_post_url_www() {
        let url = validate_post_url(Some("https://www.instagram.com/p/ABC/"), DEFAULT_DOMAIN);
        assert!(url.is_ok());
    }

    #[test]
    fn test_validate_post_url_bare_domain() {
        let url = validate_post_url(Some("https://instagram.com/p/VALIDCODE/"), DEFAULT_DOMAIN);
        assert_eq!(url.unwrap().as_str(), "https://instagram.com/p/VALIDCODE/");
    }

    #[test]
    fn test_validate_post_url_strips_fragment() {
        let url = validate_post_url(Some("https://instagram.com/reel/X1/#top"), DEFAULT_DOMAIN);
        assert_eq!(url.unwrap().as_str(), "https://instagram.com/reel/X1/");
    }

    #[test]
    fn test_validate_post_url_missing() {
        assert!(validate_post_url(None, DEFAULT_DOMAIN).is_err());
        assert!(validate_post_url(Some("   "), DEFAULT_DOMAIN).is_err());
    }

    #[test]
    fn test_validate_post_url_not_a_url() {
        let err = validate_post_url(Some("not-a-url"), DEFAULT_DOMAIN).unwrap_err();
        assert!(matches!(err, ReelfetchError::InvalidUrl(_)));
    }

    #[test]
    fn test_validate_post_url_without_scheme() {
        let url = validate_post_url(Some("www.instagram.com/p/ABC/"), DEFAULT_DOMAIN).unwrap();
        assert_eq!(url.as_str(), "https://www.instagram.com/p/ABC/");

        let url = validate_post_url(Some("instagram.com/reel/XYZ/?igsh=1"), DEFAULT_DOMAIN);
        assert_eq!(url.unwrap().scheme(), "https");

        assert!(validate_post_url(Some("example.com/instagram.com/p/ABC/"), DEFAULT_DOMAIN).is_err());
    }

    #[test]
    fn test_validate_post_url_marker_only_in_query() {
        let url = validate_post_url(Some("https://evil.example/?u=instagram.com"), DEFAULT_DOMAIN);
        assert!(url.is_err());
    }

    #[test]
    fn test_validate_post_url_lookalike_host() {
        let url = validate_post_url(Some("https://notinstagram.com/p/A/"), DEFAULT_DOMAIN);
        assert!(url.is_err());
    }

    #[test]
    fn test_validate_post_url_rejects_scheme() {
        let url = validate_post_url(Some("ftp://instagram.com/p/A/"), DEFAULT_DOMAIN);
        assert!(url.is_err());
    }

    #[test]
    fn test_extract_shortcode_variants() {
        assert_eq!(extract_shortcode("/p/ABC123/"), Some("ABC123".to_string()));
        assert_eq!(extract_shortcode("/tv/ABC123"), Some("ABC123".to_string()));
        assert_eq!(extract_shortcode("/reels/A-b_c/"), Some("A-b_c".to_string()));
        assert_eq!(
            extract_shortcode("/someuser/p/ABC123/"),
            Some("ABC123".to_string())
        );
    }

    #[test]
    fn test_extract_shortcode_none() {
        assert_eq!(extract_shortcode("/"), None);
        assert_eq!(extract_shortcode("/p/"), None);
        assert_eq!(extract_shortcode("/stories/highlights/"), None);
    }

    #[test]
    fn test_is_transient_handle() {
        assert!(is_transient_handle("blob:https://www.instagram.com/1234-abcd"));
        assert!(!is_transient_handle("https://cdn.example/v.mp4"));
    }

    proptest! {
        #[test]
        fn prop_foreign_hosts_rejected(label in "[a-z]{1,12}", tld in "(com|net|org|io)") {
            prop_assume!(label != "instagram");
            let raw = format!("https://{label}.{tld}/p/ABC/?next=instagram.com");
            prop_assert!(validate_post_url(Some(&raw), DEFAULT_DOMAIN).is_err());
        }

        #[test]
        fn prop_subdomains_accepted(sub in "[a-z]{1,10}", code in "[A-Za-z0-9_-]{5,12}") {
            let raw = format!("https://{sub}.instagram.com/p/{code}/");
            let url = validate_post_url(Some(&raw), DEFAULT_DOMAIN);
            prop_assert!(url.is_ok());
            prop_assert_eq!(extract_shortcode(url.unwrap().path()), Some(code));
        }
    }
}
