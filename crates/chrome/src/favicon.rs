//! Favicon URL derivation
//!
//! Nothing is fetched here. A page's favicon is assumed to live at
//! `<origin>/favicon.ico`, and the guess is remembered per origin.

use rustc_hash::FxHashMap;
use url::Url;

/// Favicon URLs keyed by page origin
#[derive(Debug, Default)]
pub struct FaviconCache {
    by_origin: FxHashMap<String, String>,
}

impl FaviconCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Favicon URL for a page, or an empty string for anything that is not
    /// an http(s) URL
    pub fn favicon_url(&mut self, page_url: &str) -> String {
        let Some(origin) = origin_of(page_url) else {
            return String::new();
        };
        self.by_origin
            .entry(origin)
            .or_insert_with_key(|origin| format!("{}/favicon.ico", origin))
            .clone()
    }

    /// Override the favicon for an origin
    pub fn insert(&mut self, origin: impl Into<String>, favicon: impl Into<String>) {
        self.by_origin.insert(origin.into(), favicon.into());
    }

    /// Number of cached origins
    pub fn len(&self) -> usize {
        self.by_origin.len()
    }

    /// Check if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.by_origin.is_empty()
    }
}

/// Scheme, host and non-default port of an http(s) URL
pub fn origin_of(page_url: &str) -> Option<String> {
    let url = Url::parse(page_url).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.host_str()?;
    Some(url.origin().ascii_serialization())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_of() {
        assert_eq!(
            origin_of("https://example.com/docs/page?q=1").as_deref(),
            Some("https://example.com")
        );
        assert_eq!(
            origin_of("http://localhost:8080/").as_deref(),
            Some("http://localhost:8080")
        );
        assert_eq!(origin_of("file:///ui.html"), None);
        assert_eq!(origin_of("about:blank"), None);
        assert_eq!(origin_of("not a url"), None);
    }

    #[test]
    fn test_favicon_per_origin() {
        let mut cache = FaviconCache::new();
        assert_eq!(
            cache.favicon_url("https://example.com/a"),
            "https://example.com/favicon.ico"
        );
        assert_eq!(
            cache.favicon_url("https://example.com/b/c"),
            "https://example.com/favicon.ico"
        );
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.favicon_url("file:///ui.html"), "");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_override() {
        let mut cache = FaviconCache::new();
        cache.insert("https://example.com", "data:image/png;base64,AAAA");
        assert_eq!(
            cache.favicon_url("https://example.com/"),
            "data:image/png;base64,AAAA"
        );
    }
}
