//! Canonical URL construction.
//!
//! Every generated document links back into the site through this
//! module, so URL shape decisions (path layout, encoding, trailing
//! slash) live in exactly one place.
//!
//! Facet labels (categories, tags) are plain authored strings and may
//! contain spaces, slashes or non-ASCII text. They are percent-encoded
//! on the way into a path and percent-decoded on the way out; the two
//! operations must stay symmetric so a label round-trips exactly.

use crate::config::SiteConfig;
use anyhow::{Context, Result};
use std::borrow::Cow;

/// A logical route into the published site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// Site root.
    Home,
    /// Blog index page.
    Blog,
    /// Search page.
    Search,
    /// A hub page under `/hubs/`.
    Hub(&'a str),
    /// An individual post, addressed by slug.
    Post(&'a str),
    /// A category listing page.
    Category(&'a str),
    /// A tag listing page.
    Tag(&'a str),
}

impl Route<'_> {
    /// Site-relative path for this route, percent-encoding facet segments.
    pub fn site_path(&self) -> String {
        match self {
            Self::Home => String::new(),
            Self::Blog => "/blog".to_string(),
            Self::Search => "/search".to_string(),
            Self::Hub(name) => format!("/hubs/{}", encode_segment(name)),
            Self::Post(slug) => format!("/{slug}"),
            Self::Category(label) => format!("/categories/{}", encode_segment(label)),
            Self::Tag(label) => format!("/tags/{}", encode_segment(label)),
        }
    }
}

/// Canonical absolute URL for a route.
pub fn permalink(config: &SiteConfig, route: Route<'_>) -> String {
    let base = config.base_url();
    let path = route.site_path();

    let mut url = format!("{base}{path}");
    if config.base.trailing_slash && !url.ends_with('/') {
        url.push('/');
    }
    url
}

/// Percent-encode one path segment.
pub fn encode_segment(segment: &str) -> Cow<'_, str> {
    urlencoding::encode(segment)
}

/// Decode one path segment back to the authored label.
pub fn decode_segment(segment: &str) -> Result<String> {
    let decoded = urlencoding::decode(segment)
        .with_context(|| format!("invalid percent-encoding in path segment: {segment:?}"))?;
    Ok(decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(url: &str, trailing_slash: bool) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.base.url = Some(url.to_string());
        config.base.trailing_slash = trailing_slash;
        config
    }

    #[test]
    fn test_post_permalink() {
        let config = make_config("https://example.com", false);
        assert_eq!(
            permalink(&config, Route::Post("posts/hello")),
            "https://example.com/posts/hello"
        );
    }

    #[test]
    fn test_trailing_slash_policy() {
        let config = make_config("https://example.com", true);
        assert_eq!(
            permalink(&config, Route::Post("posts/hello")),
            "https://example.com/posts/hello/"
        );
        assert_eq!(permalink(&config, Route::Home), "https://example.com/");
    }

    #[test]
    fn test_home_without_trailing_slash() {
        let config = make_config("https://example.com/", false);
        assert_eq!(permalink(&config, Route::Home), "https://example.com");
    }

    #[test]
    fn test_static_routes() {
        let config = make_config("https://example.com", false);
        assert_eq!(permalink(&config, Route::Blog), "https://example.com/blog");
        assert_eq!(
            permalink(&config, Route::Search),
            "https://example.com/search"
        );
        assert_eq!(
            permalink(&config, Route::Hub("ai-security")),
            "https://example.com/hubs/ai-security"
        );
    }

    #[test]
    fn test_facet_segments_encoded() {
        let config = make_config("https://example.com", false);
        assert_eq!(
            permalink(&config, Route::Category("AI Security")),
            "https://example.com/categories/AI%20Security"
        );
        assert_eq!(
            permalink(&config, Route::Tag("c/c++")),
            "https://example.com/tags/c%2Fc%2B%2B"
        );
    }

    #[test]
    fn test_segment_round_trip() {
        for label in ["AI Security", "rails/ruby", "日本語", "naïve approach", "plain"] {
            let encoded = encode_segment(label);
            assert_eq!(decode_segment(&encoded).unwrap(), label);
        }
    }

    #[test]
    fn test_encoded_segment_has_no_reserved_chars() {
        let encoded = encode_segment("a b/c?d#e");
        assert!(!encoded.contains([' ', '/', '?', '#']));
    }
}
