//! `[base]` section configuration.
//!
//! Contains basic site information like title, author, description, etc.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in syndica.toml - basic site metadata.
///
/// # Example
/// ```toml
/// [base]
/// title = "My Blog"
/// description = "A personal blog about Rust"
/// author = "Alice"
/// url = "https://myblog.com"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Site title used in feed envelopes.
    pub title: String,

    /// Author name for feed items and the feed-level author object.
    #[serde(default = "defaults::base::author")]
    #[educe(Default = defaults::base::author())]
    pub author: String,

    /// Author email for the RSS author field.
    #[serde(default = "defaults::base::email")]
    #[educe(Default = defaults::base::email())]
    pub email: String,

    /// Site description for feed envelopes.
    pub description: String,

    /// Base URL for absolute links in feeds and sitemap.
    /// Required whenever any output is enabled.
    #[serde(default = "defaults::base::url")]
    #[educe(Default = defaults::base::url())]
    pub url: Option<String>,

    /// BCP 47 language code (e.g., "en-US", "zh-Hans").
    #[serde(default = "defaults::base::language")]
    #[educe(Default = defaults::base::language())]
    pub language: String,

    /// Avatar image URL for the JSON Feed author object.
    #[serde(default)]
    pub avatar: Option<String>,

    /// Append a trailing slash to generated permalinks.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub trailing_slash: bool,
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_base_config_full() {
        let config = r#"
            [base]
            title = "Fern"
            description = "Fern's Blog"
            url = "https://fern.dev"
            language = "en-US"
            avatar = "https://fern.dev/images/avatar.jpg"
            trailing_slash = true
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.base.title, "Fern");
        assert_eq!(config.base.description, "Fern's Blog");
        assert_eq!(config.base.url, Some("https://fern.dev".to_string()));
        assert_eq!(config.base.language, "en-US");
        assert_eq!(
            config.base.avatar,
            Some("https://fern.dev/images/avatar.jpg".to_string())
        );
        assert!(config.base.trailing_slash);
    }

    #[test]
    fn test_base_config_defaults() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test blog"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.base.author, "<YOUR_NAME>");
        assert_eq!(config.base.email, "user@noreply.syndica");
        assert_eq!(config.base.language, "en-US");
        assert_eq!(config.base.url, None);
        assert_eq!(config.base.avatar, None);
        assert!(!config.base.trailing_slash);
    }

    #[test]
    fn test_unknown_field_rejection() {
        let config = r#"
            [base]
            title = "Test"
            description = "Test blog"
            unknown_field = "should_fail"
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);

        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn test_base_config_unicode() {
        let config = r#"
            [base]
            title = "My Blog 🚀"
            description = "This is a blog with unicode"
            author = "René"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.base.title, "My Blog 🚀");
        assert_eq!(config.base.author, "René");
    }
}
