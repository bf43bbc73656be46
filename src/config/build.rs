//! `[build]` section configuration.
//!
//! Contains content/output paths and the per-output generation settings.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in syndica.toml - generation pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// content = "content"      # Post source directory
/// output = "public"        # Output directory
///
/// [build.rss]
/// enable = true
/// channel_categories = ["Technology", "Software Development"]
///
/// [build.sitemap]
/// hub_pages = ["web-development", "ai-security"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Post source directory (Markdown files with TOML front matter).
    #[serde(default = "defaults::build::content")]
    #[educe(Default = defaults::build::content())]
    pub content: PathBuf,

    /// Generation output directory.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// JSON Feed generation settings.
    #[serde(default)]
    pub json_feed: JsonFeedConfig,

    /// RSS feed generation settings.
    #[serde(default)]
    pub rss: RssConfig,

    /// Sitemap generation settings.
    #[serde(default)]
    pub sitemap: SitemapConfig,
}

// ============================================================================
// Sub-configurations
// ============================================================================

/// `[build.json_feed]` section - JSON Feed 1.1 output.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct JsonFeedConfig {
    /// Enable JSON Feed generation.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub enable: bool,

    /// Output path for the JSON Feed file, relative to the output directory.
    #[serde(default = "defaults::build::json_feed::path")]
    #[educe(Default = defaults::build::json_feed::path())]
    pub path: PathBuf,
}

/// `[build.rss]` section - site-wide and per-category RSS output.
///
/// Disabling this switches the `/rss.xml` and `/rss/{category}.xml`
/// routes to a 404 with an empty body; an enabled feed with zero posts
/// still produces a valid empty document. Callers can rely on that
/// distinction.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct RssConfig {
    /// Enable RSS feed generation (site-wide and per-category).
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub enable: bool,

    /// Output path for the site-wide feed, relative to the output directory.
    #[serde(default = "defaults::build::rss::path")]
    #[educe(Default = defaults::build::rss::path())]
    pub path: PathBuf,

    /// Directory for per-category feeds, relative to the output directory.
    #[serde(default = "defaults::build::rss::category_dir")]
    #[educe(Default = defaults::build::rss::category_dir())]
    pub category_dir: PathBuf,

    /// Fixed `<category>` tags for the channel envelope.
    #[serde(default)]
    pub channel_categories: Vec<String>,

    /// Channel TTL in minutes.
    #[serde(default = "defaults::build::rss::ttl")]
    #[educe(Default = defaults::build::rss::ttl())]
    pub ttl: u32,
}

/// `[build.sitemap]` section - sitemap.xml output.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SitemapConfig {
    /// Enable sitemap generation.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub enable: bool,

    /// Output path for the sitemap file, relative to the output directory.
    #[serde(default = "defaults::build::sitemap::path")]
    #[educe(Default = defaults::build::sitemap::path())]
    pub path: PathBuf,

    /// Hub page names, emitted as `/hubs/{name}` static entries.
    #[serde(default)]
    pub hub_pages: Vec<String>,
}
