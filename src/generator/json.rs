//! JSON Feed generation.
//!
//! Projects the active post set into a JSON Feed 1.1 document
//! (<https://jsonfeed.org/version/1.1>), including the full rendered
//! post body. Extension fields carry the post metadata that has no
//! standard JSON Feed slot (`_series`, `_featured`, ...).

use crate::{
    config::SiteConfig,
    content::{ExternalLink, PostRecord, Posts, select::select_posts},
    log,
    permalink::{Route, permalink},
    render::HtmlRenderer,
};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;

/// JSON Feed version identifier.
const JSON_FEED_VERSION: &str = "https://jsonfeed.org/version/1.1";

// ============================================================================
// Public API
// ============================================================================

/// Build the JSON Feed if enabled in config.
pub fn build_json_feed(
    config: &SiteConfig,
    posts: &Posts,
    renderer: &dyn HtmlRenderer,
) -> Result<()> {
    if config.build.json_feed.enable {
        JsonFeedDoc::build(config, posts, renderer).write(config)?;
    }
    Ok(())
}

// ============================================================================
// Document Model
// ============================================================================

/// Feed envelope, serialized as indented JSON.
#[derive(Debug, Serialize)]
struct JsonFeedDoc {
    version: &'static str,
    title: String,
    home_page_url: String,
    feed_url: String,
    description: String,
    language: String,
    author: JsonAuthor,
    items: Vec<JsonItem>,
}

#[derive(Debug, Serialize)]
struct JsonAuthor {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar: Option<String>,
}

/// One projected post.
///
/// Underscore-prefixed fields are JSON Feed custom extensions and are
/// passed through from the post record unmodified.
#[derive(Debug, Serialize)]
struct JsonItem {
    id: String,
    url: String,
    title: String,
    content_html: String,
    content_text: String,
    summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    banner_image: Option<String>,
    date_published: String,
    date_modified: String,
    author: JsonAuthor,
    tags: Vec<String>,
    #[serde(rename = "_series", skip_serializing_if = "Option::is_none")]
    series: Option<String>,
    #[serde(rename = "_series_order", skip_serializing_if = "Option::is_none")]
    series_order: Option<u32>,
    #[serde(rename = "_featured")]
    featured: bool,
    #[serde(rename = "_external_links", skip_serializing_if = "Vec::is_empty")]
    external_links: Vec<ExternalLink>,
    #[serde(rename = "_prerequisites", skip_serializing_if = "Vec::is_empty")]
    prerequisites: Vec<String>,
}

impl JsonFeedDoc {
    /// Project the active post set into the feed document.
    fn build(config: &SiteConfig, posts: &Posts, renderer: &dyn HtmlRenderer) -> Self {
        let selected = select_posts(posts, None);
        let total = selected.len();

        let items: Vec<_> = selected
            .iter()
            .filter_map(|post| post_to_item(post, config, renderer))
            .collect();

        // A post without a publish date cannot carry feed timestamps;
        // its projection is dropped, not the whole document.
        let excluded = total - items.len();
        if excluded > 0 {
            log!("json"; "excluded {excluded} posts without publish date");
        }

        Self {
            version: JSON_FEED_VERSION,
            title: config.base.title.clone(),
            home_page_url: permalink(config, Route::Home),
            feed_url: format!(
                "{}/{}",
                config.base_url(),
                config.build.json_feed.path.display()
            ),
            description: config.base.description.clone(),
            language: config.base.language.clone(),
            author: JsonAuthor {
                name: config.base.author.clone(),
                url: config.base.url.clone(),
                avatar: config.base.avatar.clone(),
            },
            items,
        }
    }

    /// Serialize to indented JSON.
    fn into_json(self) -> Result<String> {
        serde_json::to_string_pretty(&self).context("serializing JSON feed")
    }

    /// Write the feed to the output directory.
    fn write(self, config: &SiteConfig) -> Result<()> {
        let json = self.into_json()?;
        let path = config.build.output.join(&config.build.json_feed.path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, json)
            .with_context(|| format!("failed to write JSON feed to {}", path.display()))?;

        log!("json"; "{}", path.file_name().unwrap_or_default().to_string_lossy());
        Ok(())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert a post to a feed item.
/// Returns None if the post has no publish date.
fn post_to_item(
    post: &PostRecord,
    config: &SiteConfig,
    renderer: &dyn HtmlRenderer,
) -> Option<JsonItem> {
    let published = post.publish_date?;
    let modified = post.update_date.unwrap_or(published);
    let url = permalink(config, Route::Post(&post.id));
    let excerpt = post.excerpt.clone().unwrap_or_default();

    Some(JsonItem {
        id: url.clone(),
        url,
        title: post.title.clone(),
        content_html: renderer.render(&post.body),
        content_text: excerpt.clone(),
        summary: excerpt,
        image: post.image.clone(),
        banner_image: post.image.clone(),
        date_published: published.to_rfc3339(),
        date_modified: modified.to_rfc3339(),
        author: JsonAuthor {
            name: post.author.clone().unwrap_or_else(|| config.base.author.clone()),
            url: None,
            avatar: None,
        },
        tags: facet_labels(post),
        series: post.series.clone(),
        series_order: post.series_order,
        featured: post.featured,
        external_links: post.external_links.clone(),
        prerequisites: post.prerequisites.clone(),
    })
}

/// Category (when present) prepended to the tag list, order preserved.
fn facet_labels(post: &PostRecord) -> Vec<String> {
    post.category
        .iter()
        .chain(post.tags.iter())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::testing::make_post;
    use crate::render::MarkdownRenderer;

    fn make_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.base.title = "Test Blog".to_string();
        config.base.description = "A test blog".to_string();
        config.base.author = "Site Author".to_string();
        config.base.url = Some("https://example.com".to_string());
        config
    }

    #[test]
    fn test_envelope_fields() {
        let config = make_config();
        let posts = Posts { items: vec![] };
        let doc = JsonFeedDoc::build(&config, &posts, &MarkdownRenderer);

        assert_eq!(doc.version, JSON_FEED_VERSION);
        assert_eq!(doc.title, "Test Blog");
        assert_eq!(doc.home_page_url, "https://example.com");
        assert_eq!(doc.feed_url, "https://example.com/feed.json");
        assert_eq!(doc.author.name, "Site Author");
        assert!(doc.items.is_empty());
    }

    #[test]
    fn test_item_mapping() {
        let config = make_config();
        let mut post = make_post("posts/hello", Some("2024-01-01"), false);
        post.category = Some("rails".to_string());
        post.tags = vec!["ruby".to_string()];
        post.excerpt = Some("The summary".to_string());
        post.body = "# Heading\n".to_string();

        let item = post_to_item(&post, &config, &MarkdownRenderer).unwrap();
        assert_eq!(item.id, "https://example.com/posts/hello");
        assert_eq!(item.url, item.id);
        assert_eq!(item.content_text, "The summary");
        assert_eq!(item.summary, "The summary");
        assert!(item.content_html.contains("<h1>Heading</h1>"));
        assert_eq!(item.date_published, "2024-01-01T00:00:00Z");
        assert_eq!(item.tags, vec!["rails", "ruby"]);
        assert_eq!(item.author.name, "Site Author");
        assert!(!item.featured);
    }

    #[test]
    fn test_missing_excerpt_defaults_to_empty() {
        let config = make_config();
        let post = make_post("a", Some("2024-01-01"), false);

        let item = post_to_item(&post, &config, &MarkdownRenderer).unwrap();
        assert_eq!(item.content_text, "");
        assert_eq!(item.summary, "");
    }

    #[test]
    fn test_date_modified_falls_back_to_published() {
        let config = make_config();
        let post = make_post("a", Some("2024-05-01"), false);

        let item = post_to_item(&post, &config, &MarkdownRenderer).unwrap();
        assert_eq!(item.date_published, "2024-05-01T00:00:00Z");
        assert_eq!(item.date_modified, item.date_published);
    }

    #[test]
    fn test_missing_publish_date_skips_item() {
        let config = make_config();
        let post = make_post("a", None, false);
        assert!(post_to_item(&post, &config, &MarkdownRenderer).is_none());
    }

    #[test]
    fn test_ids_unique_when_source_ids_unique() {
        let config = make_config();
        let posts = Posts {
            items: vec![
                make_post("a", Some("2024-01-01"), false),
                make_post("b", Some("2024-02-01"), false),
                make_post("c", Some("2024-03-01"), false),
            ],
        };

        let doc = JsonFeedDoc::build(&config, &posts, &MarkdownRenderer);
        let mut ids: Vec<_> = doc.items.iter().map(|i| i.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_extension_fields_serialized() {
        let config = make_config();
        let mut post = make_post("a", Some("2024-01-01"), false);
        post.series = Some("typed-rails".to_string());
        post.series_order = Some(2);
        post.featured = true;
        post.prerequisites = vec!["ruby-basics".to_string()];

        let item = post_to_item(&post, &config, &MarkdownRenderer).unwrap();
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["_series"], "typed-rails");
        assert_eq!(json["_series_order"], 2);
        assert_eq!(json["_featured"], true);
        assert_eq!(json["_prerequisites"][0], "ruby-basics");
        // Absent extensions are omitted, not null
        assert!(json.get("_external_links").is_none());
    }

    #[test]
    fn test_drafts_never_projected() {
        let config = make_config();
        let posts = Posts {
            items: vec![
                make_post("live", Some("2024-01-01"), false),
                make_post("draft", Some("2024-02-01"), true),
            ],
        };

        let doc = JsonFeedDoc::build(&config, &posts, &MarkdownRenderer);
        assert_eq!(doc.items.len(), 1);
        assert!(doc.items[0].id.ends_with("/live"));
    }
}
