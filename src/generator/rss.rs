//! RSS feed generation.
//!
//! Builds the site-wide RSS 2.0 feed and one independent feed per
//! distinct category. Categories are derived from the post snapshot at
//! build time (a fixed point: facet extraction runs once, then each
//! category document is generated on its own), and a failure in one
//! category document never blocks the others.

use crate::{
    config::SiteConfig,
    content::{PostRecord, Posts, facet::FacetSet, select::select_posts},
    log,
    permalink::{Route, decode_segment, encode_segment, permalink},
};
use anyhow::{Context, Result, anyhow};
use chrono::Datelike;
use rayon::prelude::*;
use regex::Regex;
use rss::{
    CategoryBuilder, ChannelBuilder, EnclosureBuilder, GuidBuilder, ItemBuilder,
    extension::{ExtensionBuilder, ExtensionMap},
    validation::Validate,
};
use std::{collections::BTreeMap, fs, path::PathBuf, sync::LazyLock};

/// Fixed MIME type for post image enclosures.
const ENCLOSURE_MIME: &str = "image/jpeg";

// ============================================================================
// Public API
// ============================================================================

/// Build the site-wide RSS feed if enabled in config.
pub fn build_rss(config: &SiteConfig, posts: &Posts) -> Result<()> {
    if config.build.rss.enable {
        RssFeed::site(posts).write(config)?;
    }
    Ok(())
}

/// Build one feed per distinct category of the active post set.
///
/// Enumeration happens in two symmetric halves: each category label is
/// percent-encoded into its route segment here, and decoded back to the
/// authored label before filtering in [`build_category_route`]. Labels
/// with spaces, slashes or non-ASCII text round-trip exactly.
///
/// Failures are isolated per category: each is logged and the remaining
/// feeds are still written. Returns the number of failed documents.
pub fn build_category_feeds(config: &SiteConfig, posts: &Posts, facets: &FacetSet) -> usize {
    if !config.build.rss.enable {
        return 0;
    }

    let routes: Vec<String> = facets
        .categories
        .iter()
        .map(|category| encode_segment(category).into_owned())
        .collect();

    let failures: Vec<_> = routes
        .par_iter()
        .filter_map(|segment| {
            build_category_route(config, posts, segment)
                .err()
                .map(|err| (segment, err))
        })
        .collect();

    for (segment, err) in &failures {
        log!("error"; "category feed {segment:?} failed: {err:#}");
    }
    failures.len()
}

/// Generate the feed document behind one encoded category route.
fn build_category_route(config: &SiteConfig, posts: &Posts, segment: &str) -> Result<()> {
    let category = decode_segment(segment)?;
    RssFeed::category(posts, &category).write(config)
}

// ============================================================================
// RssFeed Implementation
// ============================================================================

/// Which document a feed instance describes.
enum FeedScope<'a> {
    Site,
    Category(&'a str),
}

/// RSS feed builder
struct RssFeed<'a> {
    scope: FeedScope<'a>,
    posts: Vec<&'a PostRecord>,
}

impl<'a> RssFeed<'a> {
    /// Site-wide feed over the whole active set.
    fn site(posts: &'a Posts) -> Self {
        Self {
            scope: FeedScope::Site,
            posts: select_posts(posts, None),
        }
    }

    /// Feed restricted to one category.
    ///
    /// A category matching zero posts yields a valid empty feed, not an
    /// error: categories are derived data and may legitimately empty out
    /// between builds.
    fn category(posts: &'a Posts, category: &'a str) -> Self {
        Self {
            scope: FeedScope::Category(category),
            posts: select_posts(posts, Some(category)),
        }
    }

    /// Generate rss xml string
    fn into_xml(self, config: &SiteConfig) -> Result<String> {
        let total = self.posts.len();
        let items: Vec<_> = self
            .posts
            .iter()
            .filter_map(|post| post_to_rss_item(post, config))
            .collect();

        let excluded = total - items.len();
        if excluded > 0 {
            log!("rss"; "excluded {excluded} posts without publish date");
        }

        let base = &config.base;
        let mut channel = ChannelBuilder::default();
        channel
            .link(config.base_url().to_string())
            .language(base.language.clone())
            .ttl(config.build.rss.ttl.to_string())
            .generator("syndica".to_string())
            .items(items);

        match self.scope {
            FeedScope::Site => {
                channel
                    .title(&base.title)
                    .description(&base.description)
                    .copyright(format!(
                        "Copyright {} {}",
                        chrono::Utc::now().year(),
                        base.author
                    ))
                    .categories(
                        config
                            .build
                            .rss
                            .channel_categories
                            .iter()
                            .map(|name| CategoryBuilder::default().name(name).build())
                            .collect::<Vec<_>>(),
                    );
            }
            FeedScope::Category(category) => {
                channel
                    .title(format!("{} - {category}", base.title))
                    .description(format!("Posts in the {category} category"))
                    .categories(vec![CategoryBuilder::default().name(category).build()])
                    .managing_editor(normalize_rss_author(None, config));
            }
        }

        let channel = channel.build();
        channel
            .validate()
            .map_err(|e| anyhow!("rss validation failed: {e}"))?;
        Ok(channel.to_string())
    }

    /// Write the feed to its output path.
    fn write(self, config: &SiteConfig) -> Result<()> {
        let rss_path = self.output_path(config);
        let xml = self.into_xml(config)?;

        if let Some(parent) = rss_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&rss_path, xml)
            .with_context(|| format!("failed to write feed to {}", rss_path.display()))?;

        log!("rss"; "{}", rss_path.file_name().unwrap_or_default().to_string_lossy());
        Ok(())
    }

    /// Output file path; category labels are percent-encoded so any
    /// authored label maps to a routable file name.
    fn output_path(&self, config: &SiteConfig) -> PathBuf {
        let output = &config.build.output;
        match self.scope {
            FeedScope::Site => output.join(&config.build.rss.path),
            FeedScope::Category(category) => output
                .join(&config.build.rss.category_dir)
                .join(format!("{}.xml", encode_segment(category))),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert a post to an rss item.
/// Returns None if the post has no publish date.
fn post_to_rss_item(post: &PostRecord, config: &SiteConfig) -> Option<rss::Item> {
    let pub_date = post.publish_date?.to_rfc2822();
    let link = permalink(config, Route::Post(&post.id));

    let categories: Vec<_> = post
        .category
        .iter()
        .chain(post.tags.iter())
        .map(|name| CategoryBuilder::default().name(name).build())
        .collect();

    let enclosure = post.image.as_ref().map(|image| {
        EnclosureBuilder::default()
            .url(image)
            .mime_type(ENCLOSURE_MIME)
            .length("0")
            .build()
    });

    Some(
        ItemBuilder::default()
            .title(post.title.clone())
            .link(Some(link.clone()))
            .guid(GuidBuilder::default().permalink(true).value(link).build())
            .description(post.excerpt.clone().unwrap_or_else(|| post.title.clone()))
            .pub_date(pub_date)
            .author(normalize_rss_author(post.author.as_ref(), config))
            .categories(categories)
            .enclosure(enclosure)
            .extensions(series_extensions(post))
            .build(),
    )
}

/// Custom `<series>` / `<seriesOrder>` elements, emitted only when the
/// corresponding source field is present.
fn series_extensions(post: &PostRecord) -> ExtensionMap {
    let mut elements = BTreeMap::new();

    if let Some(series) = &post.series {
        elements.insert(
            "series".to_string(),
            vec![
                ExtensionBuilder::default()
                    .name("series")
                    .value(series.clone())
                    .build(),
            ],
        );
    }
    if let Some(order) = post.series_order {
        elements.insert(
            "seriesOrder".to_string(),
            vec![
                ExtensionBuilder::default()
                    .name("seriesOrder")
                    .value(order.to_string())
                    .build(),
            ],
        );
    }

    let mut map = ExtensionMap::default();
    if !elements.is_empty() {
        map.insert(String::new(), elements);
    }
    map
}

/// Normalize author field to rss format: "email@example.com (Name)"
///
/// Priority:
/// 1. Post author if already in valid format
/// 2. Post author name combined with site email
/// 3. Site config author (combined with site email when name-only)
fn normalize_rss_author(author: Option<&String>, config: &SiteConfig) -> String {
    static RE_VALID_AUTHOR: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}[ \t]*\([^)]+\)$").unwrap()
    });

    let base = &config.base;
    let name = author.unwrap_or(&base.author);
    if RE_VALID_AUTHOR.is_match(name) {
        return name.clone();
    }
    format!("{} ({})", base.email, name)
}
