//! Sitemap generation.
//!
//! Generates a sitemap.xml listing static pages, posts, and the derived
//! category/tag pages for search engine indexing.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/posts/hello</loc>
//!     <priority>0.8</priority>
//!     <changefreq>monthly</changefreq>
//!     <lastmod>2025-01-01</lastmod>
//!   </url>
//! </urlset>
//! ```

use crate::{
    config::SiteConfig,
    content::{Posts, facet::extract_facets, select::select_posts},
    log,
    permalink::{Route, permalink},
};
use anyhow::{Context, Result};
use std::fs;

// ============================================================================
// Constants
// ============================================================================

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Entry classes with fixed priority/changefreq pairs.
///
/// Single source for these constants; every entry-producing path below
/// goes through this table so the pairs cannot drift apart per call
/// site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryClass {
    Home,
    BlogIndex,
    Search,
    Hub,
    Post,
    Category,
    Tag,
}

impl EntryClass {
    const fn priority(self) -> &'static str {
        match self {
            Self::Home => "1.0",
            Self::BlogIndex => "0.9",
            Self::Search => "0.7",
            Self::Hub | Self::Post => "0.8",
            Self::Category => "0.6",
            Self::Tag => "0.5",
        }
    }

    const fn changefreq(self) -> &'static str {
        match self {
            Self::Home | Self::Search | Self::Hub | Self::Post => "monthly",
            Self::BlogIndex | Self::Category | Self::Tag => "weekly",
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Build sitemap if enabled in config.
pub fn build_sitemap(config: &SiteConfig, posts: &Posts) -> Result<()> {
    if config.build.sitemap.enable {
        Sitemap::from_posts(config, posts).write(config)?;
    }
    Ok(())
}

// ============================================================================
// Sitemap Implementation
// ============================================================================

/// Sitemap data structure
struct Sitemap {
    /// List of URL entries
    urls: Vec<UrlEntry>,
}

/// Single URL entry in the sitemap
struct UrlEntry {
    /// Full URL location
    loc: String,
    /// Entry class, determines priority/changefreq
    class: EntryClass,
    /// Last modification date (optional, YYYY-MM-DD format)
    lastmod: Option<String>,
}

impl Sitemap {
    /// Collect entries: static pages, then posts, then facet pages.
    ///
    /// Posts tolerate a missing publish date here: `lastmod` falls back
    /// to the update date and is omitted when both are absent, so a
    /// dateless page is still indexed.
    fn from_posts(config: &SiteConfig, posts: &Posts) -> Self {
        let selected = select_posts(posts, None);
        let facets = extract_facets(selected.iter().copied());

        let static_pages = [
            (Route::Home, EntryClass::Home),
            (Route::Blog, EntryClass::BlogIndex),
            (Route::Search, EntryClass::Search),
        ]
        .into_iter()
        .chain(
            config
                .build
                .sitemap
                .hub_pages
                .iter()
                .map(|name| (Route::Hub(name), EntryClass::Hub)),
        )
        .map(|(route, class)| UrlEntry {
            loc: permalink(config, route),
            class,
            lastmod: None,
        });

        let post_entries = selected.iter().map(|post| UrlEntry {
            loc: permalink(config, Route::Post(&post.id)),
            class: EntryClass::Post,
            lastmod: post.last_modified().map(|date| date.to_ymd()),
        });

        let category_entries = facets.categories.iter().map(|category| UrlEntry {
            loc: permalink(config, Route::Category(category)),
            class: EntryClass::Category,
            lastmod: None,
        });

        let tag_entries = facets.tags.iter().map(|tag| UrlEntry {
            loc: permalink(config, Route::Tag(tag)),
            class: EntryClass::Tag,
            lastmod: None,
        });

        let urls = static_pages
            .chain(post_entries)
            .chain(category_entries)
            .chain(tag_entries)
            .collect();

        Self { urls }
    }

    /// Generate sitemap XML string.
    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
        xml.push('\n');

        for entry in self.urls {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
            xml.push_str(&format!(
                "    <priority>{}</priority>\n",
                entry.class.priority()
            ));
            xml.push_str(&format!(
                "    <changefreq>{}</changefreq>\n",
                entry.class.changefreq()
            ));
            if let Some(lastmod) = entry.lastmod {
                xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
            }
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }

    /// Write sitemap to output file.
    fn write(self, config: &SiteConfig) -> Result<()> {
        let sitemap_path = config.build.output.join(&config.build.sitemap.path);
        let xml = self.into_xml();

        if let Some(parent) = sitemap_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&sitemap_path, xml)
            .with_context(|| format!("failed to write sitemap to {}", sitemap_path.display()))?;

        log!("sitemap"; "{}", sitemap_path.file_name().unwrap_or_default().to_string_lossy());
        Ok(())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

// ============================================================================
// Tests
// ============================================================================
