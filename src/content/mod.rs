//! Post records and the content source.
//!
//! `PostRecord` is the validated in-memory representation of one authored
//! post. Records are built once per generation pass and never mutated;
//! everything downstream (ordering, facets, projections) computes new
//! values from the loaded set.
//!
//! # Architecture
//!
//! ```text
//! Posts::load()
//!     │
//!     └── walk content dir ──► front_matter::parse() per file
//!                                      │
//!                                      ▼
//!                               PostRecord (id from relative path)
//!                                      │
//!                                      ▼
//!                          Posts { items: Vec<PostRecord> }
//!                                      │
//!              ┌───────────────┬───────┴────────┬──────────────┐
//!              ▼               ▼                ▼              ▼
//!        build_json_feed  build_rss   build_category_feeds  build_sitemap
//! ```

pub mod facet;
pub mod front_matter;
pub mod select;

pub use front_matter::ExternalLinkMeta as ExternalLink;

use crate::{config::SiteConfig, log, utils::date::DateTimeUtc};
use anyhow::{Context, Result, anyhow, bail};
use std::{collections::HashSet, fs, path::Path};
use walkdir::WalkDir;

/// One validated authored post with metadata.
///
/// | Field | Example | Used by |
/// |-------|---------|---------|
/// | `id` | `posts/hello-world` | permalinks, item identity |
/// | `publish_date` | `2024-01-01` | ordering, pubDate, date_published |
/// | `update_date` | `2024-02-01` | date_modified, sitemap lastmod |
/// | `category` | `rails` | category feeds, facet pages |
/// | `tags` | `["ruby", "types"]` | item categories, facet pages |
/// | `body` | raw Markdown | rendered content_html |
#[derive(Debug, Clone)]
pub struct PostRecord {
    /// Unique, stable id derived from the content-relative path.
    pub id: String,
    pub title: String,
    /// Absent only for posts that never reach a feed projector.
    pub publish_date: Option<DateTimeUtc>,
    /// Last-modified; callers fall back to `publish_date` when absent.
    pub update_date: Option<DateTimeUtc>,
    pub draft: bool,
    pub excerpt: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub author: Option<String>,
    pub series: Option<String>,
    pub series_order: Option<u32>,
    pub prerequisites: Vec<String>,
    pub external_links: Vec<ExternalLink>,
    pub featured: bool,
    /// Raw authored content. Opaque here; the render seam turns it into
    /// presentational HTML for the full-text feed.
    pub body: String,
}

impl PostRecord {
    /// Build a record from parsed front matter and a content-relative slug.
    fn from_front_matter(
        slug: String,
        meta: front_matter::FrontMatter,
        body: String,
    ) -> Result<Self> {
        if meta.title.trim().is_empty() {
            bail!("post has an empty title");
        }

        let parse_date = |field: &str, value: Option<&String>| -> Result<Option<DateTimeUtc>> {
            value
                .map(|raw| {
                    DateTimeUtc::parse(raw)
                        .ok_or_else(|| anyhow!("invalid {field}: {raw:?} (expected YYYY-MM-DD or RFC 3339)"))
                })
                .transpose()
        };

        Ok(Self {
            id: slug,
            title: meta.title,
            publish_date: parse_date("publish_date", meta.publish_date.as_ref())?,
            update_date: parse_date("update_date", meta.update_date.as_ref())?,
            draft: meta.draft,
            excerpt: meta.excerpt,
            image: meta.image,
            category: meta.category,
            tags: meta.tags,
            author: meta.author,
            series: meta.series,
            series_order: meta.series_order,
            prerequisites: meta.prerequisites,
            external_links: meta.external_links,
            featured: meta.featured,
            body,
        })
    }

    /// Last-modified for freshness signaling: update date, else publish date.
    pub fn last_modified(&self) -> Option<DateTimeUtc> {
        self.update_date.or(self.publish_date)
    }
}

// ============================================================================
// Post Collection
// ============================================================================

/// Immutable snapshot of all posts for one generation pass.
#[derive(Debug, Default)]
pub struct Posts {
    pub items: Vec<PostRecord>,
}

impl Posts {
    /// Load every `.md` file under the content directory.
    ///
    /// Walk order is sorted by path so the encounter order (and with it
    /// every derived output) is identical across runs and platforms.
    ///
    /// # Errors
    ///
    /// Fails on unreadable files, malformed front matter, invalid dates,
    /// empty titles, and duplicate ids. Author mistakes should surface at
    /// build time, not as silently wrong feeds.
    pub fn load(config: &SiteConfig) -> Result<Self> {
        let content_dir = &config.build.content;

        let mut items = Vec::new();
        let mut seen = HashSet::new();

        let entries = WalkDir::new(content_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"));

        for entry in entries {
            let path = entry.path();
            let post = load_post(path, content_dir)
                .with_context(|| format!("failed to load post: {}", path.display()))?;

            if !seen.insert(post.id.clone()) {
                bail!("duplicate post id {:?} (from {})", post.id, path.display());
            }
            items.push(post);
        }

        log!("content"; "loaded {} posts", items.len());
        Ok(Self { items })
    }

    /// Get iterator over posts.
    pub fn iter(&self) -> impl Iterator<Item = &PostRecord> {
        self.items.iter()
    }

    /// Number of posts.
    #[allow(dead_code)]
    pub const fn len(&self) -> usize {
        self.items.len()
    }
}

/// Read and validate a single post file.
fn load_post(path: &Path, content_dir: &Path) -> Result<PostRecord> {
    let raw = fs::read_to_string(path)?;
    let (meta, body) = front_matter::parse(&raw)?;
    let slug = slug_from_path(path, content_dir)?;
    PostRecord::from_front_matter(slug, meta, body)
}

/// Derive the stable post id from the content-relative path.
///
/// `content/posts/hello.md` → `posts/hello`. Separators are normalized
/// to `/` so ids match across platforms.
fn slug_from_path(path: &Path, content_dir: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(content_dir)
        .map_err(|_| anyhow!("file is not in content directory: {}", path.display()))?
        .to_str()
        .ok_or_else(|| anyhow!("invalid path encoding: {}", path.display()))?
        .strip_suffix(".md")
        .ok_or_else(|| anyhow!("not a .md file: {}", path.display()))?
        .replace('\\', "/");

    Ok(relative)
}


#[cfg(test)]
mod tests {
    use super::testing::make_post;
    use super::*;
    use std::path::PathBuf;

    fn write_post(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn make_config(content_dir: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.build.content = content_dir.to_path_buf();
        config
    }

    #[test]
    fn test_slug_from_path() {
        let content = PathBuf::from("/site/content");
        let slug = slug_from_path(&content.join("posts/hello.md"), &content).unwrap();
        assert_eq!(slug, "posts/hello");
    }

    #[test]
    fn test_slug_rejects_foreign_path() {
        let content = PathBuf::from("/site/content");
        assert!(slug_from_path(Path::new("/elsewhere/a.md"), &content).is_err());
    }

    #[test]
    fn test_load_posts() {
        let dir = tempfile::tempdir().unwrap();
        write_post(
            dir.path(),
            "hello.md",
            "+++\ntitle = \"Hello\"\npublish_date = \"2024-01-01\"\n+++\nBody\n",
        );
        write_post(
            dir.path(),
            "nested/deep.md",
            "+++\ntitle = \"Deep\"\ndraft = true\n+++\n",
        );
        // Non-markdown files are ignored
        write_post(dir.path(), "notes.txt", "not a post");

        let posts = Posts::load(&make_config(dir.path())).unwrap();
        assert_eq!(posts.len(), 2);

        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["hello", "nested/deep"]);

        let hello = posts.iter().find(|p| p.id == "hello").unwrap();
        assert_eq!(hello.publish_date, Some(DateTimeUtc::from_ymd(2024, 1, 1)));
        assert_eq!(hello.body, "Body\n");
    }

    #[test]
    fn test_load_rejects_invalid_date() {
        let dir = tempfile::tempdir().unwrap();
        write_post(
            dir.path(),
            "bad.md",
            "+++\ntitle = \"Bad\"\npublish_date = \"soon\"\n+++\n",
        );

        let err = Posts::load(&make_config(dir.path())).unwrap_err();
        assert!(format!("{err:#}").contains("publish_date"));
    }

    #[test]
    fn test_load_rejects_empty_title() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "untitled.md", "+++\ntitle = \"  \"\n+++\n");

        let err = Posts::load(&make_config(dir.path())).unwrap_err();
        assert!(format!("{err:#}").contains("empty title"));
    }

    #[test]
    fn test_last_modified_fallback() {
        let mut post = make_post("a", Some("2024-05-01"), false);
        assert_eq!(post.last_modified(), Some(DateTimeUtc::from_ymd(2024, 5, 1)));

        post.update_date = Some(DateTimeUtc::from_ymd(2024, 6, 1));
        assert_eq!(post.last_modified(), Some(DateTimeUtc::from_ymd(2024, 6, 1)));

        post.publish_date = None;
        post.update_date = None;
        assert_eq!(post.last_modified(), None);
    }
}
