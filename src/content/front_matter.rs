//! TOML front matter extraction.
//!
//! Posts are Markdown files opening with a `+++` fenced TOML block:
//!
//! ```markdown
//! +++
//! title = "Hello"
//! publish_date = "2024-01-01"
//! +++
//!
//! Body text...
//! ```
//!
//! The body is returned untouched; nothing in this layer interprets it.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Front matter fence delimiter.
const FENCE: &str = "+++";

/// Raw post metadata as authored.
///
/// Deserialization through serde is the schema-validation step: a file
/// whose front matter does not match this shape fails its load.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrontMatter {
    pub title: String,
    pub publish_date: Option<String>,
    pub update_date: Option<String>,
    #[serde(default)]
    pub draft: bool,
    pub excerpt: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: Option<String>,
    pub series: Option<String>,
    pub series_order: Option<u32>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub external_links: Vec<ExternalLinkMeta>,
    #[serde(default)]
    pub featured: bool,
}

/// A reference to related material outside the site.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExternalLinkMeta {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Split a post file into parsed front matter and the raw body.
pub fn parse(input: &str) -> Result<(FrontMatter, String)> {
    let rest = match input.strip_prefix(FENCE) {
        Some(rest) => rest,
        None => bail!("missing front matter: file must start with `{FENCE}`"),
    };

    let Some((meta, body)) = rest.split_once(&format!("\n{FENCE}")) else {
        bail!("unterminated front matter: no closing `{FENCE}`");
    };

    let front_matter: FrontMatter = toml::from_str(meta)?;
    Ok((front_matter, body.trim_start_matches(['\r', '\n']).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let (meta, body) = parse("+++\ntitle = \"Hello\"\n+++\n\nBody text.\n").unwrap();
        assert_eq!(meta.title, "Hello");
        assert!(!meta.draft);
        assert_eq!(body, "Body text.\n");
    }

    #[test]
    fn test_parse_full() {
        let input = r#"+++
title = "Typed Rails"
publish_date = "2024-01-01"
update_date = "2024-02-01T08:30:00Z"
draft = false
excerpt = "A short summary"
image = "https://example.com/cover.jpg"
category = "rails"
tags = ["ruby", "types"]
author = "Alice"
series = "typed-rails"
series_order = 2
prerequisites = ["ruby-basics"]
featured = true

[[external_links]]
title = "Sorbet"
url = "https://sorbet.org"
description = "The type checker"
+++
Body here.
"#;
        let (meta, body) = parse(input).unwrap();
        assert_eq!(meta.title, "Typed Rails");
        assert_eq!(meta.publish_date.as_deref(), Some("2024-01-01"));
        assert_eq!(meta.category.as_deref(), Some("rails"));
        assert_eq!(meta.tags, vec!["ruby", "types"]);
        assert_eq!(meta.series_order, Some(2));
        assert_eq!(meta.external_links.len(), 1);
        assert_eq!(meta.external_links[0].url, "https://sorbet.org");
        assert_eq!(
            meta.external_links[0].description.as_deref(),
            Some("The type checker")
        );
        assert!(meta.featured);
        assert_eq!(body, "Body here.\n");
    }

    #[test]
    fn test_parse_missing_fence() {
        assert!(parse("title = \"Hello\"\n").is_err());
    }

    #[test]
    fn test_parse_unterminated_fence() {
        assert!(parse("+++\ntitle = \"Hello\"\n").is_err());
    }

    #[test]
    fn test_parse_unknown_field() {
        let err = parse("+++\ntitle = \"x\"\nbogus = 1\n+++\n").unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn test_body_fence_not_confused() {
        // A `+++` inside the body is plain text
        let (_, body) = parse("+++\ntitle = \"x\"\n+++\nsome\n+++\ntext\n").unwrap();
        assert_eq!(body, "some\n+++\ntext\n");
    }
}
