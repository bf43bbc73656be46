//! Site configuration management for `syndica.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[base]`    | Site metadata (title, author, url, language)     |
//! | `[build]`   | Content/output paths, per-output feed settings   |
//! | `[serve]`   | Development server (port, interface)             |
//! | `[extra]`   | User-defined custom fields                       |
//!
//! # Example
//!
//! ```toml
//! [base]
//! title = "My Blog"
//! description = "A personal blog"
//! url = "https://example.com"
//!
//! [build]
//! content = "content"
//! output = "public"
//!
//! [build.rss]
//! enable = true
//!
//! [serve]
//! port = 5277
//! ```

mod base;
mod build;
pub mod defaults;
mod error;
mod serve;

pub use base::BaseConfig;
pub use build::{BuildConfig, JsonFeedConfig, RssConfig, SitemapConfig};
pub use serve::ServeConfig;

use crate::cli::{Cli, Commands};
use error::ConfigError;

use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing syndica.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Basic site information
    #[serde(default)]
    pub base: BaseConfig,

    /// Generation settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// User-defined extra fields
    #[serde(default)]
    pub extra: HashMap<String, toml::Value>,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Base URL without a trailing slash, empty string when unset.
    pub fn base_url(&self) -> &str {
        self.base.url.as_deref().unwrap_or_default().trim_end_matches('/')
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli
            .root
            .as_ref()
            .cloned()
            .unwrap_or_else(|| self.get_root().to_owned());
        self.update_path_with_root(&root, cli);

        match &cli.command {
            Commands::Build { build_args } => {
                if let Some(url) = &build_args.base_url {
                    self.base.url = Some(url.clone());
                }
            }
            Commands::Serve { interface, port } => {
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
            }
        }
    }

    /// Fail on config states no generation run can work with.
    pub fn validate(&self) -> Result<()> {
        let b = &self.build;
        let any_output = b.json_feed.enable || b.rss.enable || b.sitemap.enable;
        if any_output && self.base.url.is_none() {
            bail!(ConfigError::Validation(
                "base.url is required when any output is enabled (feeds need absolute links)"
                    .into()
            ));
        }
        if !self.build.content.exists() {
            bail!(ConfigError::Validation(format!(
                "content directory does not exist: {}",
                self.build.content.display()
            )));
        }
        Ok(())
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Update all paths relative to root directory and normalize to absolute paths.
    ///
    /// Per-output file paths (`build.rss.path` etc.) stay relative to the
    /// output directory and are joined at write time.
    fn update_path_with_root(&mut self, root: &Path, cli: &Cli) {
        // Apply CLI overrides first
        Self::update_option(&mut self.build.content, cli.content.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());

        let root = Self::normalize_path(root);
        self.config_path = Self::normalize_path(&root.join(&cli.config));
        self.build.content = Self::normalize_path(&root.join(&self.build.content));
        self.build.output = Self::normalize_path(&root.join(&self.build.output));
        self.set_root(&root);
    }

    /// Normalize a path to absolute form for reliable comparison.
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let config = SiteConfig::from_str(
            r#"
            [base]
            title = "Test"
            description = "Test blog"
        "#,
        )
        .unwrap();

        assert_eq!(config.base.title, "Test");
        assert!(config.build.rss.enable);
    }

    #[test]
    fn test_base_url_trimming() {
        let mut config = SiteConfig::default();
        config.base.url = Some("https://example.com/".to_string());
        assert_eq!(config.base_url(), "https://example.com");

        config.base.url = None;
        assert_eq!(config.base_url(), "");
    }

    #[test]
    fn test_validate_requires_url() {
        let config = SiteConfig::from_str(
            r#"
            [base]
            title = "Test"
            description = "Test blog"
        "#,
        )
        .unwrap();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("base.url"));
    }

    #[test]
    fn test_validate_all_outputs_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = SiteConfig::from_str(
            r#"
            [base]
            title = "Test"
            description = "Test blog"

            [build.json_feed]
            enable = false

            [build.rss]
            enable = false

            [build.sitemap]
            enable = false
        "#,
        )
        .unwrap();
        config.build.content = dir.path().to_path_buf();

        // Nothing enabled: no URL requirement
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_extra_fields_allowed() {
        let config = SiteConfig::from_str(
            r#"
            [base]
            title = "Test"
            description = "Test blog"

            [extra]
            analytics_id = "UA-12345"
        "#,
        )
        .unwrap();

        assert!(config.extra.contains_key("analytics_id"));
    }
}
