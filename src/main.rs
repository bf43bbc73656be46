//! Syndica - feed and sitemap generation for markdown blogs.

mod cli;
mod config;
mod content;
mod generator;
mod logger;
mod permalink;
mod render;
mod serve;
mod utils;

use anyhow::{Result, bail};
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use content::Posts;
use generator::build_outputs;
use render::MarkdownRenderer;
use serve::serve_site;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Build { .. } => build_all(&config),
        Commands::Serve { .. } => {
            build_all(&config)?;
            serve_site(&config)
        }
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    if !config_path.exists() {
        bail!("Config file not found: {}", config_path.display());
    }

    let mut config = SiteConfig::from_path(&config_path)?;
    config.update_with_cli(cli);
    config.validate()?;

    Ok(config)
}

/// Load the post snapshot and generate every enabled output document.
fn build_all(config: &SiteConfig) -> Result<()> {
    let posts = Posts::load(config)?;
    build_outputs(config, &posts, &MarkdownRenderer)
}
