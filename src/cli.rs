//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Syndica feed and sitemap generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Output directory path (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Content directory path (relative to project root)
    #[arg(short, long)]
    pub content: Option<PathBuf>,

    /// Config file name (default: syndica.toml)
    #[arg(short = 'C', long, default_value = "syndica.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared build arguments for Build and Serve commands
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Override base URL for the site.
    ///
    /// Useful for CI/CD deployments where the production URL differs from
    /// the one in syndica.toml.
    #[arg(long = "base-url")]
    pub base_url: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate all enabled outputs (JSON Feed, RSS, per-category RSS, sitemap)
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Serve the generated outputs with the route policy applied
    Serve {
        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[allow(unused)]
impl Cli {
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build { .. })
    }

    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_command() {
        let cli = Cli::parse_from(["syndica", "build"]);
        assert!(cli.is_build());
        assert_eq!(cli.config, PathBuf::from("syndica.toml"));
    }

    #[test]
    fn test_build_with_base_url() {
        let cli = Cli::parse_from(["syndica", "build", "--base-url", "https://example.com"]);
        match cli.command {
            Commands::Build { build_args } => {
                assert_eq!(build_args.base_url.as_deref(), Some("https://example.com"));
            }
            Commands::Serve { .. } => panic!("expected build command"),
        }
    }

    #[test]
    fn test_serve_with_port() {
        let cli = Cli::parse_from(["syndica", "-r", "/tmp/site", "serve", "-p", "8080"]);
        assert!(cli.is_serve());
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/site")));
        match cli.command {
            Commands::Serve { port, .. } => assert_eq!(port, Some(8080)),
            Commands::Build { .. } => panic!("expected serve command"),
        }
    }
}
