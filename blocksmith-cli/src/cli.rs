//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blocksmith", version, about = "Load and inspect content block schemas")]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Discover, validate and compile content blocks, then print a summary
    Load {
        /// Package root(s) to scan; may be given multiple times
        #[arg(long = "root", required = true)]
        roots: Vec<PathBuf>,

        /// Bypass the persisted cache and force a full cold load
        #[arg(long)]
        no_cache: bool,

        /// Directory for the persisted cache (defaults to the user cache dir)
        #[arg(long)]
        cache_dir: Option<PathBuf>,

        /// Publish block assets as symlinks below this directory
        #[arg(long)]
        publish: Option<PathBuf>,
    },

    /// Remove the persisted cache entry
    ClearCache {
        /// Directory for the persisted cache (defaults to the user cache dir)
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },
}
