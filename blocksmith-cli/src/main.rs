//! Blocksmith CLI: load content block definitions and print the compiled
//! schema summary.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Load failed (configuration error in some block definition)

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

use blocksmith::{BlockLoader, DefinitionCache, LoadError};
use cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("blocksmith=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Load {
            roots,
            no_cache,
            cache_dir,
            publish,
        } => load(roots, no_cache, cache_dir, publish),
        Commands::ClearCache { cache_dir } => clear_cache(cache_dir),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load(
    roots: Vec<PathBuf>,
    no_cache: bool,
    cache_dir: Option<PathBuf>,
    publish: Option<PathBuf>,
) -> Result<(), LoadError> {
    let mut builder = BlockLoader::builder().roots(roots);
    if let Some(dir) = cache_dir {
        builder = builder.cache_dir(dir);
    }
    if let Some(target) = publish {
        builder = builder.publish_to(target);
    }
    let mut loader = builder.build()?;

    let schema = loader.load(!no_cache)?;

    println!(
        "{} content block(s), {} table(s)",
        loader.registry().len(),
        schema.len()
    );
    for (table_name, table) in schema.tables() {
        println!(
            "  {}: {} column(s), {} type(s)",
            table_name,
            table.columns.len(),
            table.types.len()
        );
        for (type_key, variant) in &table.types {
            println!("    {} <- {}", type_key, variant.block);
        }
    }
    Ok(())
}

fn clear_cache(cache_dir: Option<PathBuf>) -> Result<(), LoadError> {
    let cache = match cache_dir {
        Some(dir) => DefinitionCache::with_dir(dir),
        None => DefinitionCache::new()?,
    };
    if cache.clear()? {
        println!("cache cleared");
    } else {
        println!("cache was already empty");
    }
    Ok(())
}
