//! mediboy
//!
//! Files media releases into a `TV/...` / `Movie/...` library layout.
//! `parse` shows what the rule table extracts from a single `parent/child`
//! target; `process-file` classifies whole batches, either from a list of
//! `parent/child` lines or by symlinking a directory tree.

mod batch;
mod link;
mod report;

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use mediboy_core::{Classifier, LayoutConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// CLI arguments
#[derive(Parser)]
#[command(name = "mediboy")]
#[command(about = "Organise media releases into a TV/Movie library layout")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    layout: LayoutArgs,
}

/// Library directory names
#[derive(Args)]
struct LayoutArgs {
    /// Directory for TV shows
    #[arg(long, env = "MEDIBOY_TV_DIR", global = true, default_value = "TV")]
    tv_dir: String,

    /// Directory for movies
    #[arg(long, env = "MEDIBOY_MOVIE_DIR", global = true, default_value = "Movie")]
    movie_dir: String,

    /// Word placed before the season number
    #[arg(long, env = "MEDIBOY_SEASON_PREFIX", global = true, default_value = "Season")]
    season_prefix: String,

    /// Directory for openings, endings, OVAs and other extras
    #[arg(long, env = "MEDIBOY_SPECIAL_DIR", global = true, default_value = "Special")]
    special_dir: String,
}

impl From<LayoutArgs> for LayoutConfig {
    fn from(args: LayoutArgs) -> Self {
        LayoutConfig::new()
            .with_tv_dir(args.tv_dir)
            .with_movie_dir(args.movie_dir)
            .with_season_prefix(args.season_prefix)
            .with_special_dir(args.special_dir)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the attributes and library path for `parent/child`
    #[command(visible_alias = "p")]
    Parse {
        /// Release name, optionally `parent/child`
        target: String,
    },
    /// Classify a list of `parent/child` lines into an output file
    ProcessFile {
        /// Input list (or directory with --symlink)
        input: PathBuf,

        /// Output file (or library root with --symlink)
        output: PathBuf,

        /// Walk the input directory and symlink every file into the library
        #[arg(short, long)]
        symlink: bool,
    },
}

fn init_tracing(verbose: bool) {
    // RUST_LOG wins; otherwise pick a level from the verbose flag
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let classifier = Classifier::standard()
        .context("Failed to build the rule table")?
        .with_layout(cli.layout.into());

    match cli.command {
        Commands::Parse { target } => {
            let report = report::ParseReport::build(&classifier, &target);
            let json = serde_json::to_string_pretty(&report)
                .context("Failed to serialize parse report")?;
            println!("{json}");
        }
        Commands::ProcessFile {
            input,
            output,
            symlink,
        } => {
            let input = std::path::absolute(&input)
                .with_context(|| format!("Invalid input path {}", input.display()))?;
            let output = std::path::absolute(&output)
                .with_context(|| format!("Invalid output path {}", output.display()))?;

            if symlink {
                info!("Linking {} into {}", input.display(), output.display());
                let summary = link::link_tree(&classifier, &input, &output)?;
                info!(
                    linked = summary.linked,
                    existing = summary.existing,
                    skipped_directories = summary.skipped_directories,
                    "Done"
                );
            } else {
                info!("Processing {} into {}", input.display(), output.display());
                let summary = process_file(&classifier, &input, &output)?;
                info!(
                    directories = summary.directories,
                    paths = summary.paths,
                    skipped_lines = summary.skipped_lines,
                    skipped_directories = summary.skipped_directories,
                    "Done"
                );
            }
        }
    }

    Ok(())
}

fn process_file(classifier: &Classifier, input: &Path, output: &Path) -> Result<batch::Summary> {
    let reader = File::open(input)
        .map(BufReader::new)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let mut writer = File::create(output)
        .map(BufWriter::new)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let summary = batch::process_lines(classifier, reader, &mut writer)?;
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(summary)
}
