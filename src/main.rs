mod cache;
mod commands;
mod formats;
mod metrics;
mod model;
mod output;
mod reports;
mod util;

use crate::commands::{export, info, summarize, CacheArgs, ExportFormat, Selection};
use crate::output::rss::DEFAULT_ITEM_LIMIT;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

#[derive(Parser)]
struct Opts {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print batch summaries for each selected state.
    Summarize {
        /// Directory of timestamped results documents
        snapshot_dir: PathBuf,
        #[clap(flatten)]
        selection: Selection,
        /// Print stage timings when done
        #[clap(long)]
        timings: bool,
    },
    /// Write batch summaries as CSV, HTML, RSS and/or JSON.
    Export {
        /// Directory of timestamped results documents
        snapshot_dir: PathBuf,
        /// Output directory
        out_dir: PathBuf,
        #[clap(long, value_enum, default_value = "all")]
        format: ExportFormat,
        /// Maximum number of items in the RSS feed
        #[clap(long, default_value_t = DEFAULT_ITEM_LIMIT)]
        rss_limit: usize,
        #[clap(flatten)]
        selection: Selection,
        /// Print stage timings when done
        #[clap(long)]
        timings: bool,
    },
    /// List the states found in a snapshot directory.
    Info {
        /// Directory of timestamped results documents
        snapshot_dir: PathBuf,
        #[clap(flatten)]
        cache: CacheArgs,
    },
}

fn main() {
    let opts = Opts::parse();

    let result = match opts.command {
        Command::Summarize {
            snapshot_dir,
            selection,
            timings,
        } => summarize(&snapshot_dir, &selection, timings),
        Command::Export {
            snapshot_dir,
            out_dir,
            format,
            rss_limit,
            selection,
            timings,
        } => export(
            &snapshot_dir,
            &out_dir,
            &selection,
            format,
            rss_limit,
            timings,
        ),
        Command::Info {
            snapshot_dir,
            cache,
        } => info(&snapshot_dir, &cache),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "❌".red(), e.to_string().red());
        std::process::exit(1);
    }
}
