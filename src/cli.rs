// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Three ways to get a series:
// - index:  the author keeps a wiki page listing every part
// - follow: start at part 1 and keep clicking "next"
// - batch:  you already have the list of part URLs
//
// Global flags (--config, --rate-limit-ms) come before the subcommand.
// =============================================================================

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "series-crawler",
    version,
    about = "Discover and collect a serialized series of forum posts",
    long_about = "series-crawler finds every part of a story posted as a chain of forum posts, \
                  either from an index page or by following 'next' links, and exports the \
                  collected parts as one document."
)]
pub struct Cli {
    /// TOML settings file (rate_limit_ms, next_pattern, user_agent, timeout_secs)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Minimum milliseconds between requests (overrides the config file)
    #[arg(long, global = true)]
    pub rate_limit_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read the list of parts from an index (wiki) page
    ///
    /// Example: series-crawler index https://www.reddit.com/r/HFY/wiki/series/my_story --collect
    Index {
        /// Index page URL
        url: String,

        /// Also fetch every part and export them
        #[arg(long)]
        collect: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Start at one post and follow its "next" links
    ///
    /// Example: series-crawler follow https://redd.it/abc123 --pattern "next|part \d+"
    Follow {
        /// URL of the first part (short or long form)
        url: String,

        /// Regex matched (case-insensitive) against link text
        #[arg(long)]
        pattern: Option<String>,

        /// Stop after this many parts
        #[arg(long)]
        max_parts: Option<usize>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Collect an explicit, ordered list of parts
    ///
    /// Example: series-crawler batch https://redd.it/aaa https://redd.it/bbb --title "My Story"
    Batch {
        /// Part URLs, in reading order
        #[arg(required = true)]
        urls: Vec<String>,

        /// Title for the exported document
        #[arg(long, default_value = "")]
        title: String,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Print the export as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Write the export to this file (.html for a readable page, anything else for JSON)
    #[arg(long)]
    pub out: Option<PathBuf>,
}
