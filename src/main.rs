// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments and load settings
// 2. Build one Collector (HTTP source + rate limiter + session cache)
// 3. Dispatch to the subcommand handler (index, follow, batch)
// 4. Print or write the export
// 5. Exit with proper code (0 = success, 1 = crawl failed, 2 = error)
// =============================================================================

mod cli;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands, OutputArgs};
use series_crawler::collect::{collect_batch, Collector, Post, PostRef};
use series_crawler::config::Settings;
use series_crawler::discover::{discover_from_index, follow_series, NextLinkMatcher};
use series_crawler::export::ExportDocument;
use series_crawler::fetch::{HttpSource, RateLimiter};
use series_crawler::observe::{CrawlObserver, CrawlOutcome, Flow};
use series_crawler::CrawlError;

#[tokio::main]
async fn main() {
    // Logs go to stderr so --json output on stdout stays parseable
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(code);
}

// Returns:
//   Ok(0) = series collected (or stopped early on request)
//   Ok(1) = a fetch failed part way
//   Err   = unexpected error (bad config, bad pattern, index page unusable)
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(ms) = cli.rate_limit_ms {
        settings.rate_limit_ms = ms;
    }

    let limiter = Arc::new(RateLimiter::default());
    limiter.set_min_interval(settings.min_interval());
    let source = HttpSource::new(limiter, &settings.user_agent, settings.timeout())
        .context("Failed to create HTTP client")?;
    let collector = Collector::new(source);

    match cli.command {
        Commands::Index {
            url,
            collect,
            output,
        } => handle_index(&collector, &url, collect, &output).await,
        Commands::Follow {
            url,
            pattern,
            max_parts,
            output,
        } => {
            let pattern = pattern.unwrap_or(settings.next_pattern);
            handle_follow(&collector, &url, &pattern, max_parts, &output).await
        }
        Commands::Batch { urls, title, output } => {
            handle_batch(&collector, urls, &title, &output).await
        }
    }
}

async fn handle_index(
    collector: &Collector<HttpSource>,
    url: &str,
    collect: bool,
    output: &OutputArgs,
) -> Result<i32> {
    if !output.json {
        println!("🔍 Reading index page: {}", url);
    }

    let series = discover_from_index(collector, url)
        .await
        .with_context(|| format!("Could not read index page {}", url))?;

    if !collect {
        if output.json {
            println!("{}", serde_json::to_string_pretty(&series)?);
        } else {
            print_series(&series.title, &series.author, &series.parts);
        }
        return Ok(0);
    }

    if !output.json {
        println!("📚 {} part(s) listed, collecting...\n", series.parts.len());
    }

    let mut progress = Progress::new(output.json, None);
    let outcome = collect_batch(collector, &series.parts, &mut progress).await;
    finish(outcome, output, |posts| ExportDocument::from_series(&series, posts))
}

async fn handle_follow(
    collector: &Collector<HttpSource>,
    url: &str,
    pattern: &str,
    max_parts: Option<usize>,
    output: &OutputArgs,
) -> Result<i32> {
    let matcher = NextLinkMatcher::new(pattern)?;

    if !output.json {
        println!("🔍 Following \"{}\" links from {}\n", pattern, url);
    }

    let mut progress = Progress::new(output.json, max_parts);
    let outcome = follow_series(collector, url, &matcher, &mut progress).await;

    // The first part names the series
    let (title, author) = outcome
        .posts()
        .first()
        .map(|post| (post.title.clone(), post.author.clone()))
        .unwrap_or_default();

    finish(outcome, output, |posts| {
        ExportDocument::from_posts(&title, &author, posts)
    })
}

async fn handle_batch(
    collector: &Collector<HttpSource>,
    urls: Vec<String>,
    title: &str,
    output: &OutputArgs,
) -> Result<i32> {
    let parts: Vec<PostRef> = urls.into_iter().map(PostRef::from_url).collect();

    if let Some(bad) = parts.iter().find(|part| part.name.is_none()) {
        return Err(CrawlError::InvalidUrl(bad.url.clone()).into());
    }

    let mut progress = Progress::new(output.json, None);
    let outcome = collect_batch(collector, &parts, &mut progress).await;

    let author = outcome
        .posts()
        .first()
        .map(|post| post.author.clone())
        .unwrap_or_default();
    let title = if title.is_empty() {
        outcome
            .posts()
            .first()
            .map(|post| post.title.clone())
            .unwrap_or_default()
    } else {
        title.to_string()
    };

    finish(outcome, output, |posts| {
        ExportDocument::from_posts(&title, &author, posts)
    })
}

// Reports how the crawl ended, then exports whatever was collected
//
// Collected parts are exported even after a failure so nothing fetched is lost.
fn finish<F>(outcome: CrawlOutcome, output: &OutputArgs, build: F) -> Result<i32>
where
    F: FnOnce(&[Post]) -> ExportDocument,
{
    match &outcome {
        CrawlOutcome::Done(posts) if !output.json => {
            println!("\n✅ Collected {} part(s)", posts.len());
        }
        CrawlOutcome::Aborted(posts) if !output.json => {
            println!("\n⏹️  Stopped after {} part(s)", posts.len());
        }
        CrawlOutcome::Failed {
            posts,
            target,
            error,
        } => {
            eprintln!("\n❌ Failed on {}: {}", target.url, error);
            eprintln!("   {} part(s) collected before the failure", posts.len());
        }
        _ => {}
    }

    let code = exit_code(&outcome);
    let posts = outcome.into_posts();
    let document = build(&posts);

    if let Some(path) = &output.out {
        write_export(&document, path)?;
        if !output.json {
            println!("💾 Wrote {}", path.display());
        }
    }

    if output.json {
        println!("{}", document.to_json()?);
    } else {
        print_table(&posts);
    }

    Ok(code)
}

// 0 when the crawl finished or was stopped on request (--max-parts),
// 1 when a fetch failed part way
fn exit_code(outcome: &CrawlOutcome) -> i32 {
    match outcome {
        CrawlOutcome::Done(_) | CrawlOutcome::Aborted(_) => 0,
        CrawlOutcome::Failed { .. } => 1,
    }
}

fn write_export(document: &ExportDocument, path: &Path) -> Result<()> {
    let is_html = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"));

    let contents = if is_html {
        document.to_html()
    } else {
        document.to_json()?
    };

    std::fs::write(path, contents).with_context(|| format!("Could not write {}", path.display()))
}

fn print_series(title: &str, author: &str, parts: &[PostRef]) {
    println!("📖 {}", if title.is_empty() { "(untitled)" } else { title });
    if !author.is_empty() {
        println!("✍️  {}", author);
    }
    println!();
    println!("{:<5} {:<10} {:<50}", "#", "ID", "TITLE");
    println!("{}", "=".repeat(65));

    for (index, part) in parts.iter().enumerate() {
        let id = part.name.as_ref().map(|id| id.as_str()).unwrap_or("-");
        println!("{:<5} {:<10} {:<50}", index + 1, id, truncate(&part.title, 50));
    }
}

fn print_table(posts: &[Post]) {
    if posts.is_empty() {
        return;
    }

    println!();
    println!("{:<5} {:<10} {:<50} {:<10}", "#", "ID", "TITLE", "SIZE");
    println!("{}", "=".repeat(75));

    for (index, post) in posts.iter().enumerate() {
        println!(
            "{:<5} {:<10} {:<50} {:<10}",
            index + 1,
            post.name,
            truncate(&post.title, 50),
            post.content.len()
        );
    }
}

// Truncates on a character boundary for display
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let cut: String = text.chars().take(width - 3).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

// Prints one line per step and stops the crawl after `max_parts`, if set
struct Progress {
    quiet: bool,
    max_parts: Option<usize>,
    collected: usize,
}

impl Progress {
    fn new(quiet: bool, max_parts: Option<usize>) -> Self {
        Self {
            quiet,
            max_parts,
            collected: 0,
        }
    }
}

impl CrawlObserver for Progress {
    fn next_url(&mut self, url: &str) -> Flow {
        if !self.quiet {
            println!("   ➡️  next: {}", url);
        }
        Flow::Continue
    }

    fn collected(&mut self, post: &Post) -> Flow {
        self.collected += 1;
        if !self.quiet {
            println!("📄 [{}] {}", self.collected, post.title);
        }

        match self.max_parts {
            Some(limit) if self.collected >= limit => Flow::Abort,
            _ => Flow::Continue,
        }
    }

    fn failed(&mut self, target: &PostRef, error: &CrawlError) {
        if !self.quiet {
            let label = if target.title.is_empty() {
                &target.url
            } else {
                &target.title
            };
            println!("⚠️  {} failed: {}", label, error);
        }
    }
}
