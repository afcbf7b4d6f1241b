//! Lame-Sitemapper main entry point
//!
//! This is the command-line interface for the Lame-Sitemapper site crawler.

use anyhow::Context;
use clap::Parser;
use lame_sitemapper::config::{load_config_with_hash, Config};
use lame_sitemapper::{CrawlError, Crawler, HostPolicy};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Exit code for bad arguments, seeds and configuration files
const EXIT_USAGE: u8 = 3;

/// Lame-Sitemapper: a single-host site mapper
///
/// Crawls one host starting from URL and prints every page it found, in
/// depth-first order. Pages where traversal stopped are followed by the reasons.
#[derive(Parser, Debug)]
#[command(name = "lame-sitemapper")]
#[command(version)]
#[command(about = "A single-host site mapper", long_about = None)]
struct Cli {
    /// Address to start crawling from
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Depth at which traversal stops (1-10)
    #[arg(short, long)]
    depth: Option<usize>,

    /// Number of concurrent scrapers (1-10)
    #[arg(short = 't', long)]
    scraper_threads: Option<usize>,

    /// Do not fetch or honor robots.txt
    #[arg(long)]
    no_robots: bool,

    /// Accept hosts that are not registrable domains (IP addresses, localhost)
    #[arg(long)]
    any_host: bool,

    /// Validate the configuration and print it without crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            let code = e
                .downcast_ref::<CrawlError>()
                .map_or(EXIT_USAGE, CrawlError::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_settings(&cli)?;

    if cli.dry_run {
        print_config(&config);
        return Ok(());
    }

    let crawler = Crawler::from_config(&config)?;
    tracing::info!(
        "Crawling {} with {} scrapers, max depth {}, robots.txt {}",
        cli.url,
        config.crawler.scraper_threads,
        config.crawler.max_depth,
        if config.crawler.use_robots { "on" } else { "off" }
    );

    let started = Instant::now();
    let outcome = crawler.run(&cli.url).await?;
    tracing::info!(
        "found {} pages in {:.2}s",
        outcome.page_count(),
        started.elapsed().as_secs_f64()
    );

    for page in outcome.root.iter().flat_map(|root| root.iter()) {
        if page.is_scraped() {
            println!("{}", page.path());
        } else {
            println!("{} ({})", page.path(), page.status());
        }
    }

    Ok(())
}

/// Loads the configuration file, if any, and applies command line overrides
fn load_settings(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .map_err(CrawlError::from)
                .with_context(|| format!("unable to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }
    if let Some(threads) = cli.scraper_threads {
        config.crawler.scraper_threads = threads;
    }
    if cli.no_robots {
        config.crawler.use_robots = false;
    }
    if cli.any_host {
        config.crawler.host_policy = HostPolicy::Any;
    }

    lame_sitemapper::config::validate(&config).map_err(CrawlError::from)?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("lame_sitemapper=info,warn"),
            1 => EnvFilter::new("lame_sitemapper=debug,info"),
            2 => EnvFilter::new("lame_sitemapper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective settings
fn print_config(config: &Config) {
    println!("Crawler:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Scraper threads: {}", config.crawler.scraper_threads);
    println!("  Use robots.txt: {}", config.crawler.use_robots);
    println!("  Host policy: {:?}", config.crawler.host_policy);

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!("  Connect timeout: {}s", config.http.connect_timeout_secs);
    println!("  Max redirects: {}", config.http.max_redirects);

    println!("\n✓ Configuration is valid");
}
