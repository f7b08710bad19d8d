//! Search-Harvester main entry point
//!
//! This is the command-line interface for the Search-Harvester product scraper.

use clap::Parser;
use search_harvester::config::{load_config_with_hash, validate, Config};
use search_harvester::output::{export_dataset, exporters_for, print_report};
use search_harvester::{Harvester, SearchQuery};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Search-Harvester: crawl every result page of a product search
///
/// Discovers all result pages for a keyword, extracts the products listed
/// on them, and writes one deduplicated dataset keyed by product id.
#[derive(Parser, Debug)]
#[command(name = "search-harvester")]
#[command(version = "1.0.0")]
#[command(about = "Harvest products from a paginated search", long_about = None)]
struct Cli {
    /// Keyword to search for
    #[arg(value_name = "KEYWORD")]
    keyword: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Search URL prefix the keyword is appended to (must end with '/')
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Product detail link to enrich after the crawl
    #[arg(long, value_name = "LINK")]
    detail: Option<String>,

    /// Directory receiving the export files
    #[arg(long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Maximum number of result pages before giving up
    #[arg(long)]
    max_pages: Option<u32>,

    /// Number of result pages probed ahead concurrently
    #[arg(long)]
    lookahead: Option<usize>,

    /// Skip writing export files
    #[arg(long)]
    no_export: bool,

    /// Validate settings and show what would be harvested without crawling
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
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = match load_settings(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            tracing::error!("Failed to load settings: {}", e);
            return Err(e);
        }
    };
    let query = SearchQuery::new(&cli.keyword, &config.search.base_url)?;

    if cli.dry_run {
        handle_dry_run(&config, config_hash.as_deref(), &query, &cli);
        return Ok(());
    }

    if let Err(e) = handle_harvest(&config, &query, &cli).await {
        tracing::error!("Harvest failed: {}", e);
        return Err(e);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("search_harvester=info,warn"),
            1 => EnvFilter::new("search_harvester=debug,info"),
            2 => EnvFilter::new("search_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (or defaults) and applies command-line overrides
///
/// Returns the settings together with the config file's hash, if a file
/// was given.
fn load_settings(cli: &Cli) -> Result<(Config, Option<String>), Box<dyn std::error::Error>> {
    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    if let Some(base_url) = &cli.base_url {
        config.search.base_url = base_url.clone();
    }
    if let Some(output_dir) = &cli.output_dir {
        config.output.directory = output_dir.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.pagination.max_pages = max_pages;
    }
    if let Some(lookahead) = cli.lookahead {
        config.pagination.lookahead = lookahead;
    }

    validate(&config)?;
    Ok((config, config_hash))
}

/// Handles the --dry-run mode: shows the resolved settings
fn handle_dry_run(config: &Config, config_hash: Option<&str>, query: &SearchQuery, cli: &Cli) {
    println!("=== Search-Harvester Dry Run ===\n");

    match (&cli.config, config_hash) {
        (Some(path), Some(hash)) => {
            println!("Config: {} (sha256 {})", path.display(), hash)
        }
        _ => println!("Config: built-in defaults"),
    }

    println!("Search:");
    println!("  Keyword: {}", query.keyword());
    println!("  Search URL: {}", query.search_url());

    println!("\nPagination:");
    println!("  Max pages: {}", config.pagination.max_pages);
    println!("  Lookahead: {}", config.pagination.lookahead);
    println!("  End markers: {}", config.pagination.end_markers.join(", "));

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!("  Request delay: {}ms", config.http.request_delay_ms);

    println!("\nOutput:");
    if cli.no_export {
        println!("  (export disabled)");
    } else {
        for exporter in exporters_for(&config.output) {
            println!("  - {}", exporter.destination());
        }
    }

    if let Some(detail) = &cli.detail {
        println!("\nDetail enrichment: {}", detail);
    }

    println!("\n✓ Settings are valid");
}

/// Handles the main harvest operation
async fn handle_harvest(
    config: &Config,
    query: &SearchQuery,
    cli: &Cli,
) -> Result<(), Box<dyn std::error::Error>> {
    let harvester = Harvester::new(config)?;
    let mut report = harvester.harvest(query).await?;

    if let Some(link) = &cli.detail {
        if let Err(e) = harvester.enrich(&mut report.dataset, link).await {
            tracing::error!("Failed to enrich {}: {}", link, e);
            return Err(e.into());
        }
    }

    if !cli.quiet {
        print_report(&report);
    }

    if cli.no_export {
        return Ok(());
    }

    for destination in export_dataset(&config.output, &report.dataset)? {
        tracing::debug!("Exported to {}", destination);
    }

    Ok(())
}
