//! Listing Harvester main entry point
//!
//! This is the command-line interface for the listing harvester.

use anyhow::Context;
use clap::Parser;
use listing_harvester::browser::{Browser, HttpBrowser};
use listing_harvester::config::{
    build_field_map, load_config_with_hash, load_targets, BrowserEngine, Config, CrawlTarget,
};
use listing_harvester::crawler::{CrawlRunner, DelayPolicy, SleepPacer};
use listing_harvester::extract::FieldMap;
use listing_harvester::output::{print_summary, CsvSinkFactory};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Listing Harvester: a paginating listing-page scraper
///
/// Visits every URL of the target list, extracts the configured fields from
/// each listing item, follows the "next page" control, and appends the rows
/// to one CSV file per target.
#[derive(Parser, Debug)]
#[command(name = "listing-harvester")]
#[command(version)]
#[command(about = "A paginating listing-page scraper", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    /// Path to the TOML target list
    #[arg(short, long, value_name = "FILE", default_value = "targets.toml")]
    targets: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the inputs and show what would be crawled without starting a browser
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Configuration errors must surface before any browser session starts
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let targets = load_targets(&cli.targets)
        .with_context(|| format!("failed to load {}", cli.targets.display()))?;
    let field_map = build_field_map(&config)?;

    if cli.dry_run {
        print_plan(&config, &targets, &field_map);
        return Ok(());
    }

    handle_crawl(&config, &targets, &field_map).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("listing_harvester=info,warn"),
            1 => EnvFilter::new("listing_harvester=debug,info"),
            2 => EnvFilter::new("listing_harvester=trace,debug"),
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

/// Handles --dry-run: shows the validated inputs
fn print_plan(config: &Config, targets: &[CrawlTarget], field_map: &FieldMap) {
    println!("=== Listing Harvester Dry Run ===\n");

    println!("Crawler:");
    println!("  Item locator: {}", config.crawler.item_locator);
    println!("  Next-page locator: {}", config.crawler.next_page_locator);
    println!("  Initial load wait: {}ms", config.crawler.initial_load_ms);
    println!(
        "  Page settle wait: {}-{}ms",
        config.crawler.page_settle_ms.min, config.crawler.page_settle_ms.max
    );
    println!(
        "  Between targets wait: {}-{}ms",
        config.crawler.between_targets_ms.min, config.crawler.between_targets_ms.max
    );
    if let Some(max) = config.crawler.max_pages {
        println!("  Page limit: {}", max);
    }

    println!("\nBrowser: {:?}", config.browser.engine);

    println!("\nFields ({}):", field_map.len());
    for field in field_map.iter() {
        let kind = if field.is_link { " [link]" } else { "" };
        println!("  - {} = {}{}", field.name, field.locator, kind);
    }

    let sinks = CsvSinkFactory::new(&config.output.directory, &config.output.extension);
    println!("\nTargets ({}):", targets.len());
    for target in targets {
        println!(
            "  - {} -> {}",
            target.url,
            sinks.path_for(&target.name).display()
        );
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    targets: &[CrawlTarget],
    field_map: &FieldMap,
) -> anyhow::Result<()> {
    tracing::info!(
        "Starting harvest of {} targets with {:?} engine",
        targets.len(),
        config.browser.engine
    );

    match config.browser.engine {
        BrowserEngine::Http => {
            let browser = HttpBrowser::new(&config.browser)?;
            run_with(browser, config, targets, field_map).await
        }
        #[cfg(feature = "browser")]
        BrowserEngine::Chrome => {
            let browser = listing_harvester::browser::ChromeBrowser::launch(&config.browser).await?;
            run_with(browser, config, targets, field_map).await
        }
        #[cfg(not(feature = "browser"))]
        BrowserEngine::Chrome => {
            anyhow::bail!("the chrome engine requires the `browser` feature")
        }
    }
}

async fn run_with<B: Browser>(
    browser: B,
    config: &Config,
    targets: &[CrawlTarget],
    field_map: &FieldMap,
) -> anyhow::Result<()> {
    let pacer = SleepPacer::new(DelayPolicy::from_settings(&config.crawler));
    let sinks = CsvSinkFactory::new(&config.output.directory, &config.output.extension);
    let mut runner = CrawlRunner::new(browser, pacer, sinks, &config.crawler)?;

    match runner.run(targets, field_map).await {
        Ok(summary) => {
            tracing::info!("Harvest completed");
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
