//! Sitemap-Harvest main entry point
//!
//! This is the command-line interface for the sitemap harvester.

use anyhow::{Context, Result};
use clap::Parser;
use sitemap_harvest::config::{load_config_with_hash, validate, Config};
use sitemap_harvest::extract::render_directory;
use sitemap_harvest::output::print_summary;
use sitemap_harvest::Harvester;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Sitemap-Harvest: a deduplicating bulk page fetcher
///
/// Resolves the configured sitemaps, fetches every listed page once with a
/// bounded pool of workers, and saves each distinct page body exactly once.
#[derive(Parser, Debug)]
#[command(name = "sitemap-harvest")]
#[command(version)]
#[command(about = "A deduplicating bulk page fetcher", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the number of fetch workers
    #[arg(long, value_name = "N")]
    workers: Option<u32>,

    /// Additional sitemap URL to harvest (repeatable)
    #[arg(long = "sitemap", value_name = "URL")]
    sitemaps: Vec<String>,

    /// Validate config and show what would be harvested without fetching
    #[arg(long, conflicts_with = "render")]
    dry_run: bool,

    /// Generate pages from the saved pages directory and exit
    #[arg(long, conflicts_with = "dry_run")]
    render: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    apply_overrides(&mut config, &cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.render {
        handle_render(&config)?;
    } else {
        handle_harvest(config, config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_harvest=info,warn"),
            1 => EnvFilter::new("sitemap_harvest=debug,info"),
            2 => EnvFilter::new("sitemap_harvest=trace,debug"),
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

/// Applies command-line overrides and re-validates the result
fn apply_overrides(config: &mut Config, cli: &Cli) -> Result<()> {
    if let Some(workers) = cli.workers {
        tracing::info!("Overriding workers: {} -> {}", config.harvester.workers, workers);
        config.harvester.workers = workers;
    }
    config.sitemaps.extend(cli.sitemaps.iter().cloned());

    validate(config).context("Invalid configuration after command-line overrides")?;
    Ok(())
}

/// Handles the --dry-run mode: shows what would be harvested
fn handle_dry_run(config: &Config) {
    println!("=== Sitemap-Harvest Dry Run ===\n");

    println!("Harvester Configuration:");
    println!("  Workers: {}", config.harvester.workers);
    println!("  Request timeout: {}s", config.harvester.request_timeout);
    println!("  Sitemap timeout: {}s", config.harvester.sitemap_timeout);
    println!("  Max sitemap depth: {}", config.harvester.max_sitemap_depth);
    println!(
        "  Collapse duplicates: {}",
        config.harvester.collapse_duplicates
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Pages: {}", config.output.pages_dir);
    println!("  Extension: .{}", config.output.extension);
    println!("  Rendered pages: {}", config.output.rendered_dir);

    println!("\nSitemaps ({}):", config.sitemaps.len());
    for sitemap in &config.sitemaps {
        println!("  - {}", sitemap);
    }

    println!("\n✓ Configuration is valid");
    if config.sitemaps.is_empty() {
        println!("! No sitemaps configured, a harvest would save nothing");
    }
}

/// Handles the --render mode: generates pages from saved pages
fn handle_render(config: &Config) -> Result<()> {
    let input = Path::new(&config.output.pages_dir);
    let output = Path::new(&config.output.rendered_dir);

    let rendered = render_directory(input, output)
        .with_context(|| format!("Failed to render pages from {}", input.display()))?;

    println!(
        "✓ Rendered {} pages from {} into {}",
        rendered,
        input.display(),
        output.display()
    );
    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, config_hash: String) -> Result<()> {
    tracing::info!(
        "Harvesting {} sitemaps with {} workers into {}",
        config.sitemaps.len(),
        config.harvester.workers,
        config.output.pages_dir
    );

    let harvester =
        Harvester::new(config, config_hash).context("Failed to initialize harvester")?;

    let cancel = harvester.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight fetches");
            cancel.cancel();
        }
    });

    let summary = harvester.run().await;
    print_summary(&summary);

    Ok(())
}
