//! Campus-Atlas main entry point
//!
//! This is the command-line interface for the Campus-Atlas directory crawler.

use campus_atlas::config::{load_config_with_hash, Config, DEFAULT_CONFIG_HASH};
use campus_atlas::crawler::{Coordinator, PatternExtractor};
use campus_atlas::location::{LocationResolver, ReferenceTable};
use campus_atlas::output::{
    generate_markdown_directory, load_statistics, print_report, print_statistics,
};
use campus_atlas::storage::{PlaceStore, SqliteStorage};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Campus-Atlas: a locator for people and chairs on campus
///
/// Campus-Atlas crawls the university directory starting at a root unit,
/// extracts the room of every unit and lecturer it reaches, and resolves
/// those rooms to coordinates and floors using a reference table.
#[derive(Parser, Debug)]
#[command(name = "campus-atlas")]
#[command(version)]
#[command(about = "Locates chairs and people of a university directory", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Remove previously stored places before crawling
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    fresh: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    (cfg, hash)
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            (Config::default(), DEFAULT_CONFIG_HASH.to_string())
        }
    };

    let table = match ReferenceTable::from_config(&config.reference) {
        Ok(table) => table,
        Err(e) => {
            tracing::error!("Failed to load reference table: {}", e);
            return Err(e.into());
        }
    };
    tracing::info!(
        "Reference table holds {} rooms ({} duplicate keys)",
        table.len(),
        table.duplicate_keys().len()
    );

    if cli.dry_run {
        handle_dry_run(&config, &table);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config, &config_hash, table, cli.fresh).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("campus_atlas=info,warn"),
            1 => EnvFilter::new("campus_atlas=debug,info"),
            2 => EnvFilter::new("campus_atlas=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, table: &ReferenceTable) {
    println!("=== Campus-Atlas Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max items to visit: {}", config.crawler.max_items_to_visit);
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout_secs);

    println!("\nUser Agent:");
    println!("  Header: {}", config.user_agent.header_value());

    println!("\nSource:");
    println!("  Unit pages: {}<key>", config.source.unit_url_prefix);
    println!("  Lecturer pages: {}<key>", config.source.lecturer_url_prefix);
    println!(
        "  Root unit: {} ({})",
        config.source.root_name, config.source.root_key
    );

    println!("\nReference Table:");
    println!(
        "  Source: {}",
        config.reference.path.as_deref().unwrap_or("built-in")
    );
    println!("  Rooms: {}", table.len());
    println!("  Rooms inside the complex: {}", table.room_places().len());
    for key in table.duplicate_keys() {
        println!("  Duplicate key: {}", key);
    }

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!(
        "  Summary: {}",
        config.output.summary_path.as_deref().unwrap_or("(none)")
    );
    println!(
        "  Store reference rooms: {}",
        config.output.include_reference_rooms
    );

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would visit at most {} items starting at {}",
        config.crawler.max_items_to_visit, config.source.root_name
    );
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    config_hash: &str,
    table: ReferenceTable,
    fresh: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut storage = SqliteStorage::new(Path::new(&config.output.database_path))?;

    if fresh {
        tracing::info!("Starting fresh crawl (clearing stored places)");
        storage.clear_places()?;
    }

    let run_id = storage.create_run(config_hash)?;
    tracing::info!("Created run {}", run_id);

    if config.output.include_reference_rooms {
        let rooms = table.room_places();
        let stored = storage.upsert_places(&rooms)?;
        tracing::info!("Stored {} reference rooms", stored);
    }

    let extractor = PatternExtractor::new()?;
    let mut coordinator =
        Coordinator::new(&config, LocationResolver::new(table), Arc::new(extractor))?;

    let outcome = coordinator.run_with_report().await;

    let stored = storage.upsert_places(&outcome.places)?;
    storage.complete_run(
        run_id,
        outcome.report.visited as u64,
        outcome.report.places_emitted as u64,
    )?;
    tracing::info!("Stored {} located places", stored);

    print_report(&outcome.report);

    if let Some(summary_path) = &config.output.summary_path {
        let places = storage.load_places()?;
        generate_markdown_directory(&places, Path::new(summary_path))?;
        println!("\n✓ Directory written to: {}", summary_path);
    }

    Ok(())
}
