//! Accesso main entry point
//!
//! This is the command-line interface for the Accesso WCAG 2.2 site auditor.

use accesso::config::load_config;
use accesso::crawler::{build_http_client, Crawler, LogObserver};
use accesso::storage::{open_storage, SessionStore};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Accesso: a resumable WCAG 2.2 site auditor
///
/// Accesso crawls a website breadth-first, evaluates every fetched page
/// against a fixed catalogue of WCAG 2.2 accessibility rules, and records
/// structured findings per page and per session. Runs are bounded by a page
/// budget and can be paused and resumed exactly.
#[derive(Parser, Debug)]
#[command(name = "accesso")]
#[command(version = "1.0.0")]
#[command(about = "A resumable WCAG 2.2 site auditor", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Start a new audit session against this site root
    #[arg(long, value_name = "URL", conflicts_with_all = ["resume", "resume_pending", "stats", "dry_run"])]
    audit: Option<String>,

    /// Page budget for --audit, overriding the configured default
    #[arg(long, value_name = "N", requires = "audit")]
    max_pages: Option<u32>,

    /// Resume a paused session by ID
    #[arg(long, value_name = "SESSION_ID", conflicts_with_all = ["resume_pending", "stats", "dry_run"])]
    resume: Option<i64>,

    /// Resume every paused session with pending work, then exit
    #[arg(long, conflicts_with_all = ["stats", "dry_run"])]
    resume_pending: bool,

    /// Show statistics for a session and exit
    #[arg(long, value_name = "SESSION_ID", conflicts_with = "dry_run")]
    stats: Option<i64>,

    /// Validate config and show what would be audited without fetching
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

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if let Some(session_id) = cli.stats {
        handle_stats(&config, session_id)?;
    } else if let Some(site_url) = &cli.audit {
        handle_audit(config, site_url, cli.max_pages).await?;
    } else if let Some(session_id) = cli.resume {
        handle_resume(config, session_id).await?;
    } else if cli.resume_pending {
        handle_resume_pending(config).await?;
    } else {
        eprintln!("Nothing to do: pass --audit, --resume, --resume-pending, --stats, or --dry-run");
        std::process::exit(2);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("accesso=info,warn"),
            1 => EnvFilter::new("accesso=debug,info"),
            2 => EnvFilter::new("accesso=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would run
fn handle_dry_run(config: &accesso::Config) {
    println!("=== Accesso Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Default page budget: {}", config.crawler.max_pages);
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Max redirects: {}", config.crawler.max_redirects);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows a session summary from the database
fn handle_stats(
    config: &accesso::Config,
    session_id: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_storage(Path::new(&config.output.database_path))?;
    let session = store.get_session(session_id)?;
    let stats = store.session_statistics(session_id)?;
    accesso::output::print_statistics(&session, &stats);
    Ok(())
}

fn build_crawler(
    config: accesso::Config,
) -> Result<Crawler<accesso::storage::SqliteStore>, Box<dyn std::error::Error>> {
    let store = open_storage(Path::new(&config.output.database_path))?;
    let client = build_http_client(&config)?;
    Ok(Crawler::new(store, client, config).with_observer(Box::new(LogObserver)))
}

/// Handles --audit: runs a new session to completion or pause
async fn handle_audit(
    config: accesso::Config,
    site_url: &str,
    max_pages: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut crawler = build_crawler(config)?;
    let session_id = crawler.start(site_url, max_pages).await?;

    let session = crawler.store().get_session(session_id)?;
    println!(
        "Session {} finished {}: {} pages, {} findings",
        session_id, session.status, session.total_pages, session.total_findings
    );
    Ok(())
}

/// Handles --resume: continues one paused session
async fn handle_resume(
    config: accesso::Config,
    session_id: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut crawler = build_crawler(config)?;
    crawler.resume(session_id).await?;

    let session = crawler.store().get_session(session_id)?;
    println!(
        "Session {} is now {}: {} pages, {} findings",
        session_id, session.status, session.total_pages, session.total_findings
    );
    Ok(())
}

/// Handles --resume-pending: worker mode for all eligible sessions
async fn handle_resume_pending(
    config: accesso::Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut crawler = build_crawler(config)?;
    let resumed = crawler.resume_pending().await?;
    println!("Resumed {} sessions", resumed);
    Ok(())
}
