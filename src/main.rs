use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use conference_hub::config::{self, Config};
use conference_hub::db::PostgresDatabase;
use conference_hub::gateway::{Gateway, GatewayError};
use conference_hub::local::{AppState, SqliteLocalStore};
use conference_hub::migration::{CollectionCheck, CollectionReport, HttpFileSource};
use conference_hub::s3::{verify_buckets, S3Storage};
use conference_hub::site::Site;
use conference_hub::sync::FetchState;
use conference_hub::{logging, markup};

type LiveSite = Site<PostgresDatabase, S3Storage, SqliteLocalStore>;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config.toml",
        global = true
    )]
    config: String,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Mount the site and keep the local view reconciled until Ctrl-C
    Run,
    /// Copy the legacy local snapshot into the remote stores
    Migrate,
    /// Compare the legacy local snapshot with the remote tables
    CheckSync,
    /// Verify the storage buckets exist and count their files
    CheckBuckets,
    /// Export survey responses as CSV
    ExportSurvey {
        /// Output file
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
    },
    /// Render a markup file as JSON blocks
    Render {
        file: PathBuf,

        /// Emit HTML instead of JSON
        #[arg(long)]
        html: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Rendering is offline and needs no configuration
    if let Commands::Render { file, html } = &cli.command {
        return render_file(file, *html);
    }

    let config = config::load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config))?;
    let _log_guard = logging::init_logging(config.logging.as_ref(), cli.verbose)?;

    info!("Conference hub v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded configuration from: {}", cli.config);

    match cli.command {
        Commands::Run => run_site(config).await,
        Commands::Migrate => migrate(config).await,
        Commands::CheckSync => check_sync(config).await,
        Commands::CheckBuckets => check_buckets(config).await,
        Commands::ExportSurvey { out } => export_survey(config, out).await,
        Commands::Render { .. } => Ok(()),
    }
}

fn render_file(file: &Path, html: bool) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let blocks = markup::render(&text);
    if html {
        print!("{}", markup::to_html(&blocks));
    } else {
        println!("{}", serde_json::to_string_pretty(&blocks)?);
    }
    Ok(())
}

async fn initialize_site(config: &Config) -> Result<LiveSite> {
    let database = PostgresDatabase::new(&config.database)
        .await
        .context("Failed to connect to PostgreSQL database")?;
    let storage = S3Storage::new(&config.storage)
        .await
        .context("Failed to initialize object storage")?;
    let local_store =
        SqliteLocalStore::new(&config.local.db_path).context("Failed to open local state")?;
    let state = AppState::init(local_store)
        .await
        .context("Failed to load local state")?;

    let gateway = Arc::new(Gateway::new(database, storage));
    let interval = Duration::from_secs(config.sync.interval_seconds);
    info!("Site initialized successfully");
    Ok(Site::new(gateway, state, interval))
}

async fn run_site(config: Config) -> Result<()> {
    let mut site = initialize_site(&config).await?;

    match verify_buckets(site.gateway().storage()).await {
        Ok(statuses) => {
            let missing = statuses.iter().filter(|status| !status.exists).count();
            if missing > 0 {
                warn!("{missing} storage buckets are missing");
            }
        }
        Err(e) => warn!("Could not verify storage buckets: {e}"),
    }

    site.mount();
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown requested");
    site.teardown().await;
    Ok(())
}

fn print_collection_report(label: &str, report: &CollectionReport) {
    println!(
        "{label}: {} uploaded, {} inserted, {} updated, {} skipped, {} failed",
        report.uploaded, report.inserted, report.updated, report.skipped, report.failed
    );
    for message in &report.errors {
        println!("  - {message}");
    }
}

async fn migrate(config: Config) -> Result<()> {
    let mut site = initialize_site(&config).await?;
    let files = HttpFileSource::new().context("Failed to build HTTP client")?;

    let report = site
        .migrate(files)
        .await
        .context("Failed to save the migrated snapshot")?;
    print_collection_report("Media", &report.media);
    print_collection_report("Speakers", &report.speakers);
    print_collection_report("Survey responses", &report.survey_responses);

    site.teardown().await;
    if report.failed() > 0 {
        bail!("Migration finished with {} failures", report.failed());
    }
    Ok(())
}

async fn check_sync(config: Config) -> Result<()> {
    let site = initialize_site(&config).await?;
    let report = site.check_sync().await;

    let sections: [(&str, &Result<CollectionCheck, GatewayError>); 3] = [
        ("Media", &report.media),
        ("Speakers", &report.speakers),
        ("Survey responses", &report.survey_responses),
    ];
    for (label, check) in sections {
        match check {
            Ok(check) => {
                println!("{label}: {check}");
                for id in &check.missing_in_remote {
                    println!("  missing remotely: {id}");
                }
                for id in &check.missing_in_local {
                    println!("  missing locally: {id}");
                }
            }
            Err(e) => println!("{label}: {}", e.user_message()),
        }
    }

    site.teardown().await;
    if !report.is_synced() {
        bail!("Local snapshot and remote tables differ");
    }
    Ok(())
}

async fn check_buckets(config: Config) -> Result<()> {
    let storage = S3Storage::new(&config.storage)
        .await
        .context("Failed to initialize object storage")?;
    let statuses = verify_buckets(&storage)
        .await
        .context("Object storage is not reachable")?;

    for status in &statuses {
        match (status.exists, status.file_count) {
            (false, _) => println!("{}: missing", status.bucket),
            (true, Some(count)) => println!("{}: {count} files", status.bucket),
            (true, None) => println!("{}: present, listing failed", status.bucket),
        }
    }

    let missing = statuses.iter().filter(|status| !status.exists).count();
    if missing > 0 {
        bail!("{missing} storage buckets are missing");
    }
    Ok(())
}

async fn export_survey(config: Config, out: PathBuf) -> Result<()> {
    let site = initialize_site(&config).await?;
    site.refresh().await;
    if site.view().read().await.survey_responses.state == FetchState::FetchFailed {
        bail!("Could not fetch survey responses");
    }

    let csv = site.export_survey_csv().await;
    std::fs::write(&out, csv).with_context(|| format!("Failed to write {}", out.display()))?;
    info!("Survey responses exported to {}", out.display());

    site.teardown().await;
    Ok(())
}
