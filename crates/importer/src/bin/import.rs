use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use importer::{
    CalendarSync, HypraceClient, HypraceConfig, RaceDataProvider, ResultNormalizer, RetryPolicy,
};
use storage::Database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "podium-import")]
#[command(about = "Race calendar and results importer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "RAPIDAPI_KEY", hide_env_values = true)]
    api_key: String,

    #[arg(long, env = "HYPRACE_BASE_URL", default_value = importer::sources::hyprace::DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, env = "UPSTREAM_MAX_RETRIES", default_value_t = 5)]
    max_retries: u32,

    #[arg(long, env = "UPSTREAM_BACKOFF_MS", default_value_t = 2000)]
    backoff_ms: u64,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync a season calendar into the database
    Calendar {
        #[arg(long)]
        season: i32,

        #[arg(long, env = "DATABASE_URL")]
        database_url: String,
    },
    /// Print the normalized top-3 lists of one event without writing anything
    Results {
        #[arg(long)]
        event_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("import={},importer={}", log_level, log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let provider: Arc<dyn RaceDataProvider> = Arc::new(HypraceClient::new(HypraceConfig {
        base_url: cli.base_url.clone(),
        api_key: cli.api_key.clone(),
        retry: RetryPolicy::new(cli.max_retries, Duration::from_millis(cli.backoff_ms)),
    })?);

    match cli.command {
        Commands::Calendar {
            season,
            database_url,
        } => {
            handle_calendar(provider, season, &database_url).await?;
        }
        Commands::Results { event_id } => {
            handle_results(provider, &event_id).await?;
        }
    }

    Ok(())
}

async fn handle_calendar(
    provider: Arc<dyn RaceDataProvider>,
    season: i32,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Connecting to database...");
    let db = Database::new(database_url).await?;
    db.run_migrations().await?;

    let sync = CalendarSync::new(provider, Arc::new(db));
    let report = sync.sync(season).await?;

    tracing::info!(
        "✓ Season {}: {} events synced, {} skipped",
        season,
        report.synced,
        report.skipped
    );

    Ok(())
}

async fn handle_results(
    provider: Arc<dyn RaceDataProvider>,
    event_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let normalizer = ResultNormalizer::new(provider);
    let actual = normalizer.normalize(event_id).await?;

    println!("{}", serde_json::to_string_pretty(&actual)?);

    Ok(())
}
