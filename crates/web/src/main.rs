use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use importer::{CalendarSync, HypraceClient, RaceDataProvider};
use scoring::{PredictionService, ScoringEngine, ScoringScheduler};
use storage::Database;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod extract;
mod features;
mod middleware;
mod routes;
mod state;

use config::Config;
use features::{admin, events, leaderboard, predictions, users};
use middleware::auth::ApiKeys;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health,
        users::handlers::register_user,
        users::handlers::get_user,
        predictions::handlers::submit_picks,
        predictions::handlers::get_picks,
        events::handlers::list_events,
        events::handlers::get_event,
        leaderboard::handlers::season_leaderboard,
        leaderboard::handlers::event_leaderboard,
        admin::handlers::sync_calendar,
        admin::handlers::score_event,
    ),
    components(
        schemas(
            routes::HealthResponse,
            storage::dto::user::CreateUserRequest,
            storage::dto::prediction::PicksUpdate,
            storage::dto::prediction::SubmitPicksRequest,
            storage::dto::prediction::PredictionResponse,
            storage::dto::event::EventSummary,
            storage::dto::event::CalendarSyncResponse,
            storage::dto::leaderboard::LeaderboardEntry,
            storage::dto::leaderboard::LeaderboardResponse,
            storage::dto::scoring::ManualScoreRequest,
            storage::dto::scoring::ManualScoreResponse,
            storage::models::User,
            storage::models::Event,
            storage::models::Session,
            storage::models::Prediction,
            storage::models::Picks,
            storage::models::Score,
            storage::models::ActualResults,
        )
    ),
    tags(
        (name = "users", description = "User identity"),
        (name = "predictions", description = "Podium picks per event"),
        (name = "events", description = "Season calendar"),
        (name = "leaderboard", description = "Season and per-event standings"),
        (name = "admin", description = "Calendar sync and manual scoring"),
        (name = "health", description = "Liveness"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting Podium API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let db = Arc::new(db);
    let provider: Arc<dyn RaceDataProvider> = Arc::new(
        HypraceClient::new(config.hyprace()).context("Failed to configure Hyprace client")?,
    );

    let calendar = Arc::new(CalendarSync::new(provider.clone(), db.clone()));
    match calendar.sync(config.season_year).await {
        Ok(report) => tracing::info!(
            "Startup calendar sync for {}: {} synced, {} skipped",
            config.season_year,
            report.synced,
            report.skipped
        ),
        Err(e) => tracing::warn!(
            "Startup calendar sync for {} failed, continuing with stored calendar: {}",
            config.season_year,
            e
        ),
    }

    let engine = ScoringEngine::new(provider.clone(), db.clone());
    let scheduler = Arc::new(ScoringScheduler::new(
        db.clone(),
        engine,
        config.scheduler(),
    ));
    let _jobs = scheduler
        .clone()
        .start()
        .await
        .context("Failed to start scoring scheduler")?;

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.is_empty() {
        tracing::warn!("API_KEYS is empty; admin routes will reject every request");
    }

    let state = AppState {
        events: db.clone(),
        users: db.clone(),
        leaderboard: db.clone(),
        predictions: PredictionService::new(db.clone(), db.clone()),
        calendar,
        scheduler,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    let app = routes::router(api_keys)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .with_state(state);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    axum::serve(listener, app).await?;

    Ok(())
}
