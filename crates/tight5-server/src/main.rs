use std::sync::Arc;

use sqlx::PgPool;

use tight5::{JokeRepository, LlmProvider, RoutineRepository};

mod adapters;
mod application;
mod auth;
mod config;
mod models;
mod routes;
mod services;

use adapters::{OpenAiProvider, PgJokeRepository, PgRoutineRepository};
use application::{AssistantService, JokeService, MigrationService, RoutineService};
use auth::ApiKeys;
use config::AppConfig;
use services::FixedWindowRateLimiter;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub joke_service: Arc<JokeService>,
    pub routine_service: Arc<RoutineService>,
    pub assistant_service: Arc<AssistantService>,
    pub migration_service: Arc<MigrationService>,
    pub rate_limiter: Arc<FixedWindowRateLimiter>,
    pub api_keys: Arc<ApiKeys>,
}

impl AppState {
    pub fn new(
        jokes: Arc<dyn JokeRepository>,
        routines: Arc<dyn RoutineRepository>,
        provider: Option<Arc<dyn LlmProvider>>,
        config: &AppConfig,
    ) -> Self {
        Self {
            joke_service: Arc::new(JokeService::new(jokes.clone(), routines.clone())),
            routine_service: Arc::new(RoutineService::new(routines.clone(), jokes.clone())),
            assistant_service: Arc::new(AssistantService::new(provider, config.llm_timeout)),
            migration_service: Arc::new(MigrationService::new(jokes, routines)),
            rate_limiter: Arc::new(FixedWindowRateLimiter::new(
                config.rate_limit.max_requests,
                config.rate_limit.window,
            )),
            api_keys: Arc::new(ApiKeys::new(config.api_keys.clone())),
        }
    }
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("🎤 Tight 5 API initializing...");

    let config = AppConfig::from_secrets(&secrets)
        .map_err(|e| shuttle_runtime::Error::Custom(anyhow::anyhow!(e)))?;

    if config.api_keys.is_empty() {
        tracing::warn!("⚠️  No TIGHT5_API_KEYS set - authentication disabled");
    } else {
        tracing::info!(
            "🔐 API key authentication enabled ({} keys)",
            config.api_keys.len()
        );
    }

    // Run migrations
    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e| shuttle_runtime::Error::Database(e.to_string()))?;

    tracing::info!("✅ Database migrations completed");

    // Initialize model provider if configured
    let provider: Option<Arc<dyn LlmProvider>> = match &config.llm {
        Some(llm) => {
            let provider = OpenAiProvider::new(llm)
                .map_err(|e| shuttle_runtime::Error::Custom(anyhow::anyhow!(e)))?;
            tracing::info!("🤖 Assistant enabled ({} via {})", llm.model, llm.base_url);
            Some(Arc::new(provider))
        }
        None => {
            tracing::warn!("⚠️  No OPENAI_API_KEY set - assistant answers with fallbacks only");
            None
        }
    };

    tracing::info!(
        "🚦 Assistant rate limit: {} requests / {}s",
        config.rate_limit.max_requests,
        config.rate_limit.window.as_secs()
    );

    let jokes = Arc::new(PgJokeRepository::new(pool.clone()));
    let routines = Arc::new(PgRoutineRepository::new(pool));
    let state = AppState::new(jokes, routines, provider, &config);

    let router = routes::build_router(state);

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ Tight 5 API ready - break a leg");

    Ok(router.into())
}
