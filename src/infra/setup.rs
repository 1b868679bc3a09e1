use crate::{
    adapters::{http::app_state::AppState, persistence::PostgresPersistence},
    domain::entities::deployment_mode::DeploymentMode,
    infra::{
        InfraError, RateLimiterTrait,
        config::AppConfig,
        postgres_persistence,
        rate_limit::{InMemoryRateLimiter, RedisRateLimiter},
    },
    use_cases::waitlist::{WaitlistRepo, WaitlistUseCases},
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Wires the store, rate limiter and use cases. Returns the persistence handle
/// too so the caller can close the pool on shutdown.
pub async fn init_app_state(
    config: AppConfig,
) -> Result<(AppState, PostgresPersistence), InfraError> {
    info!(mode = %config.deployment_mode, "Starting waitlist service");

    let postgres = postgres_persistence(&config).await?;

    let rate_limiter: Arc<dyn RateLimiterTrait> = match &config.redis_url {
        Some(redis_url) => {
            info!("Rate limiting through Redis");
            Arc::new(
                RedisRateLimiter::new(
                    redis_url,
                    config.rate_limit_window_secs,
                    config.rate_limit_per_ip,
                )
                .await?,
            )
        }
        None => Arc::new(InMemoryRateLimiter::new(
            config.rate_limit_window_secs,
            config.rate_limit_per_ip,
        )),
    };

    let waitlist_use_cases = WaitlistUseCases::new(
        Arc::new(postgres.clone()) as Arc<dyn WaitlistRepo>,
        config.deployment_mode,
    );

    let app_state = AppState {
        config: Arc::new(config),
        waitlist_use_cases: Arc::new(waitlist_use_cases),
        rate_limiter,
    };
    Ok((app_state, postgres))
}

pub fn init_tracing(mode: DeploymentMode) {
    let default_filter = if mode.is_production() {
        "waitlist=info,tower_http=info"
    } else {
        "waitlist=debug,tower_http=debug"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    // Production: structured JSON lines for the log collector.
    let json_layer = mode.is_production().then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
    });

    // Development: human-friendly console output.
    let console_layer = (!mode.is_production()).then(|| {
        fmt::layer()
            .with_target(false)
            .with_level(true)
            .pretty()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(console_layer)
        .try_init()
        .ok();
}
