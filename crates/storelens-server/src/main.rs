mod api;
mod middleware;

use storelens_enhancer::{Enhancer, EnhancerError};
use storelens_scraper::StorefrontClient;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, rate_limit_state, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = storelens_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = storelens_db::PoolConfig::from_app_config(&config);
    let pool = storelens_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = storelens_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations up to date");

    let client = StorefrontClient::new(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
    )?;
    let enhancer = match Enhancer::new(config.llm.clone()) {
        Ok(enhancer) => {
            tracing::info!(model = enhancer.model(), "LLM enhancement enabled");
            Some(enhancer)
        }
        Err(EnhancerError::Disabled) => {
            tracing::info!("no LLM API key configured; enhancement disabled");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let state = AppState {
        pool,
        client,
        enhancer,
        cache_ttl: chrono::Duration::hours(config.cache_ttl_hours),
    };
    let app = build_app(state, rate_limit_state(config.analyze_rate_limit_per_min));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(bind_addr = %config.bind_addr, env = %config.env, "storelens server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
