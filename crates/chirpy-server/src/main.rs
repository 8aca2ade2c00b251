mod config;

use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use chirpy_api::{AppState, AppStateInner, AuthSettings};
use chirpy_auth::{PasswordHasher, TokenService};
use chirpy_db::{Store, snapshot};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chirpy=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    if config.init_db && snapshot::initialize(&config.db_path)? {
        info!("Initialized empty database at {}", config.db_path.display());
    }

    // Without a readable snapshot there is nothing to serve: fail before binding.
    let store = Store::open(&config.db_path, PasswordHasher::new())
        .with_context(|| format!("failed to load database {}", config.db_path.display()))?;

    let state: AppState = Arc::new(AppStateInner::new(
        store,
        TokenService::new(&config.jwt_secret),
        AuthSettings {
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
            polka_key: config.polka_key.clone(),
        },
    ));

    let app = chirpy_api::router(state, &config.static_dir)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("Chirpy listening on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
