pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
mod http;
mod middleware;
pub mod models;
pub mod policy;
pub mod state;
pub mod store;

use std::{net::SocketAddr, sync::Arc};

use axum::{Router, middleware as axum_middleware};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::{
    auth::JwtKeys,
    config::AppConfig,
    errors::AppError,
    middleware::{cors_layer, create_global_rate_limiter, rate_limit_middleware},
    state::{AppState, SharedStore},
    store::{MemoryStore, PgStore},
};

/// Builds the full application router: HTTP routes plus the global rate
/// limiter and request tracing. CORS is added by [`start_server`].
pub fn create_app(state: AppState) -> Router {
    let global_rate_limiter = create_global_rate_limiter();

    Router::new()
        .merge(http::create_http_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(move |req, next| {
                    rate_limit_middleware(global_rate_limiter.clone(), req, next)
                })),
        )
        .fallback(|| async { (axum::http::StatusCode::NOT_FOUND, "404 Not Found") })
}

async fn connect_store(config: &AppConfig) -> Result<SharedStore, AppError> {
    match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url, config.database_max_connections).await?;
            store.migrate().await?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store; data will not persist");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

pub async fn start_server() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;
    let store = connect_store(&config).await?;
    let state = AppState::new(store, JwtKeys::new(&config.jwt_secret, config.jwt_ttl_hours));

    let app = create_app(state).layer(cors_layer(config.allowed_origins.clone()));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .map_err(|e| AppError::EnvError(format!("Failed to bind port {}: {}", config.port, e)))?;

    tracing::info!("Cinema reviews server running at http://0.0.0.0:{}", config.port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Server error: {}", e);
        AppError::InternalError
    })
}
