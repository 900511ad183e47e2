pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod http;
mod middleware;
pub mod models;
pub mod services;
pub mod state;

use axum::{Router, middleware as axum_middleware};
use middleware::{cors_layer, create_rate_limiter, rate_limit_middleware};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;

use crate::{
    config::Config,
    db::{MemoryStore, PgStore},
    errors::AppError,
    state::AppState,
};

/// Builds the full router: HTTP routes, per-IP rate limiting, CORS and request tracing.
pub fn create_app(state: AppState, config: &Config) -> Router {
    let rate_limiter = create_rate_limiter(config.rate_limit_per_minute);

    Router::new()
        .merge(http::create_http_routes(state))
        .layer(axum_middleware::from_fn(move |req, next| {
            rate_limit_middleware(rate_limiter.clone(), req, next)
        }))
        .layer(cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .fallback(|| async { "404 Not Found" })
}

pub async fn start_server() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let state = match config.database_url.as_deref() {
        Some(url) => AppState::new(PgStore::connect(url).await?, &config.jwt_secret),
        None => {
            tracing::warn!("DATABASE_URL not set, ratings are kept in memory only");
            AppState::new(MemoryStore::new(), &config.jwt_secret)
        }
    };

    let app = create_app(state, &config);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!("CafeHub ratings server running at http://0.0.0.0:{}", config.port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
