mod config;
mod db;
mod error;
mod routes;
mod services;
mod state;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = config::AppConfig::from_env().expect("invalid configuration");
    if config.admin_token.is_none() {
        tracing::warn!("ADMIN_TOKEN not set; admin API disabled");
    }

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("database init failed");
    let state = state::AppState::new(pool, config.admin_token.as_deref());

    let app = routes::app(state, config.cors_allow_origin.as_deref()).expect("invalid CORS_ALLOW_ORIGIN");
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "wrenchmark listening");
    axum::serve(listener, app).await.expect("server failed");
}
