mod config;
mod db;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let config = config::Config::from_env().expect("invalid configuration");

    let pool = db::init_pool(&config)
        .await
        .expect("database init failed");
    tracing::info!(
        max_connections = config.db_max_connections,
        retry_tries = config.db_retry.tries(),
        retry_delay_ms = u64::try_from(config.db_retry.delay().as_millis()).unwrap_or(u64::MAX),
        "database ready"
    );

    let state = state::AppState::new(pool, config.db_retry);

    let app = routes::app(state).expect("leptos configuration failed");
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "opex listening");
    axum::serve(listener, app).await.expect("server failed");
}
