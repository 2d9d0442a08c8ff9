mod config;
mod db;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env().expect("invalid configuration");
    let port = config.port;
    if config.dev_auth_bypass {
        tracing::warn!("DEV_AUTH_BYPASS enabled; /api/dev/session issues sessions without sign-in");
    }

    let pool = db::init_pool(&config)
        .await
        .expect("database init failed");

    let state = state::AppState::new(pool, config);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "leadboard listening");
    axum::serve(listener, app).await.expect("server failed");
}
