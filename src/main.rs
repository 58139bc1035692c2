mod config;
mod error;
mod llm;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    // A missing .env is normal in production.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env();
    let state = state::AppState::from_config(&config);

    let app = routes::app(state, &config.website_dir);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(
        port = config.port,
        website_dir = %config.website_dir.display(),
        "portfolio listening"
    );
    axum::serve(listener, app).await.expect("server failed");
}
