use std::net::TcpListener;

use actix_web::web;
use portfolio_site::{
    background_task::start_limiter_eviction,
    graceful_shutdown::stop_on_signal,
    settings::AppConfig,
    shared_repos::SharedRepositories,
    startup,
    AppState,
};
use tracing_subscriber::EnvFilter;

fn init_tracing(config: &AppConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true);

    if config.is_production() {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config);
    tracing::info!("Loaded configuration: {:?}", config);

    let repos = SharedRepositories::from_config(&config)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let app_state = web::Data::new(AppState::new(&config, repos));

    let server_addr = config.server_addr();
    let listener = TcpListener::bind(&server_addr)?;

    tracing::info!(
        "🚀 Starting {} v{} on {} ({} storage)",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr,
        app_state.storage_backend
    );

    tokio::spawn(start_limiter_eviction(app_state.chat_limiter.clone()));

    let server = startup::run(listener, &config, app_state)?;
    tokio::spawn(stop_on_signal(server.handle()));

    server.await
}
