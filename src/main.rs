// src/main.rs
use env_logger::Builder;
use log::{error, info, LevelFilter};
use portfolio_api::app;
use portfolio_api::config::Config;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down the portfolio API...");
}

#[tokio::main]
async fn main() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_secs()
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Cannot prepare configuration: {}", e);
            return;
        }
    };

    let api = match app::build_routes(&config) {
        Ok(api) => api,
        Err(e) => {
            error!("Cannot initialize portfolio API: {}", e);
            return;
        }
    };
    info!("Portfolio API initialized.");

    let server = warp::serve(api)
        .try_bind_with_graceful_shutdown(([0, 0, 0, 0], config.port), shutdown_signal());
    match server {
        Ok((addr, server)) => {
            info!("Server running on http://{}", addr);
            server.await;
        }
        Err(e) => error!("Cannot listen and serve: {}", e),
    }
}
