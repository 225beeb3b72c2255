use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use mergington::config::Config;
use mergington::database::seed_catalog::{self, SeedError};
use mergington::database::ActivityRegistry;
use mergington::models::Catalog;
use mergington::web;

#[tokio::main]
async fn main() {
    dotenv().ok();

    // 1. Logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Config and seed catalog
    let config = Config::load();
    let catalog = match load_catalog(&config) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Seed catalog rejected: {}", e);
            std::process::exit(1);
        }
    };

    let registry = ActivityRegistry::new(catalog).enforce_capacity(config.enforce_capacity);
    let activities = registry.activity_count().await;
    info!(
        activities,
        enforce_capacity = config.enforce_capacity,
        "registry seeded"
    );

    // 3. Serve
    let app = web::router(registry, &config.static_dir);

    let listener = match bind(&config).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Could not bind server: {}", e);
            std::process::exit(1);
        }
    };

    match listener.local_addr() {
        Ok(addr) => info!("Server running on http://{}", addr),
        Err(e) => warn!("Server running, local address unknown: {}", e),
    }

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Server shut down");
}

fn load_catalog(config: &Config) -> Result<Catalog, SeedError> {
    match &config.seed_catalog {
        Some(path) => seed_catalog::load_catalog_file(path),
        None => {
            let catalog = seed_catalog::default_catalog();
            seed_catalog::validate_catalog(&catalog)?;
            Ok(catalog)
        }
    }
}

/// Bind the configured address, falling back to the next port when it is taken.
async fn bind(config: &Config) -> std::io::Result<TcpListener> {
    match TcpListener::bind((config.host.as_str(), config.port)).await {
        Ok(listener) => Ok(listener),
        Err(e) => {
            let Some(fallback) = config.fallback_port() else {
                return Err(e);
            };
            warn!(
                "Could not bind {}: {}. Trying fallback {}:{}",
                config.bind_address(),
                e,
                config.host,
                fallback
            );
            TcpListener::bind((config.host.as_str(), fallback)).await
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
