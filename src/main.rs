use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use prompt_canvas::{
    config::{Config, StoreLocation},
    routes::{AppState, build_router},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    init_tracing(&config);

    let store = config.open_store()?;
    match config.store_location()? {
        StoreLocation::Memory => {
            warn!(store = config.store_name(), "using in-memory store; records are lost on exit")
        }
        StoreLocation::Directory(root) => {
            info!(store = config.store_name(), root = %root.display(), "using file store")
        }
    }

    let bind_address = config.bind_address();
    info!(image_base = %config.image_base_url, "placeholder image service");
    let state = Arc::new(AppState::new(config, store)?);
    let router = build_router(state);

    let tcp_listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, version = env!("CARGO_PKG_VERSION"), "prompt-canvas listening");

    axum::serve(tcp_listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("prompt-canvas stopped");
    Ok(())
}

fn init_tracing(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| config.log_level.parse::<EnvFilter>())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true);
    if config.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install Ctrl-C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => warn!(error = %err, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("shutdown signal received");
}
