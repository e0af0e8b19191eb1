use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;

use media_range::logging::init_logging;
use media_range::{router, AppState, Config, DiskLookup};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging(config.log_json);

    if !config.root.is_dir() {
        tracing::warn!(
            root = %config.root.display(),
            "media directory does not exist, every file will be 404",
        );
    }

    let app = router(AppState::new(DiskLookup::new(&config.root)), &config);

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!(
        addr = %listener.local_addr()?,
        root = %config.root.display(),
        prefix = %config.prefix,
        cors = config.cors,
        "serving media",
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
