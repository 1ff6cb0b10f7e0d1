//! Command handlers.

use anyhow::{Context, Result};
use jester_server::{
    Credentials, JesterConfig, RunResponse, build_pipeline, build_state, create_router,
};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Serve until Ctrl-C or SIGTERM, cancelling in-flight runs on the way out.
pub async fn serve(config: JesterConfig, bind: Option<String>) -> Result<()> {
    let config = match bind {
        Some(bind) => {
            let server = config.server().clone().with_bind(bind);
            config.with_server(server)
        }
        None => config,
    };
    let addr = config.server().socket_addr()?;
    let credentials = Credentials::from_env();
    let shutdown = CancellationToken::new();
    let state = build_state(&config, &credentials, shutdown.clone())?;

    if state.gate().is_none() {
        warn!("Bearer gate disabled: trigger routes are open");
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(addr = %addr, gated = state.gate().is_some(), "Starting jester server");

    let app = create_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Execute one run, print the report, and fail when nothing was published.
pub async fn run_once(config: JesterConfig) -> Result<()> {
    let credentials = Credentials::from_env();
    let pipeline = build_pipeline(&config, &credentials)?;

    let cancel = CancellationToken::new();
    let watcher = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C, cancelling run");
            watcher.cancel();
        }
    });

    let report = pipeline.run(&cancel).await;
    let response = RunResponse::from(&report);
    println!("{}", serde_json::to_string_pretty(&response)?);

    if response.success {
        Ok(())
    } else {
        anyhow::bail!(
            "{}",
            response
                .error_message
                .unwrap_or_else(|| "Run failed".to_string())
        )
    }
}

/// Validate settings and credentials the way `serve` would.
pub fn check_config(config: JesterConfig) -> Result<()> {
    let credentials = Credentials::from_env();
    build_state(&config, &credentials, CancellationToken::new())?;
    println!("Configuration OK");
    println!("{}", serde_json::to_string_pretty(&config)?);
    println!("{:?}", credentials);
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
    shutdown.cancel();
}
