// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;

use tokio::signal;
use tracing::{error, info};

use pocketbook_server::{
    api::router,
    config::AppConfig,
    logging,
    state::{AppState, AuthConfig},
    storage::ProfileStore,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    logging::init(config.log_format);
    info!(?config, "configuration loaded");

    if !config.auth.verify_signatures {
        tracing::warn!(
            "AUTH_VERIFY_SIGNATURES is off: bearer tokens are decoded without signature checks"
        );
    }

    match run(config).await {
        Ok(()) => {
            info!("Server shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), String> {
    let db_path = config.profile_db_path();
    let store = ProfileStore::open(&db_path)
        .map_err(|e| format!("Failed to open profile database at {}: {e}", db_path.display()))?;
    info!(path = %db_path.display(), "profile database opened");

    let state = AppState::new(AuthConfig::from_settings(&config.auth), store);
    let app = router(state);

    let addr = config
        .bind_addr()
        .map_err(|e| format!("Failed to parse bind address: {e}"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind {addr}: {e}"))?;

    info!("Pocketbook server listening on http://{addr} (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("Server error: {e}"))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
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
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting graceful shutdown"),
        _ = terminate => info!("Received SIGTERM, starting graceful shutdown"),
    }
}
