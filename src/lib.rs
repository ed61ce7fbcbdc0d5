pub mod api; // HTTP router, server lifecycle
pub mod artifacts; // Model, scaler, encoders, feature order
pub mod config;
pub mod prediction; // Record parsing + inference pipeline

#[cfg(test)]
pub(crate) mod testing;

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::artifacts::ModelArtifacts;
use crate::config::ServiceConfig;

/// Process entry point: load artifacts, serve until Ctrl-C.
///
/// Any configuration or artifact failure aborts startup with a
/// non-zero exit code; the server never runs without a full model.
pub async fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let cfg = match ServiceConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let artifacts = match ModelArtifacts::load(&cfg.artifacts_dir) {
        Ok(artifacts) => Arc::new(artifacts),
        Err(e) => {
            tracing::error!("Failed to load model artifacts: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut server = match api::start_server(artifacts, cfg.bind_addr).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        addr = %server.session.server_addr,
        session = %server.session.session_id,
        "Serving predictions"
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }

    server.shutdown();
    server.wait().await;
    ExitCode::SUCCESS
}
