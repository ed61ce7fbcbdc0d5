use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Citas";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Artifact file names, resolved against the artifacts directory.
pub const CLASSIFIER_FILE: &str = "random_forest_model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const LABEL_DECODER_FILE: &str = "label_encoder_estado_cita.json";
pub const CATEGORY_ENCODER_FILE: &str = "ordinal_encoder.json";
pub const FEATURE_NAMES_FILE: &str = "selected_features.json";

/// Environment overrides.
pub const ENV_ARTIFACTS_DIR: &str = "CITAS_ARTIFACTS_DIR";
pub const ENV_BIND_ADDR: &str = "CITAS_BIND_ADDR";

/// Default listen address (same port the form page has always posted to).
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// Log filter used when `RUST_LOG` is not set.
///
/// The prediction path logs every intermediate value at debug level,
/// so this crate defaults to debug while dependencies stay at info.
pub fn default_log_filter() -> String {
    "info,citas=debug,citas_lib=debug".to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {var}: {value:?} is not a socket address")]
    InvalidBindAddr { var: &'static str, value: String },
}

/// Runtime configuration for the prediction service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Directory holding the five model artifacts.
    pub artifacts_dir: PathBuf,
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
}

impl ServiceConfig {
    /// Build from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            std::env::var(ENV_ARTIFACTS_DIR).ok(),
            std::env::var(ENV_BIND_ADDR).ok(),
        )
    }

    /// Build from explicit (optional) values; `None` or blank falls back to defaults.
    pub fn from_vars(
        artifacts_dir: Option<String>,
        bind_addr: Option<String>,
    ) -> Result<Self, ConfigError> {
        let artifacts_dir = artifacts_dir
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_artifacts_dir);

        let raw_addr = bind_addr
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr {
                var: ENV_BIND_ADDR,
                value: raw_addr.clone(),
            })?;

        Ok(Self {
            artifacts_dir,
            bind_addr,
        })
    }
}

/// Artifacts live in the process working directory unless overridden.
pub fn default_artifacts_dir() -> PathBuf {
    PathBuf::from(".")
}
