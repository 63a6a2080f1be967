//! CLI error types.

use refit_backend::BackendError;
use refit_config::ConfigError;
use refit_writer::WriteError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Backend(#[from] BackendError),

    #[error("{0}")]
    Write(#[from] WriteError),
}
