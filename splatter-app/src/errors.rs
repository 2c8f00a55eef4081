//! Error types for the splatter application.

use splatter_data::ObjError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Model loading error: {0}")]
    Model(#[from] ObjError),

    #[error("Config error in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Summary serialization error: {0}")]
    Summary(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No model could be loaded ({failed} of {total} files failed)")]
    NothingLoaded { failed: usize, total: usize },
}
