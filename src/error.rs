use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Error reading manifest {}: {source}", .path.display())]
    ManifestNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing manifest {}: {source}", .path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Runtime probe unavailable: {0}")]
    ProbeUnavailable(String),

    #[error("npm registry returned non-200 status code for {package}: {status}")]
    RegistryStatus {
        package: String,
        status: reqwest::StatusCode,
    },

    #[error("Error decoding npm JSON response for {package}: {source}")]
    RegistryDecode {
        package: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScanError {
    /// Only an unreadable or malformed manifest stops a run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScanError::ManifestNotFound { .. } | ScanError::ManifestParse { .. }
        )
    }
}
