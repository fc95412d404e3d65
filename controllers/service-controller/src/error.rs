//! Controller-specific error types.
//!
//! The decision core cannot fail; everything here comes from talking to the
//! API server, reading manifests, or configuration.

use std::path::PathBuf;
use thiserror::Error;
use kube::Error as KubeError;

/// Errors that can occur in the Service Controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// Manifest is not valid YAML or not a Service
    #[error("Manifest error: {0}")]
    Manifest(#[from] serde_yaml::Error),

    /// Manifest file or directory could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// Path being read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Manifest parsed but is unusable
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    /// Service store rejected an operation
    #[error("Service store error: {0}")]
    Store(String),

    /// Resource watch failed
    #[error("Resource watch failed: {0}")]
    Watch(String),
}

impl ControllerError {
    /// Whether the error is an API server 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Kube(KubeError::Api(response)) if response.code == 404)
    }
}
