//! Configuration loaded from environment variables.

use crate::error::ControllerError;
use std::env;
use std::path::PathBuf;

const DEFAULT_NAMESPACE: &str = "default";

/// Runtime configuration of the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// File or directory holding the desired Service manifests
    pub manifests: PathBuf,
    /// Namespace the Services live in
    pub namespace: String,
    /// ConfigMap that owns every managed Service
    pub owner_configmap: Option<String>,
}

impl Config {
    /// Reads `SERVICE_MANIFESTS`, `WATCH_NAMESPACE` and `OWNER_CONFIGMAP`.
    pub fn from_env() -> Result<Self, ControllerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ControllerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let manifests = lookup("SERVICE_MANIFESTS")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| ControllerError::InvalidConfig(
                "SERVICE_MANIFESTS environment variable is required".to_string()
            ))?;
        let namespace = lookup("WATCH_NAMESPACE")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
        let owner_configmap = lookup("OWNER_CONFIGMAP")
            .filter(|value| !value.trim().is_empty());

        Ok(Self {
            manifests,
            namespace,
            owner_configmap,
        })
    }
}
