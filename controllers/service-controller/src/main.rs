//! Service Controller
//!
//! Keeps Kubernetes Services converged to rendered manifests.
//!
//! Server-assigned values (cluster IPs, node ports, defaulted fields) are
//! folded into each desired Service before comparison, so live Services are
//! only updated on real drift and only recreated when an immutable field
//! actually changes.

mod config;
mod controller;
mod error;
mod manifest;
mod reconciler;
mod store;
mod watcher;
#[cfg(test)]
mod mock;

use config::Config;
use controller::Controller;
use crate::error::ControllerError;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| ControllerError::InvalidConfig(
            "rustls crypto provider already installed".to_string()
        ))?;

    info!("Starting Service Controller");

    let config = Config::from_env()?;

    info!("Configuration:");
    info!("  Manifests: {}", config.manifests.display());
    info!("  Namespace: {}", config.namespace);
    info!("  Owner ConfigMap: {}", config.owner_configmap.as_deref().unwrap_or("none"));

    let controller = Controller::new(config).await?;
    controller.run().await?;

    Ok(())
}
