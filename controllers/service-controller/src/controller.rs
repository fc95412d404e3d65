//! Main controller implementation.
//!
//! Loads the desired Services, reconciles each once, then keeps them
//! converged by watching the live objects.

use crate::config::Config;
use crate::error::ControllerError;
use crate::manifest::load_services;
use crate::reconciler::ServiceReconciler;
use crate::store::KubeServiceStore;
use crate::watcher::Watcher;
use k8s_openapi::api::core::v1::{ConfigMap, Service};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::{Api, Client, Resource};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Main controller for Service management.
pub struct Controller {
    service_watcher: JoinHandle<Result<(), ControllerError>>,
}

impl Controller {
    /// Creates a new controller instance and runs the initial reconciliation.
    pub async fn new(config: Config) -> Result<Self, ControllerError> {
        info!("Initializing Service Controller");

        let desired = load_services(&config.manifests, &config.namespace)?;
        info!("Loaded {} desired Services from {}", desired.len(), config.manifests.display());

        // Create Kubernetes client
        let kube_client = Client::try_default().await?;
        let service_api: Api<Service> = Api::namespaced(kube_client.clone(), &config.namespace);

        let owner = match &config.owner_configmap {
            Some(name) => {
                let configmap_api: Api<ConfigMap> = Api::namespaced(kube_client.clone(), &config.namespace);
                Some(owner_reference(&configmap_api, name).await?)
            }
            None => None,
        };

        let reconciler = Arc::new(ServiceReconciler::new(
            KubeServiceStore::new(service_api.clone()),
            owner,
        ));

        // Initial pass so Services exist before the first watch event
        for (name, expected) in &desired {
            match reconciler.reconcile_service(expected).await {
                Ok((outcome, _)) => info!("Service {}/{} {}", config.namespace, name, outcome),
                Err(e) => error!("Failed to reconcile Service {}/{}: {}", config.namespace, name, e),
            }
        }

        let watcher_instance = Watcher::new(reconciler, service_api, Arc::new(desired));
        let service_watcher = tokio::spawn(async move {
            watcher_instance.watch_services().await
        });

        Ok(Self { service_watcher })
    }

    /// Runs the controller until shutdown.
    pub async fn run(mut self) -> Result<(), ControllerError> {
        info!("Service Controller running");

        tokio::select! {
            result = &mut self.service_watcher => {
                result.map_err(|e| ControllerError::Watch(format!("Service watcher panicked: {}", e)))?
                    .map_err(|e| ControllerError::Watch(format!("Service watcher error: {}", e)))?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                self.service_watcher.abort();
            }
        }

        Ok(())
    }
}

/// Builds a controller owner reference to the named ConfigMap.
async fn owner_reference(api: &Api<ConfigMap>, name: &str) -> Result<OwnerReference, ControllerError> {
    let configmap = api.get(name).await?;
    configmap
        .controller_owner_ref(&())
        .ok_or_else(|| ControllerError::InvalidConfig(format!("ConfigMap {} has no uid", name)))
}
