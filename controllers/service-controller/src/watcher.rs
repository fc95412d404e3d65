//! Kubernetes Service watcher.
//!
//! Watches the live Services this controller manages and re-runs
//! reconciliation for the matching desired Service whenever one is changed
//! or deleted out of band. Events are handled one at a time, so two cycles
//! for the same Service never interleave.

use crate::error::ControllerError;
use crate::reconciler::{MANAGED_BY_LABEL, MANAGED_BY_VALUE, ServiceReconciler};
use crate::store::ServiceStore;
use futures::TryStreamExt;
use k8s_openapi::api::core::v1::Service;
use kube::Api;
use kube_runtime::watcher;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Watches managed Services for drift.
pub struct Watcher<S> {
    reconciler: Arc<ServiceReconciler<S>>,
    service_api: Api<Service>,
    desired: Arc<BTreeMap<String, Service>>,
}

impl<S: ServiceStore> Watcher<S> {
    /// Creates a new watcher instance.
    pub fn new(
        reconciler: Arc<ServiceReconciler<S>>,
        service_api: Api<Service>,
        desired: Arc<BTreeMap<String, Service>>,
    ) -> Self {
        Self {
            reconciler,
            service_api,
            desired,
        }
    }

    /// Starts watching managed Service resources.
    pub async fn watch_services(&self) -> Result<(), ControllerError> {
        info!("Starting Service watcher");

        let config = watcher::Config::default()
            .labels(&format!("{MANAGED_BY_LABEL}={MANAGED_BY_VALUE}"));
        let mut stream = Box::pin(watcher(self.service_api.clone(), config));

        while let Some(event) = stream.try_next().await
            .map_err(|e| ControllerError::Watch(format!("Watcher stream error: {}", e)))?
        {
            match event {
                watcher::Event::Apply(service) => {
                    let name = service.metadata.name.as_deref()
                        .unwrap_or("<unknown>");
                    debug!("Service applied: {}", name);
                    self.reconcile(name).await;
                }
                watcher::Event::Delete(service) => {
                    let name = service.metadata.name.as_deref()
                        .unwrap_or("<unknown>");
                    info!("Service deleted: {}", name);
                    self.reconcile(name).await;
                }
                watcher::Event::Init => {
                    debug!("Service watcher initialized");
                }
                watcher::Event::InitApply(service) => {
                    let name = service.metadata.name.as_deref()
                        .unwrap_or("<unknown>");
                    debug!("Service init apply: {}", name);
                    self.reconcile(name).await;
                }
                watcher::Event::InitDone => {
                    info!("Service watcher initialization complete");
                }
            }
        }

        Ok(())
    }

    /// Reconciles the desired Service called `name`, if there is one.
    async fn reconcile(&self, name: &str) {
        let Some(expected) = self.desired.get(name) else {
            // labelled by us once, but no longer in the manifests
            warn!("Service {} is labelled {}={} but has no manifest, ignoring", name, MANAGED_BY_LABEL, MANAGED_BY_VALUE);
            return;
        };
        match self.reconciler.reconcile_service(expected).await {
            Ok((outcome, _)) => debug!("Service {} {}", name, outcome),
            Err(e) => error!("Failed to reconcile Service {}: {}", name, e),
        }
    }
}
