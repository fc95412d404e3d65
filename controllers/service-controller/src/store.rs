//! Service store abstraction.
//!
//! The reconciler talks to the API server only through [`ServiceStore`], so
//! tests can run it against the in-memory mock instead of a cluster.

use crate::error::ControllerError;
use k8s_openapi::api::core::v1::Service;
use kube::Api;
use kube::api::{DeleteParams, PostParams, Preconditions};
use tracing::debug;

/// Create, read, replace and delete operations on Services of one namespace.
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait ServiceStore: Send + Sync {
    /// Fetches a Service. Not found is `Ok(None)`.
    async fn get(&self, name: &str) -> Result<Option<Service>, ControllerError>;

    /// Creates a Service and returns the stored object.
    async fn create(&self, service: &Service) -> Result<Service, ControllerError>;

    /// Replaces a Service. `service.metadata.resource_version` must match the stored one.
    async fn replace(&self, name: &str, service: &Service) -> Result<Service, ControllerError>;

    /// Deletes a Service, but only if it still has the given UID and resource version.
    async fn delete(
        &self,
        name: &str,
        uid: Option<&str>,
        resource_version: Option<&str>,
    ) -> Result<(), ControllerError>;
}

/// [`ServiceStore`] backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeServiceStore {
    api: Api<Service>,
}

impl std::fmt::Debug for KubeServiceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeServiceStore").finish_non_exhaustive()
    }
}

impl KubeServiceStore {
    /// Creates a store over a namespaced Service API.
    pub fn new(api: Api<Service>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl ServiceStore for KubeServiceStore {
    async fn get(&self, name: &str) -> Result<Option<Service>, ControllerError> {
        Ok(self.api.get_opt(name).await?)
    }

    async fn create(&self, service: &Service) -> Result<Service, ControllerError> {
        Ok(self.api.create(&PostParams::default(), service).await?)
    }

    async fn replace(&self, name: &str, service: &Service) -> Result<Service, ControllerError> {
        Ok(self.api.replace(name, &PostParams::default(), service).await?)
    }

    async fn delete(
        &self,
        name: &str,
        uid: Option<&str>,
        resource_version: Option<&str>,
    ) -> Result<(), ControllerError> {
        let params = DeleteParams {
            preconditions: Some(Preconditions {
                uid: uid.map(str::to_string),
                resource_version: resource_version.map(str::to_string),
            }),
            ..DeleteParams::default()
        };
        match self.api.delete(name, &params).await {
            Ok(_) => Ok(()),
            Err(e) => {
                let e = ControllerError::from(e);
                if e.is_not_found() {
                    // already gone, nothing to delete
                    debug!("Service {} already deleted", name);
                    Ok(())
                } else {
                    Err(e)
                }
            }
        }
    }
}
