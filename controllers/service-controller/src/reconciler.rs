//! Reconciliation logic for Services.
//!
//! Sequences create, recreate, update or no-op for one desired Service based
//! on the verdicts of `service_diff::decide`, then commits the result through
//! the [`ServiceStore`].

use crate::error::ControllerError;
use crate::store::ServiceStore;
use k8s_openapi::api::core::v1::Service;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use service_diff::{Action, decide};
use std::fmt;
use tracing::{Instrument, debug, info, info_span, warn};

/// Label put on every Service this controller manages.
pub const MANAGED_BY_LABEL: &str = "app.kubernetes.io/managed-by";
/// Value of [`MANAGED_BY_LABEL`].
pub const MANAGED_BY_VALUE: &str = "service-controller";

/// What a reconciliation did to the live Service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Service did not exist and was created
    Created,
    /// An immutable field changed; deleted and created again
    Recreated,
    /// Spec, labels or annotations were replaced in place
    Updated,
    /// Live Service already matched
    Unchanged,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Created => "created",
            Self::Recreated => "recreated",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
        };
        f.write_str(text)
    }
}

/// Reconciles desired Services against a [`ServiceStore`].
#[derive(Debug)]
pub struct ServiceReconciler<S> {
    store: S,
    owner: Option<OwnerReference>,
}

impl<S: ServiceStore> ServiceReconciler<S> {
    /// Creates a new reconciler. `owner` becomes the controller owner of every Service created.
    pub fn new(store: S, owner: Option<OwnerReference>) -> Self {
        Self { store, owner }
    }

    /// Reconciles one desired Service.
    ///
    /// This method:
    /// 1. Stamps the managed-by label and owner reference onto `expected`
    /// 2. Creates the Service if it does not exist
    /// 3. Deletes and recreates it if an immutable field changed
    /// 4. Otherwise replaces spec, labels and annotations if anything differs
    ///
    /// Returns the outcome and the Service as stored afterwards.
    pub async fn reconcile_service(
        &self,
        expected: &Service,
    ) -> Result<(Outcome, Service), ControllerError> {
        let name = expected.metadata.name.as_deref()
            .ok_or_else(|| ControllerError::InvalidManifest("Service missing name".to_string()))?;
        let namespace = expected.metadata.namespace.as_deref().unwrap_or("default");
        let span = info_span!("reconcile_service", namespace, service = name);

        self.converge(expected, name, namespace).instrument(span).await
    }

    async fn converge(
        &self,
        expected: &Service,
        name: &str,
        namespace: &str,
    ) -> Result<(Outcome, Service), ControllerError> {
        let expected = self.prepare(expected);

        let Some(observed) = self.store.get(name).await? else {
            info!("Service {}/{} not found, creating", namespace, name);
            let created = self.store.create(&fresh(&expected)).await?;
            return Ok((Outcome::Created, created));
        };

        let decision = decide(&expected, &observed);
        match decision.action() {
            Action::Recreate => {
                warn!("Service {}/{} changed an immutable field, recreating", namespace, name);
                self.store
                    .delete(
                        name,
                        observed.metadata.uid.as_deref(),
                        observed.metadata.resource_version.as_deref(),
                    )
                    .await?;
                // addresses merged from the deleted object must not leak into the new one
                let created = self.store.create(&fresh(&expected)).await?;
                Ok((Outcome::Recreated, created))
            }
            Action::Update => {
                info!("Service {}/{} differs from desired state, updating", namespace, name);
                let mut reconciled = observed;
                reconciled.metadata.annotations = decision.merged.metadata.annotations;
                reconciled.metadata.labels = decision.merged.metadata.labels;
                reconciled.spec = decision.merged.spec;
                let updated = self.store.replace(name, &reconciled).await?;
                Ok((Outcome::Updated, updated))
            }
            Action::NoOp => {
                debug!("Service {}/{} already up-to-date", namespace, name);
                Ok((Outcome::Unchanged, observed))
            }
        }
    }

    /// Adds the managed-by label and the controller owner reference.
    fn prepare(&self, expected: &Service) -> Service {
        let mut prepared = expected.clone();
        prepared
            .metadata
            .labels
            .get_or_insert_with(Default::default)
            .entry(MANAGED_BY_LABEL.to_string())
            .or_insert_with(|| MANAGED_BY_VALUE.to_string());

        if let Some(owner) = &self.owner {
            let owners = prepared.metadata.owner_references.get_or_insert_with(Vec::new);
            if !owners.iter().any(|existing| existing.uid == owner.uid) {
                owners.push(owner.clone());
            }
        }
        prepared
    }
}

/// Strips server-owned identity so the object can be submitted as new.
fn fresh(service: &Service) -> Service {
    let mut service = service.clone();
    service.metadata.uid = None;
    service.metadata.resource_version = None;
    service.metadata.creation_timestamp = None;
    service.status = None;
    service
}
