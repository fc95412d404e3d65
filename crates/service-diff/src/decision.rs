//! Combined verdict for one reconciliation cycle.

use crate::defaults::apply_server_side_values;
use crate::equality::needs_update;
use crate::immutability::needs_recreate;
use k8s_openapi::api::core::v1::Service;
use tracing::{debug, debug_span};

/// What the orchestrator has to do with the live service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Live service already matches
    NoOp,
    /// Replace spec, labels and annotations in place
    Update,
    /// Delete the live service and create it again
    Recreate,
}

/// Result of comparing a desired service against the live one.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// Desired service with server-assigned values filled in. This is what
    /// gets committed on update.
    pub merged: Service,
    /// An immutable field changed
    pub needs_recreate: bool,
    /// Some mutable field, label or annotation changed
    pub needs_update: bool,
}

impl Decision {
    /// The action to take. Recreate wins over update.
    #[must_use]
    pub fn action(&self) -> Action {
        if self.needs_recreate {
            Action::Recreate
        } else if self.needs_update {
            Action::Update
        } else {
            Action::NoOp
        }
    }
}

/// Merges server-side values into `desired` and evaluates both verdicts
/// against `observed`.
///
/// Pure and idempotent: the same inputs always give the same decision.
#[must_use]
pub fn decide(desired: &Service, observed: &Service) -> Decision {
    let span = debug_span!(
        "decide",
        namespace = observed.metadata.namespace.as_deref().unwrap_or_default(),
        service = observed.metadata.name.as_deref().unwrap_or_default(),
    );
    let _guard = span.enter();

    let merged = apply_server_side_values(desired, observed);
    let needs_recreate = needs_recreate(&merged, observed);
    let needs_update = needs_update(&merged, observed);
    debug!(needs_recreate, needs_update, "compared desired service with live service");

    Decision {
        merged,
        needs_recreate,
        needs_update,
    }
}
