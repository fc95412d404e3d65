//! Detection of differences that can be applied in place.

use crate::metadata::labels_and_annotations_are_equal;
use k8s_openapi::api::core::v1::{Service, ServiceSpec};
use tracing::debug;

/// Whether the live service must be updated to match `merged`.
///
/// `spec` is compared with its derived structural equality, so every
/// field counts, including each port by position. Labels and annotations are
/// compared after the merge, meaning only values the caller explicitly set
/// can differ. A missing spec equals an empty one.
#[must_use]
pub fn needs_update(merged: &Service, observed: &Service) -> bool {
    let default_spec = ServiceSpec::default();
    let desired = merged.spec.as_ref().unwrap_or(&default_spec);
    let live = observed.spec.as_ref().unwrap_or(&default_spec);

    if desired != live {
        debug!("spec differs from the live service");
        return true;
    }
    if !labels_and_annotations_are_equal(&merged.metadata, &observed.metadata) {
        debug!("labels or annotations differ from the live service");
        return true;
    }
    false
}
