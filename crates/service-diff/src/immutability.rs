//! Detection of changes the API server refuses to apply in place.

use k8s_openapi::api::core::v1::{Service, ServiceSpec};
use tracing::debug;

/// Whether `merged` differs from `observed` in a field that can only change
/// by deleting and recreating the service.
///
/// Call with the output of [`apply_server_side_values`](crate::apply_server_side_values);
/// an unmerged desired service would report every allocated address as a change.
/// `ipFamilies` is compared by length and position, `clusterIP` by value.
#[must_use]
pub fn needs_recreate(merged: &Service, observed: &Service) -> bool {
    let default_spec = ServiceSpec::default();
    let desired = merged.spec.as_ref().unwrap_or(&default_spec);
    let live = observed.spec.as_ref().unwrap_or(&default_spec);

    let desired_families = desired.ip_families.as_deref().unwrap_or_default();
    let live_families = live.ip_families.as_deref().unwrap_or_default();
    if desired_families != live_families {
        debug!(desired = ?desired_families, observed = ?live_families, "ipFamilies changed");
        return true;
    }

    let desired_ip = desired.cluster_ip.as_deref().unwrap_or_default();
    let live_ip = live.cluster_ip.as_deref().unwrap_or_default();
    if desired_ip != live_ip {
        debug!(desired = desired_ip, observed = live_ip, "clusterIP changed");
        return true;
    }

    false
}
