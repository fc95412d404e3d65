//! Server-side defaulting merge.
//!
//! The API server fills in fields the caller left empty. Before comparing a
//! desired service against the live one, those values are copied over so
//! they do not show up as a diff on every reconciliation. Each field has its
//! own guard: a value is only adopted when it is safe to assume the caller
//! had no opinion about it.

use crate::address::{all_ip_literals, is_ip_literal};
use crate::kind::has_node_port;
use crate::metadata::merge_preserving_existing_keys;
use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use tracing::trace;

/// Returns a copy of `desired` with server-assigned values from `observed`
/// filled in wherever `desired` leaves the field unset.
///
/// `desired` and `observed` are never modified. Unparseable addresses in
/// `observed` are treated as absent.
#[must_use]
pub fn apply_server_side_values(desired: &Service, observed: &Service) -> Service {
    let mut merged = desired.clone();
    let default_spec = ServiceSpec::default();
    let live = observed.spec.as_ref().unwrap_or(&default_spec);
    let spec = merged.spec.get_or_insert_with(ServiceSpec::default);

    // Type may be defaulted by the api server
    if is_unset(spec.type_.as_deref()) {
        spec.type_.clone_from(&live.type_);
    }

    // Addresses allocated for another type may not survive a type change
    let same_type = text(spec.type_.as_deref()) == text(live.type_.as_deref());

    if same_type && is_unset(spec.cluster_ip.as_deref()) && is_ip_literal(text(live.cluster_ip.as_deref())) {
        trace!(cluster_ip = ?live.cluster_ip, "adopting allocated cluster IP");
        spec.cluster_ip.clone_from(&live.cluster_ip);
    }

    if same_type
        && list_is_empty(spec.cluster_ips.as_deref())
        && all_ip_literals(live.cluster_ips.as_deref().unwrap_or_default())
    {
        trace!(cluster_ips = ?live.cluster_ips, "adopting allocated cluster IPs");
        spec.cluster_ips.clone_from(&live.cluster_ips);
    }

    if is_unset(spec.session_affinity.as_deref()) {
        spec.session_affinity.clone_from(&live.session_affinity);
    }

    apply_port_defaults(spec, live.ports.as_deref().unwrap_or_default());

    if spec.health_check_node_port.unwrap_or(0) == 0 {
        spec.health_check_node_port = live.health_check_node_port;
    }

    // ipFamilies and ipFamilyPolicy are immutable, keep the server's unless set explicitly
    if list_is_empty(spec.ip_families.as_deref()) {
        spec.ip_families.clone_from(&live.ip_families);
    }
    if is_unset(spec.ip_family_policy.as_deref()) {
        spec.ip_family_policy.clone_from(&live.ip_family_policy);
    }

    merged.metadata.annotations = merge_preserving_existing_keys(
        desired.metadata.annotations.as_ref(),
        observed.metadata.annotations.as_ref(),
    );
    merged.metadata.labels = merge_preserving_existing_keys(
        desired.metadata.labels.as_ref(),
        observed.metadata.labels.as_ref(),
    );

    merged
}

/// Copies target and node ports position by position.
///
/// Ports are matched by index, not by name or number: the API server keeps
/// the submitted order. When the lists have different lengths nothing is
/// copied and the length mismatch surfaces as a diff.
fn apply_port_defaults(spec: &mut ServiceSpec, live_ports: &[ServicePort]) {
    let node_ports = has_node_port(spec.type_.as_deref());
    let desired_len = spec.ports.as_ref().map_or(0, Vec::len);
    if desired_len != live_ports.len() {
        trace!(desired = desired_len, observed = live_ports.len(), "port counts differ, skipping port defaults");
        return;
    }

    for (port, live) in spec.ports.iter_mut().flatten().zip(live_ports) {
        if int_value(port.target_port.as_ref()) == 0 {
            port.target_port.clone_from(&live.target_port);
        }
        // node ports only exist for NodePort and LoadBalancer services
        if node_ports && port.node_port.unwrap_or(0) == 0 {
            port.node_port = live.node_port;
        }
    }
}

/// Integer value of an int-or-string port. Named ports that are not numeric count as 0.
pub(crate) fn int_value(port: Option<&IntOrString>) -> i32 {
    match port {
        Some(IntOrString::Int(value)) => *value,
        Some(IntOrString::String(value)) => value.parse().unwrap_or(0),
        None => 0,
    }
}

fn text(value: Option<&str>) -> &str {
    value.unwrap_or_default()
}

fn is_unset(value: Option<&str>) -> bool {
    text(value).is_empty()
}

fn list_is_empty<T>(value: Option<&[T]>) -> bool {
    value.is_none_or(<[T]>::is_empty)
}
