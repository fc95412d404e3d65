//! Builders for test services.

use crate::metadata::StringMap;
use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

/// Helper to create a test Service in the `default` namespace
pub fn service(name: &str, spec: ServiceSpec) -> Service {
    Service {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some("default".to_string()),
            ..Default::default()
        },
        spec: Some(spec),
        status: None,
    }
}

/// Helper to create a TCP port with optional target and node ports
pub fn port(number: i32, target_port: Option<i32>, node_port: Option<i32>) -> ServicePort {
    ServicePort {
        name: Some(format!("port-{number}")),
        port: number,
        protocol: Some("TCP".to_string()),
        target_port: target_port.map(IntOrString::Int),
        node_port,
        ..Default::default()
    }
}

/// Helper to build a label/annotation map
pub fn string_map(entries: &[(&str, &str)]) -> StringMap {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Desired spec as a controller would render it: only selector and ports set
pub fn desired_spec(ports: Vec<ServicePort>) -> ServiceSpec {
    ServiceSpec {
        selector: Some(string_map(&[("app", "web")])),
        ports: Some(ports),
        ..Default::default()
    }
}

/// The same spec after the API server defaulted and allocated everything
pub fn observed_spec(type_: &str, ports: Vec<ServicePort>) -> ServiceSpec {
    ServiceSpec {
        type_: Some(type_.to_string()),
        cluster_ip: Some("10.0.0.5".to_string()),
        cluster_ips: Some(vec!["10.0.0.5".to_string()]),
        ip_families: Some(vec!["IPv4".to_string()]),
        ip_family_policy: Some("SingleStack".to_string()),
        session_affinity: Some("None".to_string()),
        selector: Some(string_map(&[("app", "web")])),
        ports: Some(ports),
        ..Default::default()
    }
}
