//! In-memory Service store for unit testing.
//!
//! Mimics the parts of the API server the reconciler depends on: defaulting
//! and address/node port allocation on write, optimistic concurrency on
//! replace, immutability of `clusterIP`/`ipFamilies`, and delete preconditions.

use crate::error::ControllerError;
use crate::store::ServiceStore;
use k8s_openapi::api::core::v1::{Service, ServiceSpec};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use service_diff::has_node_port;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Calls made against the mock, for assertions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreCalls {
    pub creates: usize,
    pub replaces: usize,
    pub deletes: usize,
}

/// Mock Service store
#[derive(Debug, Clone, Default)]
pub struct MockServiceStore {
    services: Arc<Mutex<HashMap<String, Service>>>,
    calls: Arc<Mutex<StoreCalls>>,
    next_id: Arc<Mutex<u32>>,
}

impl MockServiceStore {
    /// Create an empty mock store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a Service as-is (for test setup)
    pub fn insert(&self, service: Service) {
        let name = service.metadata.name.clone().unwrap_or_default();
        self.services.lock().unwrap().insert(name, service);
    }

    /// Current stored copy of a Service
    pub fn stored(&self, name: &str) -> Option<Service> {
        self.services.lock().unwrap().get(name).cloned()
    }

    /// Calls recorded so far
    pub fn calls(&self) -> StoreCalls {
        self.calls.lock().unwrap().clone()
    }

    fn next_id(&self) -> u32 {
        let mut id = self.next_id.lock().unwrap();
        *id += 1;
        *id
    }

    /// Fills in what the API server would default or allocate.
    fn apply_server_defaults(&self, service: &mut Service) {
        let spec = service.spec.get_or_insert_with(ServiceSpec::default);
        if spec.type_.as_deref().unwrap_or_default().is_empty() {
            spec.type_ = Some("ClusterIP".to_string());
        }
        if spec.session_affinity.is_none() {
            spec.session_affinity = Some("None".to_string());
        }
        if spec.type_.as_deref() != Some("ExternalName") {
            if spec.cluster_ip.as_deref().unwrap_or_default().is_empty() {
                spec.cluster_ip = Some(format!("10.96.0.{}", self.next_id()));
            }
            if spec.cluster_ips.as_ref().is_none_or(Vec::is_empty) {
                spec.cluster_ips = spec.cluster_ip.clone().map(|ip| vec![ip]);
            }
            if spec.ip_families.as_ref().is_none_or(Vec::is_empty) {
                spec.ip_families = Some(vec!["IPv4".to_string()]);
            }
            if spec.ip_family_policy.is_none() {
                spec.ip_family_policy = Some("SingleStack".to_string());
            }
        }
        let node_ports = has_node_port(spec.type_.as_deref());
        for port in spec.ports.iter_mut().flatten() {
            if port.target_port.is_none() {
                port.target_port = Some(IntOrString::Int(port.port));
            }
            if node_ports && port.node_port.unwrap_or(0) == 0 {
                port.node_port = Some(30000 + i32::try_from(self.next_id()).unwrap());
            }
        }
    }

    fn bump_resource_version(&self, service: &mut Service) {
        service.metadata.resource_version = Some(self.next_id().to_string());
    }
}

#[async_trait::async_trait]
impl ServiceStore for MockServiceStore {
    async fn get(&self, name: &str) -> Result<Option<Service>, ControllerError> {
        Ok(self.stored(name))
    }

    async fn create(&self, service: &Service) -> Result<Service, ControllerError> {
        self.calls.lock().unwrap().creates += 1;
        let name = service.metadata.name.clone().unwrap_or_default();
        if self.services.lock().unwrap().contains_key(&name) {
            return Err(ControllerError::Store(format!("services \"{name}\" already exists")));
        }
        let mut created = service.clone();
        created.metadata.uid = Some(format!("uid-{}", self.next_id()));
        self.apply_server_defaults(&mut created);
        self.bump_resource_version(&mut created);
        self.insert(created.clone());
        Ok(created)
    }

    async fn replace(&self, name: &str, service: &Service) -> Result<Service, ControllerError> {
        self.calls.lock().unwrap().replaces += 1;
        let current = self
            .stored(name)
            .ok_or_else(|| ControllerError::Store(format!("services \"{name}\" not found")))?;
        if current.metadata.resource_version != service.metadata.resource_version {
            return Err(ControllerError::Store("the object has been modified".to_string()));
        }
        let current_spec = current.spec.clone().unwrap_or_default();
        let mut replaced = service.clone();
        self.apply_server_defaults(&mut replaced);
        let new_spec = replaced.spec.clone().unwrap_or_default();
        if new_spec.cluster_ip != current_spec.cluster_ip {
            return Err(ControllerError::Store("spec.clusterIP: field is immutable".to_string()));
        }
        if new_spec.ip_families != current_spec.ip_families {
            return Err(ControllerError::Store("spec.ipFamilies: field is immutable".to_string()));
        }
        self.bump_resource_version(&mut replaced);
        self.insert(replaced.clone());
        Ok(replaced)
    }

    async fn delete(
        &self,
        name: &str,
        uid: Option<&str>,
        resource_version: Option<&str>,
    ) -> Result<(), ControllerError> {
        self.calls.lock().unwrap().deletes += 1;
        let mut services = self.services.lock().unwrap();
        let Some(current) = services.get(name) else {
            return Ok(());
        };
        if uid.is_some() && current.metadata.uid.as_deref() != uid {
            return Err(ControllerError::Store("precondition failed: uid".to_string()));
        }
        if resource_version.is_some() && current.metadata.resource_version.as_deref() != resource_version {
            return Err(ControllerError::Store("precondition failed: resourceVersion".to_string()));
        }
        services.remove(name);
        Ok(())
    }
}
