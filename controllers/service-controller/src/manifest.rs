//! Desired Service manifests.
//!
//! Desired Services are rendered ahead of time into YAML, either a single
//! file (one or more `---` separated documents) or a directory of
//! `*.yaml` / `*.yml` files.

use crate::error::ControllerError;
use k8s_openapi::api::core::v1::Service;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads every desired Service under `path`, keyed by name.
///
/// Services without a namespace are placed in `namespace`; a Service naming
/// any other namespace is rejected, as are duplicate names.
pub fn load_services(
    path: &Path,
    namespace: &str,
) -> Result<BTreeMap<String, Service>, ControllerError> {
    let mut services = BTreeMap::new();
    for file in manifest_files(path)? {
        let text = fs::read_to_string(&file)
            .map_err(|source| ControllerError::Io { path: file.clone(), source })?;
        for service in parse_services(&text)? {
            let service = place_in_namespace(service, namespace)?;
            let name = service.metadata.name.clone().unwrap_or_default();
            debug!("Loaded desired Service {}/{} from {}", namespace, name, file.display());
            if services.insert(name.clone(), service).is_some() {
                return Err(ControllerError::InvalidManifest(format!(
                    "Service {name} is defined more than once"
                )));
            }
        }
    }
    Ok(services)
}

/// Parses all Service documents in a YAML stream. Empty documents are skipped.
pub fn parse_services(text: &str) -> Result<Vec<Service>, ControllerError> {
    let mut services = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        let value = serde_yaml::Value::deserialize(document)?;
        if value.is_null() {
            continue;
        }
        let service: Service = serde_yaml::from_value(value)?;
        if service.metadata.name.as_deref().unwrap_or_default().is_empty() {
            return Err(ControllerError::InvalidManifest(
                "Service manifest missing metadata.name".to_string(),
            ));
        }
        services.push(service);
    }
    Ok(services)
}

fn place_in_namespace(mut service: Service, namespace: &str) -> Result<Service, ControllerError> {
    match service.metadata.namespace.as_deref() {
        None | Some("") => service.metadata.namespace = Some(namespace.to_string()),
        Some(ns) if ns == namespace => {}
        Some(ns) => {
            return Err(ControllerError::InvalidManifest(format!(
                "Service {} is in namespace {}, expected {}",
                service.metadata.name.as_deref().unwrap_or_default(),
                ns,
                namespace
            )));
        }
    }
    Ok(service)
}

/// Files to read: `path` itself, or the YAML files directly inside it in name order.
fn manifest_files(path: &Path) -> Result<Vec<PathBuf>, ControllerError> {
    let io_error = |source| ControllerError::Io { path: path.to_path_buf(), source };
    if !fs::metadata(path).map_err(io_error)?.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(path).map_err(io_error)? {
        let file = entry.map_err(io_error)?.path();
        let is_yaml = file
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == "yaml" || ext == "yml");
        if is_yaml && file.is_file() {
            files.push(file);
        }
    }
    files.sort();
    Ok(files)
}
