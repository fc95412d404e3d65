//! Label and annotation helpers.
//!
//! A missing map and an empty map mean the same thing to the API server, so
//! both helpers treat `None` as `{}`.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

/// String map as used by `metadata.labels` and `metadata.annotations`.
pub type StringMap = BTreeMap<String, String>;

/// Merges `observed` into `desired`: keys already in `desired` keep their
/// value, keys only in `observed` are added.
///
/// Returns `None` only when neither side has any entry and `desired` was unset.
#[must_use]
pub fn merge_preserving_existing_keys(
    desired: Option<&StringMap>,
    observed: Option<&StringMap>,
) -> Option<StringMap> {
    let mut merged = desired.cloned().unwrap_or_default();
    for (key, value) in observed.into_iter().flatten() {
        merged.entry(key.clone()).or_insert_with(|| value.clone());
    }
    if merged.is_empty() && desired.is_none() {
        return None;
    }
    Some(merged)
}

/// Compares two optional maps, treating `None` as empty.
#[must_use]
pub fn maps_are_equal(a: Option<&StringMap>, b: Option<&StringMap>) -> bool {
    let empty = StringMap::new();
    a.unwrap_or(&empty) == b.unwrap_or(&empty)
}

/// Whether both the labels and the annotations of `a` and `b` match.
#[must_use]
pub fn labels_and_annotations_are_equal(a: &ObjectMeta, b: &ObjectMeta) -> bool {
    maps_are_equal(a.labels.as_ref(), b.labels.as_ref())
        && maps_are_equal(a.annotations.as_ref(), b.annotations.as_ref())
}
