//! Service Diff
//!
//! Decides whether a live Kubernetes `Service` must be left alone, updated in
//! place, or deleted and recreated to match a desired `Service`.
//!
//! The API server injects defaults (type, session affinity, node ports),
//! allocates cluster IPs, and refuses in-place changes to a few fields. The
//! desired object a controller renders knows none of this, so a naive
//! comparison either flaps forever or misses real drift. The pipeline here:
//!
//! 1. [`apply_server_side_values`] folds server-assigned values into a copy of
//!    the desired service wherever the caller left a field unset.
//! 2. [`needs_recreate`] flags changes to immutable fields.
//! 3. [`needs_update`] flags any remaining spec, label or annotation difference.
//!
//! [`decide`] runs all three and returns a [`Decision`]. Nothing in this crate
//! performs I/O, holds state between calls, or can fail.

pub mod address;
pub mod decision;
pub mod defaults;
pub mod equality;
pub mod immutability;
pub mod kind;
pub mod metadata;

#[cfg(test)]
mod test_utils;

pub use decision::*;
pub use defaults::apply_server_side_values;
pub use equality::needs_update;
pub use immutability::needs_recreate;
pub use kind::{ServiceKind, has_node_port};
