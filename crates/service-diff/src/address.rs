//! IP literal validation for server-assigned cluster addresses.

use std::net::IpAddr;

/// Whether `value` is a plain IPv4 or IPv6 address.
///
/// `"None"` (headless services) and the empty string are not addresses.
#[must_use]
pub fn is_ip_literal(value: &str) -> bool {
    value.parse::<IpAddr>().is_ok()
}

/// Whether every element of `values` is an IP literal. True for an empty list.
#[must_use]
pub fn all_ip_literals(values: &[String]) -> bool {
    values.iter().all(|value| is_ip_literal(value))
}
