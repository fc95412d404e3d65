//! Service types and the behaviour that hangs off them.

use std::fmt;

/// The exposure mode of a Service (`spec.type`).
///
/// Unknown strings are kept verbatim so a newer API server never makes
/// parsing fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    /// `ClusterIP`, the API server default
    ClusterIp,
    /// `NodePort`
    NodePort,
    /// `LoadBalancer`
    LoadBalancer,
    /// `ExternalName`
    ExternalName,
    /// Any other value
    Other(String),
}

impl ServiceKind {
    /// Parses the `spec.type` field. Returns `None` when the type is unset.
    #[must_use]
    pub fn parse(type_: Option<&str>) -> Option<Self> {
        match type_? {
            "" => None,
            "ClusterIP" => Some(Self::ClusterIp),
            "NodePort" => Some(Self::NodePort),
            "LoadBalancer" => Some(Self::LoadBalancer),
            "ExternalName" => Some(Self::ExternalName),
            other => Some(Self::Other(other.to_string())),
        }
    }

    /// Whether services of this kind get a node port allocated per port.
    #[must_use]
    pub fn allocates_node_ports(&self) -> bool {
        matches!(self, Self::NodePort | Self::LoadBalancer)
    }

    /// The wire representation of this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ClusterIp => "ClusterIP",
            Self::NodePort => "NodePort",
            Self::LoadBalancer => "LoadBalancer",
            Self::ExternalName => "ExternalName",
            Self::Other(other) => other,
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns whether ports of a service with the given `spec.type` carry a node port.
#[must_use]
pub fn has_node_port(type_: Option<&str>) -> bool {
    ServiceKind::parse(type_).is_some_and(|kind| kind.allocates_node_ports())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_kinds() {
        assert_eq!(ServiceKind::parse(Some("ClusterIP")), Some(ServiceKind::ClusterIp));
        assert_eq!(ServiceKind::parse(Some("NodePort")), Some(ServiceKind::NodePort));
        assert_eq!(ServiceKind::parse(Some("LoadBalancer")), Some(ServiceKind::LoadBalancer));
        assert_eq!(ServiceKind::parse(Some("ExternalName")), Some(ServiceKind::ExternalName));
    }

    #[test]
    fn test_parse_unset_and_unknown() {
        assert_eq!(ServiceKind::parse(None), None);
        assert_eq!(ServiceKind::parse(Some("")), None);
        assert_eq!(
            ServiceKind::parse(Some("Headless")),
            Some(ServiceKind::Other("Headless".to_string()))
        );
    }

    #[test]
    fn test_has_node_port() {
        assert!(has_node_port(Some("NodePort")));
        assert!(has_node_port(Some("LoadBalancer")));
        assert!(!has_node_port(Some("ClusterIP")));
        assert!(!has_node_port(Some("ExternalName")));
        assert!(!has_node_port(None));
    }

    #[test]
    fn test_display_round_trips_wire_name() {
        assert_eq!(ServiceKind::LoadBalancer.to_string(), "LoadBalancer");
        assert_eq!(ServiceKind::Other("Custom".to_string()).to_string(), "Custom");
    }
}
