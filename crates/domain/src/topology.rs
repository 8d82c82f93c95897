use serde::{Deserialize, Serialize};

/// Physical connection coordinates of a database deployment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    /// DNS name or address clients connect to.
    pub host: String,
    /// TCP port of the database listener.
    pub port: u16,
    /// Cluster or instance identifier.
    pub identifier: String,
}

impl Endpoint {
    /// Creates an endpoint from its parts.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16, identifier: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            identifier: identifier.into(),
        }
    }
}

/// Shape of the database deployment a role is created on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseTopology {
    /// Single-node database instance.
    SingleInstance(Endpoint),
    /// Multi-node database cluster, addressed through its writer endpoint.
    Cluster(Endpoint),
}

impl DatabaseTopology {
    /// Returns the connection coordinates regardless of topology shape.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        match self {
            Self::SingleInstance(endpoint) | Self::Cluster(endpoint) => endpoint,
        }
    }

    /// Returns a stable label for the topology shape.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SingleInstance(_) => "single_instance",
            Self::Cluster(_) => "cluster",
        }
    }
}

impl From<DatabaseTopology> for TopologyDescriptor {
    fn from(value: DatabaseTopology) -> Self {
        match value {
            DatabaseTopology::SingleInstance(endpoint) => Self::instance(endpoint),
            DatabaseTopology::Cluster(endpoint) => Self::cluster(endpoint),
        }
    }
}

/// Untyped topology reference as it appears in deployment manifests.
///
/// A well-formed descriptor carries exactly one endpoint shape. Resolution
/// prefers the cluster endpoint when both are present and fails when neither
/// is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologyDescriptor {
    /// Cluster-style endpoint, when the topology is a cluster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_endpoint: Option<Endpoint>,
    /// Instance-style endpoint, when the topology is a single instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_endpoint: Option<Endpoint>,
}

impl TopologyDescriptor {
    /// Describes a cluster topology.
    #[must_use]
    pub fn cluster(endpoint: Endpoint) -> Self {
        Self {
            cluster_endpoint: Some(endpoint),
            instance_endpoint: None,
        }
    }

    /// Describes a single-instance topology.
    #[must_use]
    pub fn instance(endpoint: Endpoint) -> Self {
        Self {
            cluster_endpoint: None,
            instance_endpoint: Some(endpoint),
        }
    }
}
