//! Connection coordinate resolution for polymorphic database topologies.

use roleforge_core::{AppError, AppResult};
use roleforge_domain::{DatabaseTopology, Endpoint, TopologyDescriptor};

/// Selects the topology shape a descriptor exposes.
///
/// The cluster endpoint wins when a descriptor carries both shapes.
pub fn resolve_topology(descriptor: &TopologyDescriptor) -> AppResult<DatabaseTopology> {
    if let Some(endpoint) = &descriptor.cluster_endpoint {
        return Ok(DatabaseTopology::Cluster(endpoint.clone()));
    }

    if let Some(endpoint) = &descriptor.instance_endpoint {
        return Ok(DatabaseTopology::SingleInstance(endpoint.clone()));
    }

    Err(AppError::TopologyResolution(
        "topology exposes neither a cluster nor an instance endpoint".to_owned(),
    ))
}

/// Resolves host, port and identifier from a topology descriptor.
pub fn resolve_endpoint(descriptor: &TopologyDescriptor) -> AppResult<Endpoint> {
    resolve_topology(descriptor).map(|topology| topology.endpoint().clone())
}
