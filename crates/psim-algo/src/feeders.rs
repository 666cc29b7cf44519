//! Feeder partitioning for studies scoped to part of the network.
//!
//! Each enabled branch leaving the source heads one feeder; the feeder covers that
//! branch's downstream vertices. EV-penetration and load-change studies use this to
//! spread additions per feeder and to restrict results to the affected subset.

use psim_core::{EdgeId, RadialGraph, TopologyResult, VertexId};
use serde::Serialize;
use std::collections::BTreeSet;

/// One feeder: the branch leaving the source and everything beyond it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feeder {
    pub head_edge: EdgeId,
    pub vertices: BTreeSet<VertexId>,
}

impl Feeder {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn contains(&self, vertex: VertexId) -> bool {
        self.vertices.contains(&vertex)
    }
}

/// Split every non-source vertex into feeders, ordered by head edge id.
pub fn partition_by_feeder(graph: &RadialGraph) -> TopologyResult<Vec<Feeder>> {
    let source = graph.source();
    let mut feeders = graph
        .edges()
        .filter(|edge| edge.enabled && (edge.endpoints.0 == source || edge.endpoints.1 == source))
        .map(|edge| {
            Ok(Feeder {
                head_edge: edge.id,
                vertices: graph.find_downstream_vertices(edge.id)?,
            })
        })
        .collect::<TopologyResult<Vec<_>>>()?;
    feeders.sort_by_key(|feeder| feeder.head_edge);

    tracing::debug!(feeders = feeders.len(), "partitioned network by feeder");
    Ok(feeders)
}

/// Head edge of the feeder supplying `vertex`; `None` for the source or unknown vertices.
pub fn feeder_of(feeders: &[Feeder], vertex: VertexId) -> Option<EdgeId> {
    feeders
        .iter()
        .find(|feeder| feeder.contains(vertex))
        .map(|feeder| feeder.head_edge)
}
