//! Raw construction input for a radial topology.

use crate::diagnostics::Diagnostics;
use crate::error::TopologyResult;
use crate::graph::RadialGraph;
use crate::validation;
use crate::{EdgeId, VertexId};
use serde::{Deserialize, Serialize};

/// Caller-supplied description of a switchable network.
///
/// `edges`, `edge_pairs` and `edge_enabled` are index-aligned: position `i` of each
/// describes the same branch. Nothing is checked until [`TopologyInput::build`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyInput {
    pub vertices: Vec<VertexId>,
    pub edges: Vec<EdgeId>,
    pub edge_pairs: Vec<(VertexId, VertexId)>,
    pub edge_enabled: Vec<bool>,
    pub source: VertexId,
}

impl TopologyInput {
    pub fn new(
        vertices: Vec<VertexId>,
        edges: Vec<EdgeId>,
        edge_pairs: Vec<(VertexId, VertexId)>,
        edge_enabled: Vec<bool>,
        source: VertexId,
    ) -> Self {
        Self {
            vertices,
            edges,
            edge_pairs,
            edge_enabled,
            source,
        }
    }

    /// Validate the input and produce a usable graph.
    ///
    /// Fails on the first violated invariant; see [`validation::validate`] for the order.
    pub fn build(self) -> TopologyResult<RadialGraph> {
        RadialGraph::from_input(self)
    }

    /// Run every check without stopping at the first failure.
    pub fn diagnose(&self) -> Diagnostics {
        validation::diagnose(self)
    }

    /// Number of edges flagged enabled (ignores any length mismatch).
    pub fn enabled_count(&self) -> usize {
        self.edge_enabled.iter().filter(|&&on| on).count()
    }

    /// Enabled edges as `(id, u, v)` triples, skipping positions beyond the shortest column.
    pub(crate) fn enabled_edges(&self) -> impl Iterator<Item = (EdgeId, VertexId, VertexId)> + '_ {
        self.edges
            .iter()
            .zip(self.edge_pairs.iter())
            .zip(self.edge_enabled.iter())
            .filter(|(_, on)| **on)
            .map(|((&id, &(u, v)), _)| (id, u, v))
    }
}

impl TryFrom<TopologyInput> for RadialGraph {
    type Error = crate::error::TopologyError;

    fn try_from(input: TopologyInput) -> TopologyResult<Self> {
        input.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> TopologyInput {
        TopologyInput::new(
            (0..4).map(VertexId::new).collect(),
            (1..4).map(EdgeId::new).collect(),
            vec![
                (VertexId::new(0), VertexId::new(1)),
                (VertexId::new(1), VertexId::new(2)),
                (VertexId::new(2), VertexId::new(3)),
            ],
            vec![true, false, true],
            VertexId::new(0),
        )
    }

    #[test]
    fn test_enabled_edges_skip_disabled() {
        let input = chain();
        let enabled: Vec<_> = input.enabled_edges().map(|(id, _, _)| id).collect();
        assert_eq!(enabled, vec![EdgeId::new(1), EdgeId::new(3)]);
        assert_eq!(input.enabled_count(), 2);
    }

    #[test]
    fn test_input_roundtrips_through_json() {
        let input = chain();
        let json = serde_json::to_string(&input).unwrap();
        assert!(json.contains("\"source\":0"));
        let back: TopologyInput = serde_json::from_str(&json).unwrap();
        assert_eq!(back, input);
    }
}
