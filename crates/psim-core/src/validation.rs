//! Construction-time checks for radial topologies.
//!
//! [`validate`] stops at the first violation and runs the checks in a fixed order:
//!
//! 1. vertex ids unique, then edge ids unique
//! 2. one endpoint pair per edge id
//! 3. every endpoint is a declared vertex
//! 4. one enabled flag per edge id
//! 5. the source is a declared vertex
//! 6. no two edges share an unordered endpoint pair
//! 7. every vertex is reachable from the source over enabled edges
//! 8. the enabled edges contain no cycle
//!
//! Structural checks (1-6) never touch the traversal. [`diagnose`] runs the same
//! checks without stopping and adds a few non-fatal warnings.

use crate::diagnostics::{Diagnostics, IssueKind, Subject};
use crate::error::{IdSpace, InputColumn, TopologyError, TopologyResult};
use crate::graph_utils::find_islands;
use crate::topology::TopologyInput;
use crate::traversal::{depth_first, Traversal};
use crate::{EdgeId, VertexId};
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Lookup tables and the enabled-edge graph produced by a successful validation.
#[derive(Debug)]
pub(crate) struct Validated {
    pub vertex_index: HashMap<VertexId, NodeIndex>,
    pub edge_position: HashMap<EdgeId, usize>,
    pub enabled: UnGraph<VertexId, EdgeId>,
    pub traversal: Traversal,
}

pub(crate) fn validate(input: &TopologyInput) -> TopologyResult<Validated> {
    if let Some(&id) = duplicates(&input.vertices).first() {
        return Err(TopologyError::IdNotUnique {
            space: IdSpace::Vertex,
            id: id.value(),
        });
    }
    if let Some(&id) = duplicates(&input.edges).first() {
        return Err(TopologyError::IdNotUnique {
            space: IdSpace::Edge,
            id: id.value(),
        });
    }
    if input.edge_pairs.len() != input.edges.len() {
        return Err(TopologyError::LengthMismatch {
            column: InputColumn::EdgePairs,
            expected: input.edges.len(),
            actual: input.edge_pairs.len(),
        });
    }

    let vertex_index: HashMap<VertexId, NodeIndex> = input
        .vertices
        .iter()
        .enumerate()
        .map(|(i, &id)| (id, NodeIndex::new(i)))
        .collect();

    if let Some(&(_, missing)) = unknown_endpoints(input, &vertex_index).first() {
        return Err(TopologyError::vertex_not_found(missing));
    }
    if input.edge_enabled.len() != input.edges.len() {
        return Err(TopologyError::LengthMismatch {
            column: InputColumn::EdgeEnabled,
            expected: input.edges.len(),
            actual: input.edge_enabled.len(),
        });
    }
    let Some(&source) = vertex_index.get(&input.source) else {
        return Err(TopologyError::vertex_not_found(input.source));
    };
    if let Some(&(first, second)) = repeated_pairs(input).first() {
        return Err(TopologyError::EdgePairNotUnique { first, second });
    }

    let enabled = enabled_graph(input, &vertex_index);
    let traversal = depth_first(&enabled, source);
    if traversal.tree.reached() != input.vertices.len() {
        return Err(TopologyError::GraphNotFullyConnected {
            reached: traversal.tree.reached(),
            total: input.vertices.len(),
        });
    }
    if let Some(edge) = traversal.cycle {
        return Err(TopologyError::GraphCycle { edge });
    }
    debug_assert_eq!(enabled.edge_count() + 1, input.vertices.len());

    let edge_position = input
        .edges
        .iter()
        .enumerate()
        .map(|(i, &id)| (id, i))
        .collect();

    Ok(Validated {
        vertex_index,
        edge_position,
        enabled,
        traversal,
    })
}

/// Run every check and collect what it finds.
pub fn diagnose(input: &TopologyInput) -> Diagnostics {
    let mut report = Diagnostics::default();

    for id in duplicates(&input.vertices) {
        report.push(
            IssueKind::DuplicateVertex,
            Some(Subject::Vertex(id)),
            "Vertex id is not unique",
        );
    }
    for id in duplicates(&input.edges) {
        report.push(
            IssueKind::DuplicateEdge,
            Some(Subject::Edge(id)),
            "Edge id is not unique",
        );
    }
    if input.edge_pairs.len() != input.edges.len() {
        report.push(
            IssueKind::PairsLength,
            None,
            format!(
                "{} edge vertex pairs for {} edge ids",
                input.edge_pairs.len(),
                input.edges.len()
            ),
        );
    }
    if input.edge_enabled.len() != input.edges.len() {
        report.push(
            IssueKind::EnabledLength,
            None,
            format!(
                "{} edge enabled flags for {} edge ids",
                input.edge_enabled.len(),
                input.edges.len()
            ),
        );
    }

    let vertex_index: HashMap<VertexId, NodeIndex> = input
        .vertices
        .iter()
        .enumerate()
        .map(|(i, &id)| (id, NodeIndex::new(i)))
        .collect();

    for (edge, missing) in unknown_endpoints(input, &vertex_index) {
        report.push(
            IssueKind::UnknownEndpoint,
            Some(Subject::Edge(edge)),
            format!("Endpoint vertex {missing} is not declared"),
        );
    }
    if !vertex_index.contains_key(&input.source) {
        report.push(
            IssueKind::UnknownSource,
            Some(Subject::Vertex(input.source)),
            "Source vertex is not declared",
        );
    }
    for (first, second) in repeated_pairs(input) {
        report.push(
            IssueKind::RepeatedPair,
            Some(Subject::Edge(second)),
            format!("Connects the same vertex pair as edge {first}"),
        );
    }

    for (&edge, &(u, v)) in input.edges.iter().zip(input.edge_pairs.iter()) {
        if u == v {
            report.push(
                IssueKind::SelfLoop,
                Some(Subject::Edge(edge)),
                format!("Self-loop on vertex {u}"),
            );
        }
    }
    if input.vertices.len() > 1 {
        let touched: HashSet<VertexId> = input
            .edge_pairs
            .iter()
            .flat_map(|&(u, v)| [u, v])
            .collect();
        for &vertex in input.vertices.iter().filter(|v| !touched.contains(v)) {
            report.push(
                IssueKind::IsolatedVertex,
                Some(Subject::Vertex(vertex)),
                "Vertex has no incident edges",
            );
        }
    }

    // Traversal checks only make sense on a structurally sound input.
    if report.has_errors() {
        return report;
    }
    match validate(input) {
        Err(TopologyError::GraphNotFullyConnected { reached, total }) => {
            let islands = find_islands(input);
            report.push(
                IssueKind::Disconnected,
                Some(Subject::Vertex(input.source)),
                format!(
                    "{reached} of {total} vertices reachable from source ({} islands)",
                    islands.islands.len()
                ),
            );
        }
        Err(TopologyError::GraphCycle { edge }) => {
            report.push(
                IssueKind::Cycle,
                Some(Subject::Edge(edge)),
                "Enabled edges form a cycle",
            );
        }
        // structural failures were all reported above
        Err(_) | Ok(_) => {}
    }
    report
}

/// Ids that occur more than once, each reported once, in order of first repeat.
fn duplicates<T: Copy + Eq + Hash>(ids: &[T]) -> Vec<T> {
    let mut seen = HashSet::with_capacity(ids.len());
    let mut reported = HashSet::new();
    let mut repeated = Vec::new();
    for &id in ids {
        if !seen.insert(id) && reported.insert(id) {
            repeated.push(id);
        }
    }
    repeated
}

/// `(edge, vertex)` for every endpoint that is not a declared vertex.
fn unknown_endpoints(
    input: &TopologyInput,
    vertex_index: &HashMap<VertexId, NodeIndex>,
) -> Vec<(EdgeId, VertexId)> {
    input
        .edges
        .iter()
        .zip(input.edge_pairs.iter())
        .flat_map(|(&edge, &(u, v))| [(edge, u), (edge, v)])
        .filter(|(_, vertex)| !vertex_index.contains_key(vertex))
        .collect()
}

/// `(first, later)` edge pairs connecting the same unordered vertex pair.
fn repeated_pairs(input: &TopologyInput) -> Vec<(EdgeId, EdgeId)> {
    let mut owner: HashMap<(VertexId, VertexId), EdgeId> = HashMap::new();
    let mut repeated = Vec::new();
    for (&edge, &(u, v)) in input.edges.iter().zip(input.edge_pairs.iter()) {
        let key = if u <= v { (u, v) } else { (v, u) };
        match owner.get(&key) {
            Some(&first) => repeated.push((first, edge)),
            None => {
                owner.insert(key, edge);
            }
        }
    }
    repeated
}

/// All declared vertices as nodes (node index = input position), enabled edges only.
pub(crate) fn enabled_graph(
    input: &TopologyInput,
    vertex_index: &HashMap<VertexId, NodeIndex>,
) -> UnGraph<VertexId, EdgeId> {
    let mut graph = UnGraph::with_capacity(input.vertices.len(), input.enabled_count());
    for &vertex in &input.vertices {
        graph.add_node(vertex);
    }
    for (edge, u, v) in input.enabled_edges() {
        if let (Some(&a), Some(&b)) = (vertex_index.get(&u), vertex_index.get(&v)) {
            graph.add_edge(a, b, edge);
        }
    }
    graph
}
