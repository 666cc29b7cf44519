//! The validated radial graph and its read-only queries.

use crate::error::{TopologyError, TopologyResult};
use crate::topology::TopologyInput;
use crate::traversal::RootedTree;
use crate::validation::validate;
use crate::{EdgeId, VertexId};
use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// A switchable network whose enabled edges form a spanning tree rooted at the source.
///
/// Instances only exist after every invariant has been checked; a failed construction
/// returns the [`TopologyError`] and nothing else. The graph is never mutated
/// afterwards, so it can be shared across threads for concurrent queries. Modeling a
/// switching action means building a new graph, see [`RadialGraph::with_edge_swapped`].
#[derive(Debug, Clone)]
pub struct RadialGraph {
    input: TopologyInput,
    vertex_index: HashMap<VertexId, NodeIndex>,
    edge_position: HashMap<EdgeId, usize>,
    enabled: UnGraph<VertexId, EdgeId>,
    tree: RootedTree,
}

/// One branch as declared in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EdgeView {
    pub id: EdgeId,
    pub endpoints: (VertexId, VertexId),
    pub enabled: bool,
}

/// The two sides of the tree left when one enabled edge is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partition {
    /// The opened edge.
    pub edge: EdgeId,
    /// Subtree beyond the edge, away from the source.
    pub downstream: BTreeSet<VertexId>,
    /// Everything else, source included.
    pub upstream: BTreeSet<VertexId>,
}

impl Partition {
    /// Whether an edge between `u` and `v` would reconnect the two sides.
    pub fn is_bridged_by(&self, u: VertexId, v: VertexId) -> bool {
        self.downstream.contains(&u) != self.downstream.contains(&v)
    }
}

impl RadialGraph {
    /// Build and validate a graph from index-aligned edge columns.
    pub fn new(
        vertices: Vec<VertexId>,
        edges: Vec<EdgeId>,
        edge_pairs: Vec<(VertexId, VertexId)>,
        edge_enabled: Vec<bool>,
        source: VertexId,
    ) -> TopologyResult<Self> {
        Self::from_input(TopologyInput::new(
            vertices,
            edges,
            edge_pairs,
            edge_enabled,
            source,
        ))
    }

    pub(crate) fn from_input(input: TopologyInput) -> TopologyResult<Self> {
        let validated = validate(&input)?;
        tracing::debug!(
            vertices = input.vertices.len(),
            edges = input.edges.len(),
            enabled = validated.enabled.edge_count(),
            source = %input.source,
            "validated radial topology"
        );
        Ok(Self {
            input,
            vertex_index: validated.vertex_index,
            edge_position: validated.edge_position,
            enabled: validated.enabled,
            tree: validated.traversal.tree,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn source(&self) -> VertexId {
        self.input.source
    }

    pub fn input(&self) -> &TopologyInput {
        &self.input
    }

    pub fn vertex_count(&self) -> usize {
        self.input.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.input.edges.len()
    }

    pub fn enabled_edge_count(&self) -> usize {
        self.enabled.edge_count()
    }

    pub fn vertices(&self) -> &[VertexId] {
        &self.input.vertices
    }

    pub fn contains_vertex(&self, vertex: VertexId) -> bool {
        self.vertex_index.contains_key(&vertex)
    }

    /// All edges in input order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView> + '_ {
        (0..self.input.edges.len()).map(move |pos| self.edge_at(pos))
    }

    pub fn edge(&self, edge: EdgeId) -> TopologyResult<EdgeView> {
        Ok(self.edge_at(self.position(edge)?))
    }

    pub fn is_enabled(&self, edge: EdgeId) -> TopologyResult<bool> {
        Ok(self.input.edge_enabled[self.position(edge)?])
    }

    /// Enabled edge ids, ascending.
    pub fn enabled_edges(&self) -> Vec<EdgeId> {
        let mut ids: Vec<EdgeId> = self.enabled.edge_weights().copied().collect();
        ids.sort();
        ids
    }

    /// Disabled edge ids, ascending.
    pub fn disabled_edges(&self) -> Vec<EdgeId> {
        let mut ids: Vec<EdgeId> = self
            .edges()
            .filter(|edge| !edge.enabled)
            .map(|edge| edge.id)
            .collect();
        ids.sort();
        ids
    }

    /// Rooted-tree parent of `vertex`; `None` for the source.
    pub fn parent(&self, vertex: VertexId) -> TopologyResult<Option<VertexId>> {
        let node = self.node(vertex)?;
        Ok(self.tree.parent(node).map(|p| self.enabled[p]))
    }

    /// Rooted-tree children of `vertex`, in traversal order.
    pub fn children(&self, vertex: VertexId) -> TopologyResult<Vec<VertexId>> {
        let node = self.node(vertex)?;
        Ok(self
            .tree
            .children(node)
            .iter()
            .map(|&c| self.enabled[c])
            .collect())
    }

    /// Number of enabled edges between `vertex` and the source.
    pub fn depth(&self, vertex: VertexId) -> TopologyResult<usize> {
        Ok(self.tree.depth(self.node(vertex)?))
    }

    /// Vertices from `vertex` up to the source, both included.
    pub fn path_to_source(&self, vertex: VertexId) -> TopologyResult<Vec<VertexId>> {
        let mut node = self.node(vertex)?;
        let mut path = vec![self.enabled[node]];
        while let Some(parent) = self.tree.parent(node) {
            path.push(self.enabled[parent]);
            node = parent;
        }
        Ok(path)
    }

    /// Vertices in the order the rooted traversal entered them.
    pub fn traversal_order(&self) -> Vec<VertexId> {
        self.tree.order().iter().map(|&n| self.enabled[n]).collect()
    }

    pub fn rooted_tree(&self) -> &RootedTree {
        &self.tree
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Vertices beyond `edge` as seen from the source, the edge's far endpoint included.
    ///
    /// A disabled edge has no downstream side and yields an empty set.
    pub fn find_downstream_vertices(&self, edge: EdgeId) -> TopologyResult<BTreeSet<VertexId>> {
        let pos = self.position(edge)?;
        if !self.input.edge_enabled[pos] {
            return Ok(BTreeSet::new());
        }
        let child = self.child_side(pos)?;
        Ok(self
            .tree
            .subtree(child)
            .into_iter()
            .map(|n| self.enabled[n])
            .collect())
    }

    /// Split the tree at an enabled edge.
    pub fn partition(&self, edge: EdgeId) -> TopologyResult<Partition> {
        let pos = self.enabled_position(edge)?;
        let mask = self.tree.subtree_mask(self.child_side(pos)?);
        let (downstream, upstream) = self
            .enabled
            .node_indices()
            .map(|n| (mask[n.index()], self.enabled[n]))
            .fold(
                (BTreeSet::new(), BTreeSet::new()),
                |(mut down, mut up), (beyond, vertex)| {
                    if beyond {
                        down.insert(vertex);
                    } else {
                        up.insert(vertex);
                    }
                    (down, up)
                },
            );
        Ok(Partition {
            edge,
            downstream,
            upstream,
        })
    }

    /// Disabled edges that would restore a spanning tree if `edge` were opened.
    ///
    /// Opening an enabled edge splits the tree into the subtree beyond it and the rest.
    /// Both halves are trees, so any disabled edge with one endpoint on each side joins
    /// them into a new spanning tree. Returned ascending; empty if nothing bridges.
    pub fn find_alternative_edges(&self, edge: EdgeId) -> TopologyResult<Vec<EdgeId>> {
        let pos = self.enabled_position(edge)?;
        let beyond = self.tree.subtree_mask(self.child_side(pos)?);
        let side = |vertex: &VertexId| {
            self.vertex_index
                .get(vertex)
                .map(|n| beyond[n.index()])
                .unwrap_or(false)
        };

        let mut alternatives: Vec<EdgeId> = self
            .edges()
            .filter(|candidate| !candidate.enabled)
            .filter(|candidate| side(&candidate.endpoints.0) != side(&candidate.endpoints.1))
            .map(|candidate| candidate.id)
            .collect();
        alternatives.sort();

        tracing::debug!(
            edge = %edge,
            alternatives = alternatives.len(),
            "alternative edge search"
        );
        Ok(alternatives)
    }

    /// A new validated graph with `disable` opened and `enable` closed.
    ///
    /// `self` is left as is. The result goes through full validation, so an `enable`
    /// that does not bridge the split fails as disconnected or cyclic. `disable` is
    /// always off in the result, even when it equals `enable`.
    pub fn with_edge_swapped(&self, disable: EdgeId, enable: EdgeId) -> TopologyResult<Self> {
        let off = self.enabled_position(disable)?;
        let on = self.position(enable)?;
        let mut input = self.input.clone();
        input.edge_enabled[on] = true;
        input.edge_enabled[off] = false;
        input.build()
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    fn node(&self, vertex: VertexId) -> TopologyResult<NodeIndex> {
        self.vertex_index
            .get(&vertex)
            .copied()
            .ok_or_else(|| TopologyError::vertex_not_found(vertex))
    }

    fn position(&self, edge: EdgeId) -> TopologyResult<usize> {
        self.edge_position
            .get(&edge)
            .copied()
            .ok_or_else(|| TopologyError::edge_not_found(edge))
    }

    fn enabled_position(&self, edge: EdgeId) -> TopologyResult<usize> {
        let pos = self.position(edge)?;
        if !self.input.edge_enabled[pos] {
            return Err(TopologyError::EdgeAlreadyDisabled(edge));
        }
        Ok(pos)
    }

    fn edge_at(&self, pos: usize) -> EdgeView {
        EdgeView {
            id: self.input.edges[pos],
            endpoints: self.input.edge_pairs[pos],
            enabled: self.input.edge_enabled[pos],
        }
    }

    /// Endpoint of an enabled edge that lies farther from the source.
    fn child_side(&self, pos: usize) -> TopologyResult<NodeIndex> {
        let (u, v) = self.input.edge_pairs[pos];
        let (a, b) = (self.node(u)?, self.node(v)?);
        if self.tree.parent(b) == Some(a) {
            Ok(b)
        } else {
            debug_assert_eq!(self.tree.parent(a), Some(b));
            Ok(a)
        }
    }
}
