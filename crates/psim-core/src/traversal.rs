//! Rooted depth-first traversal over the enabled sub-graph.
//!
//! The traversal walks an explicit stack instead of recursing, so feeder depth is
//! bounded only by memory. Each vertex is entered at most once; the edge used to
//! enter it becomes its parent edge. Any other edge that leads back to a visited
//! vertex closes a cycle. The first such edge is recorded and the walk continues, so
//! callers can still judge connectivity before reporting the cycle.

use crate::{EdgeId, VertexId};
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

/// Parent/child view of a spanning tree rooted at the source.
///
/// Indexed by the dense node index of the enabled-edge graph.
#[derive(Debug, Clone)]
pub struct RootedTree {
    root: NodeIndex,
    parent: Vec<Option<NodeIndex>>,
    parent_edge: Vec<Option<EdgeIndex>>,
    depth: Vec<usize>,
    children: Vec<Vec<NodeIndex>>,
    order: Vec<NodeIndex>,
}

/// Outcome of one traversal: the tree over everything reached, plus the first
/// cycle-closing edge if one was met.
#[derive(Debug, Clone)]
pub(crate) struct Traversal {
    pub tree: RootedTree,
    pub cycle: Option<EdgeId>,
}

pub(crate) fn depth_first(graph: &UnGraph<VertexId, EdgeId>, root: NodeIndex) -> Traversal {
    let n = graph.node_count();
    let mut parent = vec![None; n];
    let mut parent_edge = vec![None; n];
    let mut depth = vec![0usize; n];
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut cycle = None;

    visited[root.index()] = true;
    order.push(root);
    let mut stack = vec![(root, graph.edges(root))];

    while let Some(frame) = stack.last_mut() {
        let node = frame.0;
        let Some(edge) = frame.1.next() else {
            stack.pop();
            continue;
        };
        if parent_edge[node.index()] == Some(edge.id()) {
            continue;
        }
        let next = if edge.source() == node {
            edge.target()
        } else {
            edge.source()
        };
        if visited[next.index()] {
            cycle.get_or_insert(*edge.weight());
            continue;
        }
        visited[next.index()] = true;
        parent[next.index()] = Some(node);
        parent_edge[next.index()] = Some(edge.id());
        depth[next.index()] = depth[node.index()] + 1;
        order.push(next);
        stack.push((next, graph.edges(next)));
    }

    let mut children = vec![Vec::new(); n];
    for &node in order.iter().skip(1) {
        if let Some(p) = parent[node.index()] {
            children[p.index()].push(node);
        }
    }

    tracing::debug!(
        reached = order.len(),
        total = n,
        cycle = ?cycle,
        "depth-first traversal finished"
    );

    Traversal {
        tree: RootedTree {
            root,
            parent,
            parent_edge,
            depth,
            children,
            order,
        },
        cycle,
    }
}

impl RootedTree {
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Number of vertices reached from the root.
    pub fn reached(&self) -> usize {
        self.order.len()
    }

    /// Vertices in the order they were first entered (root first).
    pub fn order(&self) -> &[NodeIndex] {
        &self.order
    }

    pub fn parent(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.parent.get(node.index()).copied().flatten()
    }

    pub fn parent_edge(&self, node: NodeIndex) -> Option<EdgeIndex> {
        self.parent_edge.get(node.index()).copied().flatten()
    }

    pub fn depth(&self, node: NodeIndex) -> usize {
        self.depth.get(node.index()).copied().unwrap_or(0)
    }

    pub fn children(&self, node: NodeIndex) -> &[NodeIndex] {
        self.children
            .get(node.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_leaf(&self, node: NodeIndex) -> bool {
        self.children(node).is_empty()
    }

    /// Every vertex of the subtree hanging from `top`, `top` included.
    pub fn subtree(&self, top: NodeIndex) -> Vec<NodeIndex> {
        let mut members = Vec::new();
        let mut stack = vec![top];
        while let Some(node) = stack.pop() {
            members.push(node);
            stack.extend(self.children(node).iter().copied());
        }
        members
    }

    /// Membership mask of [`RootedTree::subtree`], indexed by node index.
    pub fn subtree_mask(&self, top: NodeIndex) -> Vec<bool> {
        let mut mask = vec![false; self.parent.len()];
        for node in self.subtree(top) {
            mask[node.index()] = true;
        }
        mask
    }
}
