//! # psim-core: Radial Distribution Topology Engine
//!
//! Validates switchable radial networks and answers the topology questions that
//! contingency and hosting studies depend on.
//!
//! ## Design Philosophy
//!
//! A distribution feeder is modeled as an **undirected graph** where:
//! - **Vertices**: Nodes of the network (opaque integer ids)
//! - **Edges**: Switchable branches (lines and transformers), each enabled or disabled
//!
//! The sub-graph formed by the enabled branches must be a spanning tree rooted at a
//! single source. That invariant is enforced once, at construction, and every query
//! afterwards is a pure read over the validated structure:
//! - Downstream queries ("which nodes lose supply if this branch opens?")
//! - Alternative-edge discovery for N-1 planning ("which open switch can restore supply?")
//!
//! ## Quick Start
//!
//! ```rust
//! use psim_core::*;
//!
//! //  0 (source) --1-- 2 --9-- 10
//! //  |                |
//! //  |               7 (open)
//! //  |                |
//! //  +---------3----- 4
//! let graph = RadialGraph::new(
//!     vec![VertexId::new(0), VertexId::new(2), VertexId::new(4), VertexId::new(10)],
//!     vec![EdgeId::new(1), EdgeId::new(3), EdgeId::new(7), EdgeId::new(9)],
//!     vec![
//!         (VertexId::new(0), VertexId::new(2)),
//!         (VertexId::new(0), VertexId::new(4)),
//!         (VertexId::new(2), VertexId::new(4)),
//!         (VertexId::new(2), VertexId::new(10)),
//!     ],
//!     vec![true, true, false, true],
//!     VertexId::new(0),
//! )?;
//!
//! let downstream = graph.find_downstream_vertices(EdgeId::new(1))?;
//! assert_eq!(downstream.len(), 2);
//! assert_eq!(graph.find_alternative_edges(EdgeId::new(1))?, vec![EdgeId::new(7)]);
//! # Ok::<(), TopologyError>(())
//! ```
//!
//! ## Modules
//!
//! - [`topology`] - Construction input record
//! - [`validation`] - First-violation validator and the non-fatal diagnose pass
//! - [`traversal`] - Rooted depth-first traversal over enabled edges
//! - [`graph`] - The validated [`RadialGraph`] and its queries
//! - [`diagnostics`] - Typed issue report for every problem in an input
//! - [`graph_utils`] - Statistics, island listing and Graphviz export

use serde::{Deserialize, Serialize};

pub mod diagnostics;
pub mod error;
pub mod graph;
pub mod graph_utils;
pub mod topology;
pub mod traversal;
pub mod validation;

pub use diagnostics::{DiagnosticIssue, Diagnostics, IssueKind, Severity, Subject};
pub use error::{ErrorKind, IdSpace, InputColumn, TopologyError, TopologyResult};
pub use graph::{EdgeView, Partition, RadialGraph};
pub use graph_utils::*;
pub use topology::TopologyInput;
pub use traversal::RootedTree;

// Newtype wrappers for IDs for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(usize);

impl VertexId {
    #[inline]
    pub fn new(value: usize) -> Self {
        VertexId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl EdgeId {
    #[inline]
    pub fn new(value: usize) -> Self {
        EdgeId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
