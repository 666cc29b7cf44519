//! Error taxonomy for topology construction and queries.
//!
//! Every failure the engine can report maps onto one [`ErrorKind`]. The
//! [`TopologyError`] variants carry the offending identifiers so that callers
//! can surface a useful message and abort only the affected analysis.
//!
//! # Example
//!
//! ```
//! use psim_core::{ErrorKind, RadialGraph, VertexId};
//!
//! let err = RadialGraph::new(
//!     vec![VertexId::new(0), VertexId::new(0)],
//!     vec![],
//!     vec![],
//!     vec![],
//!     VertexId::new(0),
//! )
//! .unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::IdNotUnique);
//! ```

use crate::{EdgeId, VertexId};
use thiserror::Error;

/// Which identifier namespace an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdSpace {
    Vertex,
    Edge,
}

impl std::fmt::Display for IdSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdSpace::Vertex => f.write_str("vertex"),
            IdSpace::Edge => f.write_str("edge"),
        }
    }
}

/// Parallel input collection whose length disagrees with the edge ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputColumn {
    EdgePairs,
    EdgeEnabled,
}

impl std::fmt::Display for InputColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputColumn::EdgePairs => f.write_str("edge vertex pairs"),
            InputColumn::EdgeEnabled => f.write_str("edge enabled flags"),
        }
    }
}

/// Payload-free classification of a [`TopologyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    IdNotUnique,
    LengthMismatch,
    IdNotFound,
    EdgePairNotUnique,
    GraphNotFullyConnected,
    GraphCycle,
    EdgeAlreadyDisabled,
}

/// Errors raised while building or querying a [`crate::RadialGraph`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// A vertex or edge id appears more than once.
    #[error("{space} id {id} is not unique")]
    IdNotUnique { space: IdSpace, id: usize },

    /// A parallel input collection has the wrong length.
    #[error("{column} has {actual} entries but there are {expected} edge ids")]
    LengthMismatch {
        column: InputColumn,
        expected: usize,
        actual: usize,
    },

    /// A referenced vertex or edge id does not exist.
    #[error("{space} id {id} not found")]
    IdNotFound { space: IdSpace, id: usize },

    /// Two edges connect the same unordered vertex pair.
    #[error("edges {first} and {second} connect the same vertex pair")]
    EdgePairNotUnique { first: EdgeId, second: EdgeId },

    /// The enabled sub-graph does not reach every vertex from the source.
    #[error("graph not fully connected: {reached} of {total} vertices reachable from source")]
    GraphNotFullyConnected { reached: usize, total: usize },

    /// The enabled sub-graph contains a cycle, closed by `edge`.
    #[error("graph contains a cycle closed by edge {edge}")]
    GraphCycle { edge: EdgeId },

    /// The query needs an enabled edge.
    #[error("edge {0} is already disabled")]
    EdgeAlreadyDisabled(EdgeId),
}

impl TopologyError {
    /// Taxonomy bucket of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TopologyError::IdNotUnique { .. } => ErrorKind::IdNotUnique,
            TopologyError::LengthMismatch { .. } => ErrorKind::LengthMismatch,
            TopologyError::IdNotFound { .. } => ErrorKind::IdNotFound,
            TopologyError::EdgePairNotUnique { .. } => ErrorKind::EdgePairNotUnique,
            TopologyError::GraphNotFullyConnected { .. } => ErrorKind::GraphNotFullyConnected,
            TopologyError::GraphCycle { .. } => ErrorKind::GraphCycle,
            TopologyError::EdgeAlreadyDisabled(_) => ErrorKind::EdgeAlreadyDisabled,
        }
    }

    pub(crate) fn vertex_not_found(id: VertexId) -> Self {
        TopologyError::IdNotFound {
            space: IdSpace::Vertex,
            id: id.value(),
        }
    }

    pub(crate) fn edge_not_found(id: EdgeId) -> Self {
        TopologyError::IdNotFound {
            space: IdSpace::Edge,
            id: id.value(),
        }
    }
}

/// Convenience type alias for Results using TopologyError.
pub type TopologyResult<T> = Result<T, TopologyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TopologyError::GraphNotFullyConnected {
            reached: 3,
            total: 5,
        };
        assert!(err.to_string().contains("not fully connected"));
        assert!(err.to_string().contains("3 of 5"));

        let err = TopologyError::LengthMismatch {
            column: InputColumn::EdgeEnabled,
            expected: 4,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "edge enabled flags has 3 entries but there are 4 edge ids"
        );
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            TopologyError::vertex_not_found(VertexId::new(7)).kind(),
            ErrorKind::IdNotFound
        );
        assert_eq!(
            TopologyError::EdgeAlreadyDisabled(EdgeId::new(2)).kind(),
            ErrorKind::EdgeAlreadyDisabled
        );
        assert_eq!(
            TopologyError::GraphCycle {
                edge: EdgeId::new(1)
            }
            .kind(),
            ErrorKind::GraphCycle
        );
    }

    #[test]
    fn test_question_mark_into_anyhow() {
        fn inner() -> TopologyResult<()> {
            Err(TopologyError::edge_not_found(EdgeId::new(9)))
        }

        fn outer() -> anyhow::Result<()> {
            inner()?;
            Ok(())
        }

        let err = outer().unwrap_err();
        assert!(err.to_string().contains("edge id 9 not found"));
    }
}
