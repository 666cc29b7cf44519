//! Collected, non-fatal reporting for topology inputs.
//!
//! Construction stops at the first violated invariant. Tooling that wants to show
//! a user everything wrong with an input calls [`crate::TopologyInput::diagnose`],
//! which returns a [`Diagnostics`] report instead. Every finding is an
//! [`IssueKind`]; the kinds that would stop construction map back onto the
//! [`ErrorKind`] construction would have returned.
//!
//! ```
//! use psim_core::{EdgeId, IssueKind, Subject, TopologyInput, VertexId};
//!
//! let input = TopologyInput::new(
//!     vec![VertexId::new(0), VertexId::new(1)],
//!     vec![EdgeId::new(1)],
//!     vec![(VertexId::new(0), VertexId::new(9))],
//!     vec![true],
//!     VertexId::new(0),
//! );
//! let report = input.diagnose();
//! let issue = report.of_kind(IssueKind::UnknownEndpoint).next().unwrap();
//! assert_eq!(issue.subject, Some(Subject::Edge(EdgeId::new(1))));
//! assert_eq!(report.summary(), "1 error, 1 warning");
//! ```

use crate::error::ErrorKind;
use crate::{EdgeId, VertexId};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Suspicious but construction would still succeed
    Warning,
    /// Construction would fail on this
    Error,
}

/// What a diagnostic issue is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    DuplicateVertex,
    DuplicateEdge,
    PairsLength,
    EnabledLength,
    UnknownEndpoint,
    UnknownSource,
    RepeatedPair,
    Disconnected,
    Cycle,
    SelfLoop,
    IsolatedVertex,
}

impl IssueKind {
    pub fn severity(self) -> Severity {
        match self.error_kind() {
            Some(_) => Severity::Error,
            None => Severity::Warning,
        }
    }

    /// Construction error this issue corresponds to; `None` for warnings.
    pub fn error_kind(self) -> Option<ErrorKind> {
        match self {
            IssueKind::DuplicateVertex | IssueKind::DuplicateEdge => Some(ErrorKind::IdNotUnique),
            IssueKind::PairsLength | IssueKind::EnabledLength => Some(ErrorKind::LengthMismatch),
            IssueKind::UnknownEndpoint | IssueKind::UnknownSource => Some(ErrorKind::IdNotFound),
            IssueKind::RepeatedPair => Some(ErrorKind::EdgePairNotUnique),
            IssueKind::Disconnected => Some(ErrorKind::GraphNotFullyConnected),
            IssueKind::Cycle => Some(ErrorKind::GraphCycle),
            IssueKind::SelfLoop | IssueKind::IsolatedVertex => None,
        }
    }
}

/// The vertex or edge an issue points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum Subject {
    Vertex(VertexId),
    Edge(EdgeId),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Vertex(id) => write!(f, "vertex {id}"),
            Subject::Edge(id) => write!(f, "edge {id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticIssue {
    pub kind: IssueKind,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Subject>,
    pub message: String,
}

impl fmt::Display for DiagnosticIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "[{severity}] {}", self.message)?;
        if let Some(subject) = &self.subject {
            write!(f, " ({subject})")?;
        }
        Ok(())
    }
}

/// Every issue found in one input, in check order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    issues: Vec<DiagnosticIssue>,
}

impl Diagnostics {
    pub(crate) fn push(
        &mut self,
        kind: IssueKind,
        subject: Option<Subject>,
        message: impl Into<String>,
    ) {
        self.issues.push(DiagnosticIssue {
            kind,
            severity: kind.severity(),
            subject,
            message: message.into(),
        });
    }

    pub fn issues(&self) -> &[DiagnosticIssue] {
        &self.issues
    }

    pub fn of_kind(&self, kind: IssueKind) -> impl Iterator<Item = &DiagnosticIssue> {
        self.issues.iter().filter(move |issue| issue.kind == kind)
    }

    pub fn errors(&self) -> impl Iterator<Item = &DiagnosticIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &DiagnosticIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Construction would succeed and nothing looked suspicious.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn summary(&self) -> String {
        fn plural(count: usize, noun: &str) -> String {
            format!("{count} {noun}{}", if count == 1 { "" } else { "s" })
        }

        match (self.errors().count(), self.warnings().count()) {
            (0, 0) => "No issues".to_string(),
            (e, 0) => plural(e, "error"),
            (0, w) => plural(w, "warning"),
            (e, w) => format!("{}, {}", plural(e, "error"), plural(w, "warning")),
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Diagnostics: {}", self.summary())?;
        for issue in &self.issues {
            writeln!(f, "  {issue}")?;
        }
        Ok(())
    }
}
