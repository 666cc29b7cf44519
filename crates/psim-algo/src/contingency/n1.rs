//! N-1 contingency sweep for radial networks.
//!
//! For every enabled branch the sweep asks two questions:
//!
//! 1. **Screening:** which open switches could restore a spanning tree if this branch
//!    trips, and which nodes lose supply until one of them closes?
//! 2. **Evaluation:** for each such switch, what does the load flow look like on the
//!    reconfigured network?
//!
//! Screening is pure topology. Evaluation builds a new, re-validated [`RadialGraph`]
//! per (outage, alternative) pair and hands it to a [`LoadFlowSolver`]. The base graph
//! is only read, so both phases fan out over rayon when `parallel` is set.

use crate::parallel::par_map;
use crate::solver::{LoadFlowSolver, LoadFlowSummary};
use anyhow::{Context, Result};
use psim_core::{EdgeId, RadialGraph, TopologyResult, VertexId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Configuration for N-1 sweeps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct N1Config {
    /// Evaluate contingencies in parallel (needs the `rayon` feature)
    pub parallel: bool,
    /// Stop at the first solver failure instead of recording it
    pub fail_fast: bool,
    /// Evaluate at most this many alternatives per outage (lowest edge ids first)
    pub max_alternatives: Option<usize>,
    /// Flag threshold as fraction of branch rating (e.g., 1.0 = 100%)
    pub loading_limit: f64,
}

impl Default for N1Config {
    fn default() -> Self {
        Self {
            parallel: true,
            fail_fast: false,
            max_alternatives: None,
            loading_limit: 1.0,
        }
    }
}

/// Topology-only result for one tripped branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct N1Outcome {
    pub outaged: EdgeId,
    /// Open switches that restore a spanning tree, ascending
    pub alternatives: Vec<EdgeId>,
    /// Vertices cut off from the source until an alternative closes
    pub downstream: BTreeSet<VertexId>,
    /// No alternative exists; the downstream vertices stay unsupplied
    pub islanded: bool,
}

/// Results from N-1 screening.
#[derive(Debug, Clone, Serialize)]
pub struct N1Results {
    /// One outcome per enabled branch, ascending by branch id
    pub outcomes: Vec<N1Outcome>,
    pub num_islanded: usize,
    pub total_screened: usize,
}

impl N1Results {
    /// Outages with no restoring alternative.
    pub fn islanded(&self) -> impl Iterator<Item = &N1Outcome> {
        self.outcomes.iter().filter(|o| o.islanded)
    }

    pub fn outcome(&self, outaged: EdgeId) -> Option<&N1Outcome> {
        self.outcomes.iter().find(|o| o.outaged == outaged)
    }

    pub fn summary(&self) -> String {
        format!(
            "N-1 screening: {}/{} outages restorable, {} islanding",
            self.total_screened - self.num_islanded,
            self.total_screened,
            self.num_islanded
        )
    }
}

/// Load-flow result for one (outage, alternative) reconfiguration.
#[derive(Debug, Clone, Serialize)]
pub struct ContingencyEvaluation {
    pub outaged: EdgeId,
    pub alternative: EdgeId,
    /// Solver output; `None` when the solver failed
    pub summary: Option<LoadFlowSummary>,
    /// Solver error message, if any
    pub error: Option<String>,
    /// Max loading exceeds the configured limit
    pub flagged: bool,
}

/// Results from N-1 evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct N1EvaluationResults {
    /// Ordered by outaged branch, then alternative
    pub evaluations: Vec<ContingencyEvaluation>,
    pub num_flagged: usize,
    pub num_failed: usize,
    pub loading_limit: f64,
}

impl N1EvaluationResults {
    pub fn flagged(&self) -> impl Iterator<Item = &ContingencyEvaluation> {
        self.evaluations.iter().filter(|e| e.flagged)
    }

    pub fn failed(&self) -> impl Iterator<Item = &ContingencyEvaluation> {
        self.evaluations.iter().filter(|e| e.error.is_some())
    }

    /// Solved alternative with the lowest max loading for `outaged`.
    ///
    /// Ties go to the lower edge id.
    pub fn best_alternative(&self, outaged: EdgeId) -> Option<&ContingencyEvaluation> {
        self.evaluations
            .iter()
            .filter(|e| e.outaged == outaged)
            .filter_map(|e| e.summary.as_ref().map(|s| (s.max_loading, e)))
            .min_by(|(a, ea), (b, eb)| a.total_cmp(b).then(ea.alternative.cmp(&eb.alternative)))
            .map(|(_, e)| e)
    }

    pub fn summary(&self) -> String {
        format!(
            "N-1 evaluation: {} reconfigurations, {} above {:.0}% loading, {} solver failures",
            self.evaluations.len(),
            self.num_flagged,
            self.loading_limit * 100.0,
            self.num_failed
        )
    }
}

/// N-1 sweep over one validated topology.
pub struct N1Screener<'a> {
    graph: &'a RadialGraph,
    config: N1Config,
}

impl<'a> N1Screener<'a> {
    pub fn new(graph: &'a RadialGraph, config: N1Config) -> Self {
        Self { graph, config }
    }

    pub fn config(&self) -> &N1Config {
        &self.config
    }

    /// Generate all N-1 contingencies: every enabled branch, ascending.
    pub fn generate_n1(&self) -> Vec<EdgeId> {
        self.graph.enabled_edges()
    }

    /// Screen a single tripped branch.
    pub fn screen_contingency(&self, outaged: EdgeId) -> TopologyResult<N1Outcome> {
        let alternatives = self.graph.find_alternative_edges(outaged)?;
        let downstream = self.graph.find_downstream_vertices(outaged)?;
        Ok(N1Outcome {
            outaged,
            islanded: alternatives.is_empty(),
            alternatives,
            downstream,
        })
    }

    /// Screen every enabled branch.
    pub fn screen_all(&self) -> TopologyResult<N1Results> {
        let outages = self.generate_n1();
        let outcomes = par_map(self.config.parallel, &outages, |edge| {
            self.screen_contingency(edge)
        })
        .into_iter()
        .collect::<TopologyResult<Vec<_>>>()?;

        let num_islanded = outcomes.iter().filter(|o| o.islanded).count();
        let results = N1Results {
            total_screened: outcomes.len(),
            num_islanded,
            outcomes,
        };
        tracing::info!("{}", results.summary());
        Ok(results)
    }

    /// (outage, alternative) pairs that evaluation will visit.
    pub fn reconfigurations(&self) -> TopologyResult<Vec<(EdgeId, EdgeId)>> {
        let mut pairs = Vec::new();
        for outaged in self.generate_n1() {
            let alternatives = self.graph.find_alternative_edges(outaged)?;
            let keep = self.config.max_alternatives.unwrap_or(alternatives.len());
            pairs.extend(alternatives.into_iter().take(keep).map(|alt| (outaged, alt)));
        }
        Ok(pairs)
    }

    /// Run the solver on every reconfiguration.
    ///
    /// A solver failure is recorded on its evaluation and the sweep moves on, unless
    /// `fail_fast` is set.
    pub fn evaluate(&self, solver: &dyn LoadFlowSolver) -> Result<N1EvaluationResults> {
        let pairs = self.reconfigurations()?;
        let evaluations = par_map(self.config.parallel, &pairs, |(outaged, alternative)| {
            self.evaluate_one(solver, outaged, alternative)
        })
        .into_iter()
        .collect::<Result<Vec<_>>>()?;

        let results = N1EvaluationResults {
            num_flagged: evaluations.iter().filter(|e| e.flagged).count(),
            num_failed: evaluations.iter().filter(|e| e.error.is_some()).count(),
            loading_limit: self.config.loading_limit,
            evaluations,
        };
        tracing::info!("{}", results.summary());
        Ok(results)
    }

    fn evaluate_one(
        &self,
        solver: &dyn LoadFlowSolver,
        outaged: EdgeId,
        alternative: EdgeId,
    ) -> Result<ContingencyEvaluation> {
        let reconfigured = self
            .graph
            .with_edge_swapped(outaged, alternative)
            .with_context(|| format!("swapping edge {outaged} for {alternative}"))?;

        match solver.solve(&reconfigured) {
            Ok(summary) => Ok(ContingencyEvaluation {
                outaged,
                alternative,
                flagged: summary.max_loading > self.config.loading_limit,
                summary: Some(summary),
                error: None,
            }),
            Err(err) if self.config.fail_fast => Err(err.context(format!(
                "load flow failed with edge {outaged} out and {alternative} in"
            ))),
            Err(err) => {
                tracing::warn!(
                    outaged = %outaged,
                    alternative = %alternative,
                    error = %err,
                    "load flow failed; recording and continuing"
                );
                Ok(ContingencyEvaluation {
                    outaged,
                    alternative,
                    summary: None,
                    error: Some(err.to_string()),
                    flagged: false,
                })
            }
        }
    }
}

/// Convenience function: screen every enabled branch of `graph`.
pub fn screen_n1_contingencies(graph: &RadialGraph, config: N1Config) -> TopologyResult<N1Results> {
    N1Screener::new(graph, config).screen_all()
}
