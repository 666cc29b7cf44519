use anyhow::Result;
use psim_core::{EdgeId, RadialGraph, VertexId};
use serde::{Deserialize, Serialize};

/// Steady-state figures a contingency sweep needs back from one load-flow run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadFlowSummary {
    /// Highest branch loading as a fraction of rating.
    pub max_loading: f64,
    /// Branch carrying `max_loading`.
    pub max_loading_edge: EdgeId,
    pub min_voltage_pu: f64,
    pub max_voltage_pu: f64,
}

/// Trait for running a load flow on a validated topology.
///
/// This crate does not ship a numeric solver; callers plug in their own
/// Newton-Raphson (or any other) implementation. Closures with the matching
/// signature implement the trait, which keeps tests and quick studies light.
pub trait LoadFlowSolver: Send + Sync {
    fn solve(&self, graph: &RadialGraph) -> Result<LoadFlowSummary>;
}

impl<F> LoadFlowSolver for F
where
    F: Fn(&RadialGraph) -> Result<LoadFlowSummary> + Send + Sync,
{
    fn solve(&self, graph: &RadialGraph) -> Result<LoadFlowSummary> {
        self(graph)
    }
}

/// Voltage at one node for one timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeState {
    pub vertex: VertexId,
    pub u_pu: f64,
}

/// Flows on one line for one timestamp. Powers in W; loading as fraction of rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineState {
    pub edge: EdgeId,
    pub p_from: f64,
    pub p_to: f64,
    pub loading: f64,
}

/// Solved network state at one timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timestep {
    /// Seconds since the Unix epoch
    pub timestamp: i64,
    pub nodes: Vec<NodeState>,
    pub lines: Vec<LineState>,
}

/// Output of a batch (time-series) load flow: one [`Timestep`] per load profile row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesResult {
    pub steps: Vec<Timestep>,
}

/// Batch load flow over a load profile the solver already holds.
///
/// `tap_position` overrides the transformer tap for every step; `None` keeps the
/// position from the network data.
pub trait TimeSeriesSolver: Send + Sync {
    fn solve_series(
        &self,
        graph: &RadialGraph,
        tap_position: Option<i64>,
    ) -> Result<TimeSeriesResult>;
}

impl<F> TimeSeriesSolver for F
where
    F: Fn(&RadialGraph, Option<i64>) -> Result<TimeSeriesResult> + Send + Sync,
{
    fn solve_series(
        &self,
        graph: &RadialGraph,
        tap_position: Option<i64>,
    ) -> Result<TimeSeriesResult> {
        self(graph, tap_position)
    }
}
