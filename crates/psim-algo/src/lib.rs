//! # psim-algo: Analyses on Radial Topologies
//!
//! Builds on the validated [`psim_core::RadialGraph`] to provide:
//!
//! - [`contingency`]: N-1 screening (alternatives and cut-off vertices per outage) and
//!   evaluation of every reconfiguration through a pluggable load-flow solver
//! - [`solver`]: the [`LoadFlowSolver`] and [`TimeSeriesSolver`] seams; numeric solvers
//!   live outside this crate
//! - [`timeseries`]: voltage and loading reports over a batch load flow
//! - [`tap`]: transformer tap selection by energy loss or voltage deviation
//! - [`feeders`]: feeder partitioning for EV-penetration and load studies
//!
//! ## Example
//!
//! ```ignore
//! use psim_algo::{N1Config, N1Screener};
//!
//! let graph = psim_core::TopologyInput::new(/* ... */).build()?;
//! let screener = N1Screener::new(&graph, N1Config::default());
//!
//! let screening = screener.screen_all()?;
//! println!("{}", screening.summary());
//!
//! let evaluation = screener.evaluate(&my_load_flow)?;
//! for flagged in evaluation.flagged() {
//!     println!("{} out, {} in: overloaded", flagged.outaged, flagged.alternative);
//! }
//! ```

pub mod contingency;
pub mod feeders;
mod parallel;
pub mod solver;
pub mod tap;
pub mod timeseries;

pub use contingency::{
    screen_n1_contingencies, ContingencyEvaluation, N1Config, N1EvaluationResults, N1Outcome,
    N1Results, N1Screener,
};
pub use feeders::{feeder_of, partition_by_feeder, Feeder};
pub use solver::{
    LineState, LoadFlowSolver, LoadFlowSummary, NodeState, TimeSeriesResult, TimeSeriesSolver,
    Timestep,
};
pub use tap::{optimal_tap_position, TapCriterion, TapEvaluation, TapOptimization, TapRange};
pub use timeseries::{aggregate_loading, aggregate_voltage, LoadingRow, VoltageRow};
