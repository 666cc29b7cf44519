//! N-1 contingency analysis for radial networks.
//!
//! ## Key Concepts
//!
//! - **Outage:** an enabled branch taken out of service.
//! - **Alternative:** an open switch whose closure reconnects the two halves left by the
//!   outage into a new spanning tree. Found by partition, not by trial and error, see
//!   [`psim_core::RadialGraph::find_alternative_edges`].
//! - **Reconfiguration:** the (outage, alternative) pair, materialized as a fresh
//!   validated graph and handed to the load-flow solver.
//!
//! ## Algorithm
//!
//! 1. Enumerate enabled branches (ascending id)
//! 2. Screen each one: alternatives plus the downstream vertices it cuts off
//! 3. For each alternative, rebuild the topology and run the solver
//! 4. Flag reconfigurations whose max loading exceeds the configured limit

pub mod n1;

pub use n1::{
    screen_n1_contingencies, ContingencyEvaluation, N1Config, N1EvaluationResults, N1Outcome,
    N1Results, N1Screener,
};
