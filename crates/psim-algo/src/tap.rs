//! Transformer tap selection over a batch load flow.
//!
//! Every position in the tap range is solved over the whole load profile and scored;
//! the lowest score wins, ties going to the lower position.

use crate::parallel::par_map;
use crate::solver::{TimeSeriesResult, TimeSeriesSolver};
use crate::timeseries::{aggregate_loading, aggregate_voltage};
use anyhow::{Context, Result};
use psim_core::RadialGraph;
use serde::{Deserialize, Serialize};

/// What an optimal tap position minimises.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TapCriterion {
    /// Energy lost on all lines over the horizon, kWh
    #[default]
    TotalEnergyLoss,
    /// Mean over timestamps of the largest |u - 1.0| p.u.
    VoltageDeviation,
}

/// Inclusive tap range. Either end may be the numerically larger one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapRange {
    pub tap_min: i64,
    pub tap_max: i64,
}

impl TapRange {
    pub fn new(tap_min: i64, tap_max: i64) -> Self {
        Self { tap_min, tap_max }
    }

    /// Every position in the range, ascending.
    pub fn positions(&self) -> Vec<i64> {
        let (low, high) = if self.tap_min <= self.tap_max {
            (self.tap_min, self.tap_max)
        } else {
            (self.tap_max, self.tap_min)
        };
        (low..=high).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TapEvaluation {
    pub position: i64,
    pub score: f64,
}

/// Result of a tap sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TapOptimization {
    pub criterion: TapCriterion,
    pub best_position: i64,
    /// One entry per position, ascending
    pub evaluations: Vec<TapEvaluation>,
}

/// Score one batch result under `criterion`.
pub fn score_series(series: &TimeSeriesResult, criterion: TapCriterion) -> Result<f64> {
    match criterion {
        TapCriterion::TotalEnergyLoss => Ok(aggregate_loading(series)?
            .iter()
            .map(|row| row.energy_loss_kwh)
            .sum()),
        TapCriterion::VoltageDeviation => {
            let rows = aggregate_voltage(series)?;
            let total: f64 = rows.iter().map(|row| row.deviation()).sum();
            Ok(total / rows.len() as f64)
        }
    }
}

/// Solve every tap position in `range` and pick the one with the lowest score.
pub fn optimal_tap_position(
    graph: &RadialGraph,
    solver: &dyn TimeSeriesSolver,
    range: TapRange,
    criterion: TapCriterion,
) -> Result<TapOptimization> {
    let positions = range.positions();
    let evaluations = par_map(true, &positions, |position| {
        let series = solver
            .solve_series(graph, Some(position))
            .with_context(|| format!("batch load flow at tap position {position}"))?;
        let score = score_series(&series, criterion)
            .with_context(|| format!("scoring tap position {position}"))?;
        Ok(TapEvaluation { position, score })
    })
    .into_iter()
    .collect::<Result<Vec<_>>>()?;

    // positions() is non-empty and ascending, so the first minimum is the lowest position
    let best = evaluations
        .iter()
        .reduce(|best, candidate| {
            if candidate.score.total_cmp(&best.score).is_lt() {
                candidate
            } else {
                best
            }
        })
        .map(|evaluation| evaluation.position)
        .context("empty tap range")?;

    tracing::info!(
        criterion = ?criterion,
        positions = evaluations.len(),
        best_position = best,
        "tap sweep finished"
    );
    Ok(TapOptimization {
        criterion,
        best_position: best,
        evaluations,
    })
}
