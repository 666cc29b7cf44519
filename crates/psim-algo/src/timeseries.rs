//! Aggregation of batch load-flow results into per-timestamp and per-line reports.
//!
//! - [`aggregate_voltage`]: for each timestamp, the highest and lowest node voltage and
//!   the nodes they occur at
//! - [`aggregate_loading`]: for each line, energy lost over the horizon and the extreme
//!   loadings with the timestamps they occur at
//!
//! Profiles are hourly: energy loss integrates `p_from + p_to` with the trapezoidal rule
//! at a one-hour spacing. Ties on an extreme go to the first node or timestamp seen.

use crate::solver::TimeSeriesResult;
use anyhow::{bail, Result};
use psim_core::{EdgeId, VertexId};
use serde::Serialize;
use std::collections::BTreeMap;

/// Spacing between consecutive load-profile rows.
pub const STEP_HOURS: f64 = 1.0;

/// Voltage extremes at one timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoltageRow {
    pub timestamp: i64,
    pub max_u_pu: f64,
    pub max_u_pu_vertex: VertexId,
    pub min_u_pu: f64,
    pub min_u_pu_vertex: VertexId,
}

impl VoltageRow {
    /// Largest distance from 1.0 p.u. at this timestamp.
    pub fn deviation(&self) -> f64 {
        (self.max_u_pu - 1.0).abs().max((self.min_u_pu - 1.0).abs())
    }
}

/// Loss and loading extremes of one line over the whole horizon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadingRow {
    pub edge: EdgeId,
    pub energy_loss_kwh: f64,
    pub max_loading: f64,
    pub max_loading_timestamp: i64,
    pub min_loading: f64,
    pub min_loading_timestamp: i64,
}

/// Per-timestamp voltage extremes, in timestamp order.
pub fn aggregate_voltage(series: &TimeSeriesResult) -> Result<Vec<VoltageRow>> {
    check_timestamps(series)?;
    series
        .steps
        .iter()
        .map(|step| {
            let Some(first) = step.nodes.first() else {
                bail!("no node results at timestamp {}", step.timestamp);
            };
            let (mut max, mut min) = (*first, *first);
            for node in &step.nodes[1..] {
                if node.u_pu > max.u_pu {
                    max = *node;
                }
                if node.u_pu < min.u_pu {
                    min = *node;
                }
            }
            Ok(VoltageRow {
                timestamp: step.timestamp,
                max_u_pu: max.u_pu,
                max_u_pu_vertex: max.vertex,
                min_u_pu: min.u_pu,
                min_u_pu_vertex: min.vertex,
            })
        })
        .collect()
}

#[derive(Default)]
struct LineTrack {
    losses_kw: Vec<f64>,
    max: Option<(f64, i64)>,
    min: Option<(f64, i64)>,
}

/// Per-line energy loss and loading extremes, ascending by edge id.
///
/// Every line must be reported at every timestamp.
pub fn aggregate_loading(series: &TimeSeriesResult) -> Result<Vec<LoadingRow>> {
    check_timestamps(series)?;
    let mut tracks: BTreeMap<EdgeId, LineTrack> = BTreeMap::new();
    for step in &series.steps {
        for line in &step.lines {
            let track = tracks.entry(line.edge).or_default();
            track.losses_kw.push((line.p_from + line.p_to) * 1e-3);
            if track.max.map_or(true, |(best, _)| line.loading > best) {
                track.max = Some((line.loading, step.timestamp));
            }
            if track.min.map_or(true, |(best, _)| line.loading < best) {
                track.min = Some((line.loading, step.timestamp));
            }
        }
    }

    let mut rows = Vec::with_capacity(tracks.len());
    for (edge, track) in tracks {
        let (Some(max), Some(min)) = (track.max, track.min) else {
            continue;
        };
        if track.losses_kw.len() != series.steps.len() {
            bail!(
                "line {edge} reported at {} of {} timestamps",
                track.losses_kw.len(),
                series.steps.len()
            );
        }
        rows.push(LoadingRow {
            edge,
            energy_loss_kwh: trapezoid(&track.losses_kw, STEP_HOURS),
            max_loading: max.0,
            max_loading_timestamp: max.1,
            min_loading: min.0,
            min_loading_timestamp: min.1,
        });
    }
    Ok(rows)
}

fn check_timestamps(series: &TimeSeriesResult) -> Result<()> {
    if series.steps.is_empty() {
        bail!("time series has no timestamps");
    }
    if let Some(pair) = series
        .steps
        .windows(2)
        .find(|pair| pair[1].timestamp <= pair[0].timestamp)
    {
        bail!(
            "timestamps not strictly increasing: {} follows {}",
            pair[1].timestamp,
            pair[0].timestamp
        );
    }
    Ok(())
}

fn trapezoid(samples: &[f64], dx: f64) -> f64 {
    samples
        .windows(2)
        .map(|pair| (pair[0] + pair[1]) * 0.5 * dx)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{LineState, NodeState, Timestep};

    fn v(id: usize) -> VertexId {
        VertexId::new(id)
    }

    fn e(id: usize) -> EdgeId {
        EdgeId::new(id)
    }

    fn step(
        timestamp: i64,
        voltages: &[(usize, f64)],
        lines: &[(usize, f64, f64, f64)],
    ) -> Timestep {
        Timestep {
            timestamp,
            nodes: voltages
                .iter()
                .map(|&(vertex, u_pu)| NodeState {
                    vertex: v(vertex),
                    u_pu,
                })
                .collect(),
            lines: lines
                .iter()
                .map(|&(edge, p_from, p_to, loading)| LineState {
                    edge: e(edge),
                    p_from,
                    p_to,
                    loading,
                })
                .collect(),
        }
    }

    fn three_hours() -> TimeSeriesResult {
        TimeSeriesResult {
            steps: vec![
                step(
                    0,
                    &[(0, 1.0), (2, 0.98), (4, 0.97)],
                    &[(9, 2000.0, -1000.0, 0.4), (1, 500.0, -400.0, 0.2)],
                ),
                step(
                    3600,
                    &[(0, 1.0), (2, 1.02), (4, 0.99)],
                    &[(9, 4000.0, -1000.0, 0.9), (1, 700.0, -400.0, 0.3)],
                ),
                step(
                    7200,
                    &[(0, 1.0), (2, 0.99), (4, 0.99)],
                    &[(9, 3000.0, -1000.0, 0.9), (1, 500.0, -400.0, 0.1)],
                ),
            ],
        }
    }

    #[test]
    fn test_voltage_extremes_per_timestamp() {
        let rows = aggregate_voltage(&three_hours()).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].max_u_pu_vertex, v(0));
        assert_eq!(rows[0].min_u_pu_vertex, v(4));
        assert!((rows[0].min_u_pu - 0.97).abs() < 1e-12);

        assert_eq!(rows[1].timestamp, 3600);
        assert_eq!(rows[1].max_u_pu_vertex, v(2));
        // 2 and 4 tie at 0.99; the first node wins
        assert_eq!(rows[2].min_u_pu_vertex, v(2));
        assert!((rows[1].deviation() - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_loading_rows_by_edge() {
        let rows = aggregate_loading(&three_hours()).unwrap();
        assert_eq!(rows.iter().map(|r| r.edge).collect::<Vec<_>>(), vec![e(1), e(9)]);

        let line = &rows[1];
        // losses 1, 3, 2 kW -> (1+3)/2 + (3+2)/2 = 4.5 kWh
        assert!((line.energy_loss_kwh - 4.5).abs() < 1e-12);
        assert_eq!(line.max_loading_timestamp, 3600);
        assert_eq!(line.min_loading_timestamp, 0);

        let line = &rows[0];
        // losses 0.1, 0.3, 0.1 kW -> 0.4 kWh
        assert!((line.energy_loss_kwh - 0.4).abs() < 1e-12);
        assert_eq!(line.min_loading_timestamp, 7200);
    }

    #[test]
    fn test_single_timestamp_has_no_energy() {
        let series = TimeSeriesResult {
            steps: vec![step(0, &[(0, 1.0)], &[(1, 5000.0, -4000.0, 0.5)])],
        };
        let rows = aggregate_loading(&series).unwrap();
        assert_eq!(rows[0].energy_loss_kwh, 0.0);
        assert_eq!(rows[0].max_loading_timestamp, rows[0].min_loading_timestamp);
    }

    #[test]
    fn test_malformed_series_are_rejected() {
        assert!(aggregate_voltage(&TimeSeriesResult::default()).is_err());

        let mut unordered = three_hours();
        unordered.steps.swap(0, 1);
        let err = aggregate_loading(&unordered).unwrap_err();
        assert!(err.to_string().contains("not strictly increasing"));

        let mut missing_line = three_hours();
        missing_line.steps[1].lines.pop();
        let err = aggregate_loading(&missing_line).unwrap_err();
        assert_eq!(err.to_string(), "line 1 reported at 2 of 3 timestamps");

        let mut no_nodes = three_hours();
        no_nodes.steps[2].nodes.clear();
        assert!(aggregate_voltage(&no_nodes).is_err());
    }
}
