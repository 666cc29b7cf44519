use anyhow::Result;
use psim_algo::{
    aggregate_loading, aggregate_voltage, optimal_tap_position, LineState, NodeState,
    TapCriterion, TapRange, TimeSeriesResult, Timestep,
};
use psim_core::{EdgeId, RadialGraph, VertexId};

fn v(id: usize) -> VertexId {
    VertexId::new(id)
}

fn e(id: usize) -> EdgeId {
    EdgeId::new(id)
}

/// 0 --1-- 1 --2-- 2, 0 --3-- 3
fn feeder() -> RadialGraph {
    RadialGraph::new(
        vec![v(0), v(1), v(2), v(3)],
        vec![e(1), e(2), e(3)],
        vec![(v(0), v(1)), (v(1), v(2)), (v(0), v(3))],
        vec![true, true, true],
        v(0),
    )
    .unwrap()
}

/// Voltage drops 1% per edge of depth and rises 1% per tap step; the load on
/// every line follows a day-shaped curve and grows with depth.
fn depth_solver(graph: &RadialGraph, tap: Option<i64>) -> Result<TimeSeriesResult> {
    let tap = tap.unwrap_or(0) as f64;
    let demand = [2.0, 3.0, 2.0, 1.0];
    let mut steps = Vec::new();
    for (hour, &scale) in demand.iter().enumerate() {
        let mut nodes = Vec::new();
        for &vertex in graph.vertices() {
            let depth = graph.depth(vertex)? as f64;
            nodes.push(NodeState {
                vertex,
                u_pu: 1.0 + 0.01 * tap - 0.01 * depth * scale,
            });
        }
        let mut lines = Vec::new();
        for edge in graph.enabled_edges() {
            let downstream = graph.find_downstream_vertices(edge)?.len() as f64;
            lines.push(LineState {
                edge,
                p_from: 1000.0 * downstream * scale,
                p_to: -1000.0 * downstream * scale + 100.0 * scale,
                loading: 0.1 * downstream * scale,
            });
        }
        steps.push(Timestep {
            timestamp: hour as i64 * 3600,
            nodes,
            lines,
        });
    }
    Ok(TimeSeriesResult { steps })
}

#[test]
fn reports_follow_network_shape() {
    let series = depth_solver(&feeder(), None).unwrap();

    let voltage = aggregate_voltage(&series).unwrap();
    assert_eq!(voltage.len(), 4);
    assert!(voltage.iter().all(|row| row.max_u_pu_vertex == v(0)));
    // deepest vertex sags most at the peak hour
    assert_eq!(voltage[1].min_u_pu_vertex, v(2));
    assert!((voltage[1].min_u_pu - 0.94).abs() < 1e-9);

    let loading = aggregate_loading(&series).unwrap();
    assert_eq!(loading.iter().map(|r| r.edge).collect::<Vec<_>>(), vec![e(1), e(2), e(3)]);
    let head = &loading[0];
    assert_eq!(head.max_loading_timestamp, 3600);
    assert_eq!(head.min_loading_timestamp, 3 * 3600);
    // losses 0.2, 0.3, 0.2, 0.1 kW -> 0.25 + 0.25 + 0.15 kWh
    assert!((head.energy_loss_kwh - 0.65).abs() < 1e-9);
}

#[test]
fn tap_sweep_balances_voltage_profile() {
    let graph = feeder();
    let by_voltage = optimal_tap_position(
        &graph,
        &depth_solver,
        TapRange::new(-2, 4),
        TapCriterion::VoltageDeviation,
    )
    .unwrap();
    assert_eq!(by_voltage.evaluations.len(), 7);
    assert_eq!(by_voltage.best_position, 2);

    // losses do not depend on the tap here, so the lowest position wins the tie
    let by_loss = optimal_tap_position(
        &graph,
        &depth_solver,
        TapRange::new(-2, 4),
        TapCriterion::TotalEnergyLoss,
    )
    .unwrap();
    assert_eq!(by_loss.best_position, -2);

    let json = serde_json::to_value(&by_voltage).unwrap();
    assert_eq!(json["criterion"], "voltage_deviation");
    assert_eq!(json["best_position"], 2);
}
