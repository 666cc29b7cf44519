use anyhow::{anyhow, Result};
use psim_algo::{
    feeder_of, partition_by_feeder, LoadFlowSolver, LoadFlowSummary, N1Config, N1Screener,
};
use psim_core::{EdgeId, RadialGraph, TopologyInput, VertexId};
use std::sync::atomic::{AtomicUsize, Ordering};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn v(id: usize) -> VertexId {
    VertexId::new(id)
}

fn e(id: usize) -> EdgeId {
    EdgeId::new(id)
}

/// Two feeders out of substation 0 with one normally-open tie between their tails.
///
/// ```text
/// 0 --11-- 1 --12-- 2 --13-- 3
/// |                          :
/// |                         30 (open tie)
/// |                          :
/// +--21--- 4 --22-- 5 --23-- 6
///          :
///         31 (open, 4-2)
/// ```
fn two_feeder_network() -> RadialGraph {
    TopologyInput::new(
        (0..7).map(v).collect(),
        vec![e(11), e(12), e(13), e(21), e(22), e(23), e(30), e(31)],
        vec![
            (v(0), v(1)),
            (v(1), v(2)),
            (v(2), v(3)),
            (v(0), v(4)),
            (v(4), v(5)),
            (v(5), v(6)),
            (v(3), v(6)),
            (v(4), v(2)),
        ],
        vec![true, true, true, true, true, true, false, false],
        v(0),
    )
    .build()
    .unwrap()
}

/// Counts calls and loads the longest feeder hardest.
struct CountingSolver {
    calls: AtomicUsize,
}

impl LoadFlowSolver for CountingSolver {
    fn solve(&self, graph: &RadialGraph) -> Result<LoadFlowSummary> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let feeders = partition_by_feeder(graph)?;
        let longest = feeders
            .iter()
            .max_by_key(|f| (f.len(), std::cmp::Reverse(f.head_edge)))
            .ok_or_else(|| anyhow!("no feeders"))?;
        Ok(LoadFlowSummary {
            max_loading: longest.len() as f64 / 4.0,
            max_loading_edge: longest.head_edge,
            min_voltage_pu: 1.0 - 0.01 * longest.len() as f64,
            max_voltage_pu: 1.0,
        })
    }
}

#[test]
fn screening_covers_every_enabled_branch() {
    init_tracing();
    let graph = two_feeder_network();
    let screener = N1Screener::new(&graph, N1Config::default());
    let results = screener.screen_all().unwrap();

    assert_eq!(results.total_screened, 6);
    let alternatives = |edge| results.outcome(e(edge)).unwrap().alternatives.clone();
    assert_eq!(alternatives(11), vec![e(30), e(31)]);
    assert_eq!(alternatives(12), vec![e(30), e(31)]);
    assert_eq!(alternatives(13), vec![e(30)]);
    assert_eq!(alternatives(21), vec![e(30), e(31)]);
    assert_eq!(alternatives(22), vec![e(30)]);
    assert_eq!(alternatives(23), vec![e(30)]);
    assert_eq!(results.num_islanded, 0);
}

#[test]
fn evaluation_runs_solver_once_per_reconfiguration() {
    init_tracing();
    let graph = two_feeder_network();
    let solver = CountingSolver {
        calls: AtomicUsize::new(0),
    };
    let screener = N1Screener::new(&graph, N1Config::default());
    let results = screener.evaluate(&solver).unwrap();

    let expected = screener.reconfigurations().unwrap().len();
    assert_eq!(expected, 9);
    assert_eq!(solver.calls.load(Ordering::SeqCst), expected);
    assert_eq!(results.evaluations.len(), expected);
    assert_eq!(results.num_failed, 0);

    // 21 out, 30 in: feeder 11 carries all six vertices -> 1.5 loading
    let evaluation = results
        .evaluations
        .iter()
        .find(|ev| ev.outaged == e(21) && ev.alternative == e(30))
        .unwrap();
    assert!(evaluation.flagged);
    assert_eq!(evaluation.summary.as_ref().unwrap().max_loading_edge, e(11));

    // 12 out: either alternative moves {2,3} onto feeder 21; the tie goes to 30
    let best = results.best_alternative(e(12)).unwrap();
    assert_eq!(best.alternative, e(30));
}

#[test]
fn results_serialize_for_reporting() {
    let graph = two_feeder_network();
    let screener = N1Screener::new(
        &graph,
        N1Config {
            parallel: false,
            max_alternatives: Some(1),
            ..N1Config::default()
        },
    );
    let screening = screener.screen_all().unwrap();
    let json = serde_json::to_value(&screening).unwrap();
    assert_eq!(json["total_screened"], 6);
    assert_eq!(json["outcomes"][0]["outaged"], 11);
    assert_eq!(json["outcomes"][0]["downstream"], serde_json::json!([1, 2, 3]));

    let solver = CountingSolver {
        calls: AtomicUsize::new(0),
    };
    let evaluation = screener.evaluate(&solver).unwrap();
    assert_eq!(evaluation.evaluations.len(), 6);
    let json = serde_json::to_string(&evaluation).unwrap();
    assert!(json.contains("\"loading_limit\":1.0"));
}

#[test]
fn feeders_follow_reconfiguration() {
    let graph = two_feeder_network();
    let before = partition_by_feeder(&graph).unwrap();
    assert_eq!(feeder_of(&before, v(3)), Some(e(11)));

    let after = graph.with_edge_swapped(e(13), e(30)).unwrap();
    let feeders = partition_by_feeder(&after).unwrap();
    assert_eq!(feeder_of(&feeders, v(3)), Some(e(21)));
    assert_eq!(feeders.iter().map(|f| f.len()).sum::<usize>(), 6);
}
