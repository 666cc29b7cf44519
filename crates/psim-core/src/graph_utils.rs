use crate::graph::RadialGraph;
use crate::topology::TopologyInput;
use crate::VertexId;
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet, VecDeque};

/// Summary statistics of a validated radial topology.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphStats {
    pub vertex_count: usize,
    pub edge_count: usize,
    pub enabled_edge_count: usize,
    pub disabled_edge_count: usize,
    /// Vertices other than the source with no children.
    pub leaf_count: usize,
    /// Longest source-to-vertex path, in edges.
    pub max_depth: usize,
    pub min_degree: usize,
    pub avg_degree: f64,
    pub max_degree: usize,
}

/// One connected component of the enabled sub-graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IslandSummary {
    pub island_id: usize,
    pub vertex_count: usize,
    pub contains_source: bool,
}

/// Island label for one vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexAssignment {
    pub vertex: VertexId,
    pub island_id: usize,
}

/// Aggregated island analysis result.
#[derive(Debug, Clone)]
pub struct IslandAnalysis {
    pub islands: Vec<IslandSummary>,
    pub assignments: Vec<VertexAssignment>,
}

/// Counts and degree figures over the enabled (tree) edges.
pub fn graph_stats(graph: &RadialGraph) -> GraphStats {
    let tree = graph.rooted_tree();
    let order = tree.order();
    let degrees: Vec<usize> = order
        .iter()
        .map(|&n| tree.children(n).len() + usize::from(tree.parent(n).is_some()))
        .collect();
    let vertex_count = graph.vertex_count();
    GraphStats {
        vertex_count,
        edge_count: graph.edge_count(),
        enabled_edge_count: graph.enabled_edge_count(),
        disabled_edge_count: graph.edge_count() - graph.enabled_edge_count(),
        leaf_count: order
            .iter()
            .filter(|&&n| n != tree.root() && tree.is_leaf(n))
            .count(),
        max_depth: order.iter().map(|&n| tree.depth(n)).max().unwrap_or(0),
        min_degree: degrees.iter().copied().min().unwrap_or(0),
        avg_degree: if vertex_count == 0 {
            0.0
        } else {
            degrees.iter().sum::<usize>() as f64 / vertex_count as f64
        },
        max_degree: degrees.iter().copied().max().unwrap_or(0),
    }
}

/// Labels connected components of the enabled sub-graph (breadth-first search).
///
/// Works on raw input, so it can explain a `GraphNotFullyConnected` failure. Edges
/// naming undeclared vertices are ignored. Island 0 is the one holding the source
/// when the source is declared.
pub fn find_islands(input: &TopologyInput) -> IslandAnalysis {
    let mut adjacency: HashMap<VertexId, Vec<VertexId>> = input
        .vertices
        .iter()
        .map(|&vertex| (vertex, Vec::new()))
        .collect();
    for (_, u, v) in input.enabled_edges() {
        if adjacency.contains_key(&u) && adjacency.contains_key(&v) {
            adjacency.entry(u).or_default().push(v);
            adjacency.entry(v).or_default().push(u);
        }
    }

    let starts = std::iter::once(input.source)
        .filter(|source| adjacency.contains_key(source))
        .chain(input.vertices.iter().copied());

    let mut visited = HashSet::new();
    let mut islands = Vec::new();
    let mut assignments = Vec::new();
    for start in starts {
        if visited.contains(&start) {
            continue;
        }
        let island_id = islands.len();
        let mut queue = VecDeque::from([start]);
        let mut members = 0;
        let mut contains_source = false;
        while let Some(vertex) = queue.pop_front() {
            if !visited.insert(vertex) {
                continue;
            }
            members += 1;
            contains_source |= vertex == input.source;
            assignments.push(VertexAssignment { vertex, island_id });
            for &neighbor in adjacency.get(&vertex).into_iter().flatten() {
                if !visited.contains(&neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        islands.push(IslandSummary {
            island_id,
            vertex_count: members,
            contains_source,
        });
    }
    assignments.sort_by_key(|assignment| assignment.vertex);
    IslandAnalysis {
        islands,
        assignments,
    }
}

/// Export the topology to a DOT string (Graphviz) so external tools can visualize the layout.
pub fn export_graph(graph: &RadialGraph, format: &str) -> Result<String> {
    match format.to_ascii_lowercase().as_str() {
        "graphviz" | "dot" => Ok(render_dot(graph)),
        other => Err(anyhow!("unsupported graph export format '{other}'")),
    }
}

fn render_dot(graph: &RadialGraph) -> String {
    let mut buffer = String::new();
    buffer.push_str("graph radial_topology {\n");
    for &vertex in graph.vertices() {
        if vertex == graph.source() {
            buffer.push_str(&format!("  v{vertex} [label=\"{vertex}\", shape=box];\n"));
        } else {
            buffer.push_str(&format!("  v{vertex} [label=\"{vertex}\"];\n"));
        }
    }
    for edge in graph.edges() {
        let (u, v) = edge.endpoints;
        let style = if edge.enabled { "solid" } else { "dashed" };
        buffer.push_str(&format!(
            "  v{u} -- v{v} [label=\"{}\", style={style}];\n",
            edge.id
        ));
    }
    buffer.push('}');
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EdgeId;

    fn v(id: usize) -> VertexId {
        VertexId::new(id)
    }

    fn feeder() -> TopologyInput {
        // 0 -- 1 -- 2, 1 -- 3, open 2 -- 3
        TopologyInput::new(
            vec![v(0), v(1), v(2), v(3)],
            vec![EdgeId::new(1), EdgeId::new(2), EdgeId::new(3), EdgeId::new(4)],
            vec![(v(0), v(1)), (v(1), v(2)), (v(1), v(3)), (v(2), v(3))],
            vec![true, true, true, false],
            v(0),
        )
    }

    #[test]
    fn test_graph_stats() {
        let graph = feeder().build().unwrap();
        let stats = graph_stats(&graph);
        assert_eq!(stats.vertex_count, 4);
        assert_eq!(stats.enabled_edge_count, 3);
        assert_eq!(stats.disabled_edge_count, 1);
        assert_eq!(stats.leaf_count, 2);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(stats.min_degree, 1);
        assert_eq!(stats.max_degree, 3);
        assert!((stats.avg_degree - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_find_islands_on_split_input() {
        let mut input = feeder();
        input.edge_enabled = vec![true, false, false, true];
        let analysis = find_islands(&input);

        assert_eq!(analysis.islands.len(), 2);
        assert!(analysis.islands[0].contains_source);
        assert_eq!(analysis.islands[0].vertex_count, 2);
        assert_eq!(analysis.islands[1].vertex_count, 2);
        let island_of = |vertex| {
            analysis
                .assignments
                .iter()
                .find(|a| a.vertex == vertex)
                .map(|a| a.island_id)
        };
        assert_eq!(island_of(v(2)), island_of(v(3)));
        assert_ne!(island_of(v(0)), island_of(v(2)));
    }

    #[test]
    fn test_export_dot() {
        let graph = feeder().build().unwrap();
        let dot = export_graph(&graph, "DOT").unwrap();
        assert!(dot.starts_with("graph radial_topology {"));
        assert!(dot.contains("v0 [label=\"0\", shape=box];"));
        assert!(dot.contains("v2 -- v3 [label=\"4\", style=dashed];"));
        assert!(dot.contains("v0 -- v1 [label=\"1\", style=solid];"));
        assert!(export_graph(&graph, "svg").is_err());
    }
}
