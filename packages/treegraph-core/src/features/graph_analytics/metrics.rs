//! Whole-graph summary

use serde::{Deserialize, Serialize};

use super::GraphAnalyzer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMetrics {
    pub node_count: usize,
    pub edge_count: usize,
    /// Edges over the maximum possible given directedness; 0.0 below two nodes
    pub density: f64,
    /// Weakly connected components when directed
    pub component_count: usize,
    /// Exactly one component; false for the empty graph
    pub is_connected: bool,
    /// `None` for undirected graphs
    pub is_dag: Option<bool>,
}

impl<'g> GraphAnalyzer<'g> {
    pub fn graph_metrics(&self) -> GraphMetrics {
        let n = self.graph.node_count();
        let m = self.graph.edge_count();
        let density = if n > 1 {
            let pairs = (n * (n - 1)) as f64;
            if self.graph.is_directed() {
                m as f64 / pairs
            } else {
                2.0 * m as f64 / pairs
            }
        } else {
            0.0
        };
        let component_count = self.connected_components().len();

        GraphMetrics {
            node_count: n,
            edge_count: m,
            density,
            component_count,
            is_connected: component_count == 1,
            is_dag: self.graph.is_directed().then(|| !self.has_cycle()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::graph_projection::{EdgeWeight, Graph, GraphBuilder, NodeWeight};

    fn graph(directed: bool, n: usize, edges: &[(usize, usize)]) -> Graph {
        let mut b = GraphBuilder::new(directed);
        for i in 0..n {
            b.add_node(NodeWeight::new(i.to_string()));
        }
        for &(s, t) in edges {
            b.add_edge(s, t, EdgeWeight::default()).unwrap();
        }
        b.build()
    }

    #[test]
    fn test_empty_graph_metrics() {
        let g = graph(true, 0, &[]);
        let metrics = GraphAnalyzer::new(&g).graph_metrics();
        assert_eq!(metrics.node_count, 0);
        assert_eq!(metrics.edge_count, 0);
        assert_eq!(metrics.density, 0.0);
        assert_eq!(metrics.component_count, 0);
        assert!(!metrics.is_connected);
        assert_eq!(metrics.is_dag, Some(true));
    }

    #[test]
    fn test_directed_metrics() {
        let g = graph(true, 4, &[(0, 1), (1, 2), (2, 0)]);
        let metrics = GraphAnalyzer::new(&g).graph_metrics();
        assert_eq!(metrics.edge_count, 3);
        assert!((metrics.density - 3.0 / 12.0).abs() < 1e-12);
        assert_eq!(metrics.component_count, 2);
        assert!(!metrics.is_connected);
        assert_eq!(metrics.is_dag, Some(false));
    }

    #[test]
    fn test_undirected_metrics() {
        let g = graph(false, 3, &[(0, 1), (1, 2)]);
        let metrics = GraphAnalyzer::new(&g).graph_metrics();
        assert!((metrics.density - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(metrics.component_count, 1);
        assert!(metrics.is_connected);
        assert_eq!(metrics.is_dag, None);

        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["node_count"], 3);
        assert!(json["is_dag"].is_null());
    }
}
