//! Graph Analytics
//!
//! Read-only algorithms over any projected `Graph`: paths, cycles,
//! components, centrality and a metrics summary. Results are expressed in
//! node indices; translate them through the projection's bijection.
//!
//! # Usage
//! ```ignore
//! use treegraph_core::features::graph_analytics::{CentralityMetric, GraphAnalyzer, PathLimits};
//!
//! let analyzer = GraphAnalyzer::new(&projection.graph);
//! let path = analyzer.shortest_path(0, 4)?;
//! let scores = analyzer.centrality(CentralityMetric::Degree);
//! let metrics = analyzer.graph_metrics();
//! ```

mod centrality;
mod metrics;
mod paths;
mod structure;

pub use centrality::CentralityMetric;
pub use metrics::GraphMetrics;
pub use paths::PathLimits;

use crate::features::graph_projection::Graph;

/// Borrowing view over a graph; cheap to construct per query
#[derive(Debug, Clone, Copy)]
pub struct GraphAnalyzer<'g> {
    graph: &'g Graph,
}

impl<'g> GraphAnalyzer<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }
}
