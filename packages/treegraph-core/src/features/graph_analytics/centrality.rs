//! Per-node centrality scores
//!
//! - `Degree`: O(V + E). Degree over `n - 1`; in + out for directed graphs,
//!   so directed scores can exceed 1.0.
//! - `Betweenness`: Brandes, O(V * E) time and O(V + E) memory per source.
//!   Normalized by `(n - 1)(n - 2)`.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::GraphAnalyzer;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CentralityMetric {
    #[default]
    Degree,
    Betweenness,
}

impl<'g> GraphAnalyzer<'g> {
    /// One score per node index
    pub fn centrality(&self, metric: CentralityMetric) -> Vec<f64> {
        match metric {
            CentralityMetric::Degree => self.degree_centrality(),
            CentralityMetric::Betweenness => self.betweenness_centrality(),
        }
    }

    fn degree_centrality(&self) -> Vec<f64> {
        let n = self.graph.node_count();
        if n <= 1 {
            return vec![0.0; n];
        }
        let scale = (n - 1) as f64;
        (0..n)
            .map(|i| self.graph.degree(i) as f64 / scale)
            .collect()
    }

    fn betweenness_centrality(&self) -> Vec<f64> {
        let n = self.graph.node_count();
        let mut scores = vec![0.0f64; n];
        if n <= 2 {
            return scores;
        }

        let mut sigma = vec![0.0f64; n];
        let mut dist = vec![-1i64; n];
        let mut delta = vec![0.0f64; n];
        let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut order = Vec::with_capacity(n);
        let mut queue = VecDeque::new();

        for source in 0..n {
            sigma.fill(0.0);
            dist.fill(-1);
            delta.fill(0.0);
            preds.iter_mut().for_each(Vec::clear);
            order.clear();

            sigma[source] = 1.0;
            dist[source] = 0;
            queue.push_back(source);
            while let Some(v) = queue.pop_front() {
                order.push(v);
                for &w in self.graph.successors(v) {
                    if dist[w] < 0 {
                        dist[w] = dist[v] + 1;
                        queue.push_back(w);
                    }
                    if dist[w] == dist[v] + 1 {
                        sigma[w] += sigma[v];
                        preds[w].push(v);
                    }
                }
            }

            // dependencies accumulate in reverse BFS order
            for &w in order.iter().rev() {
                for &v in &preds[w] {
                    delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
                }
                if w != source {
                    scores[w] += delta[w];
                }
            }
        }

        // undirected pairs were counted from both ends, which the scale absorbs
        let scale = ((n - 1) * (n - 2)) as f64;
        for score in &mut scores {
            *score /= scale;
        }
        debug!(nodes = n, "Computed betweenness centrality");
        scores
    }
}
