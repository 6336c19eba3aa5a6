//! Shortest path and bounded simple-path enumeration

use std::collections::VecDeque;

use tracing::{debug, warn};

use super::GraphAnalyzer;
use crate::config::PathConfig;
use crate::errors::{Result, TreegraphError};

/// Bounds for `all_simple_paths`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathLimits {
    /// Longest path, in edges
    pub max_depth: usize,
    /// More paths than this fails with `ResourceExhausted`
    pub max_paths: usize,
}

impl PathLimits {
    pub fn new(max_depth: usize, max_paths: usize) -> Self {
        Self {
            max_depth,
            max_paths,
        }
    }
}

impl Default for PathLimits {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_paths: 1_000,
        }
    }
}

impl From<&PathConfig> for PathLimits {
    fn from(config: &PathConfig) -> Self {
        Self::new(config.max_depth, config.max_paths)
    }
}

impl<'g> GraphAnalyzer<'g> {
    /// Fewest-edge path from `source` to `target`, following edge direction.
    ///
    /// BFS visits neighbors in ascending index order, so ties resolve to the
    /// same path on every run. `Ok(None)` when unreachable.
    pub fn shortest_path(&self, source: usize, target: usize) -> Result<Option<Vec<usize>>> {
        self.graph.check_index(source, "shortest_path source")?;
        self.graph.check_index(target, "shortest_path target")?;
        if source == target {
            return Ok(Some(vec![source]));
        }

        let n = self.graph.node_count();
        let mut prev = vec![usize::MAX; n];
        let mut seen = vec![false; n];
        let mut queue = VecDeque::from([source]);
        seen[source] = true;

        while let Some(node) = queue.pop_front() {
            for &next in self.graph.successors(node) {
                if seen[next] {
                    continue;
                }
                seen[next] = true;
                prev[next] = node;
                if next == target {
                    let mut path = vec![target];
                    let mut cur = target;
                    while cur != source {
                        cur = prev[cur];
                        path.push(cur);
                    }
                    path.reverse();
                    return Ok(Some(path));
                }
                queue.push_back(next);
            }
        }
        Ok(None)
    }

    /// Every simple path from `source` to `target` of at most
    /// `limits.max_depth` edges, in DFS order (ascending neighbors).
    ///
    /// Exponential in general. Exceeding `limits.max_paths` is an error rather
    /// than a truncated result. `source == target` yields no paths.
    pub fn all_simple_paths(
        &self,
        source: usize,
        target: usize,
        limits: PathLimits,
    ) -> Result<Vec<Vec<usize>>> {
        self.graph.check_index(source, "all_simple_paths source")?;
        self.graph.check_index(target, "all_simple_paths target")?;
        let mut paths = Vec::new();
        if source == target || limits.max_depth == 0 {
            return Ok(paths);
        }

        let mut on_path = vec![false; self.graph.node_count()];
        let mut path = vec![source];
        on_path[source] = true;
        // Each frame: node and the position of the next neighbor to try
        let mut stack: Vec<(usize, usize)> = vec![(source, 0)];

        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            let successors = self.graph.successors(node);
            if cursor >= successors.len() {
                stack.pop();
                path.pop();
                on_path[node] = false;
                continue;
            }
            frame.1 += 1;

            let next = successors[cursor];
            if on_path[next] {
                continue;
            }
            if next == target {
                if paths.len() == limits.max_paths {
                    warn!(source, target, limit = limits.max_paths, "Simple path budget exceeded");
                    return Err(TreegraphError::exhausted("simple paths", limits.max_paths));
                }
                let mut found = path.clone();
                found.push(next);
                paths.push(found);
                continue;
            }
            // keeps every recorded path within max_depth edges
            if path.len() < limits.max_depth {
                on_path[next] = true;
                path.push(next);
                stack.push((next, 0));
            }
        }

        debug!(source, target, paths = paths.len(), "Enumerated simple paths");
        Ok(paths)
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

    // 0 -> 1 -> 3, 0 -> 2 -> 3, 3 -> 4
    fn diamond() -> Graph {
        graph(true, 5, &[(0, 1), (0, 2), (1, 3), (2, 3), (3, 4)])
    }

    #[test]
    fn test_shortest_path() {
        let g = diamond();
        let a = GraphAnalyzer::new(&g);
        assert_eq!(a.shortest_path(0, 4).unwrap(), Some(vec![0, 1, 3, 4]));
        assert_eq!(a.shortest_path(4, 0).unwrap(), None);
        assert_eq!(a.shortest_path(2, 2).unwrap(), Some(vec![2]));
        assert!(a.shortest_path(0, 9).is_err());
    }

    #[test]
    fn test_shortest_path_undirected() {
        let g = graph(false, 3, &[(0, 1), (1, 2)]);
        let a = GraphAnalyzer::new(&g);
        assert_eq!(a.shortest_path(2, 0).unwrap(), Some(vec![2, 1, 0]));
    }

    #[test]
    fn test_all_simple_paths() {
        let g = diamond();
        let a = GraphAnalyzer::new(&g);
        let paths = a.all_simple_paths(0, 4, PathLimits::default()).unwrap();
        assert_eq!(paths, vec![vec![0, 1, 3, 4], vec![0, 2, 3, 4]]);

        let short = a.all_simple_paths(0, 3, PathLimits::new(1, 10)).unwrap();
        assert!(short.is_empty());
        let two = a.all_simple_paths(0, 3, PathLimits::new(2, 10)).unwrap();
        assert_eq!(two.len(), 2);

        assert!(a.all_simple_paths(0, 0, PathLimits::default()).unwrap().is_empty());
    }

    #[test]
    fn test_all_simple_paths_budget() {
        let g = diamond();
        let a = GraphAnalyzer::new(&g);
        let err = a.all_simple_paths(0, 4, PathLimits::new(10, 1)).unwrap_err();
        assert!(err.is_resource_exhausted());
    }

    #[test]
    fn test_all_simple_paths_undirected_cycle() {
        // square: 0-1-2-3-0
        let g = graph(false, 4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
        let a = GraphAnalyzer::new(&g);
        let paths = a.all_simple_paths(0, 2, PathLimits::default()).unwrap();
        assert_eq!(paths, vec![vec![0, 1, 2], vec![0, 3, 2]]);
    }
}
