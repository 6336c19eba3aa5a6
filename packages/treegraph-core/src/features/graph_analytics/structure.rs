//! Cycles, components and topological order
//!
//! Directed graphs use petgraph's Tarjan SCC; undirected graphs use
//! union-find (a component is cyclic iff it has at least as many edges as
//! nodes).

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use petgraph::algo::tarjan_scc;
use petgraph::unionfind::UnionFind;

use super::GraphAnalyzer;
use crate::errors::{Result, TreegraphError};

impl<'g> GraphAnalyzer<'g> {
    pub fn has_cycle(&self) -> bool {
        if self.graph.is_directed() {
            tarjan_scc(self.graph.as_petgraph())
                .iter()
                .any(|scc| scc.len() > 1)
        } else {
            let mut sets = UnionFind::<usize>::new(self.graph.node_count());
            self.graph.edges().any(|(s, t, _)| !sets.union(s, t))
        }
    }

    /// Components that contain a cycle: SCCs with more than one node
    /// (directed) or connected components with `edges >= nodes` (undirected).
    /// Members ascending; components ordered by smallest member.
    pub fn cyclic_components(&self) -> Vec<Vec<usize>> {
        if self.graph.is_directed() {
            let mut cyclic: Vec<Vec<usize>> = self
                .strongly_connected_components()
                .into_iter()
                .filter(|component| component.len() > 1)
                .collect();
            cyclic.sort();
            return cyclic;
        }

        let components = self.connected_components();
        let mut component_of = vec![0usize; self.graph.node_count()];
        for (c, members) in components.iter().enumerate() {
            for &node in members {
                component_of[node] = c;
            }
        }
        let mut edge_counts = vec![0usize; components.len()];
        for (s, _, _) in self.graph.edges() {
            edge_counts[component_of[s]] += 1;
        }
        components
            .into_iter()
            .zip(edge_counts)
            .filter(|(members, edges)| *edges >= members.len())
            .map(|(members, _)| members)
            .collect()
    }

    /// Connected components (weakly connected when directed).
    /// Members ascending; components ordered by smallest member.
    pub fn connected_components(&self) -> Vec<Vec<usize>> {
        let n = self.graph.node_count();
        let mut sets = UnionFind::<usize>::new(n);
        for (s, t, _) in self.graph.edges() {
            sets.union(s, t);
        }

        let mut slot_of_root = vec![usize::MAX; n];
        let mut components: Vec<Vec<usize>> = Vec::new();
        for node in 0..n {
            let root = sets.find(node);
            if slot_of_root[root] == usize::MAX {
                slot_of_root[root] = components.len();
                components.push(Vec::new());
            }
            components[slot_of_root[root]].push(node);
        }
        components
    }

    /// Strongly connected components. For undirected graphs these are the
    /// connected components. Members ascending; ordered by smallest member.
    pub fn strongly_connected_components(&self) -> Vec<Vec<usize>> {
        if !self.graph.is_directed() {
            return self.connected_components();
        }
        let mut components: Vec<Vec<usize>> = tarjan_scc(self.graph.as_petgraph())
            .into_iter()
            .map(|scc| {
                let mut members: Vec<usize> = scc.into_iter().map(|idx| idx.index()).collect();
                members.sort_unstable();
                members
            })
            .collect();
        components.sort();
        components
    }

    /// Kahn's algorithm, smallest ready index first.
    ///
    /// Fails with `InvalidGraphOperation` for undirected or cyclic graphs.
    pub fn topological_sort(&self) -> Result<Vec<usize>> {
        if !self.graph.is_directed() {
            return Err(TreegraphError::invalid_operation(
                "topological_sort",
                "requires a directed graph",
            ));
        }

        let n = self.graph.node_count();
        let mut in_degree: Vec<usize> = (0..n).map(|i| self.graph.in_degree(i)).collect();
        let mut ready: BinaryHeap<Reverse<usize>> = (0..n)
            .filter(|&i| in_degree[i] == 0)
            .map(Reverse)
            .collect();

        let mut order = Vec::with_capacity(n);
        while let Some(Reverse(node)) = ready.pop() {
            order.push(node);
            for &next in self.graph.successors(node) {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    ready.push(Reverse(next));
                }
            }
        }

        if order.len() < n {
            return Err(TreegraphError::invalid_operation(
                "topological_sort",
                format!("graph contains a cycle ({} of {} nodes ordered)", order.len(), n),
            ));
        }
        Ok(order)
    }

    pub fn is_dag(&self) -> bool {
        self.graph.is_directed() && !self.has_cycle()
    }
}
