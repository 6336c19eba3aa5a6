//! Abstract graph used for projections, patterns and analytics
//!
//! A thin layer over `petgraph::DiGraph` that adds:
//! - runtime directedness (undirected graphs store each edge once)
//! - dense `usize` node indices `0..N`
//! - sorted adjacency lists for deterministic traversal
//! - O(1) edge lookup by node pair
//!
//! At most one edge exists per ordered pair (directed) or unordered pair
//! (undirected). Self-loops are rejected. Graphs are immutable once built.

use std::collections::BTreeMap;
use std::fmt;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, TreegraphError};
use crate::shared::models::{ByteRange, NodeKind};

/// Caller-supplied node/edge attributes (deterministic key order)
pub type AttrMap = BTreeMap<String, serde_json::Value>;

/// Origin of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Tree parent to child
    ParentChild,
    /// Consecutive children of the same parent
    Sibling,
    /// Added by an edge predicate or by hand
    Custom,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::ParentChild => "parent_child",
            EdgeKind::Sibling => "sibling",
            EdgeKind::Custom => "custom",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node payload: metadata copied from the syntax node plus caller attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeWeight {
    pub type_name: String,
    pub kind: NodeKind,
    pub range: ByteRange,
    pub depth: usize,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: AttrMap,
}

impl NodeWeight {
    /// Weight for a hand-built node (no source position)
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            kind: NodeKind::Other,
            range: ByteRange::default(),
            depth: 0,
            attrs: AttrMap::new(),
        }
    }

    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }
}

/// Edge payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeWeight {
    pub kind: EdgeKind,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: AttrMap,
}

impl EdgeWeight {
    pub fn new(kind: EdgeKind) -> Self {
        Self {
            kind,
            attrs: AttrMap::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }
}

impl Default for EdgeWeight {
    fn default() -> Self {
        Self::new(EdgeKind::Custom)
    }
}

/// Immutable directed or undirected graph with dense indices
#[derive(Clone)]
pub struct Graph {
    inner: DiGraph<NodeWeight, EdgeWeight>,
    directed: bool,
    /// Directed: successors. Undirected: all neighbors. Sorted.
    out_adj: Vec<Vec<usize>>,
    /// Directed: predecessors. Undirected: all neighbors. Sorted.
    in_adj: Vec<Vec<usize>>,
    edge_lookup: FxHashMap<(usize, usize), EdgeIndex>,
}

impl Graph {
    pub fn builder(directed: bool) -> GraphBuilder {
        GraphBuilder::new(directed)
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    pub fn contains_node(&self, index: usize) -> bool {
        index < self.node_count()
    }

    pub fn node(&self, index: usize) -> Option<&NodeWeight> {
        self.inner.node_weight(NodeIndex::new(index))
    }

    /// Edge between `source` and `target` (either orientation when undirected)
    pub fn edge(&self, source: usize, target: usize) -> Option<&EdgeWeight> {
        self.edge_lookup
            .get(&self.key(source, target))
            .and_then(|&edge| self.inner.edge_weight(edge))
    }

    pub fn has_edge(&self, source: usize, target: usize) -> bool {
        self.edge_lookup.contains_key(&self.key(source, target))
    }

    /// Outgoing neighbors (all neighbors when undirected), ascending
    pub fn successors(&self, index: usize) -> &[usize] {
        self.out_adj.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Incoming neighbors (all neighbors when undirected), ascending
    pub fn predecessors(&self, index: usize) -> &[usize] {
        self.in_adj.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Neighbors ignoring direction, ascending and deduplicated
    pub fn neighbors_undirected(&self, index: usize) -> Vec<usize> {
        if !self.directed {
            return self.successors(index).to_vec();
        }
        let mut all: Vec<usize> = self
            .successors(index)
            .iter()
            .chain(self.predecessors(index))
            .copied()
            .collect();
        all.sort_unstable();
        all.dedup();
        all
    }

    pub fn out_degree(&self, index: usize) -> usize {
        self.successors(index).len()
    }

    pub fn in_degree(&self, index: usize) -> usize {
        self.predecessors(index).len()
    }

    /// Total degree: in + out when directed, neighbor count when undirected
    pub fn degree(&self, index: usize) -> usize {
        if self.directed {
            self.out_degree(index) + self.in_degree(index)
        } else {
            self.out_degree(index)
        }
    }

    /// Edges in insertion order as `(source, target, weight)`
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, &EdgeWeight)> + '_ {
        self.inner
            .edge_references()
            .map(|edge| (edge.source().index(), edge.target().index(), edge.weight()))
    }

    pub fn nodes(&self) -> impl Iterator<Item = (usize, &NodeWeight)> + '_ {
        self.inner
            .node_indices()
            .map(move |idx| (idx.index(), &self.inner[idx]))
    }

    /// Underlying petgraph storage. Undirected edges appear once, oriented
    /// as inserted.
    pub fn as_petgraph(&self) -> &DiGraph<NodeWeight, EdgeWeight> {
        &self.inner
    }

    /// Fail with `InvalidGraphOperation` unless `index` is a node
    pub fn check_index(&self, index: usize, context: &str) -> Result<()> {
        if self.contains_node(index) {
            Ok(())
        } else {
            Err(TreegraphError::invalid_operation(
                context,
                format!(
                    "node index {} out of range for graph with {} nodes",
                    index,
                    self.node_count()
                ),
            ))
        }
    }

    fn key(&self, source: usize, target: usize) -> (usize, usize) {
        edge_key(self.directed, source, target)
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("directed", &self.directed)
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}

fn edge_key(directed: bool, source: usize, target: usize) -> (usize, usize) {
    if directed || source <= target {
        (source, target)
    } else {
        (target, source)
    }
}

/// Incremental graph construction
///
/// Example:
/// ```ignore
/// let mut b = Graph::builder(true);
/// let a = b.add_node(NodeWeight::new("A"));
/// let c = b.add_node(NodeWeight::new("B"));
/// b.add_edge(a, c, EdgeWeight::new(EdgeKind::Custom))?;
/// let pattern = b.build();
/// ```
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    directed: bool,
    inner: DiGraph<NodeWeight, EdgeWeight>,
    edge_lookup: FxHashMap<(usize, usize), EdgeIndex>,
}

impl GraphBuilder {
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            inner: DiGraph::new(),
            edge_lookup: FxHashMap::default(),
        }
    }

    pub fn with_capacity(directed: bool, nodes: usize, edges: usize) -> Self {
        Self {
            directed,
            inner: DiGraph::with_capacity(nodes, edges),
            edge_lookup: FxHashMap::default(),
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Add a node, returning its dense index
    pub fn add_node(&mut self, weight: NodeWeight) -> usize {
        self.inner.add_node(weight).index()
    }

    pub fn has_edge(&self, source: usize, target: usize) -> bool {
        self.edge_lookup
            .contains_key(&edge_key(self.directed, source, target))
    }

    /// Add an edge. Returns `false` and keeps the existing edge if the pair is
    /// already connected.
    pub fn add_edge(&mut self, source: usize, target: usize, weight: EdgeWeight) -> Result<bool> {
        let n = self.inner.node_count();
        let context = format!("edge {} -> {}", source, target);
        if source >= n || target >= n {
            return Err(TreegraphError::invalid_operation(
                context,
                format!("endpoint out of range for graph with {} nodes", n),
            ));
        }
        if source == target {
            return Err(TreegraphError::invalid_operation(
                context,
                "self-loops are not supported",
            ));
        }

        let key = edge_key(self.directed, source, target);
        if self.edge_lookup.contains_key(&key) {
            return Ok(false);
        }
        let edge = self
            .inner
            .add_edge(NodeIndex::new(source), NodeIndex::new(target), weight);
        self.edge_lookup.insert(key, edge);
        Ok(true)
    }

    pub fn build(self) -> Graph {
        let n = self.inner.node_count();
        let mut out_adj = vec![Vec::new(); n];
        let mut in_adj = vec![Vec::new(); n];

        for edge in self.inner.edge_references() {
            let (s, t) = (edge.source().index(), edge.target().index());
            if self.directed {
                out_adj[s].push(t);
                in_adj[t].push(s);
            } else {
                out_adj[s].push(t);
                out_adj[t].push(s);
            }
        }
        for list in out_adj.iter_mut().chain(in_adj.iter_mut()) {
            list.sort_unstable();
        }
        if !self.directed {
            in_adj = out_adj.clone();
        }

        Graph {
            inner: self.inner,
            directed: self.directed,
            out_adj,
            in_adj,
            edge_lookup: self.edge_lookup,
        }
    }
}
