//! Collection → graph projection
//!
//! # Algorithm
//!
//! 1. Assign dense indices to distinct nodes in encounter order
//! 2. Parent → child edges from every projected node to each of its children
//!    that is also projected (a node shared by two trees gets both parents)
//! 3. (optional) Sibling chain edges between consecutive projected children of
//!    each projected parent, ordered by start byte
//! 4. (optional) Custom edges from a pairwise predicate
//!
//! Earlier steps win when two steps connect the same pair.
//!
//! # Performance
//!
//! - Steps 1-3: O(N) expected
//! - Step 4: O(N²) predicate calls, refused above `max_pairwise_nodes`

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::ProjectionConfig;
use crate::errors::{CallbackResult, Result, TreegraphError};
use crate::features::graph_projection::domain::{
    AttrMap, EdgeKind, EdgeWeight, Graph, GraphBuilder, NodeBijection, NodeWeight,
};
use crate::shared::models::{IdentityIndex, SyntaxNode};

/// Reserved node attribute key (the type name is stored on `NodeWeight`)
pub const RESERVED_NODE_KEY: &str = "type_name";
/// Reserved edge attribute key (the edge kind is stored on `EdgeWeight`)
pub const RESERVED_EDGE_KEY: &str = "edge_kind";

/// Default pairwise-predicate node limit (the balanced preset)
pub const DEFAULT_MAX_PAIRWISE_NODES: usize = 2048;

pub type EdgePredicate = Arc<dyn Fn(&SyntaxNode, &SyntaxNode) -> CallbackResult<bool> + Send + Sync>;
pub type NodeAttrFn = Arc<dyn Fn(&SyntaxNode) -> CallbackResult<AttrMap> + Send + Sync>;
pub type EdgeAttrFn =
    Arc<dyn Fn(&SyntaxNode, &SyntaxNode, EdgeKind) -> CallbackResult<AttrMap> + Send + Sync>;

/// Projection settings
#[derive(Clone)]
pub struct ProjectionOptions {
    directed: bool,
    include_siblings: bool,
    max_pairwise_nodes: usize,
    edge_predicate: Option<EdgePredicate>,
    node_attrs: Option<NodeAttrFn>,
    edge_attrs: Option<EdgeAttrFn>,
}

impl ProjectionOptions {
    pub fn new() -> Self {
        Self {
            directed: true,
            include_siblings: false,
            max_pairwise_nodes: DEFAULT_MAX_PAIRWISE_NODES,
            edge_predicate: None,
            node_attrs: None,
            edge_attrs: None,
        }
    }

    /// Directed projection with budgets taken from `config`
    pub fn from_config(config: &ProjectionConfig) -> Self {
        Self::new()
            .include_siblings(config.include_siblings)
            .max_pairwise_nodes(config.max_pairwise_nodes)
    }

    pub fn directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    pub fn include_siblings(mut self, enabled: bool) -> Self {
        self.include_siblings = enabled;
        self
    }

    pub fn max_pairwise_nodes(mut self, limit: usize) -> Self {
        self.max_pairwise_nodes = limit;
        self
    }

    /// Add a `Custom` edge for every pair the predicate accepts.
    /// Directed graphs test every ordered pair, undirected every unordered pair.
    pub fn edge_predicate<F>(mut self, f: F) -> Self
    where
        F: Fn(&SyntaxNode, &SyntaxNode) -> CallbackResult<bool> + Send + Sync + 'static,
    {
        self.edge_predicate = Some(Arc::new(f));
        self
    }

    pub fn node_attrs<F>(mut self, f: F) -> Self
    where
        F: Fn(&SyntaxNode) -> CallbackResult<AttrMap> + Send + Sync + 'static,
    {
        self.node_attrs = Some(Arc::new(f));
        self
    }

    pub fn edge_attrs<F>(mut self, f: F) -> Self
    where
        F: Fn(&SyntaxNode, &SyntaxNode, EdgeKind) -> CallbackResult<AttrMap> + Send + Sync + 'static,
    {
        self.edge_attrs = Some(Arc::new(f));
        self
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProjectionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectionOptions")
            .field("directed", &self.directed)
            .field("include_siblings", &self.include_siblings)
            .field("max_pairwise_nodes", &self.max_pairwise_nodes)
            .field("edge_predicate", &self.edge_predicate.is_some())
            .field("node_attrs", &self.node_attrs.is_some())
            .field("edge_attrs", &self.edge_attrs.is_some())
            .finish()
    }
}

/// Graph plus the bijection back to syntax nodes
#[derive(Debug, Clone)]
pub struct GraphProjection {
    pub graph: Graph,
    pub bijection: NodeBijection,
}

impl GraphProjection {
    pub fn node(&self, index: usize) -> Option<&SyntaxNode> {
        self.bijection.node(index)
    }

    pub fn index_of(&self, node: &SyntaxNode) -> Result<Option<usize>> {
        self.bijection.index_of(node)
    }
}

/// Project `nodes` into a graph
pub fn project(nodes: &[SyntaxNode], options: &ProjectionOptions) -> Result<GraphProjection> {
    let index = IdentityIndex::from_nodes(nodes.iter().cloned())?;
    let members = index.nodes();
    let n = members.len();

    if options.edge_predicate.is_some() && n > options.max_pairwise_nodes {
        warn!(
            nodes = n,
            limit = options.max_pairwise_nodes,
            "Pairwise edge predicate refused: too many nodes"
        );
        return Err(TreegraphError::exhausted(
            "pairwise edge predicate nodes",
            options.max_pairwise_nodes,
        ));
    }

    let mut builder = GraphBuilder::with_capacity(options.directed, n, n);

    // Step 1: nodes
    for node in members {
        let mut weight = NodeWeight {
            type_name: node.type_name().to_string(),
            kind: node.kind(),
            range: node.byte_range(),
            depth: node.depth(),
            attrs: AttrMap::new(),
        };
        if let Some(node_attrs) = &options.node_attrs {
            let attrs = node_attrs(node)
                .map_err(|e| TreegraphError::invalid_operation(node.describe(), e))?;
            if attrs.contains_key(RESERVED_NODE_KEY) {
                return Err(TreegraphError::invalid_operation(
                    node.describe(),
                    format!("attribute key '{}' is reserved", RESERVED_NODE_KEY),
                ));
            }
            weight.attrs = attrs;
        }
        builder.add_node(weight);
    }

    // Step 2: parent → child, read from each member's own children so a node
    // shared by several trees keeps an edge from every projected parent
    let mut children_of: Vec<Vec<usize>> = Vec::with_capacity(n);
    for node in members {
        let mut present = Vec::new();
        for child in node.children() {
            if let Some(position) = index.position(&child)? {
                if !present.contains(&position) {
                    present.push(position);
                }
            }
        }
        children_of.push(present);
    }
    let mut baseline = 0;
    for (parent, children) in children_of.iter().enumerate() {
        for &child in children {
            if add_edge(&mut builder, members, options, parent, child, EdgeKind::ParentChild)? {
                baseline += 1;
            }
        }
    }

    // Step 3: sibling chains
    let mut siblings = 0;
    if options.include_siblings {
        for children in &mut children_of {
            children.sort_by_key(|&i| (members[i].start_byte(), i));
            for pair in children.windows(2) {
                if add_edge(&mut builder, members, options, pair[0], pair[1], EdgeKind::Sibling)? {
                    siblings += 1;
                }
            }
        }
    }

    // Step 4: pairwise predicate
    let mut custom = 0;
    if let Some(predicate) = &options.edge_predicate {
        for i in 0..n {
            let start = if options.directed { 0 } else { i + 1 };
            for j in start..n {
                if i == j {
                    continue;
                }
                let accepted = predicate(&members[i], &members[j])
                    .map_err(|e| TreegraphError::invalid_operation(pair_context(members, i, j), e))?;
                if accepted && add_edge(&mut builder, members, options, i, j, EdgeKind::Custom)? {
                    custom += 1;
                }
            }
        }
    }

    info!(
        nodes = n,
        parent_child = baseline,
        sibling = siblings,
        custom = custom,
        directed = options.directed,
        "Projected collection to graph"
    );

    Ok(GraphProjection {
        graph: builder.build(),
        bijection: NodeBijection::new(index),
    })
}

/// Add one edge if the pair is free. Returns whether it was added.
fn add_edge(
    builder: &mut GraphBuilder,
    members: &[SyntaxNode],
    options: &ProjectionOptions,
    source: usize,
    target: usize,
    kind: EdgeKind,
) -> Result<bool> {
    if builder.has_edge(source, target) {
        return Ok(false);
    }
    let mut weight = EdgeWeight::new(kind);
    if let Some(edge_attrs) = &options.edge_attrs {
        let context = || pair_context(members, source, target);
        let attrs = edge_attrs(&members[source], &members[target], kind)
            .map_err(|e| TreegraphError::invalid_operation(context(), e))?;
        if attrs.contains_key(RESERVED_EDGE_KEY) {
            return Err(TreegraphError::invalid_operation(
                context(),
                format!("attribute key '{}' is reserved", RESERVED_EDGE_KEY),
            ));
        }
        weight.attrs = attrs;
    }
    builder.add_edge(source, target, weight)
}

fn pair_context(members: &[SyntaxNode], source: usize, target: usize) -> String {
    format!(
        "{} -> {}",
        members[source].describe(),
        members[target].describe()
    )
}
