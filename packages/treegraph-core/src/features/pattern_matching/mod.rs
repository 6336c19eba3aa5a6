//! Pattern Matching
//!
//! Subgraph isomorphism between a pattern graph and a target graph.
//!
//! # Usage
//! ```ignore
//! use treegraph_core::features::pattern_matching::{matchers, MatchOptions, SubgraphMatcher};
//!
//! let matches = SubgraphMatcher::new(&pattern.graph)
//!     .node_matcher(matchers::same_type_name())
//!     .find_matches(&target.graph)?;
//! for m in &matches {
//!     let node = target.node(m.target(0).unwrap());
//! }
//! ```

pub mod domain;
pub mod infrastructure;

pub use domain::matchers;
pub use domain::{EdgeMatcher, Match, MatchOptions, NodeMatcher};
pub use infrastructure::SubgraphMatcher;

use crate::errors::Result;
use crate::features::graph_projection::ProjectionOptions;
use crate::features::query_engine::NodeCollection;

/// Project both collections with `projection` and match by grammar type name
/// and edge kind.
///
/// Match indices refer to the two projections; use `to_graph` directly when
/// the bijections are needed.
pub fn find_pattern_matches(
    pattern_nodes: &NodeCollection,
    target_nodes: &NodeCollection,
    projection: &ProjectionOptions,
    options: MatchOptions,
) -> Result<Vec<Match>> {
    let pattern = pattern_nodes.to_graph(projection)?;
    let target = target_nodes.to_graph(projection)?;
    SubgraphMatcher::new(&pattern.graph)
        .node_matcher(matchers::same_type_name())
        .edge_matcher(matchers::same_edge_kind())
        .options(options)
        .find_matches(&target.graph)
}
