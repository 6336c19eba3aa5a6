//! Graph Projection
//!
//! Turns a node collection into an abstract graph with a bijection back to
//! the syntax nodes. The same `Graph` type is used for hand-built patterns
//! (`GraphBuilder`), matching targets and analytics.
//!
//! # Usage
//! ```ignore
//! use treegraph_core::features::graph_projection::ProjectionOptions;
//!
//! let projection = collection.to_graph(&ProjectionOptions::new().include_siblings(true))?;
//! let root = projection.node(0);
//! ```

pub mod domain;
pub mod infrastructure;

pub use domain::{AttrMap, EdgeKind, EdgeWeight, Graph, GraphBuilder, NodeBijection, NodeWeight};
pub use infrastructure::{
    project, EdgeAttrFn, EdgePredicate, GraphProjection, NodeAttrFn, ProjectionOptions,
    RESERVED_EDGE_KEY, RESERVED_NODE_KEY,
};
