//! Graph projection domain: graph model and node bijection

pub mod bijection;
pub mod graph;

pub use bijection::NodeBijection;
pub use graph::{AttrMap, EdgeKind, EdgeWeight, Graph, GraphBuilder, NodeWeight};
