//! Projection of node collections into graphs

pub mod projector;

pub use projector::{
    project, EdgeAttrFn, EdgePredicate, GraphProjection, NodeAttrFn, ProjectionOptions,
    RESERVED_EDGE_KEY, RESERVED_NODE_KEY,
};
