//! Feature modules - each a vertical slice
//!
//! Larger slices split into:
//! - domain/         - Pure types and rules
//! - infrastructure/ - Algorithms and external dependency adapters

// Tree-sitter adapter producing the node arena
pub mod parsing;

// Lazy node collections, predicate algebra, dispatch tables
pub mod query_engine;

// Collection -> abstract graph with index/node bijection
pub mod graph_projection;

// VF2-style subgraph isomorphism
pub mod pattern_matching;

// Paths, cycles, components, centrality
pub mod graph_analytics;
