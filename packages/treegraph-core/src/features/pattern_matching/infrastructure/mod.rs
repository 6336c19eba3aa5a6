//! Subgraph search

pub mod vf2;

pub use vf2::SubgraphMatcher;
