//! Ready-made node and edge matchers

use std::sync::Arc;

use super::matching::{EdgeMatcher, NodeMatcher};
use crate::errors::CallbackResult;
use crate::features::graph_projection::{EdgeWeight, NodeWeight};

/// Wrap a closure as a `NodeMatcher`
pub fn node_matcher<F>(f: F) -> NodeMatcher
where
    F: Fn(&NodeWeight, &NodeWeight) -> CallbackResult<bool> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as an `EdgeMatcher`
pub fn edge_matcher<F>(f: F) -> EdgeMatcher
where
    F: Fn(&EdgeWeight, &EdgeWeight) -> CallbackResult<bool> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Nodes match when their grammar type names are equal
pub fn same_type_name() -> NodeMatcher {
    node_matcher(|pattern, target| Ok(pattern.type_name == target.type_name))
}

/// Nodes match when their kinds are equal
pub fn same_kind() -> NodeMatcher {
    node_matcher(|pattern, target| Ok(pattern.kind == target.kind))
}

/// Nodes match when the pattern's value for `key` equals the target's.
/// A pattern node without the key matches anything.
pub fn attr_equals(key: impl Into<String>) -> NodeMatcher {
    let key = key.into();
    node_matcher(move |pattern, target| {
        Ok(match pattern.attrs.get(&key) {
            None => true,
            Some(expected) => target.attrs.get(&key) == Some(expected),
        })
    })
}

/// Edges match when their kinds are equal
pub fn same_edge_kind() -> EdgeMatcher {
    edge_matcher(|pattern, target| Ok(pattern.kind == target.kind))
}
