//! Per-type dispatch for collection transforms
//!
//! Maps grammar type names (and, as a second tier, `NodeKind`s) to transform
//! functions. Lookup order: exact type name, then kind, then fallback. A node
//! with no handler yields `None` and is dropped by `transform_with`.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::shared::models::{NodeKind, SyntaxNode};

type Handler<T> = Arc<dyn Fn(&SyntaxNode) -> Option<T> + Send + Sync>;

/// Type-name keyed table of node transforms
pub struct DispatchTable<T> {
    by_type: FxHashMap<String, Handler<T>>,
    by_kind: FxHashMap<NodeKind, Handler<T>>,
    fallback: Option<Handler<T>>,
}

impl<T> DispatchTable<T> {
    pub fn new() -> Self {
        Self {
            by_type: FxHashMap::default(),
            by_kind: FxHashMap::default(),
            fallback: None,
        }
    }

    /// Handle nodes whose grammar type name is `type_name`
    pub fn on<F>(mut self, type_name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&SyntaxNode) -> Option<T> + Send + Sync + 'static,
    {
        self.by_type.insert(type_name.into(), Arc::new(handler));
        self
    }

    /// Handle nodes of `kind` that have no type-name handler
    pub fn on_kind<F>(mut self, kind: NodeKind, handler: F) -> Self
    where
        F: Fn(&SyntaxNode) -> Option<T> + Send + Sync + 'static,
    {
        self.by_kind.insert(kind, Arc::new(handler));
        self
    }

    /// Handle everything else
    pub fn fallback<F>(mut self, handler: F) -> Self
    where
        F: Fn(&SyntaxNode) -> Option<T> + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(handler));
        self
    }

    pub fn handles(&self, node: &SyntaxNode) -> bool {
        self.handler_for(node).is_some()
    }

    pub fn dispatch(&self, node: &SyntaxNode) -> Option<T> {
        self.handler_for(node).and_then(|handler| handler(node))
    }

    fn handler_for(&self, node: &SyntaxNode) -> Option<&Handler<T>> {
        self.by_type
            .get(node.type_name())
            .or_else(|| self.by_kind.get(&node.kind()))
            .or(self.fallback.as_ref())
    }
}

impl<T> Default for DispatchTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for DispatchTable<T> {
    fn clone(&self) -> Self {
        Self {
            by_type: self.by_type.clone(),
            by_kind: self.by_kind.clone(),
            fallback: self.fallback.clone(),
        }
    }
}

impl<T> fmt::Debug for DispatchTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.by_type.keys().collect();
        types.sort();
        let mut kinds: Vec<_> = self.by_kind.keys().map(|k| k.as_str()).collect();
        kinds.sort();
        f.debug_struct("DispatchTable")
            .field("types", &types)
            .field("kinds", &kinds)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{KindRegistry, NodeSpec, SyntaxTree};

    #[test]
    fn test_lookup_order() {
        // x = 1
        let root = NodeSpec::new("module", 0..5).child(
            NodeSpec::new("assignment", 0..5).children([
                NodeSpec::new("identifier", 0..1),
                NodeSpec::anonymous("=", 2..3),
                NodeSpec::new("integer", 4..5),
            ]),
        );
        let tree = SyntaxTree::build("x = 1", root, &KindRegistry::python()).unwrap();

        let table = DispatchTable::new()
            .on("identifier", |n| Some(format!("name:{}", n.text())))
            .on_kind(NodeKind::Literal, |n| Some(format!("lit:{}", n.text())))
            .on("=", |_| None);

        let out: Vec<_> = tree.nodes().filter_map(|n| table.dispatch(&n)).collect();
        assert_eq!(out, vec!["name:x".to_string(), "lit:1".to_string()]);
        assert!(!table.handles(&tree.root()));

        let with_fallback = table.fallback(|n| Some(n.type_name().to_string()));
        assert_eq!(with_fallback.dispatch(&tree.root()).as_deref(), Some("module"));
    }
}
