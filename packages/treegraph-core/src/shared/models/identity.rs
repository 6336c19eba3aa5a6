//! Structural identity index
//!
//! Deduplicates nodes by structural identity while keeping first-encountered
//! order. Lookups go through the fingerprint and every hit is confirmed with a
//! deep comparison; a hit that fails the comparison means identity is broken
//! and is reported as `IdentityInconsistency` instead of being merged.

use rustc_hash::FxHashMap;

use super::syntax_node::{structurally_equal, Fingerprint, SyntaxNode};
use crate::errors::{Result, TreegraphError};

/// Insertion-ordered set of nodes keyed by structural identity
#[derive(Debug, Default, Clone)]
pub struct IdentityIndex {
    slots: FxHashMap<Fingerprint, usize>,
    nodes: Vec<SyntaxNode>,
}

impl IdentityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Build from an iterator, keeping the first occurrence of each member
    pub fn from_nodes(nodes: impl IntoIterator<Item = SyntaxNode>) -> Result<Self> {
        let mut index = Self::new();
        for node in nodes {
            index.insert(node)?;
        }
        Ok(index)
    }

    /// Build from nodes already known to be pairwise distinct (a filtered or
    /// partitioned slice of another index). Skips the equality check.
    pub(crate) fn from_unique(nodes: Vec<SyntaxNode>) -> Self {
        let mut slots = FxHashMap::with_capacity_and_hasher(nodes.len(), Default::default());
        for (position, node) in nodes.iter().enumerate() {
            let previous = slots.insert(*node.fingerprint(), position);
            debug_assert!(previous.is_none(), "duplicate member {}", node.describe());
        }
        Self { slots, nodes }
    }

    /// Insert a node. Returns its dense position and whether it was new.
    pub fn insert(&mut self, node: SyntaxNode) -> Result<(usize, bool)> {
        if let Some(position) = self.position(&node)? {
            return Ok((position, false));
        }
        let position = self.nodes.len();
        self.slots.insert(*node.fingerprint(), position);
        self.nodes.push(node);
        Ok((position, true))
    }

    /// Dense position of a structurally equal member, if any
    pub fn position(&self, node: &SyntaxNode) -> Result<Option<usize>> {
        match self.slots.get(node.fingerprint()) {
            None => Ok(None),
            Some(&position) => {
                let member = &self.nodes[position];
                if member.same_instance(node) || structurally_equal(member, node) {
                    Ok(Some(position))
                } else {
                    Err(TreegraphError::IdentityInconsistency {
                        left: member.describe(),
                        right: node.describe(),
                    })
                }
            }
        }
    }

    pub fn contains(&self, node: &SyntaxNode) -> Result<bool> {
        Ok(self.position(node)?.is_some())
    }

    pub fn get(&self, position: usize) -> Option<&SyntaxNode> {
        self.nodes.get(position)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[SyntaxNode] {
        &self.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{KindRegistry, NodeSpec, SyntaxTree};

    fn tree(source: &str) -> std::sync::Arc<SyntaxTree> {
        let len = source.len();
        let root = NodeSpec::new("module", 0..len).child(NodeSpec::new("identifier", 0..len));
        SyntaxTree::build(source.to_string(), root, &KindRegistry::empty()).unwrap()
    }

    #[test]
    fn test_dedup_keeps_first_instance() {
        let a = tree("abc");
        let b = tree("abc");

        let mut index = IdentityIndex::new();
        assert_eq!(index.insert(a.root()).unwrap(), (0, true));
        assert_eq!(index.insert(b.root()).unwrap(), (0, false));
        assert_eq!(index.insert(b.root().child(0).unwrap()).unwrap(), (1, true));

        assert_eq!(index.len(), 2);
        assert!(index.get(0).unwrap().same_instance(&a.root()));
        assert!(index.contains(&b.root()).unwrap());
        assert!(!index.contains(&tree("xyz").root()).unwrap());
    }

    #[test]
    fn test_fingerprint_collision_fails_fast() {
        let real = tree("abc");
        let forged = SyntaxTree::with_root_fingerprint(tree("xyz"), *real.root().fingerprint());
        assert_eq!(real.root().fingerprint(), forged.root().fingerprint());

        let mut index = IdentityIndex::new();
        index.insert(real.root()).unwrap();
        let err = index.insert(forged.root()).unwrap_err();
        assert!(matches!(err, TreegraphError::IdentityInconsistency { .. }));
        assert_eq!(index.len(), 1);
        assert!(index.contains(&forged.root()).is_err());
    }

    #[test]
    fn test_set_operations_surface_collision() {
        use crate::features::query_engine::NodeCollection;

        let real = tree("abc");
        let forged = SyntaxTree::with_root_fingerprint(tree("xyz"), *real.root().fingerprint());
        let left = NodeCollection::from_tree(&real).unwrap();
        let right = NodeCollection::from_tree(&forged).unwrap();

        for result in [
            left.union(&right),
            left.intersection(&right),
            left.difference(&right),
        ] {
            assert!(matches!(
                result,
                Err(TreegraphError::IdentityInconsistency { .. })
            ));
        }
        assert!(NodeCollection::from_nodes([real.root(), forged.root()]).is_err());
    }
}
