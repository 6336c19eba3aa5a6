// NodeCollection - Lazy, persistent node sets
//
// A collection is a deduplicated, insertion-ordered backing set plus a chain of
// pending predicates:
// - Filtering: .filter() appends to the chain in O(1), nothing is traversed
// - Materializing: .iter(), .to_list(), .count(), .first(), .contains()
// - Set algebra: .union(), .intersection(), .difference(), .symmetric_difference()
// - Mapping: .map(), .map_values(), .transform(), .transform_with()
// - Structure: .descendants(), .ancestors(), .siblings(), .groupby()
// - Projection: .to_graph()
//
// Identity is structural (see `IdentityIndex`). Collections are values: every
// operation returns a new collection and leaves its inputs untouched.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use super::dispatch::DispatchTable;
use super::domain::predicate::Predicate;
use crate::errors::Result;
use crate::features::graph_projection::{project, GraphProjection, ProjectionOptions};
use crate::shared::models::{IdentityIndex, NodeKind, SyntaxNode, SyntaxTree};

/// One link of the pending predicate chain (newest first)
struct PendingFilter {
    predicate: Predicate,
    prev: Option<Arc<PendingFilter>>,
}

impl Drop for PendingFilter {
    // Unlink uniquely owned predecessors one at a time; a shared link stops
    // the walk since another collection still holds it.
    fn drop(&mut self) {
        let mut next = self.prev.take();
        while let Some(link) = next {
            next = match Arc::try_unwrap(link) {
                Ok(mut filter) => filter.prev.take(),
                Err(_) => None,
            };
        }
    }
}

/// Lazy node collection
///
/// Example:
/// ```ignore
/// let calls = NodeCollection::from_tree(&tree)?
///     .filter_type("call")
///     .filter(Predicate::text_contains("print"));
///
/// for call in calls.iter() {
///     println!("{}", call.describe());
/// }
/// ```
#[derive(Clone)]
pub struct NodeCollection {
    base: Arc<IdentityIndex>,
    pending: Option<Arc<PendingFilter>>,
    pending_len: usize,
}

impl NodeCollection {
    // ═══════════════════════════════════════════════════════════════════════
    // Construction
    // ═══════════════════════════════════════════════════════════════════════

    pub fn empty() -> Self {
        Self::from_index(IdentityIndex::new())
    }

    /// Every node of the tree in pre-order
    pub fn from_tree(tree: &Arc<SyntaxTree>) -> Result<Self> {
        Ok(Self::from_index(IdentityIndex::from_nodes(tree.nodes())?))
    }

    /// `node` followed by its strict descendants in pre-order
    pub fn from_subtree(node: &SyntaxNode) -> Result<Self> {
        let nodes = std::iter::once(node.clone()).chain(node.descendants());
        Ok(Self::from_index(IdentityIndex::from_nodes(nodes)?))
    }

    /// Explicit node list. Duplicates (by structural identity) keep their
    /// first position.
    pub fn from_nodes(nodes: impl IntoIterator<Item = SyntaxNode>) -> Result<Self> {
        Ok(Self::from_index(IdentityIndex::from_nodes(nodes)?))
    }

    fn from_index(index: IdentityIndex) -> Self {
        Self {
            base: Arc::new(index),
            pending: None,
            pending_len: 0,
        }
    }

    fn from_unique(nodes: Vec<SyntaxNode>) -> Self {
        Self::from_index(IdentityIndex::from_unique(nodes))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Lazy filtering
    // ═══════════════════════════════════════════════════════════════════════

    /// Queue a predicate. O(1); the receiver is unchanged.
    pub fn filter(&self, predicate: Predicate) -> Self {
        Self {
            base: Arc::clone(&self.base),
            pending: Some(Arc::new(PendingFilter {
                predicate,
                prev: self.pending.clone(),
            })),
            pending_len: self.pending_len + 1,
        }
    }

    pub fn filter_type(&self, type_name: &str) -> Self {
        self.filter(Predicate::type_name(type_name))
    }

    pub fn filter_text(&self, text: &str) -> Self {
        self.filter(Predicate::text_eq(text))
    }

    pub fn filter_text_contains(&self, needle: &str) -> Self {
        self.filter(Predicate::text_contains(needle))
    }

    pub fn filter_kind(&self, kind: NodeKind) -> Self {
        self.filter(Predicate::kind(kind))
    }

    /// Filter with a custom predicate
    ///
    /// Example:
    /// ```ignore
    /// .where_fn(|n| n.child_count() > 3)
    /// ```
    pub fn where_fn<F>(&self, f: F) -> Self
    where
        F: Fn(&SyntaxNode) -> bool + Send + Sync + 'static,
    {
        self.filter(Predicate::custom(f))
    }

    /// Number of queued, not yet applied predicates
    pub fn pending_filters(&self) -> usize {
        self.pending_len
    }

    /// Size of the backing set before filtering
    pub fn backing_len(&self) -> usize {
        self.base.len()
    }

    /// Queued predicates in the order they were added
    fn chain(&self) -> Vec<&Predicate> {
        let mut chain = Vec::with_capacity(self.pending_len);
        let mut link = self.pending.as_deref();
        while let Some(filter) = link {
            chain.push(&filter.predicate);
            link = filter.prev.as_deref();
        }
        chain.reverse();
        chain
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Materialization
    // ═══════════════════════════════════════════════════════════════════════

    /// Survivors in insertion order. Predicates run on demand, conjunctively
    /// and in the order they were queued.
    pub fn iter(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        let chain = self.chain();
        self.base
            .nodes()
            .iter()
            .filter(move |node| chain.iter().all(|p| p.matches(node)))
            .cloned()
    }

    pub fn to_list(&self) -> Vec<SyntaxNode> {
        self.iter().collect()
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn first(&self) -> Option<SyntaxNode> {
        self.iter().next()
    }

    pub fn is_empty(&self) -> bool {
        self.first().is_none()
    }

    /// Whether a structurally equal node survives the chain
    pub fn contains(&self, node: &SyntaxNode) -> Result<bool> {
        match self.base.position(node)? {
            None => Ok(false),
            Some(position) => {
                let member = &self.base.nodes()[position];
                Ok(self.chain().iter().all(|p| p.matches(member)))
            }
        }
    }

    pub fn find_first(&self, predicate: &Predicate) -> Option<SyntaxNode> {
        self.iter().find(|node| predicate.matches(node))
    }

    pub fn find_all(&self, predicate: &Predicate) -> Vec<SyntaxNode> {
        self.iter().filter(|node| predicate.matches(node)).collect()
    }

    pub fn count_where(&self, predicate: &Predicate) -> usize {
        self.iter().filter(|node| predicate.matches(node)).count()
    }

    /// Apply the chain now. The result has no pending predicates.
    pub fn materialize(&self) -> Self {
        if self.pending.is_none() {
            return self.clone();
        }
        Self::from_unique(self.to_list())
    }

    fn survivor_index(&self) -> Arc<IdentityIndex> {
        if self.pending.is_none() {
            Arc::clone(&self.base)
        } else {
            Arc::new(IdentityIndex::from_unique(self.to_list()))
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Set algebra
    // ═══════════════════════════════════════════════════════════════════════

    /// Left survivors, then right survivors not already present
    pub fn union(&self, other: &NodeCollection) -> Result<Self> {
        let mut index = (*self.survivor_index()).clone();
        for node in other.iter() {
            index.insert(node)?;
        }
        debug!(
            left = self.backing_len(),
            right = other.backing_len(),
            result = index.len(),
            "NodeCollection union"
        );
        Ok(Self::from_index(index))
    }

    /// Left survivors also present on the right, in left order
    pub fn intersection(&self, other: &NodeCollection) -> Result<Self> {
        let right = other.survivor_index();
        let mut kept = Vec::new();
        for node in self.iter() {
            if right.contains(&node)? {
                kept.push(node);
            }
        }
        Ok(Self::from_unique(kept))
    }

    /// Left survivors absent on the right, in left order
    pub fn difference(&self, other: &NodeCollection) -> Result<Self> {
        let right = other.survivor_index();
        let mut kept = Vec::new();
        for node in self.iter() {
            if !right.contains(&node)? {
                kept.push(node);
            }
        }
        Ok(Self::from_unique(kept))
    }

    /// Left-only survivors, then right-only survivors
    pub fn symmetric_difference(&self, other: &NodeCollection) -> Result<Self> {
        let left = self.survivor_index();
        let right = other.survivor_index();
        let mut kept = Vec::new();
        for node in left.nodes() {
            if !right.contains(node)? {
                kept.push(node.clone());
            }
        }
        for node in right.nodes() {
            if !left.contains(node)? {
                kept.push(node.clone());
            }
        }
        Ok(Self::from_unique(kept))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Mapping
    // ═══════════════════════════════════════════════════════════════════════

    /// Map every survivor to a node; the result is deduplicated
    pub fn map<F>(&self, f: F) -> Result<Self>
    where
        F: Fn(&SyntaxNode) -> SyntaxNode,
    {
        Self::from_nodes(self.iter().map(|node| f(&node)))
    }

    /// Map every survivor to an arbitrary value, in order
    pub fn map_values<T, F>(&self, f: F) -> Vec<T>
    where
        F: Fn(&SyntaxNode) -> T,
    {
        self.iter().map(|node| f(&node)).collect()
    }

    /// Filter-map: survivors mapping to `None` are dropped
    pub fn transform<T, F>(&self, f: F) -> Vec<T>
    where
        F: Fn(&SyntaxNode) -> Option<T>,
    {
        self.iter().filter_map(|node| f(&node)).collect()
    }

    /// Transform through a per-type dispatch table
    pub fn transform_with<T>(&self, table: &DispatchTable<T>) -> Vec<T> {
        self.iter().filter_map(|node| table.dispatch(&node)).collect()
    }

    /// Partition survivors by key. Groups appear in first-seen key order and
    /// members keep their order.
    pub fn groupby<K, F>(&self, key_fn: F) -> Vec<(K, NodeCollection)>
    where
        K: Eq + Hash + Clone,
        F: Fn(&SyntaxNode) -> K,
    {
        let mut slots: FxHashMap<K, usize> = FxHashMap::default();
        let mut groups: Vec<(K, Vec<SyntaxNode>)> = Vec::new();
        for node in self.iter() {
            let key = key_fn(&node);
            match slots.get(&key) {
                Some(&slot) => groups[slot].1.push(node),
                None => {
                    slots.insert(key.clone(), groups.len());
                    groups.push((key, vec![node]));
                }
            }
        }
        groups
            .into_iter()
            .map(|(key, members)| (key, Self::from_unique(members)))
            .collect()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Structural navigation
    // ═══════════════════════════════════════════════════════════════════════

    /// Strict descendants of every survivor, pre-order per member,
    /// deduplicated in first-encountered order
    pub fn descendants(&self) -> Result<Self> {
        let mut index = IdentityIndex::new();
        for node in self.iter() {
            for descendant in node.descendants() {
                index.insert(descendant)?;
            }
        }
        Ok(Self::from_index(index))
    }

    /// Strict ancestors of every survivor, nearest first per member,
    /// deduplicated in first-encountered order
    pub fn ancestors(&self) -> Result<Self> {
        let mut index = IdentityIndex::new();
        for node in self.iter() {
            for ancestor in node.ancestors() {
                index.insert(ancestor)?;
            }
        }
        Ok(Self::from_index(index))
    }

    /// Siblings of `of` that survive in this collection, in child order.
    /// `of` itself is excluded; a node without a parent has no siblings.
    pub fn siblings(&self, of: &SyntaxNode) -> Result<Self> {
        let Some(parent) = of.parent() else {
            return Ok(Self::empty());
        };
        let members = self.survivor_index();
        let mut seen = Vec::new();
        for child in parent.children() {
            if child.same_instance(of) || child == *of {
                continue;
            }
            // structurally equal siblings (zero-width recovery nodes) share a slot
            if let Some(position) = members.position(&child)? {
                if !seen.contains(&position) {
                    seen.push(position);
                }
            }
        }
        let kept = seen.into_iter().map(|p| members.nodes()[p].clone()).collect();
        Ok(Self::from_unique(kept))
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Projection
    // ═══════════════════════════════════════════════════════════════════════

    /// Project survivors into a graph
    pub fn to_graph(&self, options: &ProjectionOptions) -> Result<GraphProjection> {
        project(&self.to_list(), options)
    }
}

impl Default for NodeCollection {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for NodeCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeCollection")
            .field("backing", &self.base.len())
            .field("pending", &self.chain())
            .finish()
    }
}
