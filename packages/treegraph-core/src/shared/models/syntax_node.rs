//! Immutable syntax tree arena and node handles
//!
//! A `SyntaxTree` owns the source text and a flat `Vec` of node records laid
//! out in pre-order. Parent/child relations are `NodeId` indices, so the
//! strict descendants of a node are the contiguous id range that follows it.
//!
//! A `SyntaxNode` is a cheap handle (`Arc<SyntaxTree>` + `NodeId`). Equality
//! and hashing are *structural*: type name, byte range, text and children.
//! Every record carries a blake3 fingerprint computed bottom-up over exactly
//! those fields; `Hash` uses the fingerprint and `Eq` confirms a fingerprint
//! hit with a deep comparison.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::kind::{Capabilities, KindRegistry, NodeKind, NodeShape};
use super::span::{ByteRange, Point};
use crate::errors::{Result, TreegraphError};

/// 32-byte structural fingerprint
pub type Fingerprint = [u8; 32];

/// Index of a node inside its `SyntaxTree` (pre-order position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct NodeRecord {
    type_name: Arc<str>,
    kind: NodeKind,
    capabilities: Capabilities,
    range: ByteRange,
    start_point: Point,
    end_point: Point,
    is_named: bool,
    field_name: Option<Arc<str>>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Exclusive end of this node's pre-order id range
    subtree_end: u32,
    depth: usize,
    fingerprint: Fingerprint,
}

/// Immutable parsed tree
#[derive(Debug)]
pub struct SyntaxTree {
    source: Arc<str>,
    records: Vec<NodeRecord>,
}

impl SyntaxTree {
    /// Build a tree from a nested `NodeSpec` description
    pub fn build(
        source: impl Into<Arc<str>>,
        root: NodeSpec,
        registry: &KindRegistry,
    ) -> Result<Arc<SyntaxTree>> {
        let mut builder = SyntaxTreeBuilder::new(source, registry);
        builder.push_spec(&root)?;
        builder.finish()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn root(self: &Arc<Self>) -> SyntaxNode {
        SyntaxNode {
            tree: Arc::clone(self),
            id: NodeId(0),
        }
    }

    pub fn node(self: &Arc<Self>, id: NodeId) -> Option<SyntaxNode> {
        (id.index() < self.records.len()).then(|| SyntaxNode {
            tree: Arc::clone(self),
            id,
        })
    }

    /// All nodes in pre-order
    pub fn nodes(self: &Arc<Self>) -> impl Iterator<Item = SyntaxNode> + '_ {
        (0..self.records.len() as u32).map(move |id| SyntaxNode {
            tree: Arc::clone(self),
            id: NodeId(id),
        })
    }

    fn record(&self, id: NodeId) -> &NodeRecord {
        &self.records[id.index()]
    }
}

#[cfg(test)]
impl SyntaxTree {
    /// Overwrite the root fingerprint, simulating a hash collision
    pub(crate) fn with_root_fingerprint(
        mut tree: Arc<SyntaxTree>,
        fingerprint: Fingerprint,
    ) -> Arc<SyntaxTree> {
        if let Some(inner) = Arc::get_mut(&mut tree) {
            inner.records[0].fingerprint = fingerprint;
        }
        tree
    }
}

/// Handle to one node of a `SyntaxTree`
#[derive(Clone)]
pub struct SyntaxNode {
    tree: Arc<SyntaxTree>,
    id: NodeId,
}

impl SyntaxNode {
    pub fn tree(&self) -> &Arc<SyntaxTree> {
        &self.tree
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    fn record(&self) -> &NodeRecord {
        self.tree.record(self.id)
    }

    fn handle(&self, id: NodeId) -> SyntaxNode {
        SyntaxNode {
            tree: Arc::clone(&self.tree),
            id,
        }
    }

    /// Grammar type name
    pub fn type_name(&self) -> &str {
        &self.record().type_name
    }

    pub fn kind(&self) -> NodeKind {
        self.record().kind
    }

    pub fn capabilities(&self) -> Capabilities {
        self.record().capabilities
    }

    pub fn has_capability(&self, capability: Capabilities) -> bool {
        self.record().capabilities.contains(capability)
    }

    pub fn byte_range(&self) -> ByteRange {
        self.record().range
    }

    pub fn start_byte(&self) -> usize {
        self.record().range.start
    }

    pub fn end_byte(&self) -> usize {
        self.record().range.end
    }

    pub fn start_point(&self) -> Point {
        self.record().start_point
    }

    pub fn end_point(&self) -> Point {
        self.record().end_point
    }

    /// Source text covered by this node
    pub fn text(&self) -> &str {
        let range = self.record().range;
        &self.tree.source[range.start..range.end]
    }

    pub fn is_named(&self) -> bool {
        self.record().is_named
    }

    /// Field name relative to the parent, if the grammar assigns one
    pub fn field_name(&self) -> Option<&str> {
        self.record().field_name.as_deref()
    }

    pub fn depth(&self) -> usize {
        self.record().depth
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.record().fingerprint
    }

    pub fn parent(&self) -> Option<SyntaxNode> {
        self.record().parent.map(|id| self.handle(id))
    }

    pub fn child_count(&self) -> usize {
        self.record().children.len()
    }

    pub fn child(&self, index: usize) -> Option<SyntaxNode> {
        self.record().children.get(index).map(|&id| self.handle(id))
    }

    /// Ordered children (named and anonymous)
    pub fn children(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.record().children.iter().map(move |&id| self.handle(id))
    }

    pub fn named_children(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.children().filter(|child| child.is_named())
    }

    pub fn child_by_field_name(&self, field: &str) -> Option<SyntaxNode> {
        self.children()
            .find(|child| child.field_name() == Some(field))
    }

    /// Strict descendants in pre-order
    pub fn descendants(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        let start = self.id.0 + 1;
        let end = self.record().subtree_end;
        (start..end).map(move |id| self.handle(NodeId(id)))
    }

    /// Strict ancestors, nearest first
    pub fn ancestors(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        std::iter::successors(self.parent(), |node| node.parent())
    }

    /// True if both handles point at the same record of the same tree
    pub fn same_instance(&self, other: &SyntaxNode) -> bool {
        Arc::ptr_eq(&self.tree, &other.tree) && self.id == other.id
    }

    /// Short `type@start..end` label used in diagnostics
    pub fn describe(&self) -> String {
        format!("{}@{}", self.type_name(), self.byte_range())
    }

    /// Multi-line indented rendering of the subtree.
    ///
    /// Text snippets longer than `max_text` characters are truncated.
    pub fn pretty(&self, max_text: usize) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out, 0, max_text);
        out
    }

    fn write_pretty(&self, out: &mut String, indent: usize, max_text: usize) {
        let pad = "  ".repeat(indent);
        out.push_str(&pad);
        out.push_str(self.type_name());
        if let Some(field) = self.field_name() {
            out.push_str(&format!(" [{}]", field));
        }
        out.push_str(&format!(" {}", self.byte_range()));

        let snippet = self.text().trim().replace('\n', " ");
        if max_text > 0 && !snippet.is_empty() && self.child_count() == 0 {
            let shown: String = if snippet.chars().count() > max_text {
                let mut cut: String = snippet.chars().take(max_text.saturating_sub(1)).collect();
                cut.push('…');
                cut
            } else {
                snippet
            };
            out.push_str(&format!(" {:?}", shown));
        }
        out.push('\n');
        for child in self.children() {
            child.write_pretty(out, indent + 1, max_text);
        }
    }
}

/// Deep structural comparison (type name, byte range, text, children).
///
/// Does not consult fingerprints, so it can confirm or refute a fingerprint hit.
pub fn structurally_equal(a: &SyntaxNode, b: &SyntaxNode) -> bool {
    let mut stack = vec![(a.clone(), b.clone())];
    while let Some((left, right)) = stack.pop() {
        if left.same_instance(&right) {
            continue;
        }
        if left.type_name() != right.type_name()
            || left.byte_range() != right.byte_range()
            || left.text() != right.text()
            || left.child_count() != right.child_count()
        {
            return false;
        }
        stack.extend(left.children().zip(right.children()));
    }
    true
}

impl PartialEq for SyntaxNode {
    fn eq(&self, other: &Self) -> bool {
        if self.same_instance(other) {
            return true;
        }
        self.fingerprint() == other.fingerprint() && structurally_equal(self, other)
    }
}

impl Eq for SyntaxNode {}

impl Hash for SyntaxNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fingerprint().hash(state);
    }
}

impl fmt::Debug for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SyntaxNode({})", self.describe())
    }
}

impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty(40))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Construction
// ═══════════════════════════════════════════════════════════════════════════

/// Nested description of a node, used to build trees by hand
#[derive(Debug, Clone)]
pub struct NodeSpec {
    pub type_name: String,
    pub range: ByteRange,
    pub is_named: bool,
    pub field_name: Option<String>,
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    /// Named node covering `range`
    pub fn new(type_name: impl Into<String>, range: impl Into<ByteRange>) -> Self {
        Self {
            type_name: type_name.into(),
            range: range.into(),
            is_named: true,
            field_name: None,
            children: Vec::new(),
        }
    }

    /// Anonymous (punctuation/keyword) node covering `range`
    pub fn anonymous(type_name: impl Into<String>, range: impl Into<ByteRange>) -> Self {
        Self {
            is_named: false,
            ..Self::new(type_name, range)
        }
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.field_name = Some(name.into());
        self
    }

    pub fn child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = NodeSpec>) -> Self {
        self.children.extend(children);
        self
    }
}

struct PendingRecord {
    type_name: Arc<str>,
    range: ByteRange,
    is_named: bool,
    field_name: Option<Arc<str>>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    subtree_end: u32,
    depth: usize,
}

/// Push-style builder: `open` a node, add its children, `close` it.
///
/// Nodes must arrive in pre-order. Invariants (non-negative range, children
/// nested in and ordered within their parent, single root, UTF-8 boundaries)
/// are checked as nodes arrive; registry validators run in `finish`.
pub struct SyntaxTreeBuilder<'r> {
    source: Arc<str>,
    registry: &'r KindRegistry,
    line_starts: Vec<usize>,
    records: Vec<PendingRecord>,
    stack: Vec<NodeId>,
}

impl<'r> SyntaxTreeBuilder<'r> {
    pub fn new(source: impl Into<Arc<str>>, registry: &'r KindRegistry) -> Self {
        let source: Arc<str> = source.into();
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            source,
            registry,
            line_starts,
            records: Vec::new(),
            stack: Vec::new(),
        }
    }

    /// Open a node as the next child of the currently open node
    pub fn open(
        &mut self,
        type_name: &str,
        range: ByteRange,
        is_named: bool,
        field_name: Option<&str>,
    ) -> Result<NodeId> {
        if range.end < range.start {
            return Err(TreegraphError::invalid_tree(format!(
                "{}@{}: end byte precedes start byte",
                type_name, range
            )));
        }
        if range.end > self.source.len()
            || !self.source.is_char_boundary(range.start)
            || !self.source.is_char_boundary(range.end)
        {
            return Err(TreegraphError::invalid_tree(format!(
                "{}@{}: range is not a valid slice of the source ({} bytes)",
                type_name,
                range,
                self.source.len()
            )));
        }

        let parent = self.stack.last().copied();
        match parent {
            Some(parent_id) => {
                let parent_record = &self.records[parent_id.index()];
                if !parent_record.range.contains(&range) {
                    return Err(TreegraphError::invalid_tree(format!(
                        "{}@{} does not nest inside parent {}@{}",
                        type_name, range, parent_record.type_name, parent_record.range
                    )));
                }
                if let Some(&prev) = parent_record.children.last() {
                    let prev_record = &self.records[prev.index()];
                    if prev_record.range.start > range.start {
                        return Err(TreegraphError::invalid_tree(format!(
                            "{}@{} starts before its preceding sibling {}@{}",
                            type_name, range, prev_record.type_name, prev_record.range
                        )));
                    }
                }
            }
            None if !self.records.is_empty() => {
                return Err(TreegraphError::invalid_tree(format!(
                    "{}@{}: tree already has a root",
                    type_name, range
                )));
            }
            None => {}
        }

        let id = NodeId(self.records.len() as u32);
        self.records.push(PendingRecord {
            type_name: Arc::from(type_name),
            range,
            is_named,
            field_name: field_name.map(Arc::from),
            parent,
            children: Vec::new(),
            subtree_end: id.0 + 1,
            depth: self.stack.len(),
        });
        if let Some(parent_id) = parent {
            self.records[parent_id.index()].children.push(id);
        }
        self.stack.push(id);
        Ok(id)
    }

    /// Close the most recently opened node
    pub fn close(&mut self) -> Result<()> {
        let id = self
            .stack
            .pop()
            .ok_or_else(|| TreegraphError::invalid_tree("close() without a matching open()"))?;
        self.records[id.index()].subtree_end = self.records.len() as u32;
        Ok(())
    }

    /// Open, recurse into children, close
    pub fn push_spec(&mut self, spec: &NodeSpec) -> Result<NodeId> {
        let id = self.open(
            &spec.type_name,
            spec.range,
            spec.is_named,
            spec.field_name.as_deref(),
        )?;
        for child in &spec.children {
            self.push_spec(child)?;
        }
        self.close()?;
        Ok(id)
    }

    /// Validate, fingerprint and freeze the tree
    pub fn finish(self) -> Result<Arc<SyntaxTree>> {
        if !self.stack.is_empty() {
            return Err(TreegraphError::invalid_tree(format!(
                "{} node(s) left open",
                self.stack.len()
            )));
        }
        if self.records.is_empty() {
            return Err(TreegraphError::invalid_tree("tree has no root"));
        }

        // Children carry larger ids than their parent, so a reverse sweep
        // sees every child fingerprint before the parent needs it.
        let mut fingerprints: Vec<Fingerprint> = vec![[0; 32]; self.records.len()];
        for index in (0..self.records.len()).rev() {
            let record = &self.records[index];
            let text = &self.source[record.range.start..record.range.end];

            let shape = NodeShape {
                type_name: &record.type_name,
                text,
                is_named: record.is_named,
                field_name: record.field_name.as_deref(),
                child_types: record
                    .children
                    .iter()
                    .map(|child| &*self.records[child.index()].type_name)
                    .collect(),
            };
            self.registry.validate(&shape).map_err(|reason| {
                TreegraphError::invalid_tree(format!(
                    "{}@{}: {}",
                    record.type_name, record.range, reason
                ))
            })?;

            let mut hasher = blake3::Hasher::new();
            hasher.update(record.type_name.as_bytes());
            hasher.update(&[0]);
            hasher.update(&(record.range.start as u64).to_le_bytes());
            hasher.update(&(record.range.end as u64).to_le_bytes());
            hasher.update(&(text.len() as u64).to_le_bytes());
            hasher.update(text.as_bytes());
            hasher.update(&(record.children.len() as u64).to_le_bytes());
            for child in &record.children {
                hasher.update(&fingerprints[child.index()]);
            }
            fingerprints[index] = *hasher.finalize().as_bytes();
        }

        let registry = self.registry;
        let records = self
            .records
            .into_iter()
            .zip(fingerprints)
            .map(|(pending, fingerprint)| NodeRecord {
                kind: registry.kind_of(&pending.type_name),
                capabilities: registry.capabilities_of(&pending.type_name),
                start_point: Self::point_in(&self.line_starts, pending.range.start),
                end_point: Self::point_in(&self.line_starts, pending.range.end),
                type_name: pending.type_name,
                range: pending.range,
                is_named: pending.is_named,
                field_name: pending.field_name,
                parent: pending.parent,
                children: pending.children,
                subtree_end: pending.subtree_end,
                depth: pending.depth,
                fingerprint,
            })
            .collect();

        Ok(Arc::new(SyntaxTree {
            source: self.source,
            records,
        }))
    }

    fn point_in(line_starts: &[usize], byte: usize) -> Point {
        let row = line_starts.partition_point(|&start| start <= byte) - 1;
        Point::new(row, byte - line_starts[row])
    }
}
