//! Index <-> node bijection for a projection

use crate::errors::Result;
use crate::shared::models::{IdentityIndex, SyntaxNode};

/// Maps dense graph indices `0..N` to the syntax nodes they were built from
#[derive(Debug, Clone, Default)]
pub struct NodeBijection {
    index: IdentityIndex,
}

impl NodeBijection {
    pub(crate) fn new(index: IdentityIndex) -> Self {
        Self { index }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Node at a graph index
    pub fn node(&self, index: usize) -> Option<&SyntaxNode> {
        self.index.get(index)
    }

    /// Graph index of a structurally equal node
    pub fn index_of(&self, node: &SyntaxNode) -> Result<Option<usize>> {
        self.index.position(node)
    }

    /// `(index, node)` pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &SyntaxNode)> + '_ {
        self.index.nodes().iter().enumerate()
    }

    pub fn nodes(&self) -> &[SyntaxNode] {
        self.index.nodes()
    }
}
