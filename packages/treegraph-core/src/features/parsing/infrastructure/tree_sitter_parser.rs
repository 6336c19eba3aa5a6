//! Tree-sitter parser adapter
//!
//! This is where the tree-sitter dependency lives. The concrete syntax tree
//! is walked once with a `TreeCursor` and copied into the node arena, extras
//! (comments) and anonymous tokens included.

use std::sync::Arc;

use tracing::debug;
use tree_sitter::{Node, Parser as TSParser, Tree};

use crate::errors::{Result, TreegraphError};
use crate::features::parsing::ports::SourceParser;
use crate::shared::models::{ByteRange, KindRegistry, SyntaxTree, SyntaxTreeBuilder};

/// Supported tree-sitter languages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeSitterLanguage {
    Python,
}

pub struct TreeSitterParser {
    language: TreeSitterLanguage,
    registry: KindRegistry,
    strict: bool,
}

impl TreeSitterParser {
    /// Python grammar with `KindRegistry::python()`
    pub fn python() -> Self {
        Self {
            language: TreeSitterLanguage::Python,
            registry: KindRegistry::python(),
            strict: false,
        }
    }

    /// Replace the kind registry used to classify nodes
    pub fn with_registry(mut self, registry: KindRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Reject sources whose tree contains ERROR or MISSING nodes
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.registry
    }

    fn ts_language(&self) -> tree_sitter::Language {
        match self.language {
            TreeSitterLanguage::Python => tree_sitter_python::language(),
        }
    }

    fn convert_tree(&self, tree: &Tree, source: &str) -> Result<Arc<SyntaxTree>> {
        let mut builder = SyntaxTreeBuilder::new(source, &self.registry);
        let mut cursor = tree.walk();

        loop {
            let node = cursor.node();
            builder.open(
                node.kind(),
                ByteRange::new(node.start_byte(), node.end_byte()),
                node.is_named(),
                cursor.field_name(),
            )?;
            if cursor.goto_first_child() {
                continue;
            }
            builder.close()?;

            // climb until a sibling exists; reaching the root ends the walk
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return builder.finish();
                }
                builder.close()?;
            }
        }
    }

    fn first_error(node: Node<'_>) -> Option<Node<'_>> {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if !node.has_error() {
            return None;
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
        children.into_iter().find_map(Self::first_error)
    }
}

impl SourceParser for TreeSitterParser {
    fn parse(&self, source: &str) -> Result<Arc<SyntaxTree>> {
        let mut parser = TSParser::new();
        parser
            .set_language(&self.ts_language())
            .map_err(|e| TreegraphError::Parse(format!("Failed to set language: {}", e)))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| TreegraphError::Parse("tree-sitter returned no tree".to_string()))?;

        if self.strict {
            if let Some(error) = Self::first_error(tree.root_node()) {
                let at = error.start_position();
                return Err(TreegraphError::Parse(format!(
                    "syntax error ({}) at {}:{}",
                    error.kind(),
                    at.row + 1,
                    at.column
                )));
            }
        }

        let converted = self.convert_tree(&tree, source)?;
        debug!(
            language = self.language_name(),
            nodes = converted.len(),
            has_error = tree.root_node().has_error(),
            "Parsed source into syntax tree"
        );
        Ok(converted)
    }

    fn language_name(&self) -> &'static str {
        match self.language {
            TreeSitterLanguage::Python => "python",
        }
    }
}

/// Parse Python source with the default registry
pub fn parse_python(source: &str) -> Result<Arc<SyntaxTree>> {
    TreeSitterParser::python().parse(source)
}
