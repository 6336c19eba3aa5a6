//! Core data model: syntax tree arena, node handles, kinds, identity

pub mod identity;
pub mod kind;
pub mod span;
pub mod syntax_node;

pub use identity::IdentityIndex;
pub use kind::{
    Capabilities, KindRegistry, KindRegistryBuilder, KindSpec, KindValidator, NodeKind, NodeShape,
};
pub use span::{ByteRange, Point};
pub use syntax_node::{
    structurally_equal, Fingerprint, NodeId, NodeSpec, SyntaxNode, SyntaxTree, SyntaxTreeBuilder,
};
