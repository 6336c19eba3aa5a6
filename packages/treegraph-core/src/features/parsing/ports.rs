//! Parser port
//!
//! Contract for the collaborator that turns source text into an immutable
//! `SyntaxTree`. The query layers only ever consume the resulting tree.

use std::sync::Arc;

use crate::errors::Result;
use crate::shared::models::SyntaxTree;

pub trait SourceParser: Send + Sync {
    fn parse(&self, source: &str) -> Result<Arc<SyntaxTree>>;

    fn language_name(&self) -> &'static str;
}
