//! Parsing
//!
//! Adapter from tree-sitter into the immutable node arena.
//!
//! ## Structure
//! - `ports` - SourceParser trait
//! - `infrastructure/` - TreeSitterParser

pub mod infrastructure;
pub mod ports;

pub use infrastructure::{parse_python, TreeSitterLanguage, TreeSitterParser};
pub use ports::SourceParser;
