pub mod tree_sitter_parser;

pub use tree_sitter_parser::{parse_python, TreeSitterLanguage, TreeSitterParser};
