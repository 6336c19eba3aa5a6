//! Source and tree fixtures

use std::sync::Arc;

use treegraph_core::features::parsing::parse_python;
use treegraph_core::shared::models::{KindRegistry, NodeSpec, SyntaxTree};

pub const SAMPLE_MODULE: &str = r#"import os

def load(path):
    data = read(path)
    return parse(data)

def save(path, data):
    write(path, data)

class Store:
    def get(self, key):
        return self.items[key]
"#;

pub fn sample_tree() -> Arc<SyntaxTree> {
    parse_python(SAMPLE_MODULE).expect("sample module parses")
}

pub fn parse(source: &str) -> Arc<SyntaxTree> {
    parse_python(source).expect("source parses")
}

/// `module > block > [a, b, c, d]` over "abcd" (hand-built, no parser)
pub fn block_of_four() -> Arc<SyntaxTree> {
    let root = NodeSpec::new("module", 0..4).child(
        NodeSpec::new("block", 0..4).children((0..4).map(|i| NodeSpec::new("identifier", i..i + 1))),
    );
    SyntaxTree::build("abcd", root, &KindRegistry::python()).expect("valid tree")
}
