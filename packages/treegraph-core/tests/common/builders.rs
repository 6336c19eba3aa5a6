//! Graph builders for matcher and analytics tests

use treegraph_core::features::graph_projection::{EdgeWeight, Graph, GraphBuilder, NodeWeight};

/// Graph with `n` nodes typed `"n"` and the given default-weight edges
pub fn graph_with_edges(directed: bool, n: usize, edges: &[(usize, usize)]) -> Graph {
    typed_graph(directed, &vec!["n"; n], edges)
}

/// One node per entry of `types`, in order
pub fn typed_graph(directed: bool, types: &[&str], edges: &[(usize, usize)]) -> Graph {
    let mut builder = GraphBuilder::new(directed);
    for type_name in types {
        builder.add_node(NodeWeight::new(*type_name));
    }
    for &(source, target) in edges {
        builder
            .add_edge(source, target, EdgeWeight::default())
            .expect("fixture edge is valid");
    }
    builder.build()
}
