//! End-to-end scenarios: collection → projection → matching / analytics

mod common;

use common::*;
use pretty_assertions::assert_eq;
use treegraph_core::config::{Preset, QueryConfig};
use treegraph_core::features::graph_analytics::{CentralityMetric, GraphAnalyzer, PathLimits};
use treegraph_core::features::graph_projection::{EdgeKind, ProjectionOptions};
use treegraph_core::features::pattern_matching::{
    find_pattern_matches, matchers, Match, MatchOptions, SubgraphMatcher,
};
use treegraph_core::features::query_engine::NodeCollection;
use treegraph_core::TreegraphError;

#[test]
fn test_projection_with_absent_parent() {
    // collection order: a, b, c, block, d  (block's parent `module` is left out)
    let tree = block_of_four();
    let nodes: Vec<_> = tree.nodes().collect();
    let (module, block, ids) = (&nodes[0], &nodes[1], &nodes[2..]);
    assert_eq!(module.type_name(), "module");

    let collection = NodeCollection::from_nodes([
        ids[0].clone(),
        ids[1].clone(),
        ids[2].clone(),
        block.clone(),
        ids[3].clone(),
    ])
    .unwrap();
    let projection = collection.to_graph(&ProjectionOptions::new().directed(true)).unwrap();
    let graph = &projection.graph;

    assert_eq!(graph.node_count(), 5);
    assert_eq!(graph.edge_count(), 4);
    assert_eq!(graph.in_degree(3), 0);
    assert_eq!(graph.successors(3), &[0, 1, 2, 4]);
    assert!(graph.edges().all(|(_, _, w)| w.kind == EdgeKind::ParentChild));
}

#[test]
fn test_projection_bijection_round_trip() {
    let all = NodeCollection::from_tree(&sample_tree()).unwrap();
    let named = all.filter(treegraph_core::Predicate::named(true));
    let projection = named.to_graph(&ProjectionOptions::new()).unwrap();

    assert_eq!(projection.bijection.len(), named.count());
    for (expected, node) in named.iter().enumerate() {
        assert_eq!(projection.index_of(&node).unwrap(), Some(expected));
        assert_eq!(projection.node(expected), Some(&node));
    }
}

#[test]
fn test_single_edge_pattern_scenario() {
    let pattern = typed_graph(true, &["A", "B"], &[(0, 1)]);
    let target = graph_with_edges(true, 3, &[(0, 1), (1, 2)]);

    let matches = SubgraphMatcher::new(&pattern).find_matches(&target).unwrap();
    assert_eq!(matches, vec![Match::new(vec![0, 1]), Match::new(vec![1, 2])]);
}

#[test]
fn test_matches_are_sound_on_projected_source() {
    let source = "def f(a):\n    return g(a)\n\ndef h(b):\n    return k(b)\n";
    let all = NodeCollection::from_tree(&parse(source)).unwrap();
    let named = all.filter(treegraph_core::Predicate::named(true));
    let target = named.to_graph(&ProjectionOptions::new()).unwrap();

    // return_statement -> call -> identifier
    let pattern = typed_graph(
        true,
        &["return_statement", "call", "identifier"],
        &[(0, 1), (1, 2)],
    );
    let matches = SubgraphMatcher::new(&pattern)
        .node_matcher(matchers::same_type_name())
        .find_matches(&target.graph)
        .unwrap();
    assert_eq!(matches.len(), 2);

    for m in &matches {
        for (source, dest, _) in pattern.edges() {
            let (ts, td) = (m.target(source).unwrap(), m.target(dest).unwrap());
            assert!(target.graph.has_edge(ts, td));
        }
        let callee = target.node(m.target(2).unwrap()).unwrap();
        assert!(["g", "k"].contains(&callee.text()));
    }
}

#[test]
fn test_find_pattern_matches_between_collections() {
    let pattern_tree = parse("x = y\n");
    let target_tree = parse("a = b\nc = d\nprint(a)\n");
    let pattern = NodeCollection::from_tree(&pattern_tree)
        .unwrap()
        .filter_type("assignment")
        .descendants()
        .unwrap()
        .filter_type("identifier")
        .union(&NodeCollection::from_tree(&pattern_tree).unwrap().filter_type("assignment"))
        .unwrap();
    let target = NodeCollection::from_tree(&target_tree).unwrap();

    let options = MatchOptions::default().induced(true);
    let matches =
        find_pattern_matches(&pattern, &target, &ProjectionOptions::new(), options).unwrap();
    // each assignment with its two identifiers, in either identifier order
    assert_eq!(matches.len(), 4);
}

#[test]
fn test_matcher_budget_is_distinct_from_empty() {
    let pattern = graph_with_edges(true, 3, &[(0, 1), (1, 2)]);
    let target = graph_with_edges(true, 6, &[(0, 1), (2, 3), (4, 5)]);

    let none = SubgraphMatcher::new(&pattern).find_matches(&target).unwrap();
    assert!(none.is_empty());

    let err = SubgraphMatcher::new(&pattern)
        .options(MatchOptions::default().max_states(Some(2)))
        .find_matches(&target)
        .unwrap_err();
    assert!(matches!(err, TreegraphError::ResourceExhausted { .. }));
}

#[test]
fn test_analytics_over_projection() {
    let all = NodeCollection::from_tree(&sample_tree()).unwrap();
    let defs = all.filter_type("function_definition");
    let scope = defs.union(&all.filter_type("class_definition")).unwrap();
    let scope = scope.union(&all.filter_type("module")).unwrap();
    let scope = scope.union(&all.filter_type("block")).unwrap();
    let projection = scope.to_graph(&ProjectionOptions::new()).unwrap();
    let analyzer = GraphAnalyzer::new(&projection.graph);

    let metrics = analyzer.graph_metrics();
    assert_eq!(metrics.node_count, scope.count());
    assert_eq!(metrics.component_count, 1);
    assert!(metrics.is_connected);
    assert_eq!(metrics.is_dag, Some(true));
    assert!(!analyzer.has_cycle());

    let module = projection
        .index_of(&all.filter_type("module").first().unwrap())
        .unwrap()
        .unwrap();
    let get = projection
        .index_of(&defs.filter_text_contains("def get").first().unwrap())
        .unwrap()
        .unwrap();
    // module -> class -> block -> get
    let path = analyzer.shortest_path(module, get).unwrap().unwrap();
    assert_eq!(path.len(), 4);
    assert_eq!(
        analyzer.all_simple_paths(module, get, PathLimits::default()).unwrap(),
        vec![path]
    );

    let order = analyzer.topological_sort().unwrap();
    assert_eq!(order[0], module);

    let degree = analyzer.centrality(CentralityMetric::Degree);
    let busiest = (0..degree.len())
        .max_by(|&a, &b| degree[a].total_cmp(&degree[b]).then(b.cmp(&a)))
        .unwrap();
    assert_eq!(busiest, module);
}

#[test]
fn test_empty_graph_metrics() {
    let projection = NodeCollection::empty().to_graph(&ProjectionOptions::new()).unwrap();
    let metrics = GraphAnalyzer::new(&projection.graph).graph_metrics();
    assert_eq!(metrics.node_count, 0);
    assert_eq!(metrics.edge_count, 0);
    assert_eq!(metrics.density, 0.0);
    assert_eq!(metrics.component_count, 0);
}

#[test]
fn test_config_drives_runtime_options() {
    let config = QueryConfig::preset(Preset::Fast)
        .projection(|c| c.max_pairwise_nodes(4))
        .matcher(|c| c.max_states(Some(10)))
        .paths(|c| c.max_paths(1))
        .build()
        .unwrap();

    let all = NodeCollection::from_tree(&sample_tree()).unwrap();
    let options = ProjectionOptions::from_config(config.projection_config())
        .edge_predicate(|_, _| Ok(false));
    let err = all.to_graph(&options).unwrap_err();
    assert!(err.is_resource_exhausted());

    let match_options = MatchOptions::from(config.matcher_config());
    assert_eq!(match_options.max_states, Some(10));

    let limits = PathLimits::from(config.path_limits());
    let diamond = graph_with_edges(true, 4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
    let err = GraphAnalyzer::new(&diamond)
        .all_simple_paths(0, 3, limits)
        .unwrap_err();
    assert!(err.is_resource_exhausted());
}
