use super::*;
use petgraph::algo::is_cyclic_directed;

// ============================================================================
// Test Utilities
// ============================================================================

fn ids(names: &[&str]) -> Vec<ModuleId> {
    names.iter().map(|name| ModuleId::from(*name)).collect()
}

fn set(names: &[&str]) -> BTreeSet<ModuleId> {
    ids(names).into_iter().collect()
}

/// Register `module` with the given requirements and precede targets
fn add(graph: &mut DependencyGraph, module: &str, requires: &[&str], precede: &[&str]) {
    let module = ModuleId::from(module);
    graph.register(&module);
    graph.require(&module, ids(requires));
    graph.precede(&module, ids(precede));
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn test_register_creates_empty_entry() {
    let mut graph = DependencyGraph::new();
    add(&mut graph, "config", &[], &[]);

    assert!(graph.contains("config"));
    assert!(graph.is_registered("config"));
    assert!(graph.direct_requirements("config").is_empty());
    assert_eq!(graph.module_count(), 1);
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_precede_creates_forward_entry_without_registration() {
    let mut graph = DependencyGraph::new();
    add(&mut graph, "metrics", &[], &["http"]);

    assert!(graph.contains("http"));
    assert!(!graph.is_registered("http"));
    assert_eq!(graph.direct_requirements("http"), ids(&["metrics"]).as_slice());
}

#[test]
fn test_reregistration_accumulates_requires() {
    let mut graph = DependencyGraph::new();
    add(&mut graph, "http", &["db"], &[]);
    add(&mut graph, "http", &["db", "tls"], &[]);

    assert_eq!(
        graph.direct_requirements("http"),
        ids(&["db", "db", "tls"]).as_slice()
    );
    // duplicates are only collapsed when counting distinct edges
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn test_direct_requirements_of_unknown_module_is_empty() {
    let graph = DependencyGraph::new();
    assert!(graph.direct_requirements("nothing").is_empty());
    assert!(!graph.contains("nothing"));
}

// ============================================================================
// Closures
// ============================================================================

#[test]
fn test_closure_of_chain_is_transitive() {
    let mut graph = DependencyGraph::new();
    add(&mut graph, "a", &[], &[]);
    add(&mut graph, "b", &["a"], &[]);
    add(&mut graph, "c", &["b"], &[]);

    assert_eq!(graph.closure("c").unwrap(), set(&["a", "b"]));
    assert_eq!(graph.closure("b").unwrap(), set(&["a"]));
    assert!(graph.closure("a").unwrap().is_empty());
}

#[test]
fn test_closure_deduplicates_diamond() {
    let mut graph = DependencyGraph::new();
    add(&mut graph, "a", &[], &[]);
    add(&mut graph, "b", &["a"], &[]);
    add(&mut graph, "c", &["a"], &[]);
    add(&mut graph, "d", &["b", "c", "b"], &[]);

    let closures = graph.closures().unwrap();
    assert_eq!(closures.get("d"), Some(&set(&["a", "b", "c"])));
    assert!(closures.requires("d", "a"));
    assert!(!closures.requires("a", "d"));
    assert_eq!(closures.len(), 4);
}

#[test]
fn test_closures_include_zero_dependency_modules() {
    let mut graph = DependencyGraph::new();
    add(&mut graph, "x", &[], &[]);
    add(&mut graph, "y", &[], &[]);

    let closures = graph.closures().unwrap();
    let modules: Vec<_> = closures.modules().cloned().collect();
    assert_eq!(modules, ids(&["x", "y"]));
    assert!(closures.get("x").unwrap().is_empty());
}

#[test]
fn test_precede_and_requires_produce_same_closure() {
    let mut via_precede = DependencyGraph::new();
    add(&mut via_precede, "a", &[], &["b"]);
    add(&mut via_precede, "b", &[], &[]);

    let mut via_requires = DependencyGraph::new();
    add(&mut via_requires, "a", &[], &[]);
    add(&mut via_requires, "b", &["a"], &[]);

    assert_eq!(via_precede.closures().unwrap(), via_requires.closures().unwrap());
}

#[test]
fn test_unknown_requirement_gets_empty_closure() {
    let mut graph = DependencyGraph::new();
    add(&mut graph, "a", &["z"], &[]);

    let closures = graph.closures().unwrap();
    assert_eq!(closures.get("a"), Some(&set(&["z"])));
    assert_eq!(closures.get("z"), Some(&BTreeSet::new()));
}

// ============================================================================
// Cycle handling during expansion
// ============================================================================

#[test]
fn test_self_requirement_terminates_with_cycle() {
    let mut graph = DependencyGraph::new();
    add(&mut graph, "a", &["a"], &[]);

    let err = graph.closures().unwrap_err();
    assert_eq!(
        err,
        PlanError::DependencyCycle {
            first: "a".into(),
            second: "a".into(),
        }
    );
}

#[test]
fn test_direct_cycle_terminates_with_cycle() {
    let mut graph = DependencyGraph::new();
    add(&mut graph, "a", &["b"], &[]);
    add(&mut graph, "b", &["a"], &[]);

    let err = graph.closures().unwrap_err();
    assert!(err.involves("a") && err.involves("b"), "unexpected error: {err}");
}

#[test]
fn test_indirect_cycle_terminates_with_cycle() {
    let mut graph = DependencyGraph::new();
    add(&mut graph, "a", &["b"], &[]);
    add(&mut graph, "b", &["c"], &[]);
    add(&mut graph, "c", &["a"], &[]);

    assert!(matches!(
        graph.closures(),
        Err(PlanError::DependencyCycle { .. })
    ));
    assert!(matches!(
        graph.closure("b"),
        Err(PlanError::DependencyCycle { .. })
    ));
}

#[test]
fn test_cycle_through_precede_is_detected() {
    let mut graph = DependencyGraph::new();
    add(&mut graph, "a", &["b"], &[]);
    add(&mut graph, "b", &[], &[]);
    // a precedes b while a requires b
    add(&mut graph, "a", &[], &["b"]);

    assert!(graph.closures().is_err());
}

#[test]
fn test_shared_dependency_not_reported_as_cycle() {
    let mut graph = DependencyGraph::new();
    add(&mut graph, "base", &[], &[]);
    add(&mut graph, "left", &["base"], &[]);
    add(&mut graph, "right", &["base", "left"], &[]);
    add(&mut graph, "top", &["left", "right", "base"], &[]);

    let closures = graph.closures().unwrap();
    assert_eq!(closures.get("top"), Some(&set(&["base", "left", "right"])));
}

// ============================================================================
// Graph export
// ============================================================================

#[test]
fn test_digraph_mirrors_requires_relation() {
    let mut graph = DependencyGraph::new();
    add(&mut graph, "a", &[], &[]);
    add(&mut graph, "b", &["a", "a"], &[]);
    add(&mut graph, "c", &["b"], &["d"]);

    let digraph = graph.to_digraph();
    assert_eq!(digraph.node_count(), 4);
    assert_eq!(digraph.edge_count(), 3);
    assert!(!is_cyclic_directed(&digraph));
}

#[test]
fn test_digraph_keeps_cycles_visible() {
    let mut graph = DependencyGraph::new();
    add(&mut graph, "a", &["b"], &[]);
    add(&mut graph, "b", &["a"], &[]);

    assert!(is_cyclic_directed(&graph.to_digraph()));
}

#[test]
fn test_dot_output_names_modules() {
    let mut graph = DependencyGraph::new();
    add(&mut graph, "config", &[], &[]);
    add(&mut graph, "database", &["config"], &[]);

    let dot = graph.to_dot();
    assert!(dot.starts_with("digraph"));
    assert!(dot.contains("config"));
    assert!(dot.contains("database"));
    assert!(dot.contains("->"));
}
