use super::*;
use std::collections::BTreeSet;

// ============================================================================
// Test Utilities
// ============================================================================

/// Shared context recording the order callbacks ran in
#[derive(Debug, Default)]
struct Recorder {
    calls: Vec<String>,
}

fn recording(name: &'static str) -> impl FnMut(&mut Recorder) + 'static {
    move |ctx: &mut Recorder| ctx.calls.push(name.to_string())
}

fn noop(_: &mut Recorder) {}

fn assert_before(plan: &Plan, first: &str, second: &str) {
    let a = plan.position(first).expect("first module in plan");
    let b = plan.position(second).expect("second module in plan");
    assert!(a < b, "expected {first} before {second} in {plan}");
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_no_dependencies_plans_every_module_by_name() {
    let mut init = Initializer::<Recorder>::new();
    init.register("c", noop);
    init.register("a", noop);
    init.register("b", noop);

    let plan = init.plan().unwrap();
    assert_eq!(plan.names(), vec!["a", "b", "c"]);
}

#[test]
fn test_linear_chain() {
    let mut init = Initializer::<Recorder>::new();
    init.register("c", noop).requires(["b"]);
    init.register("b", noop).requires(["a"]);
    init.register("a", noop);

    let plan = init.plan().unwrap();
    assert_eq!(plan.names(), vec!["a", "b", "c"]);
}

#[test]
fn test_chain_against_name_order() {
    let mut init = Initializer::<Recorder>::new();
    init.register("alpha", noop).requires(["beta"]);
    init.register("beta", noop).requires(["gamma"]);
    init.register("gamma", noop);

    assert_eq!(init.plan().unwrap().names(), vec!["gamma", "beta", "alpha"]);
}

#[test]
fn test_diamond() {
    let mut init = Initializer::<Recorder>::new();
    init.register("d", noop).requires(["b", "c"]);
    init.register("b", noop).requires(["a"]);
    init.register("c", noop).requires(["a"]);
    init.register("a", noop);

    let plan = init.plan().unwrap();
    assert_eq!(plan.len(), 4);
    assert_eq!(plan.as_slice().first().map(ModuleId::as_str), Some("a"));
    assert_eq!(plan.as_slice().last().map(ModuleId::as_str), Some("d"));
    assert_before(&plan, "b", "d");
    assert_before(&plan, "c", "d");
}

#[test]
fn test_precede_equivalent_to_requires() {
    let mut via_precede = Initializer::<Recorder>::new();
    via_precede.register("z_first", noop).precedes(["a_second"]);
    via_precede.register("a_second", noop);

    let mut via_requires = Initializer::<Recorder>::new();
    via_requires.register("z_first", noop);
    via_requires.register("a_second", noop).requires(["z_first"]);

    let precede_plan = via_precede.plan().unwrap();
    assert_eq!(precede_plan, via_requires.plan().unwrap());
    assert_eq!(precede_plan.names(), vec!["z_first", "a_second"]);
}

#[test]
fn test_precede_forward_reference() {
    let mut init = Initializer::<Recorder>::new();
    init.register("metrics", noop).precedes(["http"]);
    init.register("http", noop).requires(["db"]);
    init.register("db", noop);

    let plan = init.plan().unwrap();
    assert_before(&plan, "metrics", "http");
    assert_before(&plan, "db", "http");
}

#[test]
fn test_register_with_lists() {
    let mut init = Initializer::<Recorder>::new();
    init.register_with("http", noop, &[], &["db"]);
    init.register_with("db", noop, &["http"], &["config"]);
    init.register_with("config", noop, &[], &[]);

    assert_eq!(init.plan().unwrap().names(), vec!["config", "db", "http"]);
}

#[test]
fn test_plan_independent_of_registration_order() {
    let modules: [(&str, &[&str]); 6] = [
        ("log", &[]),
        ("config", &[]),
        ("db", &["config", "log"]),
        ("cache", &["config"]),
        ("http", &["db", "cache"]),
        ("jobs", &["db"]),
    ];

    let build = |order: &[usize]| {
        let mut init = Initializer::<Recorder>::new();
        for &i in order {
            let (name, requires) = modules[i];
            init.register(name, noop).requires(requires.iter().copied());
        }
        init.plan().unwrap()
    };

    let forward = build(&[0, 1, 2, 3, 4, 5]);
    let backward = build(&[5, 4, 3, 2, 1, 0]);
    let shuffled = build(&[3, 0, 5, 1, 4, 2]);

    assert_eq!(forward, backward);
    assert_eq!(forward, shuffled);
    for (name, requires) in modules {
        for requirement in requires {
            assert_before(&forward, requirement, name);
        }
    }
}

#[test]
fn test_plan_is_idempotent() {
    let mut init = Initializer::<Recorder>::new();
    init.register("b", noop).requires(["a"]);
    init.register("a", noop);
    init.register("x", noop);

    let first = init.plan().unwrap();
    let second = init.plan().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_plan_display() {
    let mut init = Initializer::<Recorder>::new();
    init.register("b", noop).requires(["a"]);
    init.register("a", noop);

    assert_eq!(init.plan().unwrap().to_string(), "a -> b");
}

#[test]
fn test_empty_initializer_plans_nothing() {
    let init = Initializer::<Recorder>::new();
    assert!(init.plan().unwrap().is_empty());
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unknown_dependency() {
    let mut init = Initializer::<Recorder>::new();
    init.register("a", noop).requires(["z"]);

    assert_eq!(
        init.plan().unwrap_err(),
        PlanError::UnknownDependency {
            module: "a".into(),
            dependency: "z".into(),
        }
    );
}

#[test]
fn test_unknown_transitive_dependency_names_each_dependent() {
    let mut init = Initializer::<Recorder>::new();
    init.register("a", noop).requires(["b"]);
    init.register("b", noop).requires(["z"]);

    let err = init.plan().unwrap_err();
    assert!(matches!(err, PlanError::UnknownDependency { ref dependency, .. } if dependency == "z"));
}

#[test]
fn test_unknown_precede_target() {
    let mut init = Initializer::<Recorder>::new();
    init.register("metrics", noop).precedes(["http"]);

    let err = init.plan().unwrap_err();
    assert_eq!(
        err,
        PlanError::UnknownPrecedeTarget {
            module: "metrics".into(),
            target: "http".into(),
        }
    );
    assert!(err.to_string().contains("'metrics' must precede module 'http'"));
    assert!(!err.to_string().contains("requires"));
}

#[test]
fn test_direct_cycle() {
    let mut init = Initializer::<Recorder>::new();
    init.register("a", noop).requires(["b"]);
    init.register("b", noop).requires(["a"]);

    let err = init.plan().unwrap_err();
    let (first, second) = err.pair().expect("cycle error");
    let pair: BTreeSet<&str> = [first.as_str(), second.as_str()].into_iter().collect();
    assert_eq!(pair, BTreeSet::from(["a", "b"]));
}

#[test]
fn test_indirect_cycle() {
    let mut init = Initializer::<Recorder>::new();
    init.register("a", noop).requires(["b"]);
    init.register("b", noop).requires(["c"]);
    init.register("c", noop).requires(["a"]);

    assert!(matches!(
        init.plan(),
        Err(PlanError::DependencyCycle { .. })
    ));
}

#[test]
fn test_self_cycle() {
    let mut init = Initializer::<Recorder>::new();
    init.register("a", noop).requires(["a"]);

    assert_eq!(
        init.plan().unwrap_err(),
        PlanError::DependencyCycle {
            first: "a".into(),
            second: "a".into(),
        }
    );
}

#[test]
fn test_mutual_closure_check() {
    let mut map: BTreeMap<ModuleId, BTreeSet<ModuleId>> = BTreeMap::new();
    map.insert(ModuleId::from("a"), BTreeSet::from([ModuleId::from("b")]));
    map.insert(ModuleId::from("b"), BTreeSet::from([ModuleId::from("a")]));
    let closures = Closures::from(map);

    assert_eq!(
        check_cycles(&closures).unwrap_err(),
        PlanError::DependencyCycle {
            first: "a".into(),
            second: "b".into(),
        }
    );
}

#[test]
fn test_order_places_smallest_ready_name_first() {
    let mut map: BTreeMap<ModuleId, BTreeSet<ModuleId>> = BTreeMap::new();
    map.insert(ModuleId::from("top"), BTreeSet::from(["mid".into(), "base".into()]));
    map.insert(ModuleId::from("mid"), BTreeSet::from(["base".into()]));
    map.insert(ModuleId::from("base"), BTreeSet::new());
    map.insert(ModuleId::from("aside"), BTreeSet::new());

    let plan = order(&Closures::from(map)).unwrap();
    assert_eq!(plan.names(), vec!["aside", "base", "mid", "top"]);
}

#[test]
fn test_order_fails_on_cyclic_closures() {
    let mut map: BTreeMap<ModuleId, BTreeSet<ModuleId>> = BTreeMap::new();
    map.insert(ModuleId::from("a"), BTreeSet::from([ModuleId::from("b")]));
    map.insert(ModuleId::from("b"), BTreeSet::from([ModuleId::from("a")]));

    assert_eq!(
        order(&Closures::from(map)).unwrap_err(),
        PlanError::DependencyCycle {
            first: "a".into(),
            second: "b".into(),
        }
    );
}

#[test]
fn test_independent_modules_keep_name_order_across_closure_sizes() {
    let mut init = Initializer::<Recorder>::new();
    init.register("a", noop).requires(["b"]);
    init.register("b", noop);
    init.register("c", noop);

    let plan = init.plan().unwrap();
    assert_eq!(plan.names(), vec!["b", "a", "c"]);
    assert_before(&plan, "a", "c");
}

#[test]
fn test_ready_module_waits_only_for_its_own_requirements() {
    let mut init = Initializer::<Recorder>::new();
    init.register("app", noop).requires(["db"]);
    init.register("db", noop).requires(["config"]);
    init.register("config", noop);
    init.register("zeta", noop);
    init.register("metrics", noop);

    let plan = init.plan().unwrap();
    assert_eq!(plan.names(), vec!["config", "db", "app", "metrics", "zeta"]);
}

// ============================================================================
// Execution
// ============================================================================

#[test]
fn test_init_runs_callbacks_in_plan_order() {
    let mut init = Initializer::<Recorder>::new();
    init.register("http", recording("http")).requires(["db", "cache"]);
    init.register("cache", recording("cache")).requires(["config"]);
    init.register("db", recording("db")).requires(["config"]);
    init.register("config", recording("config"));

    let plan = init.plan().unwrap();
    init.init().unwrap();

    let expected: Vec<String> = plan.names().into_iter().map(String::from).collect();
    assert_eq!(init.context().calls, expected);
    assert_eq!(init.state(), InitState::Done);
}

#[test]
fn test_callbacks_observe_increasing_indices() {
    #[derive(Default)]
    struct Indexed {
        next: usize,
        seen: Vec<(String, usize)>,
    }

    let mut init = Initializer::<Indexed>::new();
    for (name, requires) in [("b", vec!["a"]), ("a", vec![]), ("c", vec!["b"])] {
        init.register(name, move |ctx: &mut Indexed| {
            ctx.seen.push((name.to_string(), ctx.next));
            ctx.next += 1;
        })
        .requires(requires);
    }

    let plan = init.plan().unwrap();
    init.init().unwrap();

    let ctx = init.into_context();
    for (i, (name, index)) in ctx.seen.iter().enumerate() {
        assert_eq!(*index, i);
        assert_eq!(plan.position(name), Some(i));
    }
    assert_eq!(ctx.next, 3);
}

#[test]
fn test_init_failure_runs_nothing() {
    let mut init = Initializer::<Recorder>::new();
    init.register("a", recording("a"));
    init.register("b", recording("b")).requires(["missing"]);

    assert!(init.init().is_err());
    assert!(init.context().calls.is_empty());
    assert_eq!(init.state(), InitState::Pending);
}

#[test]
fn test_init_after_fixing_registration() {
    let mut init = Initializer::<Recorder>::new();
    init.register("b", recording("b")).requires(["a"]);
    assert!(init.init().is_err());

    init.register("a", recording("a"));
    init.init().unwrap();
    assert_eq!(init.context().calls, vec!["a", "b"]);
}

#[test]
fn test_second_init_is_rejected() {
    let mut init = Initializer::<Recorder>::new();
    init.register("a", recording("a"));

    init.init().unwrap();
    assert_eq!(init.init().unwrap_err(), PlanError::AlreadyInitialized);
    assert_eq!(init.context().calls, vec!["a"]);
}

#[test]
fn test_reregistration_last_callback_wins() {
    let mut init = Initializer::<Recorder>::new();
    init.register("a", recording("first"));
    init.register("a", recording("second"));

    init.init().unwrap();
    assert_eq!(init.context().calls, vec!["second"]);
}

#[test]
fn test_reregistration_accumulates_edges() {
    let mut init = Initializer::<Recorder>::new();
    init.register("x", noop);
    init.register("y", noop);
    init.register("a", noop).requires(["x"]);
    init.register("a", noop).requires(["y"]);

    let plan = init.plan().unwrap();
    assert_before(&plan, "x", "a");
    assert_before(&plan, "y", "a");
}

#[test]
fn test_supplied_context_is_used() {
    let ctx = Recorder {
        calls: vec!["preset".to_string()],
    };
    let mut init = Initializer::from_context(Some(ctx));
    init.register("a", recording("a"));
    init.init().unwrap();

    assert_eq!(init.context().calls, vec!["preset", "a"]);
}

#[test]
fn test_missing_context_defaults() {
    let init = Initializer::<Recorder>::from_context(None);
    assert!(init.context().calls.is_empty());
    assert_eq!(init.state(), InitState::Pending);
}

#[test]
fn test_context_mut() {
    let mut init = Initializer::<Recorder>::new();
    init.context_mut().calls.push("manual".to_string());
    assert_eq!(init.into_context().calls, vec!["manual"]);
}
