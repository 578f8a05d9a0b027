use initplan_lib::graph::{InitState, Initializer};
use initplan_lib::primitives::PlanError;
use std::cell::RefCell;
use std::rc::Rc;

/// Start-up context shaped like a real service
#[derive(Debug, Default)]
struct Service {
    config_loaded: bool,
    pool: Option<usize>,
    routes: Vec<&'static str>,
    listening: bool,
}

fn service_initializer() -> Initializer<Service> {
    let mut init = Initializer::<Service>::new();

    init.register("listener", |svc| {
        assert!(!svc.routes.is_empty(), "routes must be mounted first");
        svc.listening = true;
    })
    .requires(["routes"]);

    init.register("routes", |svc| {
        assert!(svc.pool.is_some(), "database must be ready");
        svc.routes.push("/health");
        svc.routes.push("/users");
    })
    .requires(["database"]);

    init.register("database", |svc| {
        assert!(svc.config_loaded, "config must be loaded");
        svc.pool = Some(4);
    });

    init.register("config", |svc| svc.config_loaded = true)
        .precedes(["database", "routes"]);

    init
}

#[test]
fn test_service_startup_sequence() {
    let mut init = service_initializer();

    let plan = init.plan().unwrap();
    assert_eq!(plan.names(), vec!["config", "database", "routes", "listener"]);

    init.init().unwrap();
    assert_eq!(init.state(), InitState::Done);

    let svc = init.into_context();
    assert!(svc.listening);
    assert_eq!(svc.pool, Some(4));
    assert_eq!(svc.routes, vec!["/health", "/users"]);
}

#[test]
fn test_missing_module_halts_before_any_side_effect() {
    let invoked = Rc::new(RefCell::new(Vec::new()));
    let mut init = Initializer::<()>::new();

    for name in ["a", "b", "c"] {
        let invoked = Rc::clone(&invoked);
        init.register(name, move |_| invoked.borrow_mut().push(name))
            .requires(if name == "c" { vec!["metrics"] } else { vec![] });
    }

    let err = init.init().unwrap_err();
    assert_eq!(
        err,
        PlanError::UnknownDependency {
            module: "c".into(),
            dependency: "metrics".into(),
        }
    );
    assert!(invoked.borrow().is_empty());
}

#[test]
fn test_wide_graph_is_deterministic() {
    let build = |reverse: bool| {
        let mut names: Vec<String> = (0..50).map(|i| format!("m{i:02}")).collect();
        if reverse {
            names.reverse();
        }

        let mut init = Initializer::<Vec<String>>::new();
        for name in names {
            let index: usize = name[1..].parse().unwrap();
            let requires: Vec<String> = [index / 2, index / 3]
                .into_iter()
                .filter(|&dep| dep != index)
                .map(|dep| format!("m{dep:02}"))
                .collect();
            let recorded = name.clone();
            init.register(name, move |log: &mut Vec<String>| log.push(recorded.clone()))
                .requires(requires);
        }
        init
    };

    let mut forward = build(false);
    let backward = build(true);
    let plan = forward.plan().unwrap();
    assert_eq!(plan, backward.plan().unwrap());

    forward.init().unwrap();
    let executed = forward.into_context();
    assert_eq!(executed.len(), 50);
    for (i, name) in executed.iter().enumerate() {
        let index: usize = name[1..].parse().unwrap();
        for dep in [index / 2, index / 3] {
            if dep != index {
                let dep_pos = plan.position(&format!("m{dep:02}")).unwrap();
                assert!(dep_pos < i, "{name} ran before m{dep:02}");
            }
        }
    }
}

#[test]
fn test_cycle_error_is_matchable() {
    let mut init = Initializer::<()>::new();
    init.register("x", |_| {}).requires(["y"]);
    init.register("y", |_| {}).requires(["z"]);
    init.register("z", |_| {}).requires(["x"]);

    match init.init() {
        Err(PlanError::DependencyCycle { first, second }) => {
            assert_ne!(first, second);
        }
        other => panic!("expected cycle, got {other:?}"),
    }
    assert_eq!(init.state(), InitState::Pending);
}
