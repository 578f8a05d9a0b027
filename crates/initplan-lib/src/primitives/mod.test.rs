use super::*;

#[test]
fn test_module_id_display_and_borrow() {
    let id = ModuleId::from("database");
    assert_eq!(id.to_string(), "database");
    assert_eq!(id, "database");

    let mut set = std::collections::BTreeSet::new();
    set.insert(id);
    assert!(set.contains("database"));
}

#[test]
fn test_module_id_orders_by_name() {
    let mut ids = vec![ModuleId::from("http"), ModuleId::from("config"), ModuleId::from("db")];
    ids.sort();
    assert_eq!(ids, vec!["config", "db", "http"]);
}

#[test]
fn test_unknown_dependency_message() {
    let err = PlanError::UnknownDependency {
        module: "http".into(),
        dependency: "tls".into(),
    };
    assert_eq!(
        err.to_string(),
        "Module 'http' requires module 'tls' but module 'tls' was never registered"
    );
    assert!(err.involves("http"));
    assert!(err.involves("tls"));
    assert!(!err.involves("db"));
    assert!(err.is_unknown());
    assert_eq!(err.pair(), None);
}

#[test]
fn test_unknown_precede_target_message() {
    let err = PlanError::UnknownPrecedeTarget {
        module: "metrics".into(),
        target: "http".into(),
    };
    assert_eq!(
        err.to_string(),
        "Module 'metrics' must precede module 'http' but module 'http' was never registered"
    );
    assert!(err.is_unknown());
    assert!(err.involves("metrics"));
    assert!(err.involves("http"));
}

#[test]
fn test_cycle_message_and_pair() {
    let err = PlanError::DependencyCycle {
        first: "a".into(),
        second: "b".into(),
    };
    assert_eq!(err.to_string(), "Dependency cycle between 'a' and 'b'");
    let (first, second) = err.pair().unwrap();
    assert_eq!(first, "a");
    assert_eq!(second, "b");
}

#[test]
fn test_already_initialized_message() {
    assert_eq!(
        PlanError::AlreadyInitialized.to_string(),
        "the initializer has already been called"
    );
}

#[test]
fn test_log_level_from_verbosity() {
    assert_eq!(LogLevel::from_verbosity(0), LogLevel::Error);
    assert_eq!(LogLevel::from_verbosity(2), LogLevel::Info);
    assert_eq!(LogLevel::from_verbosity(4), LogLevel::Trace);
    assert_eq!(LogLevel::from_verbosity(200), LogLevel::Trace);
    assert_eq!(LogLevel::Warning.as_directive(), "warn");
}

#[test]
fn test_value_enums_parse_aliases() {
    assert_eq!("plain".parse::<LogFormat>().unwrap(), LogFormat::Text);
    assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
    assert_eq!("stdout".parse::<LogOutput>().unwrap(), LogOutput::Stdout);
    assert_eq!("off".parse::<ColorIntent>().unwrap(), ColorIntent::Never);
    assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
    assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warning);
}

#[test]
fn test_value_enum_parse_error() {
    let err = "yaml".parse::<LogFormat>().unwrap_err();
    match err {
        ConfigError::ParseError { value, reason } => {
            assert_eq!(value, "yaml");
            assert_eq!(reason, "invalid log format");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_color_intent_explicit() {
    assert!(ColorIntent::Always.enabled());
    assert!(!ColorIntent::Never.enabled());
}
