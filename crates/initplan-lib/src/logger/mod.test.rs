use super::*;

#[test]
fn test_filter_directives_scope_crate_level() {
    assert_eq!(
        filter_directives(LogLevel::Debug),
        "warn,initplan=debug,initplan_lib=debug"
    );
    assert_eq!(
        filter_directives(LogLevel::Error),
        "error,initplan=error,initplan_lib=error"
    );
}

#[test]
fn test_filter_directives_parse() {
    for verbosity in 0..=4 {
        let directives = filter_directives(LogLevel::from_verbosity(verbosity));
        assert!(EnvFilter::try_new(&directives).is_ok(), "{directives}");
    }
}

#[test]
fn test_logger_global_consistent() {
    // Other tests in this binary may have installed a subscriber
    assert_eq!(Logger::is_initialized(), Logger::global().is_some());
}
