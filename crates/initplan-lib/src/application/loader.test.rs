use super::*;
use crate::primitives::{ColorIntent, LogFormat};

#[test]
fn test_resolve_applies_environment_to_default_color() {
    let env = EnvironmentConfig {
        no_color: Some("1".to_string()),
        ..EnvironmentConfig::default()
    };

    let config = AppConfig::resolve(AppConfig::default(), &env).unwrap();
    assert_eq!(config.color, ColorIntent::Never);
}

#[test]
fn test_resolve_cli_overrides_environment() {
    let env = EnvironmentConfig {
        ci: Some("true".to_string()),
        ..EnvironmentConfig::default()
    };
    let cli = AppConfig {
        color: ColorIntent::Always,
        log_format: LogFormat::Json,
        ..AppConfig::default()
    };

    let config = AppConfig::resolve(cli, &env).unwrap();
    assert_eq!(config.color, ColorIntent::Always);
    assert_eq!(config.log_format, LogFormat::Json);
}

#[test]
fn test_resolve_validates() {
    let cli = AppConfig {
        log_level: 12,
        ..AppConfig::default()
    };
    assert!(AppConfig::resolve(cli, &EnvironmentConfig::default()).is_err());
}
