use super::*;

#[test]
fn test_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.log_level, 1);
    assert_eq!(config.log_format, LogFormat::Text);
    assert_eq!(config.log_output, LogOutput::Stderr);
    assert_eq!(config.color, ColorIntent::Auto);
    assert!(config.validate().is_ok());
}

#[test]
fn test_merge_takes_non_default_values() {
    let base = AppConfig {
        color: ColorIntent::Never,
        ..AppConfig::default()
    };
    let overrides = AppConfig {
        log_level: 3,
        log_format: LogFormat::Json,
        ..AppConfig::default()
    };

    let merged = base.merge_with(overrides);
    assert_eq!(merged.log_level, 3);
    assert_eq!(merged.log_format, LogFormat::Json);
    assert_eq!(merged.log_output, LogOutput::Stderr);
    // default color in the override keeps the base value
    assert_eq!(merged.color, ColorIntent::Never);
}

#[test]
fn test_validate_rejects_out_of_range_level() {
    let config = AppConfig {
        log_level: 9,
        ..AppConfig::default()
    };
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { .. }));
    assert!(err.to_string().contains("out of range"));
}

#[test]
fn test_logger_config_mapping() {
    let config = AppConfig {
        log_level: 4,
        log_format: LogFormat::Pretty,
        log_output: LogOutput::Stdout,
        color: ColorIntent::Never,
    };
    let logger = config.to_logger_config();
    assert_eq!(logger.level, LogLevel::Trace);
    assert_eq!(logger.format, LogFormat::Pretty);
    assert_eq!(logger.output, LogOutput::Stdout);
    assert!(!logger.color);
}

#[test]
fn test_deserialize_with_defaults() {
    let config: AppConfig = serde_json::from_str(r#"{"log_format": "json"}"#).unwrap();
    assert_eq!(config.log_format, LogFormat::Json);
    assert_eq!(config.log_level, 1);
    assert_eq!(config.color, ColorIntent::Auto);
}
