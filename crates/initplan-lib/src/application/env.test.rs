use super::*;

fn env(no_color: Option<&str>, force_color: Option<&str>, clicolor: Option<&str>, ci: Option<&str>) -> EnvironmentConfig {
    EnvironmentConfig {
        no_color: no_color.map(String::from),
        force_color: force_color.map(String::from),
        clicolor: clicolor.map(String::from),
        ci: ci.map(String::from),
    }
}

#[test]
fn test_empty_environment_keeps_intent() {
    let config = EnvironmentConfig::default();
    assert_eq!(config.apply_color_config(ColorIntent::Auto), ColorIntent::Auto);
    assert_eq!(config.apply_color_config(ColorIntent::Always), ColorIntent::Always);
}

#[test]
fn test_no_color() {
    let config = env(Some("1"), None, None, None);
    assert_eq!(config.apply_color_config(ColorIntent::Auto), ColorIntent::Never);
}

#[test]
fn test_empty_no_color_is_ignored() {
    let config = env(Some(""), None, None, None);
    assert_eq!(config.apply_color_config(ColorIntent::Auto), ColorIntent::Auto);
}

#[test]
fn test_clicolor_zero() {
    let config = env(None, None, Some("0"), None);
    assert_eq!(config.apply_color_config(ColorIntent::Always), ColorIntent::Never);
}

#[test]
fn test_force_color_wins_over_no_color() {
    let config = env(Some("1"), Some("1"), Some("0"), None);
    assert_eq!(config.apply_color_config(ColorIntent::Auto), ColorIntent::Always);

    let config = env(None, Some("false"), None, None);
    assert_eq!(config.apply_color_config(ColorIntent::Always), ColorIntent::Never);
}

#[test]
fn test_ci_disables_color() {
    let config = env(None, Some("1"), None, Some("true"));
    assert_eq!(config.apply_color_config(ColorIntent::Always), ColorIntent::Never);
}

#[test]
fn test_invalid_force_color_ignored() {
    let config = env(None, Some("sometimes"), None, None);
    assert_eq!(config.apply_color_config(ColorIntent::Auto), ColorIntent::Auto);
}
