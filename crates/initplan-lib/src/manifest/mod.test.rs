use super::*;
use crate::primitives::PlanError;
use std::fs;
use tempfile::TempDir;

const SERVICE_MANIFEST: &str = r#"
[modules.config]

[modules.database]
requires = ["config"]

[modules.metrics]
precede = ["http"]

[modules.http]
requires = ["database"]
description = "HTTP listener"
"#;

#[test]
fn test_parse_manifest() {
    let manifest: Manifest = SERVICE_MANIFEST.parse().unwrap();

    assert_eq!(manifest.len(), 4);
    let http = &manifest.modules[&ModuleId::from("http")];
    assert_eq!(http.requires, vec![ModuleId::from("database")]);
    assert_eq!(http.description.as_deref(), Some("HTTP listener"));
    assert!(manifest.modules[&ModuleId::from("config")].requires.is_empty());
}

#[test]
fn test_empty_manifest() {
    let manifest: Manifest = "".parse().unwrap();
    assert!(manifest.is_empty());
    assert!(manifest.into_initializer().plan().unwrap().is_empty());
}

#[test]
fn test_unknown_field_rejected() {
    let result = "[modules.a]\nafter = [\"b\"]\n".parse::<Manifest>();
    assert!(result.is_err());
}

#[test]
fn test_manifest_plan_and_run() {
    let manifest: Manifest = SERVICE_MANIFEST.parse().unwrap();
    let mut init = manifest.into_initializer();

    let plan = init.plan().unwrap();
    assert_eq!(plan.names(), vec!["config", "database", "metrics", "http"]);

    init.init().unwrap();
    assert_eq!(init.context().executed, plan.as_slice());
}

#[test]
fn test_undeclared_reference_is_unknown() {
    let manifest: Manifest = "[modules.http]\nrequires = [\"tls\"]\n".parse().unwrap();

    assert_eq!(
        manifest.into_initializer().plan().unwrap_err(),
        PlanError::UnknownDependency {
            module: "http".into(),
            dependency: "tls".into(),
        }
    );
}

#[test]
fn test_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("init.toml");
    fs::write(&path, SERVICE_MANIFEST).unwrap();

    let manifest = Manifest::load(&path).unwrap();
    assert_eq!(manifest.len(), 4);
}

#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let err = Manifest::load(&temp_dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ManifestError::Read { .. }));
}

#[test]
fn test_load_invalid_toml() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    fs::write(&path, "[modules.a\nrequires = ").unwrap();

    let err = Manifest::load(&path).unwrap_err();
    assert!(matches!(err, ManifestError::Parse { .. }));
    assert!(err.to_string().contains("broken.toml"));
}
