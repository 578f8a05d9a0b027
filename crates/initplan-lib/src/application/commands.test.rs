use super::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_manifest(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("init.toml");
    fs::write(&path, content).unwrap();
    path
}

fn run(command: Commands) -> Result<String> {
    let mut out = Vec::new();
    execute_command_with(command, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

const CHAIN: &str = r#"
[modules.http]
requires = ["db"]

[modules.db]
requires = ["config"]

[modules.config]
"#;

#[test]
fn test_plan_text() {
    let dir = TempDir::new().unwrap();
    let manifest = write_manifest(&dir, CHAIN);

    let output = run(Commands::Plan {
        manifest,
        format: OutputFormat::Text,
    })
    .unwrap();
    assert_eq!(output, "  1. config\n  2. db\n  3. http\n");
}

#[test]
fn test_plan_json() {
    let dir = TempDir::new().unwrap();
    let manifest = write_manifest(&dir, CHAIN);

    let output = run(Commands::Plan {
        manifest,
        format: OutputFormat::Json,
    })
    .unwrap();
    let parsed: Vec<String> = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed, vec!["config", "db", "http"]);
}

#[test]
fn test_check_reports_cycle() {
    let dir = TempDir::new().unwrap();
    let manifest = write_manifest(
        &dir,
        "[modules.a]\nrequires = [\"b\"]\n[modules.b]\nrequires = [\"a\"]\n",
    );

    let err = run(Commands::Check { manifest }).unwrap_err();
    let cause = err
        .downcast_ref::<crate::primitives::PlanError>()
        .expect("plan error in chain");
    assert!(cause.pair().is_some());
    assert!(format!("{err:#}").contains("Dependency cycle"));
}

#[test]
fn test_check_ok() {
    let dir = TempDir::new().unwrap();
    let manifest = write_manifest(&dir, CHAIN);

    let output = run(Commands::Check { manifest }).unwrap();
    assert!(output.starts_with("ok: 3 modules"));
}

#[test]
fn test_run_prints_trace() {
    let dir = TempDir::new().unwrap();
    let manifest = write_manifest(&dir, CHAIN);

    let output = run(Commands::Run { manifest }).unwrap();
    assert_eq!(output, "[1/3] config\n[2/3] db\n[3/3] http\n");
}

#[test]
fn test_run_unknown_dependency_prints_nothing() {
    let dir = TempDir::new().unwrap();
    let manifest = write_manifest(&dir, "[modules.http]\nrequires = [\"tls\"]\n");

    let mut out = Vec::new();
    let err = execute_command_with(Commands::Run { manifest }, &mut out).unwrap_err();
    assert!(out.is_empty());
    assert!(format!("{err:#}").contains("module 'tls' was never registered"));
}

#[test]
fn test_graph_outputs_dot_even_with_cycle() {
    let dir = TempDir::new().unwrap();
    let manifest = write_manifest(
        &dir,
        "[modules.a]\nrequires = [\"b\"]\n[modules.b]\nrequires = [\"a\"]\n",
    );

    let output = run(Commands::Graph { manifest }).unwrap();
    assert!(output.starts_with("digraph"));
}

#[test]
fn test_missing_manifest() {
    let dir = TempDir::new().unwrap();
    let err = run(Commands::Check {
        manifest: dir.path().join("absent.toml"),
    })
    .unwrap_err();
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn test_execute_command_reuses_installed_logger() {
    let banner = || CliConfig {
        app_config: crate::application::AppConfig::default(),
        command: None,
    };

    execute_command(banner()).unwrap();
    assert!(Logger::global().is_some());
    // a second run must not try to install another subscriber
    execute_command(banner()).unwrap();
}
