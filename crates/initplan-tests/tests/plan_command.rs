//! End-to-end tests for planning, checking, and running manifests

use anyhow::Result;
use initplan_tests::TestEnvironment;
use initplan_tests::fixtures::{CYCLE, INDEPENDENT, SERVICE, SERVICE_PLAN, UNKNOWN};

#[test]
fn e2e_plan_service_text() -> Result<()> {
    let env = TestEnvironment::new()?;
    let manifest = env.manifest("service.toml", SERVICE)?;

    let output = env.run(&["plan", manifest.to_str().unwrap()])?;
    assert!(output.success(), "{:?}", output.error);

    let names: Vec<&str> = output
        .stdout
        .lines()
        .map(|line| line.split_once(". ").map(|(_, name)| name).unwrap_or(line))
        .collect();
    assert_eq!(names, SERVICE_PLAN);
    Ok(())
}

#[test]
fn e2e_plan_service_json() -> Result<()> {
    let env = TestEnvironment::new()?;
    let manifest = env.manifest("service.toml", SERVICE)?;

    let output = env.run(&["plan", manifest.to_str().unwrap(), "--format", "json"])?;
    let plan: Vec<String> = serde_json::from_str(&output.stdout)?;
    assert_eq!(plan, SERVICE_PLAN);
    Ok(())
}

#[test]
fn e2e_independent_modules_in_name_order() -> Result<()> {
    let env = TestEnvironment::new()?;
    let manifest = env.manifest("independent.toml", INDEPENDENT)?;

    let output = env.run(&["plan", manifest.to_str().unwrap(), "-f", "json"])?;
    let plan: Vec<String> = serde_json::from_str(&output.stdout)?;
    assert_eq!(plan, ["alpha", "beta", "gamma"]);
    Ok(())
}

#[test]
fn e2e_plan_repeated_is_identical() -> Result<()> {
    let env = TestEnvironment::new()?;
    let manifest = env.manifest("service.toml", SERVICE)?;
    let path = manifest.to_str().unwrap();

    let first = env.run(&["plan", path])?;
    let second = env.run(&["plan", path])?;
    assert_eq!(first.stdout, second.stdout);
    Ok(())
}

#[test]
fn e2e_check_reports_cycle() -> Result<()> {
    let env = TestEnvironment::new()?;
    let manifest = env.manifest("cycle.toml", CYCLE)?;

    let output = env.run(&["check", manifest.to_str().unwrap()])?;
    let error = output.error.expect("cycle must fail");
    assert!(error.contains("Invalid module graph"));
    assert!(error.contains("Dependency cycle between"));
    assert!(output.stdout.is_empty());
    Ok(())
}

#[test]
fn e2e_check_reports_unknown_dependency() -> Result<()> {
    let env = TestEnvironment::new()?;
    let manifest = env.manifest("unknown.toml", UNKNOWN)?;

    let output = env.run(&["check", manifest.to_str().unwrap()])?;
    let error = output.error.expect("unknown dependency must fail");
    assert!(error.contains("Module 'http' requires module 'tls'"));
    Ok(())
}

#[test]
fn e2e_run_follows_plan() -> Result<()> {
    let env = TestEnvironment::new()?;
    let manifest = env.manifest("service.toml", SERVICE)?;

    let output = env.run(&["run", manifest.to_str().unwrap()])?;
    assert!(output.success(), "{:?}", output.error);

    let expected: Vec<String> = SERVICE_PLAN
        .iter()
        .enumerate()
        .map(|(i, name)| format!("[{}/{}] {}", i + 1, SERVICE_PLAN.len(), name))
        .collect();
    let lines: Vec<&str> = output.stdout.lines().collect();
    assert_eq!(lines, expected);
    Ok(())
}

#[test]
fn e2e_run_cycle_executes_nothing() -> Result<()> {
    let env = TestEnvironment::new()?;
    let manifest = env.manifest("cycle.toml", CYCLE)?;

    let output = env.run(&["run", manifest.to_str().unwrap()])?;
    assert!(!output.success());
    assert!(output.stdout.is_empty());
    Ok(())
}

#[test]
fn e2e_graph_dot() -> Result<()> {
    let env = TestEnvironment::new()?;
    let manifest = env.manifest("service.toml", SERVICE)?;

    let output = env.run(&["graph", manifest.to_str().unwrap()])?;
    assert!(output.stdout.starts_with("digraph"));
    for name in SERVICE_PLAN {
        assert!(output.stdout.contains(name), "missing {name}");
    }
    Ok(())
}

#[test]
fn e2e_invalid_manifest() -> Result<()> {
    let env = TestEnvironment::new()?;
    let manifest = env.manifest("bad.toml", "[modules.a]\nafter = [\"b\"]\n")?;

    let output = env.run(&["plan", manifest.to_str().unwrap()])?;
    let error = output.error.expect("unknown field must fail");
    assert!(error.contains("Failed to parse manifest"));
    Ok(())
}
