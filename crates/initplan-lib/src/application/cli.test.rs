use super::*;
use crate::primitives::LogFormat;
use clap::CommandFactory;

#[test]
fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_plan_with_format() {
    let cli = Cli::try_parse_from(["initplan", "plan", "init.toml", "--format", "json"]).unwrap();
    match cli.command {
        Some(Commands::Plan { manifest, format }) => {
            assert_eq!(manifest, PathBuf::from("init.toml"));
            assert_eq!(format, OutputFormat::Json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_plan_format_defaults_to_text() {
    let cli = Cli::try_parse_from(["initplan", "plan", "init.toml"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Plan {
            format: OutputFormat::Text,
            ..
        })
    ));
}

#[test]
fn test_global_options_after_subcommand() {
    let cli =
        Cli::try_parse_from(["initplan", "check", "init.toml", "--log-format", "json"]).unwrap();
    let config = CliConfig::from(cli);
    assert_eq!(config.app_config.log_format, LogFormat::Json);
    assert!(matches!(config.command, Some(Commands::Check { .. })));
}

#[test]
fn test_missing_manifest_is_rejected() {
    assert!(Cli::try_parse_from(["initplan", "run"]).is_err());
}

#[test]
fn test_no_subcommand() {
    let cli = Cli::try_parse_from(["initplan"]).unwrap();
    assert!(cli.command.is_none());
}

#[test]
fn test_cli_config_try_parse_from() {
    let config = CliConfig::try_parse_from(["initplan", "graph", "deps.toml"]).unwrap();
    assert!(matches!(config.command, Some(Commands::Graph { .. })));
    assert!(CliConfig::try_parse_from(["initplan", "bogus"]).is_err());
}
