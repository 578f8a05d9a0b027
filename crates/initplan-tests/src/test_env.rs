//! Isolated test environment for end-to-end command tests
//!
//! Commands are parsed from argument vectors exactly as the binary parses
//! them and run in-process against manifests written to a temporary
//! directory.

use anyhow::Result;
use initplan_lib::application::{CliConfig, execute_command_with};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Temporary directory holding manifests for one test
pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

/// Captured result of one command
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub error: Option<String>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.error.is_none()
    }
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Write a manifest and return its path
    pub fn manifest(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Parse `args` (without the program name) and run the command.
    ///
    /// Command failures are captured with their full context chain.
    pub fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let argv = std::iter::once("initplan").chain(args.iter().copied());
        let config = CliConfig::try_parse_from(argv)?;
        let command = config
            .command
            .ok_or_else(|| anyhow::anyhow!("no command given"))?;

        let mut stdout = Vec::new();
        let error = execute_command_with(command, &mut stdout)
            .err()
            .map(|e| format!("{e:#}"));

        Ok(CommandOutput {
            stdout: String::from_utf8(stdout)?,
            error,
        })
    }
}
