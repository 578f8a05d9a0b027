use crate::primitives::OutputFormat;
use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

use super::config::AppConfig;

/// initplan - dependency-ordered initialization planner
#[derive(Debug, Clone, Parser)]
#[command(name = "initplan")]
#[command(about = "Plan and run initialization modules in dependency order")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Global configuration options
    #[command(flatten)]
    pub config: AppConfig,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Parsed command line
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub app_config: AppConfig,
    pub command: Option<Commands>,
}

impl CliConfig {
    /// Parse the process arguments without touching configuration sources
    pub fn parse() -> Self {
        Self::from(Cli::parse())
    }

    /// Parse an explicit argument vector, program name first
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Cli::try_parse_from(args).map(Self::from)
    }
}

impl From<Cli> for CliConfig {
    fn from(cli: Cli) -> Self {
        Self {
            app_config: cli.config,
            command: cli.command,
        }
    }
}

/// Available commands; each reads a TOML module manifest
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Print the initialization order
    Plan {
        #[arg(help = "Path to the module manifest")]
        manifest: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Validate the manifest without printing the order
    Check {
        #[arg(help = "Path to the module manifest")]
        manifest: PathBuf,
    },

    /// Run every module in order and print the execution trace
    Run {
        #[arg(help = "Path to the module manifest")]
        manifest: PathBuf,
    },

    /// Print the requires graph in Graphviz DOT format
    Graph {
        #[arg(help = "Path to the module manifest")]
        manifest: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    include!("cli.test.rs");
}
