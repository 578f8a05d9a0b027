//! # initplan Library
//!
//! Deterministic dependency planning for start-up initialization steps.
//!
//! ## Core Modules
//!
//! - [`primitives`] - Module ids, structured errors, shared enums
//! - [`graph`] - Dependency graph builder, planner, and execution driver
//! - [`manifest`] - TOML module manifests for the command line
//! - [`logger`] - Structured logging setup
//! - [`application`] - CLI interface and configuration management
//!
//! ## Quick Start
//!
//! ```
//! use initplan_lib::Initializer;
//!
//! #[derive(Default)]
//! struct App {
//!     pool_size: usize,
//!     ready: bool,
//! }
//!
//! let mut init = Initializer::<App>::new();
//! init.register("server", |app| app.ready = app.pool_size > 0)
//!     .requires(["database"]);
//! init.register("database", |app| app.pool_size = 8);
//!
//! init.init().expect("module graph is valid");
//! assert!(init.context().ready);
//! ```

pub mod application;
pub mod graph;
pub mod logger;
pub mod manifest;
pub mod primitives;

// Re-export commonly used types for convenience
pub use application::{AppConfig, Cli, Commands, execute_command};
pub use graph::{DependencyGraph, InitState, Initializer, Plan};
pub use logger::Logger;
pub use manifest::{Manifest, Trace};
pub use primitives::{ConfigError, LogFormat, LogLevel, LogOutput, ManifestError, ModuleId, PlanError};

use anyhow::Result;
use application::CliConfig;

/// Binary entry point: load configuration and run the command
pub fn main() -> Result<()> {
    let config = CliConfig::load()?;
    execute_command(config)
}
