//! Command handlers
//!
//! Handlers write to a caller-supplied writer so they can be exercised
//! without a process boundary.

use crate::application::{CliConfig, Commands};
use crate::logger::Logger;
use crate::manifest::Manifest;
use crate::primitives::OutputFormat;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Install the logger and run the parsed command against stdout
pub fn execute_command(config: CliConfig) -> Result<()> {
    let logger = match Logger::global() {
        Some(logger) => logger,
        None => Logger::init(config.app_config.to_logger_config())?,
    };
    debug!(level = ?logger.config().level, "Executing command");

    let mut stdout = std::io::stdout().lock();
    match config.command {
        Some(command) => execute_command_with(command, &mut stdout),
        None => {
            writeln!(stdout, "initplan - dependency-ordered initialization planner")?;
            writeln!(stdout, "Run 'initplan --help' for usage information")?;
            Ok(())
        }
    }
}

/// Run a command, writing its output to `out`
pub fn execute_command_with(command: Commands, out: &mut dyn Write) -> Result<()> {
    match command {
        Commands::Plan { manifest, format } => handle_plan(&manifest, format, out),
        Commands::Check { manifest } => handle_check(&manifest, out),
        Commands::Run { manifest } => handle_run(&manifest, out),
        Commands::Graph { manifest } => handle_graph(&manifest, out),
    }
}

fn load_manifest(path: &Path) -> Result<Manifest> {
    let manifest = Manifest::load(path)?;
    debug!(modules = manifest.len(), "Loaded manifest {}", path.display());
    Ok(manifest)
}

fn handle_plan(path: &Path, format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    let init = load_manifest(path)?.into_initializer();
    let plan = init
        .plan()
        .with_context(|| format!("Cannot plan modules from '{}'", path.display()))?;

    match format {
        OutputFormat::Text => {
            for (index, module) in plan.iter().enumerate() {
                writeln!(out, "{:>3}. {}", index + 1, module)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &plan)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn handle_check(path: &Path, out: &mut dyn Write) -> Result<()> {
    let init = load_manifest(path)?.into_initializer();
    let plan = init
        .plan()
        .with_context(|| format!("Invalid module graph in '{}'", path.display()))?;

    writeln!(out, "ok: {} modules, no cycles or unknown dependencies", plan.len())?;
    Ok(())
}

fn handle_run(path: &Path, out: &mut dyn Write) -> Result<()> {
    let mut init = load_manifest(path)?.into_initializer();
    init.init()
        .with_context(|| format!("Cannot initialize modules from '{}'", path.display()))?;

    let trace = init.into_context();
    let total = trace.executed.len();
    for (index, module) in trace.executed.iter().enumerate() {
        writeln!(out, "[{}/{}] {}", index + 1, total, module)?;
    }
    info!(modules = total, "Run complete");
    Ok(())
}

fn handle_graph(path: &Path, out: &mut dyn Write) -> Result<()> {
    let init = load_manifest(path)?.into_initializer();
    write!(out, "{}", init.graph().to_dot())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    include!("commands.test.rs");
}
