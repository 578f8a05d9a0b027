//! TOML description of an initialization graph
//!
//! Lets a module graph be planned and inspected without writing Rust:
//!
//! ```toml
//! [modules.config]
//!
//! [modules.database]
//! requires = ["config"]
//!
//! [modules.metrics]
//! precede = ["http"]
//!
//! [modules.http]
//! requires = ["database"]
//! description = "HTTP listener"
//! ```

use crate::graph::Initializer;
use crate::primitives::{ManifestError, ModuleId};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// One declared module
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModuleSpec {
    pub requires: Vec<ModuleId>,
    pub precede: Vec<ModuleId>,
    pub description: Option<String>,
}

/// A set of declared modules keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    pub modules: BTreeMap<ModuleId, ModuleSpec>,
}

/// Shared context for manifest-driven runs: the modules in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    pub executed: Vec<ModuleId>,
}

impl Manifest {
    /// Read and parse a manifest file
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        debug!("Loading manifest: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ManifestError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Register every declared module on an initializer whose callbacks
    /// append the module name to the [`Trace`].
    ///
    /// Names referenced but never declared stay unregistered, so planning
    /// reports them as unknown dependencies.
    pub fn into_initializer(self) -> Initializer<Trace> {
        let mut init = Initializer::new();

        for (name, declared) in self.modules {
            let id = name.clone();
            init.register(name, move |trace: &mut Trace| trace.executed.push(id.clone()))
                .requires(declared.requires)
                .precedes(declared.precede);
        }

        init
    }
}

impl FromStr for Manifest {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
