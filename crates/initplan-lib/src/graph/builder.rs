//! Dependency graph builder with memoized transitive closures
//!
//! Edges are stored as a single "requires" relation: a precede declaration
//! `a precedes b` is recorded as `b requires a`. Nothing is validated at
//! registration time; unknown modules and cycles surface when closures are
//! computed and checked by the planner.

use crate::primitives::{ModuleId, PlanError};
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace};

/// Requires relation accumulated from registrations
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Direct requirements per module, in declaration order, duplicates kept
    requires: BTreeMap<ModuleId, Vec<ModuleId>>,
    /// Modules registered by name (the planner holds their callbacks)
    registered: BTreeSet<ModuleId>,
}

/// Transitive requirements of every module seen during one closure pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Closures {
    map: BTreeMap<ModuleId, BTreeSet<ModuleId>>,
}

/// Pass-scoped state for closure expansion
#[derive(Default)]
struct ClosurePass {
    cache: BTreeMap<ModuleId, BTreeSet<ModuleId>>,
    in_progress: BTreeSet<ModuleId>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `module` as registered, creating its requires entry.
    ///
    /// Registering the same name again is not an error; edges accumulate.
    pub fn register(&mut self, module: &ModuleId) {
        if !self.registered.insert(module.clone()) {
            debug!(module = %module, "Module registered again, edges accumulate");
        }
        self.requires.entry(module.clone()).or_default();
    }

    /// Append `requires` to the direct requirements of `module`
    pub fn require<I>(&mut self, module: &ModuleId, requires: I)
    where
        I: IntoIterator<Item = ModuleId>,
    {
        let own = self.requires.entry(module.clone()).or_default();
        for requirement in requires {
            trace!(module = %module, requires = %requirement, "Recording requires edge");
            own.push(requirement);
        }
    }

    /// Record that `module` runs before each of `targets`.
    ///
    /// Stored as `target requires module`; a target that was never registered
    /// gets an entry without a callback, which planning reports as unknown.
    pub fn precede<I>(&mut self, module: &ModuleId, targets: I)
    where
        I: IntoIterator<Item = ModuleId>,
    {
        for target in targets {
            trace!(module = %module, precedes = %target, "Recording precede edge");
            self.requires.entry(target).or_default().push(module.clone());
        }
    }

    /// Whether `module` was registered (has a callback)
    pub fn is_registered(&self, module: &str) -> bool {
        self.registered.contains(module)
    }

    /// Whether `module` has an entry in the requires relation
    pub fn contains(&self, module: &str) -> bool {
        self.requires.contains_key(module)
    }

    /// All modules with a requires entry, by name
    pub fn modules(&self) -> impl Iterator<Item = &ModuleId> {
        self.requires.keys()
    }

    /// Direct requirements as recorded (duplicates included)
    pub fn direct_requirements(&self, module: &str) -> &[ModuleId] {
        self.requires.get(module).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn module_count(&self) -> usize {
        self.requires.len()
    }

    /// Number of distinct requires edges
    pub fn edge_count(&self) -> usize {
        self.requires
            .values()
            .map(|reqs| reqs.iter().collect::<BTreeSet<_>>().len())
            .sum()
    }

    /// Transitive requirements of a single module
    pub fn closure(&self, module: &str) -> Result<BTreeSet<ModuleId>, PlanError> {
        let module = ModuleId::from(module);
        let mut pass = ClosurePass::default();
        self.resolve(&module, &mut pass)?;
        Ok(pass.cache.remove(&module).unwrap_or_default())
    }

    /// Compute the closure of every module in one pass.
    ///
    /// Fails fast with [`PlanError::DependencyCycle`] when expansion re-enters
    /// a module that is still being expanded.
    pub fn closures(&self) -> Result<Closures, PlanError> {
        let mut pass = ClosurePass::default();
        for module in self.requires.keys() {
            self.resolve(module, &mut pass)?;
        }

        debug!(
            modules = self.requires.len(),
            resolved = pass.cache.len(),
            "Computed transitive closures"
        );

        Ok(Closures { map: pass.cache })
    }

    fn resolve(&self, module: &ModuleId, pass: &mut ClosurePass) -> Result<(), PlanError> {
        if pass.cache.contains_key(module) {
            return Ok(());
        }

        let direct = self.direct_requirements(module.as_str());
        if direct.is_empty() {
            pass.cache.insert(module.clone(), BTreeSet::new());
            return Ok(());
        }

        pass.in_progress.insert(module.clone());

        let mut closure = BTreeSet::new();
        for requirement in direct {
            if pass.in_progress.contains(requirement) {
                debug!(module = %module, requires = %requirement, "Cycle found during expansion");
                return Err(PlanError::DependencyCycle {
                    first: module.clone(),
                    second: requirement.clone(),
                });
            }

            self.resolve(requirement, pass)?;
            if let Some(nested) = pass.cache.get(requirement) {
                closure.extend(nested.iter().cloned());
            }
            closure.insert(requirement.clone());
        }

        pass.in_progress.remove(module);
        trace!(module = %module, size = closure.len(), "Resolved closure");
        pass.cache.insert(module.clone(), closure);
        Ok(())
    }

    /// Graph view with an edge from each requirement to its dependent
    pub fn to_digraph(&self) -> DiGraph<ModuleId, &'static str> {
        let mut graph = DiGraph::new();
        let mut nodes: BTreeMap<&ModuleId, NodeIndex> = BTreeMap::new();

        for (module, requirements) in &self.requires {
            let dependent = *nodes
                .entry(module)
                .or_insert_with(|| graph.add_node(module.clone()));

            for requirement in requirements.iter().collect::<BTreeSet<_>>() {
                let source = *nodes
                    .entry(requirement)
                    .or_insert_with(|| graph.add_node(requirement.clone()));
                graph.add_edge(source, dependent, "requires");
            }
        }

        graph
    }

    /// Graphviz rendering of the requires relation
    pub fn to_dot(&self) -> String {
        let graph = self.to_digraph();
        format!("{}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
    }
}

impl Closures {
    pub fn get(&self, module: &str) -> Option<&BTreeSet<ModuleId>> {
        self.map.get(module)
    }

    /// Whether `dependency` is in the closure of `module`
    pub fn requires(&self, module: &str, dependency: &str) -> bool {
        self.map
            .get(module)
            .is_some_and(|closure| closure.contains(dependency))
    }

    /// Modules with a computed closure, by name
    pub fn modules(&self) -> impl Iterator<Item = &ModuleId> {
        self.map.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ModuleId, &BTreeSet<ModuleId>)> {
        self.map.iter()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl From<BTreeMap<ModuleId, BTreeSet<ModuleId>>> for Closures {
    fn from(map: BTreeMap<ModuleId, BTreeSet<ModuleId>>) -> Self {
        Self { map }
    }
}

#[cfg(test)]
mod tests {
    include!("builder.test.rs");
}
