//! Planning and execution of registered initialization modules
//!
//! An [`Initializer`] owns one dependency graph, the callbacks, and the shared
//! context. Nothing is shared between instances.

use super::builder::{Closures, DependencyGraph};
use crate::primitives::{ModuleId, PlanError};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, info, info_span, trace};

type Callback<T> = Box<dyn FnMut(&mut T)>;

/// Execution state of an [`Initializer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    /// `init` has not run, or planning failed
    Pending,
    /// Callbacks are being invoked
    Running,
    /// Every callback ran
    Done,
}

/// A total order over all registered modules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Plan {
    order: Vec<ModuleId>,
}

impl Plan {
    pub fn as_slice(&self) -> &[ModuleId] {
        &self.order
    }

    /// Index of `module` in the plan
    pub fn position(&self, module: &str) -> Option<usize> {
        self.order.iter().position(|m| m == module)
    }

    pub fn names(&self) -> Vec<&str> {
        self.order.iter().map(ModuleId::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ModuleId> {
        self.order.iter()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(" -> "))
    }
}

impl IntoIterator for Plan {
    type Item = ModuleId;
    type IntoIter = std::vec::IntoIter<ModuleId>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.into_iter()
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a ModuleId;
    type IntoIter = std::slice::Iter<'a, ModuleId>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}

/// Orders initialization callbacks by their dependencies and runs them
/// against a shared context `T`.
///
/// ```
/// use initplan_lib::graph::Initializer;
///
/// #[derive(Default)]
/// struct Ctx {
///     steps: Vec<&'static str>,
/// }
///
/// let mut init = Initializer::<Ctx>::new();
/// init.register("http", |c| c.steps.push("http")).requires(["db"]);
/// init.register("db", |c| c.steps.push("db"));
/// init.init().unwrap();
///
/// assert_eq!(init.context().steps, ["db", "http"]);
/// ```
pub struct Initializer<T> {
    graph: DependencyGraph,
    callbacks: BTreeMap<ModuleId, Callback<T>>,
    ctx: T,
    state: InitState,
}

/// Handle returned by [`Initializer::register`] for adding ordering edges
pub struct Registration<'a, T> {
    initializer: &'a mut Initializer<T>,
    module: ModuleId,
}

impl<T> Registration<'_, T> {
    /// Run after every module in `modules`
    pub fn requires<I>(self, modules: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ModuleId>,
    {
        self.initializer
            .graph
            .require(&self.module, modules.into_iter().map(Into::into));
        self
    }

    /// Run before every module in `modules`
    pub fn precedes<I>(self, modules: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ModuleId>,
    {
        self.initializer
            .graph
            .precede(&self.module, modules.into_iter().map(Into::into));
        self
    }
}

impl<T: Default> Initializer<T> {
    /// Create an initializer with a default context
    pub fn new() -> Self {
        Self::with_context(T::default())
    }

    /// Use `ctx` if given, otherwise a default context
    pub fn from_context(ctx: Option<T>) -> Self {
        Self::with_context(ctx.unwrap_or_default())
    }
}

impl<T: Default> Default for Initializer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Initializer<T> {
    pub fn with_context(ctx: T) -> Self {
        Self {
            graph: DependencyGraph::new(),
            callbacks: BTreeMap::new(),
            ctx,
            state: InitState::Pending,
        }
    }

    /// Register `module` with its callback.
    ///
    /// A second registration under the same name replaces the callback; edges
    /// added through the returned handle accumulate across registrations.
    pub fn register<F>(&mut self, module: impl Into<ModuleId>, callback: F) -> Registration<'_, T>
    where
        F: FnMut(&mut T) + 'static,
    {
        let module = module.into();
        self.graph.register(&module);
        if self.callbacks.insert(module.clone(), Box::new(callback)).is_some() {
            debug!(module = %module, "Replaced callback of re-registered module");
        }

        Registration {
            initializer: self,
            module,
        }
    }

    /// Register with explicit precede and requires lists
    pub fn register_with<F>(
        &mut self,
        module: impl Into<ModuleId>,
        callback: F,
        precede: &[&str],
        requires: &[&str],
    ) where
        F: FnMut(&mut T) + 'static,
    {
        self.register(module, callback)
            .precedes(precede.iter().copied())
            .requires(requires.iter().copied());
    }

    /// Compute the execution order without running anything.
    ///
    /// At each step the smallest-named module whose requirements have all
    /// been placed comes next, so the result does not depend on registration
    /// order.
    pub fn plan(&self) -> Result<Plan, PlanError> {
        let closures = self.graph.closures()?;
        self.check_unknown(&closures)?;
        check_cycles(&closures)?;

        let plan = order(&closures)?;
        debug!(modules = plan.len(), plan = %plan, "Planned initialization order");
        Ok(plan)
    }

    /// Every closure member and every module with edges needs a callback
    fn check_unknown(&self, closures: &Closures) -> Result<(), PlanError> {
        for (module, closure) in closures.iter() {
            if let Some(dependency) = closure.iter().find(|d| !self.callbacks.contains_key(*d)) {
                return Err(PlanError::UnknownDependency {
                    module: module.clone(),
                    dependency: dependency.clone(),
                });
            }
        }

        // Only precede declarations create entries for unregistered modules
        for module in self.graph.modules() {
            if self.callbacks.contains_key(module) {
                continue;
            }
            if let Some(declarer) = self.graph.direct_requirements(module.as_str()).first() {
                return Err(PlanError::UnknownPrecedeTarget {
                    module: declarer.clone(),
                    target: module.clone(),
                });
            }
        }

        Ok(())
    }

    /// Plan, then invoke every callback in plan order.
    ///
    /// Runs at most once. A planning failure invokes no callback and leaves
    /// the initializer pending.
    pub fn init(&mut self) -> Result<(), PlanError> {
        if self.state != InitState::Pending {
            return Err(PlanError::AlreadyInitialized);
        }

        let plan = self.plan()?;

        let span = info_span!("init", modules = plan.len());
        let _enter = span.enter();

        self.state = InitState::Running;
        for (position, module) in plan.iter().enumerate() {
            if let Some(callback) = self.callbacks.get_mut(module) {
                trace!(module = %module, position, "Invoking initializer");
                callback(&mut self.ctx);
            }
        }
        self.state = InitState::Done;

        info!(modules = plan.len(), "Initialization complete");
        Ok(())
    }

    pub fn state(&self) -> InitState {
        self.state
    }

    pub fn context(&self) -> &T {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut T {
        &mut self.ctx
    }

    pub fn into_context(self) -> T {
        self.ctx
    }

    /// The underlying requires relation
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn is_registered(&self, module: &str) -> bool {
        self.callbacks.contains_key(module)
    }
}

impl<T: fmt::Debug> fmt::Debug for Initializer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Initializer")
            .field("graph", &self.graph)
            .field("modules", &self.callbacks.keys().collect::<Vec<_>>())
            .field("ctx", &self.ctx)
            .field("state", &self.state)
            .finish()
    }
}

/// Fail when two modules are each in the other's closure
pub(crate) fn check_cycles(closures: &Closures) -> Result<(), PlanError> {
    for (module, closure) in closures.iter() {
        for dependency in closure {
            if closures.requires(dependency.as_str(), module.as_str()) {
                return Err(PlanError::DependencyCycle {
                    first: module.clone(),
                    second: dependency.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Repeatedly place the smallest-named module whose closure is fully placed.
///
/// Every module lands after its requirements. Among the modules that are
/// ready at a given step, name order decides. A module with requirements
/// can therefore come after an unrelated module with a larger name, because
/// it is not ready until its requirements are placed.
pub(crate) fn order(closures: &Closures) -> Result<Plan, PlanError> {
    let mut remaining: BTreeSet<&ModuleId> = closures.modules().collect();
    let mut placed: BTreeSet<&ModuleId> = BTreeSet::new();
    let mut order = Vec::with_capacity(remaining.len());

    while !remaining.is_empty() {
        let mut blocked = None;
        let ready = remaining.iter().copied().find(|module| {
            let waiting_on = closures
                .get(module.as_str())
                .and_then(|closure| closure.iter().find(|d| !placed.contains(d)));
            match waiting_on {
                Some(dependency) => {
                    blocked.get_or_insert_with(|| ((*module).clone(), dependency.clone()));
                    false
                }
                None => true,
            }
        });

        match (ready, blocked) {
            (Some(module), _) => {
                remaining.remove(module);
                placed.insert(module);
                order.push(module.clone());
            }
            // Nothing is ready only when the closures contain a cycle
            (None, Some((first, second))) => {
                return Err(PlanError::DependencyCycle { first, second });
            }
            (None, None) => break,
        }
    }

    Ok(Plan { order })
}

#[cfg(test)]
mod tests {
    include!("planner.test.rs");
}
