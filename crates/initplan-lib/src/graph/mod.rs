//! Dependency resolution for initialization modules
//!
//! [`builder`] accumulates requires/precede edges and computes transitive
//! closures; [`planner`] validates those closures, produces a deterministic
//! total order, and drives callback execution against a shared context.

pub mod builder;
pub mod planner;

pub use builder::{Closures, DependencyGraph};
pub use planner::{InitState, Initializer, Plan};
