//! Manifest fixtures shared by the end-to-end tests

/// A web service start-up graph with one precede declaration
pub const SERVICE: &str = r#"
[modules.config]
description = "Load settings"

[modules.logging]
requires = ["config"]

[modules.database]
requires = ["config", "logging"]

[modules.cache]
requires = ["config"]

[modules.migrations]
requires = ["database"]
precede = ["http"]

[modules.http]
requires = ["database", "cache"]
"#;

/// Expected plan for [`SERVICE`]
pub const SERVICE_PLAN: [&str; 6] = ["config", "cache", "logging", "database", "migrations", "http"];

/// Modules with no edges at all
pub const INDEPENDENT: &str = r#"
[modules.gamma]
[modules.alpha]
[modules.beta]
"#;

/// Three-module cycle
pub const CYCLE: &str = r#"
[modules.a]
requires = ["b"]

[modules.b]
requires = ["c"]

[modules.c]
requires = ["a"]
"#;

/// Requirement on a module that is never declared
pub const UNKNOWN: &str = r#"
[modules.http]
requires = ["tls"]

[modules.config]
"#;
