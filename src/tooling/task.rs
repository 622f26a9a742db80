//! # Tooling task descriptors.
//!
//! [`TaskDescriptor`] is the runnable form of one declarative tooling entry:
//! CLI metadata (name, usage, positionals, options) plus an async run closure
//! that executes the resolved command against a running service. Built once
//! per declared entry; immutable after construction except for the injected
//! [`app_mount`](TaskDescriptor::app_mount) field.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::config::CommandSpec;
use crate::error::ToolingError;

/// Boxed future returned by a task's run closure.
pub type RunFuture = Pin<Box<dyn Future<Output = Result<(), ToolingError>> + Send>>;

/// Shared run closure.
pub type RunFn = Arc<dyn Fn(Invocation) -> RunFuture + Send + Sync>;

/// Parsed CLI-style options handed to a task invocation.
#[derive(Clone, Debug, Default)]
pub struct Invocation {
    /// Target service override (positional on the CLI).
    pub service: Option<String>,
    /// Command override (everything after `--` on the CLI).
    pub command: Option<CommandSpec>,
    /// User override (`--user`).
    pub user: Option<String>,
    /// Extra environment for this invocation.
    pub env: BTreeMap<String, String>,
}

/// One positional argument in a task's CLI surface.
#[derive(Clone, Debug, PartialEq)]
pub struct Positional {
    /// Argument name.
    pub name: String,
    /// One-line description.
    pub describe: String,
    /// Allowed values, when constrained (e.g. the declared service set).
    pub choices: Vec<String>,
}

/// One named option in a task's CLI surface.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct OptionSpec {
    /// One-line description.
    pub describe: String,
    /// Short/long aliases.
    pub aliases: Vec<String>,
    /// Default value rendered in help, if any.
    pub default: Option<String>,
}

/// A CLI-exposed tooling task bound to a target service.
#[derive(Clone)]
pub struct TaskDescriptor {
    /// Command name.
    pub name: String,
    /// One-line description.
    pub describe: String,
    /// Usage string rendered with usage errors.
    pub usage: String,
    /// Positional arguments, in order.
    pub positionals: Vec<Positional>,
    /// Named options.
    pub options: BTreeMap<String, OptionSpec>,
    /// Mount target injected after construction; disambiguates source paths
    /// inside the container for CLI surfaces that need it.
    pub app_mount: Option<String>,
    run: RunFn,
}

impl TaskDescriptor {
    /// Creates a descriptor with the given metadata and run closure.
    pub fn new(
        name: impl Into<String>,
        describe: impl Into<String>,
        usage: impl Into<String>,
        run: RunFn,
    ) -> Self {
        Self {
            name: name.into(),
            describe: describe.into(),
            usage: usage.into(),
            positionals: Vec::new(),
            options: BTreeMap::new(),
            app_mount: None,
            run,
        }
    }

    /// Adds a positional argument.
    pub fn with_positional(mut self, positional: Positional) -> Self {
        self.positionals.push(positional);
        self
    }

    /// Adds a named option.
    pub fn with_option(mut self, name: impl Into<String>, spec: OptionSpec) -> Self {
        self.options.insert(name.into(), spec);
        self
    }

    /// Invokes the task with parsed options.
    pub async fn run(&self, invocation: Invocation) -> Result<(), ToolingError> {
        (self.run)(invocation).await
    }
}

impl std::fmt::Debug for TaskDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskDescriptor")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .field("app_mount", &self.app_mount)
            .finish()
    }
}

/// The standard `--user` option every dispatching task exposes.
pub(crate) fn user_option() -> OptionSpec {
    OptionSpec {
        describe: "runs as a specific user".to_string(),
        aliases: vec!["u".to_string()],
        default: None,
    }
}

/// The standard `service` positional, constrained to the declared set.
pub(crate) fn service_positional(choices: Vec<String>) -> Positional {
    Positional {
        name: "service".to_string(),
        describe: "runs on this service".to_string(),
        choices,
    }
}
