//! Error types used by the dockhand core.
//!
//! This module defines three error enums:
//!
//! - [`HookError`] — errors raised by lifecycle hooks during an emission.
//! - [`ToolingError`] — errors raised by the tooling pipeline (usage problems,
//!   dispatch classification, fast-path cache misses).
//! - [`EngineError`] — errors raised while invoking the external container engine.
//!
//! All types provide `as_label` helpers for logging, and [`ToolingError`] carries
//! the structured "already reported" marker via [`ToolingError::is_reported`].

use thiserror::Error;

/// # Errors produced by lifecycle hooks.
///
/// A hook failure is fatal to the in-progress emission: the bus stops invoking
/// later-ordered hooks for that event and the error propagates to the emitter's
/// caller. Lifecycle stages are order-dependent, so continuing past a failed
/// stage would corrupt later stages.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HookError {
    /// A hook returned an error while handling an event.
    #[error("hook failed: {reason}")]
    Failed {
        /// Human-readable failure reason.
        reason: String,
    },
}

impl HookError {
    /// Creates a [`HookError::Failed`] from any displayable reason.
    pub fn failed(reason: impl Into<String>) -> Self {
        HookError::Failed {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            HookError::Failed { .. } => "hook_failed",
        }
    }
}

/// # Errors produced by the tooling pipeline.
///
/// Usage errors surface before any dispatch; dispatch errors are classified by
/// the dispatcher into "service not running" (user-actionable, suppresses the
/// underlying command error) and "command failed" (carries the original error,
/// marked as already reported so the top-level reporter does not duplicate
/// diagnostic noise the command itself printed).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ToolingError {
    /// Missing or invalid service, or missing command. Always fatal to the
    /// invocation; `usage` is the task's usage string for help rendering.
    #[error("{message}")]
    Usage {
        /// What was wrong with the invocation.
        message: String,
        /// Usage string of the task, rendered alongside the error.
        usage: String,
    },

    /// The fast path found no persisted compose snapshot for the app.
    #[error("could not detect a built app named {name}; rebuild or move into the correct location")]
    MissingSnapshot {
        /// Application name the snapshot key was derived from.
        name: String,
    },

    /// The command failed and the target container is not running.
    #[error("looks like {app} is stopped! start it up to exec your heart out")]
    ServiceNotRunning {
        /// Application name, for the remediation message.
        app: String,
        /// Service whose container was probed.
        service: String,
    },

    /// The command failed while the container was running.
    #[error("command failed: {error}")]
    CommandFailed {
        /// The underlying command/engine error message.
        error: String,
        /// Set when the failure was already surfaced by the command's own
        /// output; top-level reporters should skip re-printing diagnostics.
        reported: bool,
    },

    /// A `pre-exec`/`post-exec` hook failed around the dispatch.
    #[error(transparent)]
    Hook(#[from] HookError),
}

impl ToolingError {
    /// Creates a usage error with the given message and usage string.
    pub fn usage(message: impl Into<String>, usage: impl Into<String>) -> Self {
        ToolingError::Usage {
            message: message.into(),
            usage: usage.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ToolingError::Usage { .. } => "tooling_usage",
            ToolingError::MissingSnapshot { .. } => "tooling_missing_snapshot",
            ToolingError::ServiceNotRunning { .. } => "tooling_service_not_running",
            ToolingError::CommandFailed { .. } => "tooling_command_failed",
            ToolingError::Hook(_) => "tooling_hook",
        }
    }

    /// Indicates whether the failure was already surfaced to the user
    /// (the command's own stdout/stderr carried the diagnostics).
    ///
    /// Top-level reporters check this to suppress duplicate stack-trace noise.
    pub fn is_reported(&self) -> bool {
        matches!(self, ToolingError::CommandFailed { reported: true, .. })
    }
}

/// # Errors produced while invoking the external container engine.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine binary could not be spawned.
    #[error("failed to invoke {program}: {source}")]
    Spawn {
        /// Program that failed to start (e.g. `docker`).
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// I/O failure while talking to a spawned engine process.
    #[error("engine i/o error: {source}")]
    Io {
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl EngineError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            EngineError::Spawn { .. } => "engine_spawn",
            EngineError::Io { .. } => "engine_io",
        }
    }
}
