//! # Container engine seam.
//!
//! [`Engine`] is the interface the core consumes: run a command inside a
//! running container and probe whether a container is running. The engine
//! itself (docker, podman, a fake in tests) lives behind this trait.

use async_trait::async_trait;

use crate::engine::runner::ExecRunner;
use crate::error::EngineError;

/// How one standard stream is wired for a dispatched command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StdioKind {
    /// Pass the caller's stream straight through.
    Inherit,
    /// Capture for the dispatcher to relay and classify.
    Piped,
}

/// Standard-stream wiring for a dispatched command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StdioSpec {
    /// Standard input wiring.
    pub stdin: StdioKind,
    /// Standard output wiring.
    pub stdout: StdioKind,
    /// Standard error wiring.
    pub stderr: StdioKind,
}

impl StdioSpec {
    /// The tooling default: stdin passes through so interactive commands
    /// work; stdout/stderr are captured for relay and error classification.
    pub fn tooling() -> Self {
        Self {
            stdin: StdioKind::Inherit,
            stdout: StdioKind::Piped,
            stderr: StdioKind::Piped,
        }
    }
}

/// Result of one engine command invocation.
#[derive(Clone, Debug, Default)]
pub struct ExecOutcome {
    /// Process exit code, if the process ran to completion.
    pub code: Option<i32>,
    /// Captured standard output (empty when inherited).
    pub stdout: Vec<u8>,
    /// Captured standard error (empty when inherited).
    pub stderr: Vec<u8>,
}

impl ExecOutcome {
    /// True when the command exited with status zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Captured stderr as lossy UTF-8, trimmed.
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// External container engine consumed by the dispatcher.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Returns whether the container identified by `id` is currently running.
    async fn is_running(&self, id: &str) -> Result<bool, EngineError>;

    /// Executes the runner's command inside its target container.
    ///
    /// A non-zero exit is an `Ok` outcome with a non-zero code; `Err` means
    /// the engine invocation itself failed.
    async fn run(&self, runner: &ExecRunner, stdio: StdioSpec) -> Result<ExecOutcome, EngineError>;
}
