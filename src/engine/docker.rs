//! # Docker-backed engine.
//!
//! [`DockerEngine`] shells out to the `docker` CLI: `inspect` for liveness
//! probes and `exec` for in-container command execution. It is the default
//! production implementation of the [`Engine`] seam; anything compatible with
//! the docker CLI surface (podman with a shim) works by swapping the program
//! name.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::trace;

use crate::engine::engine::{Engine, ExecOutcome, StdioKind, StdioSpec};
use crate::engine::runner::ExecRunner;
use crate::error::EngineError;

/// Engine implementation over the `docker` CLI.
#[derive(Clone, Debug)]
pub struct DockerEngine {
    program: String,
}

impl DockerEngine {
    /// Engine using `docker` from `PATH`.
    pub fn new() -> Self {
        Self {
            program: "docker".to_string(),
        }
    }

    /// Engine using a specific CLI binary.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn exec_args(runner: &ExecRunner) -> Vec<String> {
        let mut args = vec!["exec".to_string(), "-i".to_string()];
        if let Some(user) = &runner.user {
            args.push("-u".to_string());
            args.push(user.clone());
        }
        if let Some(dir) = &runner.working_dir {
            args.push("-w".to_string());
            args.push(dir.clone());
        }
        for (key, value) in &runner.env {
            args.push("-e".to_string());
            args.push(format!("{key}={value}"));
        }
        args.push(runner.id.clone());
        args.extend(runner.argv.iter().cloned());
        args
    }
}

impl Default for DockerEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn as_stdio(kind: StdioKind) -> Stdio {
    match kind {
        StdioKind::Inherit => Stdio::inherit(),
        StdioKind::Piped => Stdio::piped(),
    }
}

#[async_trait]
impl Engine for DockerEngine {
    async fn is_running(&self, id: &str) -> Result<bool, EngineError> {
        let output = Command::new(&self.program)
            .args(["inspect", "-f", "{{.State.Running}}", id])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| EngineError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // `inspect` fails for unknown containers; that simply means stopped.
        if !output.status.success() {
            return Ok(false);
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim() == "true")
    }

    async fn run(&self, runner: &ExecRunner, stdio: StdioSpec) -> Result<ExecOutcome, EngineError> {
        let args = Self::exec_args(runner);
        trace!(program = %self.program, ?args, "engine exec");

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(as_stdio(stdio.stdin))
            .stdout(as_stdio(stdio.stdout))
            .stderr(as_stdio(stdio.stderr))
            .spawn()
            .map_err(|source| EngineError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|source| EngineError::Io { source })?;

        Ok(ExecOutcome {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
