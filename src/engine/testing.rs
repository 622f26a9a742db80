//! Test double for the engine seam.
//!
//! [`FakeEngine`] records every runner it is asked to execute and returns
//! scripted outcomes, so pipeline tests can assert on dispatch behavior
//! without a container engine.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::engine::engine::{Engine, ExecOutcome, StdioSpec};
use crate::engine::runner::ExecRunner;
use crate::error::EngineError;

/// Scripted engine for tests.
pub(crate) struct FakeEngine {
    outcome: ExecOutcome,
    running: bool,
    broken_probe: bool,
    calls: Mutex<Vec<ExecRunner>>,
}

impl FakeEngine {
    /// Engine whose commands always exit 0.
    pub(crate) fn succeeding() -> Self {
        Self {
            outcome: ExecOutcome {
                code: Some(0),
                ..Default::default()
            },
            running: true,
            broken_probe: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Engine whose commands always exit with `code`.
    pub(crate) fn failing(code: i32) -> Self {
        Self {
            outcome: ExecOutcome {
                code: Some(code),
                ..Default::default()
            },
            running: true,
            broken_probe: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Engine whose commands exit with `code` and the given stderr.
    pub(crate) fn failing_with_stderr(code: i32, stderr: &str) -> Self {
        let mut engine = Self::failing(code);
        engine.outcome.stderr = stderr.as_bytes().to_vec();
        engine
    }

    /// Sets what the liveness probe reports.
    pub(crate) fn with_running(mut self, running: bool) -> Self {
        self.running = running;
        self
    }

    /// Makes the liveness probe itself fail.
    pub(crate) fn with_broken_probe(mut self) -> Self {
        self.broken_probe = true;
        self
    }

    /// Returns every runner that was dispatched, in order.
    pub(crate) fn calls(&self) -> Vec<ExecRunner> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Engine for FakeEngine {
    async fn is_running(&self, _id: &str) -> Result<bool, EngineError> {
        if self.broken_probe {
            return Err(EngineError::Io {
                source: std::io::Error::other("probe broken"),
            });
        }
        Ok(self.running)
    }

    async fn run(
        &self,
        runner: &ExecRunner,
        _stdio: StdioSpec,
    ) -> Result<ExecOutcome, EngineError> {
        self.calls.lock().unwrap().push(runner.clone());
        Ok(self.outcome.clone())
    }
}
