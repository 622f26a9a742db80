//! # Dispatch and outcome classification.
//!
//! [`dispatch`] runs a resolved [`ExecRunner`] through the engine and turns a
//! failure into one of two classified errors:
//!
//! ```text
//! engine.run(runner)
//!   ├─ exit 0 ──────────────► Ok(outcome), no output transformation
//!   └─ non-zero / engine err
//!        └─ engine.is_running(runner.id)?
//!             ├─ false ─► ServiceNotRunning   (start guidance, original
//!             │                                command error suppressed)
//!             └─ true  ─► CommandFailed{reported: true}
//!                          (the command's own output already explained it)
//! ```
//!
//! No cancellation or deadline is imposed; a dispatched command runs to
//! completion or to the process's own termination.

use tracing::debug;

use crate::engine::engine::{Engine, ExecOutcome, StdioSpec};
use crate::engine::runner::ExecRunner;
use crate::error::ToolingError;

/// Executes `runner` inside its target container and classifies the outcome.
pub async fn dispatch(engine: &dyn Engine, runner: &ExecRunner) -> Result<ExecOutcome, ToolingError> {
    debug!(
        service = %runner.service,
        id = %runner.id,
        argv = ?runner.argv,
        "dispatching command"
    );

    let failure = match engine.run(runner, StdioSpec::tooling()).await {
        Ok(outcome) if outcome.success() => return Ok(outcome),
        Ok(outcome) => {
            let stderr = outcome.stderr_text();
            if stderr.is_empty() {
                match outcome.code {
                    Some(code) => format!("command exited with code {code}"),
                    None => "command terminated by signal".to_string(),
                }
            } else {
                stderr
            }
        }
        Err(e) => e.to_string(),
    };

    // The not-running probe decides which error the user sees: a stopped app
    // gets remediation guidance instead of the raw command error.
    match engine.is_running(&runner.id).await {
        Ok(false) => Err(ToolingError::ServiceNotRunning {
            app: runner.app.clone(),
            service: runner.service.clone(),
        }),
        _ => Err(ToolingError::CommandFailed {
            error: failure,
            reported: true,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::FakeEngine;
    use std::collections::BTreeMap;

    fn runner() -> ExecRunner {
        ExecRunner {
            id: "myapp_appserver_1".into(),
            app: "myapp".into(),
            service: "appserver".into(),
            argv: vec!["composer".into(), "install".into()],
            user: None,
            env: BTreeMap::new(),
            working_dir: None,
            mount: None,
        }
    }

    #[tokio::test]
    async fn test_success_returns_outcome_untransformed() {
        let engine = FakeEngine::succeeding();
        let outcome = dispatch(&engine, &runner()).await.unwrap();
        assert!(outcome.success());
        assert_eq!(engine.calls()[0].argv, vec!["composer", "install"]);
    }

    #[tokio::test]
    async fn test_stopped_container_classifies_as_not_running() {
        let engine = FakeEngine::failing(137).with_running(false);
        let err = dispatch(&engine, &runner()).await.unwrap_err();
        match err {
            ToolingError::ServiceNotRunning { app, service } => {
                assert_eq!(app, "myapp");
                assert_eq!(service, "appserver");
            }
            other => panic!("expected not-running, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_running_container_reraises_as_reported_failure() {
        let engine = FakeEngine::failing(2);
        let err = dispatch(&engine, &runner()).await.unwrap_err();
        assert!(err.is_reported());
        assert!(err.to_string().contains("exited with code 2"));
    }

    #[tokio::test]
    async fn test_probe_failure_keeps_original_error() {
        // When the liveness probe itself errors we cannot claim the service
        // is stopped, so the command failure is surfaced.
        let engine = FakeEngine::failing(1).with_broken_probe();
        let err = dispatch(&engine, &runner()).await.unwrap_err();
        assert!(matches!(err, ToolingError::CommandFailed { .. }));
    }

    #[tokio::test]
    async fn test_failure_message_prefers_captured_stderr() {
        let engine = FakeEngine::failing_with_stderr(2, "composer: not found");
        let err = dispatch(&engine, &runner()).await.unwrap_err();
        assert!(err.to_string().contains("composer: not found"));
    }
}
