//! Engine seam: execution specs, dispatch classification, and the docker
//! implementation.
//!
//! ## Contents
//! - [`Engine`], [`StdioSpec`], [`ExecOutcome`] the external-engine interface
//! - [`ExecRunner`] resolved per-invocation execution spec
//! - [`dispatch`] run-and-classify (not-running vs command failure)
//! - [`DockerEngine`] `docker` CLI implementation

mod dispatch;
mod docker;
#[allow(clippy::module_inception)]
mod engine;
mod runner;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatch::dispatch;
pub use docker::DockerEngine;
pub use engine::{Engine, ExecOutcome, StdioKind, StdioSpec};
pub use runner::ExecRunner;
