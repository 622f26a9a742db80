//! # Declarative application configuration.
//!
//! [`AppConfig`] is the parsed per-application configuration the core
//! consumes: the declared service set, the tooling section that becomes CLI
//! tasks, and event-commands run at lifecycle points. Discovery and parsing
//! of the file itself happen outside the core; this module only defines the
//! shapes (serde) and the small amount of logic they carry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ToolingError;
use crate::events::EventName;

/// Parsed application configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name.
    #[serde(default)]
    pub name: String,
    /// Declared services, keyed by service identifier.
    #[serde(default)]
    pub services: BTreeMap<String, ServiceConfig>,
    /// Tooling section: task name to declarative command spec.
    #[serde(default)]
    pub tooling: ToolingConfig,
    /// Commands to run inside services when a lifecycle event fires.
    #[serde(default)]
    pub events: BTreeMap<EventName, Vec<EventCommand>>,
}

impl AppConfig {
    /// Returns the declared service identifiers, in stable order.
    pub fn service_names(&self) -> Vec<String> {
        self.services.keys().cloned().collect()
    }

    /// Returns true if `service` is declared.
    pub fn has_service(&self, service: &str) -> bool {
        self.services.contains_key(service)
    }
}

/// Per-service configuration relevant to the tooling pipeline.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Explicit in-container working directory for commands.
    #[serde(default)]
    pub working_dir: Option<String>,
    /// Default user for commands in this service.
    #[serde(default)]
    pub user: Option<String>,
    /// Base environment for commands in this service.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// Tooling section: task name to spec.
pub type ToolingConfig = BTreeMap<String, ToolingSpec>;

/// One declarative tooling entry, e.g.
/// `{"build": {"command": "composer install", "service": "appserver"}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolingSpec {
    /// Target service the command runs in.
    pub service: String,
    /// The command itself; a single string or an argv list.
    pub command: CommandSpec,
    /// One-line description for CLI help.
    #[serde(default)]
    pub description: Option<String>,
    /// User override for this task.
    #[serde(default)]
    pub user: Option<String>,
    /// Working-directory override for this task.
    #[serde(default)]
    pub dir: Option<String>,
    /// Extra environment applied on top of the service's base env.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// A command as written in config: either one shell-style line or an argv.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandSpec {
    /// One line, tokenized with shell rules at invocation time. Useful for
    /// wrapping compound commands such as `cmd && cmd`.
    Line(String),
    /// Pre-split argument vector, passed through as-is (unless it has exactly
    /// one element, which is treated like a line).
    Argv(Vec<String>),
}

impl CommandSpec {
    /// Resolves the spec into an argument vector.
    ///
    /// A single string token is split with shell-argument tokenization rules
    /// (quoted substrings remain single tokens). An empty or unparseable
    /// command is a usage error, raised before any dispatch.
    pub fn to_argv(&self, usage: &str) -> Result<Vec<String>, ToolingError> {
        let argv = match self {
            CommandSpec::Line(line) => split_line(line, usage)?,
            CommandSpec::Argv(argv) if argv.len() == 1 => split_line(&argv[0], usage)?,
            CommandSpec::Argv(argv) => argv.clone(),
        };
        if argv.is_empty() {
            return Err(ToolingError::usage(
                "you must specify a command! see usage above",
                usage,
            ));
        }
        Ok(argv)
    }
}

fn split_line(line: &str, usage: &str) -> Result<Vec<String>, ToolingError> {
    shell_words::split(line)
        .map_err(|e| ToolingError::usage(format!("could not parse command: {e}"), usage))
}

/// A command bound to a lifecycle event, run inside `service` when the event
/// fires (registered at a late priority so user commands run after core
/// hooks).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventCommand {
    /// Service the command runs in.
    pub service: String,
    /// The command line or argv.
    pub cmd: CommandSpec,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_spec_deserializes_from_string_and_list() {
        let line: CommandSpec = serde_json::from_str("\"composer install\"").unwrap();
        assert_eq!(line, CommandSpec::Line("composer install".into()));

        let argv: CommandSpec = serde_json::from_str("[\"composer\", \"install\"]").unwrap();
        assert_eq!(
            argv,
            CommandSpec::Argv(vec!["composer".into(), "install".into()])
        );
    }

    #[test]
    fn test_single_line_is_shell_tokenized() {
        let spec = CommandSpec::Line("composer install".into());
        assert_eq!(spec.to_argv("usage").unwrap(), vec!["composer", "install"]);
    }

    #[test]
    fn test_quoted_substrings_stay_single_tokens() {
        let spec = CommandSpec::Line("sh -c 'echo hello world'".into());
        assert_eq!(
            spec.to_argv("usage").unwrap(),
            vec!["sh", "-c", "echo hello world"]
        );
    }

    #[test]
    fn test_single_element_argv_is_tokenized_like_a_line() {
        let spec = CommandSpec::Argv(vec!["drush cr".into()]);
        assert_eq!(spec.to_argv("usage").unwrap(), vec!["drush", "cr"]);
    }

    #[test]
    fn test_multi_element_argv_passes_through() {
        let spec = CommandSpec::Argv(vec!["echo".into(), "a b".into()]);
        assert_eq!(spec.to_argv("usage").unwrap(), vec!["echo", "a b"]);
    }

    #[test]
    fn test_empty_command_is_a_usage_error() {
        let spec = CommandSpec::Line("".into());
        let err = spec.to_argv("usage text").unwrap_err();
        match err {
            ToolingError::Usage { usage, .. } => assert_eq!(usage, "usage text"),
            other => panic!("expected usage error, got {other:?}"),
        }
    }

    #[test]
    fn test_tooling_config_parses_spec_scenario() {
        let json = r#"{"build": {"command": "composer install", "service": "appserver"}}"#;
        let tooling: ToolingConfig = serde_json::from_str(json).unwrap();
        let build = &tooling["build"];
        assert_eq!(build.service, "appserver");
        assert_eq!(build.command, CommandSpec::Line("composer install".into()));
    }

    #[test]
    fn test_event_commands_key_on_event_names() {
        let json = r#"{"events": {"post-init": [{"service": "appserver", "cmd": "env"}]}}"#;
        let cfg: AppConfig = serde_json::from_str(json).unwrap();
        let cmds = &cfg.events[&EventName::PostInit];
        assert_eq!(cmds.len(), 1);
        assert_eq!(cmds[0].service, "appserver");
    }
}
