//! Sequential execution of aligner commands.
//!
//! Commands run one after another, each waited on before the next starts.
//! Running them in parallel is deliberately not offered: thread counts are
//! passed to the aligners through their own flags.

use std::process::ExitStatus;

use log::{info, warn};
use thiserror::Error;

use crate::command::AlignerCommand;

/// Errors that can occur while running commands.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}")]
    NonZeroExit { command: String, status: ExitStatus },
}

/// Result type for command execution.
pub type RunResult<T> = Result<T, RunError>;

/// What to do when an aligner exits with a failure status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunPolicy {
    /// Log a warning and run the remaining commands
    #[default]
    KeepGoing,
    /// Stop at the first failure
    FailFast,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Commands that were started and waited on
    pub executed: usize,
    /// Commands that exited with a failure status
    pub failed: usize,
}

/// Runs every command in order, blocking on each.
///
/// Output of the aligners goes straight to the inherited stdout/stderr.
/// A command that cannot be started at all (for instance because the
/// aligner is not installed) always aborts the run.
pub fn run_commands(commands: &[AlignerCommand], policy: RunPolicy) -> RunResult<RunSummary> {
    let mut summary = RunSummary::default();

    for (i, command) in commands.iter().enumerate() {
        info!("[{}/{}] {}", i + 1, commands.len(), command);

        let status = command
            .to_process()
            .status()
            .map_err(|source| RunError::Spawn {
                command: command.to_string(),
                source,
            })?;
        summary.executed += 1;

        if !status.success() {
            summary.failed += 1;
            if policy == RunPolicy::FailFast {
                return Err(RunError::NonZeroExit {
                    command: command.to_string(),
                    status,
                });
            }
            warn!("`{}` exited with {}", command, status);
        }
    }

    Ok(summary)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_run_empty_list() {
        let summary = run_commands(&[], RunPolicy::FailFast).unwrap();
        assert_eq!(summary, RunSummary::default());
    }

    #[test]
    fn test_run_successful_commands() {
        let commands = vec![
            AlignerCommand::new("true"),
            AlignerCommand::new("true").arg("ignored"),
        ];
        let summary = run_commands(&commands, RunPolicy::FailFast).unwrap();

        assert_eq!(summary, RunSummary { executed: 2, failed: 0 });
    }

    #[test]
    fn test_failures_counted_when_keeping_going() {
        let commands = vec![
            AlignerCommand::new("false"),
            AlignerCommand::new("true"),
            AlignerCommand::new("false"),
        ];
        let summary = run_commands(&commands, RunPolicy::KeepGoing).unwrap();

        assert_eq!(summary, RunSummary { executed: 3, failed: 2 });
    }

    #[test]
    fn test_fail_fast_stops_at_first_failure() {
        let commands = vec![AlignerCommand::new("false"), AlignerCommand::new("true")];
        let result = run_commands(&commands, RunPolicy::FailFast);

        assert!(matches!(
            result,
            Err(RunError::NonZeroExit { ref command, .. }) if command == "false"
        ));
    }

    #[test]
    fn test_missing_program() {
        let commands = vec![AlignerCommand::new("msarun-no-such-aligner")];
        let result = run_commands(&commands, RunPolicy::KeepGoing);

        assert!(matches!(result, Err(RunError::Spawn { .. })));
    }

    #[test]
    fn test_arguments_are_not_shell_split() {
        // `test` sees a single operand, so a value with spaces stays intact
        let commands = vec![AlignerCommand::new("test").arg("a b")];
        let summary = run_commands(&commands, RunPolicy::FailFast).unwrap();

        assert_eq!(summary.failed, 0);
    }
}
