//! Privileged command execution with a bounded timeout.
//!
//! The orchestrator hands over a literal argument vector — never a shell
//! string assembled from user input — and interprets the exit status as
//! data. Elevation itself is pkexec's job; the argv already carries it.

use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::core::errors::{DmhError, Result};

/// Upper bound on a single privileged command.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(120);

/// Polling interval while waiting for the child.
const WAIT_POLL: Duration = Duration::from_millis(50);

/// Exit codes pkexec uses for "authorization dismissed" and "not authorized".
const AUTH_FAILURE_CODES: [i32; 2] = [126, 127];

/// How a privileged command concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Success,
    /// The elevation mechanism reported cancellation or denial.
    AuthorizationCancelled,
    /// The command ran and returned a failure code.
    Failed(i32),
    /// The deadline passed; the child was killed. The external operation
    /// may or may not have completed.
    TimedOut,
}

/// Seam for executing privileged commands, so tests can substitute recorded
/// outcomes without ever spawning a process.
pub trait PrivilegedRunner: Send + Sync {
    /// Execute `argv` and wait up to `timeout` for it to conclude.
    fn run(&self, argv: &[String], timeout: Duration) -> Result<CommandOutcome>;
}

/// Production runner: spawn, poll, kill on deadline.
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl PrivilegedRunner for ProcessRunner {
    fn run(&self, argv: &[String], timeout: Duration) -> Result<CommandOutcome> {
        let Some((program, args)) = argv.split_first() else {
            return Err(DmhError::Runtime {
                details: "empty privileged command".to_string(),
            });
        };

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| DmhError::io(program, source))?;

        let deadline = Instant::now() + timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(interpret(status)),
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Ok(CommandOutcome::TimedOut);
                    }
                    thread::sleep(WAIT_POLL);
                }
                Err(source) => return Err(DmhError::io(program, source)),
            }
        }
    }
}

fn interpret(status: ExitStatus) -> CommandOutcome {
    match status.code() {
        Some(0) => CommandOutcome::Success,
        Some(code) if AUTH_FAILURE_CODES.contains(&code) => CommandOutcome::AuthorizationCancelled,
        Some(code) => CommandOutcome::Failed(code),
        // Killed by a signal: no code to report.
        None => CommandOutcome::Failed(-1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn empty_argv_is_an_error() {
        let err = ProcessRunner.run(&[], COMMAND_TIMEOUT).unwrap_err();
        assert_eq!(err.code(), "DMH-3900");
    }

    #[cfg(unix)]
    #[test]
    fn zero_exit_is_success() {
        let outcome = ProcessRunner.run(&argv(&["true"]), COMMAND_TIMEOUT).unwrap();
        assert_eq!(outcome, CommandOutcome::Success);
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_failed_with_code() {
        let outcome = ProcessRunner
            .run(&argv(&["sh", "-c", "exit 3"]), COMMAND_TIMEOUT)
            .unwrap();
        assert_eq!(outcome, CommandOutcome::Failed(3));
    }

    #[cfg(unix)]
    #[test]
    fn authorization_codes_map_to_cancelled() {
        for code in ["exit 126", "exit 127"] {
            let outcome = ProcessRunner
                .run(&argv(&["sh", "-c", code]), COMMAND_TIMEOUT)
                .unwrap();
            assert_eq!(outcome, CommandOutcome::AuthorizationCancelled);
        }
    }

    #[cfg(unix)]
    #[test]
    fn deadline_overrun_kills_the_child() {
        let started = Instant::now();
        let outcome = ProcessRunner
            .run(&argv(&["sleep", "30"]), Duration::from_millis(200))
            .unwrap();
        assert_eq!(outcome, CommandOutcome::TimedOut);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn missing_binary_is_an_io_error() {
        let err = ProcessRunner
            .run(&argv(&["dmh-no-such-binary-exists"]), COMMAND_TIMEOUT)
            .unwrap_err();
        assert_eq!(err.code(), "DMH-3001");
    }
}
