//! Executor abstraction for goss invocation.
//!
//! The [`GossExecutor`] trait decouples the runner from actually spawning a
//! process. Tests use scripted executors that record the command and return a
//! predetermined result.

use std::process::{Command, ExitStatus, Stdio};

use tracing::{debug, error, info, instrument, warn};

use crate::core::command::GossCommand;
use crate::core::types::InvocationResult;
use crate::error::{Result, RunError};
use crate::io::process::wait_with_captured_output;

/// Abstraction over how a goss command gets executed.
pub trait GossExecutor {
    /// Run `command` to completion and return its captured result.
    fn exec(&self, command: &GossCommand) -> Result<InvocationResult>;
}

/// Executor that spawns the command as a child process and blocks until it exits.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExecutor;

impl GossExecutor for ProcessExecutor {
    #[instrument(skip_all, fields(command = %command.display()))]
    fn exec(&self, command: &GossCommand) -> Result<InvocationResult> {
        info!("starting goss");
        let executable = command.program.to_string_lossy().into_owned();

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!("spawning child process");
        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(source) => {
                error!(err = %source, "failed to spawn goss");
                return Err(RunError::Spawn { executable, source });
            }
        };

        let output = wait_with_captured_output(child).map_err(|err| RunError::Capture {
            executable: executable.clone(),
            message: format!("{err:#}"),
        })?;

        let result = InvocationResult {
            exit_code: exit_code(output.status),
            stdout: output.stdout_lossy(),
            stderr: output.stderr_lossy(),
        };
        if result.failed() {
            warn!(exit_code = ?result.exit_code, "goss reported failures");
        }
        Ok(result)
    }
}

/// Exit code of a finished process; a signal `N` is reported as `-N`.
#[cfg(unix)]
fn exit_code(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;

    status.code().or_else(|| status.signal().map(|signal| -signal))
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> Option<i32> {
    status.code()
}
