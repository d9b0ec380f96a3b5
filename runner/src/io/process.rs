//! Helpers for collecting child process output.

use std::io::Read;
use std::process::{Child, ExitStatus};
use std::thread;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, instrument, warn};

/// Captured child process output.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Wait for `child` to exit, capturing stdout/stderr without risking pipe deadlocks.
///
/// Both pipes must have been configured as `Stdio::piped()` before spawning.
/// Output is read concurrently while the child runs and there is no timeout.
#[instrument(skip_all, fields(pid = child.id()))]
pub fn wait_with_captured_output(mut child: Child) -> Result<CommandOutput> {
    let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
        (Some(stdout), Some(stderr)) => (stdout, stderr),
        (stdout, _) => {
            reap(&mut child);
            let stream = if stdout.is_none() { "stdout" } else { "stderr" };
            return Err(anyhow!("{stream} was not piped"));
        }
    };

    let stdout_handle = thread::spawn(move || read_stream(stdout));
    let stderr_handle = thread::spawn(move || read_stream(stderr));

    let status = match child.wait() {
        Ok(status) => status,
        Err(err) => {
            // Killing the child closes its pipes so the readers can finish.
            reap(&mut child);
            let _ = join_output(stdout_handle);
            let _ = join_output(stderr_handle);
            return Err(err).context("wait for command");
        }
    };

    let stdout = join_output(stdout_handle).context("join stdout")?;
    let stderr = join_output(stderr_handle).context("join stderr")?;

    debug!(
        exit_code = ?status.code(),
        stdout_bytes = stdout.len(),
        stderr_bytes = stderr.len(),
        "command finished"
    );
    Ok(CommandOutput {
        status,
        stdout,
        stderr,
    })
}

/// Best-effort kill and wait so an abandoned child is not left as a zombie.
fn reap(child: &mut Child) {
    if let Err(err) = child.kill() {
        warn!(err = %err, "failed to kill child process");
    }
    if let Err(err) = child.wait() {
        warn!(err = %err, "failed to wait for killed child process");
    }
}

fn join_output(handle: thread::JoinHandle<Result<Vec<u8>>>) -> Result<Vec<u8>> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(anyhow!("output reader thread panicked")),
    }
}

fn read_stream<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).context("read output")?;
    Ok(buf)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::process::{Command, Stdio};

    fn spawn_sh(script: &str) -> Child {
        Command::new("sh")
            .arg("-c")
            .arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn sh")
    }

    #[test]
    fn captures_both_streams_and_exit_code() {
        let child = spawn_sh("printf out; printf err >&2; exit 3");
        let output = wait_with_captured_output(child).expect("capture");
        assert_eq!(output.status.code(), Some(3));
        assert_eq!(output.stdout_lossy(), "out");
        assert_eq!(output.stderr_lossy(), "err");
    }

    #[test]
    fn drains_large_output_without_deadlock() {
        // Well beyond a default pipe buffer on both streams.
        let child = spawn_sh("yes o | head -c 200000; yes e | head -c 200000 >&2");
        let output = wait_with_captured_output(child).expect("capture");
        assert!(output.status.success());
        assert_eq!(output.stdout.len(), 200_000);
        assert_eq!(output.stderr.len(), 200_000);
    }

    #[test]
    fn errors_when_stdout_not_piped() {
        let child = Command::new("sh")
            .arg("-c")
            .arg("true")
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn sh");
        let err = wait_with_captured_output(child).unwrap_err();
        assert!(err.to_string().contains("stdout was not piped"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn unpiped_stream_kills_and_reaps_child() {
        let child = Command::new("sh")
            .arg("-c")
            .arg("sleep 30")
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn sh");
        let pid = child.id();

        let err = wait_with_captured_output(child).unwrap_err();
        assert!(err.to_string().contains("stderr was not piped"));
        // A zombie keeps its /proc entry until it is waited on.
        assert!(!std::path::Path::new(&format!("/proc/{pid}")).exists());
    }
}
