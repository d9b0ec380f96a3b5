//! Test-only helpers: scripted executors and scratch directories.

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::core::command::GossCommand;
use crate::core::types::InvocationResult;
use crate::error::{self, RunError};
use crate::io::executor::GossExecutor;

/// Minimal goss file body; goss itself never reads it in tests.
pub const SAMPLE_GOSS_YAML: &str = "file:\n  /etc/hosts:\n    exists: true\n";

/// Executor that records every command and replies with a canned result.
pub struct ScriptedExecutor {
    reply: Reply,
    calls: RefCell<Vec<GossCommand>>,
}

enum Reply {
    Result(InvocationResult),
    SpawnError,
}

impl ScriptedExecutor {
    pub fn new(result: InvocationResult) -> Self {
        Self {
            reply: Reply::Result(result),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Exit 0 with `stdout` and empty stderr.
    pub fn passing(stdout: &str) -> Self {
        Self::new(InvocationResult {
            exit_code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        })
    }

    /// Fails every call as if the executable did not exist.
    pub fn unavailable() -> Self {
        Self {
            reply: Reply::SpawnError,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Commands received so far, in order.
    pub fn calls(&self) -> Vec<GossCommand> {
        self.calls.borrow().clone()
    }
}

impl GossExecutor for ScriptedExecutor {
    fn exec(&self, command: &GossCommand) -> error::Result<InvocationResult> {
        self.calls.borrow_mut().push(command.clone());
        match &self.reply {
            Reply::Result(result) => Ok(result.clone()),
            Reply::SpawnError => Err(RunError::Spawn {
                executable: command.program.to_string_lossy().into_owned(),
                source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
            }),
        }
    }
}

/// Temporary directory that is removed on drop.
pub struct TestDir {
    temp: TempDir,
}

impl TestDir {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create tempdir")?;
        Ok(Self { temp })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Write a goss test file named `name` and return its path.
    pub fn goss_file(&self, name: &str) -> Result<PathBuf> {
        let path = self.path().join(name);
        fs::write(&path, SAMPLE_GOSS_YAML).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    /// Write an executable shell script standing in for goss.
    ///
    /// The script prints `stdout` and `stderr`, records its arguments one per
    /// line in `<name>.args`, and exits with `exit_code`.
    #[cfg(unix)]
    pub fn stub_goss(
        &self,
        name: &str,
        stdout: &str,
        stderr: &str,
        exit_code: i32,
    ) -> Result<PathBuf> {
        use std::os::unix::fs::PermissionsExt;

        let path = self.path().join(name);
        let args_path = self.path().join(format!("{name}.args"));
        let script = format!(
            "#!/bin/sh\nfor arg in \"$@\"; do printf '%s\\n' \"$arg\"; done > '{}'\nprintf '%s' '{}'\nprintf '%s' '{}' >&2\nexit {}\n",
            args_path.display(),
            shell_quote_body(stdout),
            shell_quote_body(stderr),
            exit_code
        );
        fs::write(&path, script).with_context(|| format!("write {}", path.display()))?;
        let mut perms = fs::metadata(&path)
            .with_context(|| format!("stat {}", path.display()))?
            .permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).with_context(|| format!("chmod {}", path.display()))?;
        Ok(path)
    }

    /// Arguments recorded by the stub named `name`.
    pub fn stub_args(&self, name: &str) -> Result<Vec<String>> {
        let path = self.path().join(format!("{name}.args"));
        let contents =
            fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        Ok(contents.lines().map(str::to_string).collect())
    }
}

/// Escape text for use inside single quotes.
fn shell_quote_body(text: &str) -> String {
    text.replace('\'', r"'\''")
}
