//! Shared deterministic types for a single goss invocation.
//!
//! These types define stable contracts between the runner, its executor, and
//! the module protocol adapter. None of them touch the filesystem.

/// Executable used when the caller does not name one.
pub const DEFAULT_EXECUTABLE: &str = "goss";
/// Output format used when the caller does not name one.
pub const DEFAULT_FORMAT: &str = "rspecish";
/// Message attached to a report when goss exits non-zero.
pub const TESTS_FAILED_MSG: &str = "Goss Tests Failed";

/// What the caller asked to validate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    /// Test-definition file. `~` is expanded before use.
    pub test_file_path: String,
    /// `--format` value; `None` means [`DEFAULT_FORMAT`].
    pub output_format: Option<String>,
    /// Where to persist captured stdout, if anywhere. `~` is expanded.
    pub output_file_path: Option<String>,
    pub executable_name: String,
}

impl InvocationRequest {
    pub fn new(test_file_path: impl Into<String>) -> Self {
        Self {
            test_file_path: test_file_path.into(),
            output_format: None,
            output_file_path: None,
            executable_name: DEFAULT_EXECUTABLE.to_string(),
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = Some(format.into());
        self
    }

    pub fn with_output_file(mut self, path: impl Into<String>) -> Self {
        self.output_file_path = Some(path.into());
        self
    }

    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable_name = executable.into();
        self
    }

    /// The format token passed to goss.
    pub fn effective_format(&self) -> &str {
        self.output_format.as_deref().unwrap_or(DEFAULT_FORMAT)
    }
}

/// Captured outcome of one goss process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InvocationResult {
    /// Process exit code. Termination by signal `N` is recorded as `-N`.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl InvocationResult {
    pub fn failed(&self) -> bool {
        matches!(self.exit_code, Some(code) if code != 0)
    }
}

/// Final result handed back to the orchestrating framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// All checks passed. Validation never mutates the target, so `changed` is
    /// always false.
    Success { stdout: String, changed: bool },
    /// Goss ran and reported failures, or the invocation could not complete.
    Failure {
        msg: String,
        stdout: Option<String>,
        stderr: Option<String>,
    },
    /// The invocation was not attempted (check mode).
    Skipped { msg: String },
}

impl Report {
    pub fn success(stdout: impl Into<String>) -> Self {
        Report::Success {
            stdout: stdout.into(),
            changed: false,
        }
    }

    /// A failure with a message and no captured process output.
    pub fn failure(msg: impl Into<String>) -> Self {
        Report::Failure {
            msg: msg.into(),
            stdout: None,
            stderr: None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Report::Failure { .. })
    }
}
