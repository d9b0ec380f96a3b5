//! Construction of the goss command line.

use std::ffi::OsString;
use std::path::Path;

use crate::core::types::InvocationRequest;
use crate::error::{Result, RunError};

/// Argument vector for one `goss validate` run.
///
/// `executable` is split with shell quoting rules so it may carry leading
/// arguments (`goss --vars vars.yml`). The test path and format are appended
/// as discrete arguments, so paths with spaces or shell metacharacters reach
/// goss untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GossCommand {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl GossCommand {
    /// `<executable...> -g <test_file> v --format <format>`
    pub fn validate(request: &InvocationRequest, test_file: &Path) -> Result<Self> {
        let mut words = shlex::split(&request.executable_name)
            .ok_or_else(|| {
                RunError::configuration(format!(
                    "executable {} could not be parsed",
                    request.executable_name
                ))
            })?
            .into_iter();
        let program = words
            .next()
            .ok_or_else(|| RunError::configuration("executable must be non-empty"))?;

        let mut args: Vec<OsString> = words.map(OsString::from).collect();
        args.extend([
            OsString::from("-g"),
            test_file.as_os_str().to_owned(),
            OsString::from("v"),
            OsString::from("--format"),
            OsString::from(request.effective_format()),
        ]);
        Ok(Self {
            program: OsString::from(program),
            args,
        })
    }

    /// Human-readable rendering for logs.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.to_string_lossy().into_owned()];
        parts.extend(self.args.iter().map(|arg| arg.to_string_lossy().into_owned()));
        parts.join(" ")
    }
}
