//! Orchestration of one goss validation.
//!
//! `Validate → Invoke → (optional) Persist → Report`. Each step is a hard stop
//! on failure and nothing is rolled back.

use std::path::PathBuf;

use tracing::{debug, info, instrument};

use crate::core::command::GossCommand;
use crate::core::report::classify_result;
use crate::core::types::{InvocationRequest, Report};
use crate::error::{Result, RunError};
use crate::io::executor::GossExecutor;
use crate::io::output_file::{resolve_output_path, write_output};
use crate::io::paths::{expand_user, is_readable};

/// Validate `request`, run goss through `executor`, and build the report.
///
/// A non-zero goss exit code is a [`Report::Failure`], not an `Err`. Errors
/// are reserved for violated preconditions and for I/O that prevented a
/// report from being produced.
///
/// The output file checks run after goss, so a bad `output_file` still costs
/// one goss run.
#[instrument(skip_all, fields(test_file = %request.test_file_path))]
pub fn run<E: GossExecutor>(request: &InvocationRequest, executor: &E) -> Result<Report> {
    let test_file = resolve_test_file(&request.test_file_path)?;

    let command = GossCommand::validate(request, &test_file)?;
    debug!(command = %command.display(), "invoking goss");
    let result = executor.exec(&command)?;

    if let Some(raw) = &request.output_file_path {
        let path = resolve_output_path(raw)?;
        write_output(&path, &result.stdout)?;
    }

    let report = classify_result(result);
    info!(failed = report.is_failure(), "goss finished");
    Ok(report)
}

fn resolve_test_file(raw: &str) -> Result<PathBuf> {
    if raw.is_empty() {
        return Err(RunError::configuration("test file path is null"));
    }
    let path = expand_user(raw);
    if !is_readable(&path) {
        return Err(RunError::configuration(format!(
            "Test file {} not readable",
            path.display()
        )));
    }
    if path.is_dir() {
        return Err(RunError::configuration(format!(
            "Test file must be a file ! : {}",
            path.display()
        )));
    }
    Ok(path)
}
