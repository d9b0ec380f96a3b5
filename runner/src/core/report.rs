//! Translation of a goss process result into a module report.

use crate::core::types::{InvocationResult, Report, TESTS_FAILED_MSG};

/// Classify a finished goss process.
///
/// Any non-zero exit code is a failure, including the negative code recorded
/// for a process killed by a signal.
pub fn classify_result(result: InvocationResult) -> Report {
    match result.exit_code {
        Some(0) | None => Report::success(result.stdout),
        Some(_) => Report::Failure {
            msg: TESTS_FAILED_MSG.to_string(),
            stdout: Some(result.stdout),
            stderr: Some(result.stderr),
        },
    }
}
