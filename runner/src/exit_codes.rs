//! Stable exit codes for the goss module binary.
//!
//! Ansible reads the verdict from the JSON on stdout; the exit code mirrors it
//! for callers that only look at process status.

/// Goss passed, or the invocation was skipped in check mode.
pub const OK: i32 = 0;
/// Goss reported failures, or the module could not run it.
pub const FAILED: i32 = 1;
