//! Ansible module that runs `goss validate` on the target host.
//!
//! The crate separates deterministic logic from side effects:
//!
//! - **[`core`]**: Pure logic (request/result types, command construction,
//!   result classification). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (parameter files, config, path
//!   checks, process execution, output persistence). Isolated behind the
//!   [`io::executor::GossExecutor`] seam so tests never need a real goss.
//!
//! [`run`] sequences one validation and [`module`] adapts it to the Ansible
//! module protocol.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod module;
pub mod run;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
