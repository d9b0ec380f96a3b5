//! Deterministic, pure logic for a goss invocation.
//!
//! Core modules must be free of I/O side effects. They build commands and
//! classify results from in-memory values only.

pub mod command;
pub mod report;
pub mod types;
