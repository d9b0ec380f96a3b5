//! I/O helpers for a goss invocation.

pub mod config;
pub mod executor;
pub mod output_file;
pub mod params;
pub mod paths;
pub mod process;
