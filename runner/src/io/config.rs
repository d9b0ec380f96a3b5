//! Optional runner defaults stored in a TOML file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::types::DEFAULT_EXECUTABLE;

/// Host-wide defaults for parameters a task leaves out (TOML).
///
/// Explicit module parameters always win. Missing fields keep the built-in
/// defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RunnerConfig {
    /// Executable to run when `executable` is not given.
    pub executable: String,

    /// Format to request when `format` is not given. `None` defers to goss'
    /// `rspecish` default.
    pub format: Option<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            executable: DEFAULT_EXECUTABLE.to_string(),
            format: None,
        }
    }
}

impl RunnerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.executable.trim().is_empty() {
            return Err(anyhow!("executable must be non-empty"));
        }
        if let Some(format) = &self.format
            && format.trim().is_empty()
        {
            return Err(anyhow!("format must be non-empty when set"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `RunnerConfig::default()`.
pub fn load_config(path: &Path) -> Result<RunnerConfig> {
    if !path.exists() {
        let cfg = RunnerConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: RunnerConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
