//! `goss-runner`: run `goss validate` and report the result as an Ansible module.
//!
//! Ansible invokes binary modules with the path of a JSON arguments file. The
//! same parameters can be passed as flags when running the binary by hand.
//! Either way exactly one JSON document is printed on stdout.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use goss_runner::core::types::Report;
use goss_runner::exit_codes;
use goss_runner::io::config::{RunnerConfig, load_config};
use goss_runner::io::executor::ProcessExecutor;
use goss_runner::io::params::{ModuleParams, load_module_args};
use goss_runner::logging;
use goss_runner::module::{ModuleOutput, error_report, execute};

#[derive(Parser)]
#[command(
    name = "goss-runner",
    version,
    about = "Run goss validate and report the result as an Ansible module"
)]
struct Cli {
    /// JSON arguments file written by Ansible.
    #[arg(conflicts_with_all = ["path", "format", "output_file", "executable", "check"])]
    args_file: Option<PathBuf>,

    /// Goss test file to validate.
    #[arg(long)]
    path: Option<String>,

    /// Goss output format (documentation, json, junit, nagios, rspecish, tap).
    #[arg(long)]
    format: Option<String>,

    /// Also write goss stdout to this file.
    #[arg(long)]
    output_file: Option<String>,

    /// Goss executable name or path.
    #[arg(long)]
    executable: Option<String>,

    /// Report as skipped without running goss, like Ansible check mode.
    #[arg(long)]
    check: bool,

    /// TOML file with default `executable` and `format`.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn params(&self) -> Result<ModuleParams, goss_runner::error::RunError> {
        match &self.args_file {
            Some(path) => load_module_args(path),
            None => Ok(ModuleParams {
                path: self.path.clone(),
                format: self.format.clone(),
                output_file: self.output_file.clone(),
                executable: self.executable.clone(),
                check_mode: self.check,
            }),
        }
    }

    fn config(&self) -> Result<RunnerConfig> {
        match &self.config {
            Some(path) => load_config(path),
            None => Ok(RunnerConfig::default()),
        }
    }
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::FAILED);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    let output = match (cli.config(), cli.params()) {
        (Err(err), _) => ModuleOutput::from_report(Report::failure(format!("{err:#}"))),
        (_, Err(err)) => ModuleOutput::from_report(error_report(&err)),
        (Ok(config), Ok(params)) => execute(params, &config, &ProcessExecutor),
    };

    let payload = serde_json::to_string(&output).context("serialize module output")?;
    println!("{payload}");
    Ok(output.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_args_file() {
        let cli = Cli::parse_from(["goss-runner", "/tmp/ansible-args"]);
        assert_eq!(cli.args_file, Some(PathBuf::from("/tmp/ansible-args")));
        assert_eq!(cli.path, None);
    }

    #[test]
    fn parse_flags_into_params() {
        let cli = Cli::parse_from([
            "goss-runner",
            "--path",
            "~/goss.yml",
            "--format",
            "json",
            "--output-file",
            "/tmp/out.json",
        ]);
        let params = cli.params().expect("params");
        assert_eq!(params.path.as_deref(), Some("~/goss.yml"));
        assert_eq!(params.format.as_deref(), Some("json"));
        assert_eq!(params.output_file.as_deref(), Some("/tmp/out.json"));
        assert_eq!(params.executable, None);
        assert!(!params.check_mode);
    }

    #[test]
    fn args_file_conflicts_with_flags() {
        let result = Cli::try_parse_from(["goss-runner", "/tmp/args", "--path", "t.yml"]);
        assert!(result.is_err());
    }

    #[test]
    fn missing_config_file_uses_defaults() {
        let cli = Cli::parse_from(["goss-runner", "--config", "/nonexistent/goss-runner.toml"]);
        assert_eq!(cli.config().expect("config"), RunnerConfig::default());
    }
}
