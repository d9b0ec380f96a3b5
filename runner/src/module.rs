//! Ansible module protocol adapter.
//!
//! Turns module parameters into a [`Report`] and the report into the JSON
//! object Ansible reads from the module's stdout.

use serde::Serialize;
use tracing::{info, warn};

use crate::core::types::{InvocationRequest, Report};
use crate::error::RunError;
use crate::exit_codes;
use crate::io::config::RunnerConfig;
use crate::io::executor::GossExecutor;
use crate::io::params::{MODULE_NAME, ModuleParams};
use crate::run::run;

/// JSON document printed on stdout for Ansible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invocation: Option<Invocation>,
}

/// Echo of the parameters the module ran with, defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub module_args: ModuleArgs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleArgs {
    pub path: Option<String>,
    pub format: Option<String>,
    pub output_file: Option<String>,
    pub executable: String,
}

impl From<&InvocationRequest> for ModuleArgs {
    fn from(request: &InvocationRequest) -> Self {
        Self {
            path: Some(request.test_file_path.clone()).filter(|path| !path.is_empty()),
            format: request.output_format.clone(),
            output_file: request.output_file_path.clone(),
            executable: request.executable_name.clone(),
        }
    }
}

impl ModuleOutput {
    pub fn from_report(report: Report) -> Self {
        let empty = Self {
            changed: None,
            failed: None,
            skipped: None,
            msg: None,
            stdout: None,
            stderr: None,
            invocation: None,
        };
        match report {
            Report::Success { stdout, changed } => Self {
                changed: Some(changed),
                stdout: Some(stdout),
                ..empty
            },
            Report::Failure {
                msg,
                stdout,
                stderr,
            } => Self {
                failed: Some(true),
                msg: Some(msg),
                stdout,
                stderr,
                ..empty
            },
            Report::Skipped { msg } => Self {
                changed: Some(false),
                skipped: Some(true),
                msg: Some(msg),
                ..empty
            },
        }
    }

    pub fn with_invocation(mut self, request: &InvocationRequest) -> Self {
        self.invocation = Some(Invocation {
            module_args: ModuleArgs::from(request),
        });
        self
    }

    pub fn exit_code(&self) -> i32 {
        if self.failed == Some(true) {
            exit_codes::FAILED
        } else {
            exit_codes::OK
        }
    }
}

/// Map a runner error onto the failure report Ansible expects.
pub fn error_report(err: &RunError) -> Report {
    Report::failure(err.to_string())
}

/// Execute the module for `params`: check mode, defaults, run, error mapping.
pub fn execute<E: GossExecutor>(
    params: ModuleParams,
    config: &RunnerConfig,
    executor: &E,
) -> ModuleOutput {
    let check_mode = params.check_mode;
    let request = params.into_request(config);

    let report = if check_mode {
        info!("check mode requested, skipping goss");
        Report::Skipped {
            msg: format!("remote module ({MODULE_NAME}) does not support check mode"),
        }
    } else {
        match run(&request, executor) {
            Ok(report) => report,
            Err(err) => {
                warn!(err = %err, "goss module failed");
                error_report(&err)
            }
        }
    };

    ModuleOutput::from_report(report).with_invocation(&request)
}
