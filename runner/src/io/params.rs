//! Module parameters as handed over by Ansible.
//!
//! Ansible runs a binary module with a single argument: the path of a JSON
//! file holding the task's arguments plus framework-internal `_ansible_*`
//! keys. This module loads that file and applies the argument spec
//! (`path`, `format`, `output_file`, `executable`, all strings).

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::core::types::InvocationRequest;
use crate::error::{Result, RunError};
use crate::io::config::RunnerConfig;

/// Name the module reports itself under.
pub const MODULE_NAME: &str = "goss";
/// Parameters accepted by the module, sorted.
pub const SUPPORTED_PARAMS: [&str; 4] = ["executable", "format", "output_file", "path"];

const INTERNAL_PREFIX: &str = "_ansible_";
const WRAPPER_KEY: &str = "ANSIBLE_MODULE_ARGS";

/// Parameters after type coercion, before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleParams {
    pub path: Option<String>,
    pub format: Option<String>,
    pub output_file: Option<String>,
    pub executable: Option<String>,
    /// Set from `_ansible_check_mode`.
    pub check_mode: bool,
}

impl ModuleParams {
    /// Build the invocation request, filling gaps from `config`.
    ///
    /// A missing `path` becomes an empty string so the runner's own null
    /// check reports it.
    pub fn into_request(self, config: &RunnerConfig) -> InvocationRequest {
        InvocationRequest {
            test_file_path: self.path.unwrap_or_default(),
            output_format: self.format.or_else(|| config.format.clone()),
            output_file_path: self.output_file,
            executable_name: self
                .executable
                .unwrap_or_else(|| config.executable.clone()),
        }
    }
}

/// Read and parse a module arguments file.
pub fn load_module_args(path: &Path) -> Result<ModuleParams> {
    let contents = fs::read_to_string(path).map_err(|err| {
        RunError::configuration(format!(
            "failed to read module arguments {}: {err}",
            path.display()
        ))
    })?;
    parse_module_args(&contents)
}

/// Parse module arguments from JSON text.
///
/// Accepts either the flat argument object or one wrapped under
/// `ANSIBLE_MODULE_ARGS`.
pub fn parse_module_args(raw: &str) -> Result<ModuleParams> {
    let value: Value = serde_json::from_str(raw).map_err(|err| {
        RunError::configuration(format!("failed to parse module arguments: {err}"))
    })?;
    let mut args = match value {
        Value::Object(map) => map,
        other => {
            return Err(RunError::configuration(format!(
                "module arguments must be a JSON object, got {}",
                type_name(&other)
            )));
        }
    };
    if let Some(Value::Object(inner)) = args.remove(WRAPPER_KEY) {
        args = inner;
    }

    reject_unsupported(&args)?;

    let params = ModuleParams {
        path: string_param(&args, "path")?,
        format: string_param(&args, "format")?,
        output_file: string_param(&args, "output_file")?,
        executable: string_param(&args, "executable")?,
        check_mode: matches!(args.get("_ansible_check_mode"), Some(Value::Bool(true))),
    };
    debug!(?params, "parsed module arguments");
    Ok(params)
}

fn reject_unsupported(args: &Map<String, Value>) -> Result<()> {
    let mut unsupported: Vec<&str> = args
        .keys()
        .map(String::as_str)
        .filter(|key| !key.starts_with(INTERNAL_PREFIX) && !SUPPORTED_PARAMS.contains(key))
        .collect();
    if unsupported.is_empty() {
        return Ok(());
    }
    unsupported.sort_unstable();
    Err(RunError::configuration(format!(
        "Unsupported parameters for ({MODULE_NAME}) module: {}. Supported parameters include: {}.",
        unsupported.join(", "),
        SUPPORTED_PARAMS.join(", ")
    )))
}

/// Coerce a parameter to a string the way a `type='str'` option does.
fn string_param(args: &Map<String, Value>, name: &str) -> Result<Option<String>> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(if *b { "True" } else { "False" }.to_string())),
        Some(other) => Err(RunError::configuration(format!(
            "argument '{name}' is of type {} and we were unable to convert to str",
            type_name(other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_arguments_with_internal_keys() {
        let params = parse_module_args(
            r#"{"path": "/srv/goss.yml", "format": "json", "_ansible_verbosity": 2,
                "_ansible_check_mode": false}"#,
        )
        .expect("parse");
        assert_eq!(params.path.as_deref(), Some("/srv/goss.yml"));
        assert_eq!(params.format.as_deref(), Some("json"));
        assert_eq!(params.output_file, None);
        assert!(!params.check_mode);
    }

    #[test]
    fn unwraps_ansible_module_args() {
        let params = parse_module_args(
            r#"{"ANSIBLE_MODULE_ARGS": {"path": "t.yml", "_ansible_check_mode": true}}"#,
        )
        .expect("parse");
        assert_eq!(params.path.as_deref(), Some("t.yml"));
        assert!(params.check_mode);
    }

    #[test]
    fn coerces_scalars_and_treats_null_as_absent() {
        let params =
            parse_module_args(r#"{"path": 42, "format": null, "executable": true}"#)
                .expect("parse");
        assert_eq!(params.path.as_deref(), Some("42"));
        assert_eq!(params.format, None);
        assert_eq!(params.executable.as_deref(), Some("True"));
    }

    #[test]
    fn rejects_unsupported_parameters() {
        let err = parse_module_args(r#"{"path": "t.yml", "verbose": 1, "color": "x"}"#)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported parameters for (goss) module: color, verbose. \
             Supported parameters include: executable, format, output_file, path."
        );
    }

    #[test]
    fn rejects_list_values() {
        let err = parse_module_args(r#"{"path": ["a", "b"]}"#).unwrap_err();
        assert!(err.to_string().contains("argument 'path' is of type list"));
    }

    #[test]
    fn rejects_non_object_payload() {
        let err = parse_module_args("[]").unwrap_err();
        assert!(err.to_string().contains("must be a JSON object"));
    }

    #[test]
    fn into_request_applies_defaults() {
        let request = ModuleParams::default().into_request(&RunnerConfig::default());
        assert_eq!(request.test_file_path, "");
        assert_eq!(request.output_format, None);
        assert_eq!(request.executable_name, "goss");
    }

    #[test]
    fn explicit_params_override_config() {
        let config = RunnerConfig {
            executable: "/opt/goss".to_string(),
            format: Some("tap".to_string()),
        };
        let params = ModuleParams {
            path: Some("t.yml".to_string()),
            format: Some("json".to_string()),
            ..ModuleParams::default()
        };
        let request = params.into_request(&config);
        assert_eq!(request.output_format.as_deref(), Some("json"));
        assert_eq!(request.executable_name, "/opt/goss");
    }

    #[test]
    fn load_reads_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let args = temp.path().join("args");
        fs::write(&args, r#"{"path": "~/goss.yml"}"#).expect("write");
        let params = load_module_args(&args).expect("load");
        assert_eq!(params.path.as_deref(), Some("~/goss.yml"));
    }
}
