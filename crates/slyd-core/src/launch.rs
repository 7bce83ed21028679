//! Turns a stored service config into the vLLM OpenAI server command line.

use crate::RawConfig;
use serde_json::Value;
use thiserror::Error;

pub const VLLM_ENTRYPOINT: &[&str] = &["python", "-m", "vllm.entrypoints.openai.api_server"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LaunchError {
    #[error("Config must be a JSON object")]
    NotAnObject,

    #[error("'model' must be specified in the config")]
    MissingModel,
}

/// Every key becomes `--kebab-case`. `true` is a bare flag; `false` on an
/// `enable_*` key becomes `--disable-*` and is otherwise dropped, as are
/// null and empty values.
pub fn build_command(config: &RawConfig) -> Result<Vec<String>, LaunchError> {
    let map = config.as_object().ok_or(LaunchError::NotAnObject)?;
    let has_model = map
        .get("model")
        .and_then(Value::as_str)
        .is_some_and(|m| !m.trim().is_empty());
    if !has_model {
        return Err(LaunchError::MissingModel);
    }

    let mut argv: Vec<String> = VLLM_ENTRYPOINT.iter().map(|s| s.to_string()).collect();
    for (key, value) in map {
        let flag = format!("--{}", key.replace('_', "-"));
        match value {
            Value::Bool(true) => argv.push(flag),
            Value::Bool(false) => {
                if let Some(feature) = key.strip_prefix("enable_") {
                    argv.push(format!("--disable-{}", feature.replace('_', "-")));
                }
            }
            Value::Null => {}
            Value::String(s) if s.is_empty() => {}
            Value::String(s) => {
                argv.push(flag);
                argv.push(s.clone());
            }
            other => {
                argv.push(flag);
                argv.push(other.to_string());
            }
        }
    }
    Ok(argv)
}

/// Join argv for display, single-quoting anything a shell would split.
pub fn shell_join(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| {
            if !arg.is_empty() && !arg.contains(|c: char| c.is_whitespace() || "'\"$`\\".contains(c)) {
                arg.clone()
            } else {
                format!("'{}'", arg.replace('\'', r"'\''"))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One `  Title Case Key: value` line per setting, toggles as enabled/disabled.
pub fn display_config(config: &RawConfig) -> Result<String, LaunchError> {
    let map = config.as_object().ok_or(LaunchError::NotAnObject)?;
    let lines: Vec<String> = map
        .iter()
        .map(|(key, value)| {
            let shown = match value {
                Value::Bool(true) => "enabled".to_string(),
                Value::Bool(false) => "disabled".to_string(),
                Value::Null => "None".to_string(),
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("  {}: {}", title_case(key), shown)
        })
        .collect();
    Ok(lines.join("\n"))
}

fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
