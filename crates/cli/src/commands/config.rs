use std::env;
use std::fs;
use std::path::Path;

use frontdesk_core::config::{resolve_config_path, AppConfig, LoadOptions};
use frontdesk_core::errors::ApplicationError;
use serde::Serialize;
use serde_json::json;
use toml::Value;

use crate::commands::{to_value, CommandResult};

const COMMAND: &str = "config";

#[derive(Debug, Serialize)]
struct ConfigField {
    key: &'static str,
    value: String,
    source: String,
}

pub fn run(options: &LoadOptions) -> CommandResult {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error(COMMAND, &ApplicationError::from(error)),
    };

    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let fields = vec![
        ConfigField {
            key: "directory.path",
            value: config.directory.path.display().to_string(),
            source: source("directory.path", &["FRONTDESK_DIRECTORY_PATH"]),
        },
        ConfigField {
            key: "directory.validation",
            value: to_value(&config.directory.validation).as_str().unwrap_or_default().to_string(),
            source: source("directory.validation", &["FRONTDESK_DIRECTORY_VALIDATION"]),
        },
        ConfigField {
            key: "logging.level",
            value: config.logging.level.clone(),
            source: source("logging.level", &["FRONTDESK_LOGGING_LEVEL", "FRONTDESK_LOG_LEVEL"]),
        },
        ConfigField {
            key: "logging.format",
            value: to_value(&config.logging.format).as_str().unwrap_or_default().to_string(),
            source: source("logging.format", &["FRONTDESK_LOGGING_FORMAT", "FRONTDESK_LOG_FORMAT"]),
        },
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(fields.iter().map(render_line));

    CommandResult::success_with_data(
        COMMAND,
        lines.join("\n"),
        json!({
            "config_file": config_file_path.map(|path| path.display().to_string()),
            "fields": to_value(&fields),
        }),
    )
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(field: &ConfigField) -> String {
    format!("- {} = {} (source: {})", field.key, field.value, field.source)
}
