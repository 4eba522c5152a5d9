pub mod carrier;
pub mod config;
pub mod dispatch;
pub mod doctor;
pub mod hours;
pub mod route_key;
pub mod validate;

use chrono::{DateTime, Utc};
use frontdesk_core::config::{AppConfig, LoadOptions};
use frontdesk_core::directory::{Directory, LoadedDirectory};
use frontdesk_core::errors::ApplicationError;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::success_with_data(command, message, None)
    }

    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: impl Into<Option<Value>>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: data.into(),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        Self::failure_with_data(command, error_class, message, exit_code, None)
    }

    pub fn failure_with_data(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
        data: impl Into<Option<Value>>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: data.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_error(command: &str, error: &ApplicationError) -> Self {
        Self::failure(command, error.error_class(), error.to_string(), error.exit_code())
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

pub(crate) fn load_config(options: &LoadOptions) -> Result<AppConfig, ApplicationError> {
    Ok(AppConfig::load(options.clone())?)
}

pub(crate) fn load_directory(config: &AppConfig) -> Result<LoadedDirectory, ApplicationError> {
    Ok(Directory::load(&config.directory.path, config.directory.validation)?)
}

pub(crate) fn load_runtime(
    options: &LoadOptions,
) -> Result<(AppConfig, LoadedDirectory), ApplicationError> {
    let config = load_config(options)?;
    let directory = load_directory(&config)?;
    Ok((config, directory))
}

/// `None` means the current instant; the core never reads the clock itself.
pub(crate) fn parse_at(at: Option<&str>) -> Result<DateTime<Utc>, ApplicationError> {
    match at {
        None => Ok(Utc::now()),
        Some(raw) => DateTime::parse_from_rfc3339(raw.trim())
            .map(|value| value.with_timezone(&Utc))
            .map_err(|error| {
                ApplicationError::Input(format!("`{raw}` is not an RFC 3339 timestamp: {error}"))
            }),
    }
}

pub(crate) fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
