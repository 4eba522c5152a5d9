use frontdesk_core::config::LoadOptions;
use frontdesk_core::directory::{Directory, DirectoryError, ValidationReport};
use frontdesk_core::errors::ApplicationError;
use serde_json::json;

use crate::commands::{load_config, to_value, CommandResult};

const COMMAND: &str = "validate";

pub fn run(options: &LoadOptions) -> CommandResult {
    let config = match load_config(options) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error(COMMAND, &error),
    };

    match Directory::load(&config.directory.path, config.directory.validation) {
        Ok(loaded) => {
            let directory = &loaded.directory;
            let message = if loaded.report.is_clean() {
                format!("directory `{}` is valid", config.directory.path.display())
            } else {
                format!(
                    "directory `{}` loaded with {} issue(s) in lenient mode",
                    config.directory.path.display(),
                    loaded.report.issues.len()
                )
            };
            CommandResult::success_with_data(
                COMMAND,
                message,
                json!({
                    "path": config.directory.path,
                    "mode": config.directory.validation,
                    "staff_count": directory.staff().len(),
                    "ring_group_count": directory.ring_groups().len(),
                    "carrier_count": directory.carriers().len(),
                    "timezone": directory.hours().timezone().name(),
                    "issues": issues(&loaded.report),
                }),
            )
        }
        Err(DirectoryError::Invalid(report)) => {
            let error = ApplicationError::from(DirectoryError::Invalid(report.clone()));
            CommandResult::failure_with_data(
                COMMAND,
                error.error_class(),
                format!(
                    "directory `{}` failed validation with {} issue(s)",
                    config.directory.path.display(),
                    report.issues.len()
                ),
                error.exit_code(),
                json!({ "mode": config.directory.validation, "issues": issues(&report) }),
            )
        }
        Err(error) => CommandResult::from_error(COMMAND, &ApplicationError::from(error)),
    }
}

fn issues(report: &ValidationReport) -> serde_json::Value {
    to_value(&report.issues)
}
