use frontdesk_core::config::LoadOptions;
use frontdesk_core::errors::ApplicationError;
use frontdesk_core::routing::names::match_staff_name;
use frontdesk_core::routing::NameMatch;
use serde_json::json;

use crate::commands::{load_runtime, parse_at, to_value, CommandResult};

const COMMAND: &str = "hours";

pub fn run(options: &LoadOptions, at: Option<&str>, staff: Option<&str>) -> CommandResult {
    match evaluate(options, at, staff) {
        Ok(result) => result,
        Err(error) => CommandResult::from_error(COMMAND, &error),
    }
}

fn evaluate(
    options: &LoadOptions,
    at: Option<&str>,
    staff: Option<&str>,
) -> Result<CommandResult, ApplicationError> {
    let now = parse_at(at)?;
    let (_, loaded) = load_runtime(options)?;
    let directory = loaded.directory;

    let entry = match staff {
        None => None,
        Some(name) => match match_staff_name(&directory, name) {
            NameMatch::Unique(entry) => Some(entry),
            NameMatch::Ambiguous(entries) => {
                let names: Vec<&str> = entries.iter().map(|entry| entry.name.as_str()).collect();
                return Err(ApplicationError::Input(format!(
                    "`{name}` matches several staff members: {}",
                    names.join(", ")
                )));
            }
            NameMatch::NotFound => {
                return Err(ApplicationError::Input(format!("no staff member matches `{name}`")))
            }
        },
    };

    let state = directory.hours().state(now, entry);
    let message = match (&entry, state.staff) {
        (Some(entry), Some(availability)) => format!(
            "office is {}; {} is {}",
            if state.open { "open" } else { "closed" },
            entry.name,
            to_value(&availability).as_str().unwrap_or("unknown")
        ),
        _ => format!("office is {}", if state.open { "open" } else { "closed" }),
    };

    Ok(CommandResult::success_with_data(
        COMMAND,
        message,
        json!({
            "at": now,
            "state": to_value(&state),
            "staff": entry.map(|entry| entry.name.as_str()),
        }),
    ))
}
