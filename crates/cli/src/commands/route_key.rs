use frontdesk_core::config::LoadOptions;
use frontdesk_core::routing::strip_exception_prefixes;
use serde_json::json;

use crate::commands::{load_runtime, CommandResult};

const COMMAND: &str = "route-key";

pub fn run(options: &LoadOptions, identifier: &str) -> CommandResult {
    let (_, loaded) = match load_runtime(options) {
        Ok(runtime) => runtime,
        Err(error) => return CommandResult::from_error(COMMAND, &error),
    };
    let directory = loaded.directory;

    let route_key = directory.resolve_route_key(identifier);
    let letter = directory.route_letter(identifier);
    let stripped = strip_exception_prefixes(identifier, directory.exception_prefixes());

    CommandResult::success_with_data(
        COMMAND,
        format!("`{identifier}` routes to letter {letter}"),
        json!({
            "identifier": identifier,
            "stripped": stripped,
            "route_key": route_key.to_string(),
            "letter": letter.to_string(),
        }),
    )
}
