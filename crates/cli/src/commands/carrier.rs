use frontdesk_core::carriers::UNKNOWN_CARRIER_MESSAGE;
use frontdesk_core::config::LoadOptions;
use serde_json::json;

use crate::commands::{load_runtime, CommandResult};

const COMMAND: &str = "carrier";

pub fn run(options: &LoadOptions, name: &str) -> CommandResult {
    let (_, loaded) = match load_runtime(options) {
        Ok(runtime) => runtime,
        Err(error) => return CommandResult::from_error(COMMAND, &error),
    };

    match loaded.directory.lookup_claims_number(name) {
        Some(carrier) => CommandResult::success_with_data(
            COMMAND,
            format!("{} claims: {}", carrier.name, carrier.claims_number),
            json!({
                "found": true,
                "carrier": carrier.name,
                "claims_number": carrier.claims_number,
            }),
        ),
        None => CommandResult::success_with_data(
            COMMAND,
            UNKNOWN_CARRIER_MESSAGE,
            json!({ "found": false, "carrier": name }),
        ),
    }
}
