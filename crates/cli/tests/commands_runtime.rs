use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use frontdesk_cli::commands::{carrier, config, dispatch, doctor, hours, route_key, validate};
use frontdesk_core::config::LoadOptions;
use serde_json::Value;
use tempfile::TempDir;

const WEDNESDAY_MORNING: &str = "2026-10-14T14:00:00Z";

#[test]
fn validate_reports_clean_sample_directory() {
    with_workspace(&[], |options, _| {
        let result = validate::run(options);
        assert_eq!(result.exit_code, 0, "expected the sample directory to validate");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "validate");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["timezone"], "America/New_York");
        assert_eq!(payload["data"]["issues"].as_array().map(Vec::len), Some(0));
    });
}

#[test]
fn validate_returns_directory_failure_for_invalid_directory() {
    with_workspace(&[], |options, dir| {
        let directory = dir.join("broken.toml");
        fs::write(
            &directory,
            r#"
[business_hours]
timezone = "Mars/Olympus"
"#,
        )
        .expect("write broken directory");
        let options = options_for(dir, &directory);

        let result = validate::run(&options);
        assert_eq!(result.exit_code, 3, "expected directory failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "directory_validation");
    });
}

#[test]
fn missing_directory_file_is_a_directory_failure() {
    with_workspace(&[], |_, dir| {
        let options = options_for(dir, &dir.join("missing.toml"));

        let result = route_key::run(&options, "Smith");
        assert_eq!(result.exit_code, 3);
        assert_eq!(parse_payload(&result.output)["error_class"], "directory_validation");
    });
}

#[test]
fn route_key_strips_exception_prefixes() {
    with_workspace(&[], |options, _| {
        let result = route_key::run(options, "The Great Company");
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["stripped"], "great company");
        assert_eq!(payload["data"]["letter"], "G");
    });
}

#[test]
fn carrier_lookup_matches_aliases_and_reports_unknown_carriers() {
    with_workspace(&[], |options, _| {
        let found = parse_payload(&carrier::run(options, "hartford").output);
        assert_eq!(found["status"], "ok");
        assert_eq!(found["data"]["found"], true);
        assert_eq!(found["data"]["carrier"], "The Hartford");

        let missing = carrier::run(options, "Acme Mutual");
        assert_eq!(missing.exit_code, 0, "unknown carriers are not an error");
        assert_eq!(parse_payload(&missing.output)["data"]["found"], false);
    });
}

#[test]
fn hours_reports_open_office_and_staff_break() {
    with_workspace(&[], |options, _| {
        let open = parse_payload(&hours::run(options, Some(WEDNESDAY_MORNING), None).output);
        assert_eq!(open["data"]["state"]["open"], true);

        let lunch = hours::run(options, Some("2026-10-14T16:30:00Z"), Some("Yvonne Park"));
        assert_eq!(lunch.exit_code, 0);
        assert_eq!(parse_payload(&lunch.output)["data"]["state"]["staff"], "on_break");
    });
}

#[test]
fn hours_rejects_malformed_timestamp() {
    with_workspace(&[], |options, _| {
        let result = hours::run(options, Some("next tuesday"), None);
        assert_eq!(result.exit_code, 4, "expected input failure code");
        assert_eq!(parse_payload(&result.output)["error_class"], "invalid_input");
    });
}

#[test]
fn dispatch_transfers_business_caller_by_alpha_split() {
    with_workspace(&[], |options, dir| {
        let call = write_call(
            dir,
            r#"{"insurance_type":"business","business_name":"The Great Company"}"#,
        );

        let result = dispatch::run(options, &call, Some(WEDNESDAY_MORNING), &[]);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["decision"]["kind"], "transfer");
        assert_eq!(payload["data"]["decision"]["staff"]["name"], "Yvonne Park");
        assert_eq!(payload["data"]["office_open"], true);
    });
}

#[test]
fn dispatch_skips_unreachable_ring_group() {
    with_workspace(&[], |options, dir| {
        let call = write_call(
            dir,
            r#"{"intent":"payment","insurance_type":"personal","last_name":"Nguyen"}"#,
        );

        let reachable = parse_payload(
            &dispatch::run(options, &call, Some(WEDNESDAY_MORNING), &[]).output,
        );
        assert_eq!(reachable["data"]["decision"]["kind"], "ring_group_transfer");

        let unreachable = ["301".to_string(), "302".to_string()];
        let fallback = parse_payload(
            &dispatch::run(options, &call, Some(WEDNESDAY_MORNING), &unreachable).output,
        );
        assert_eq!(fallback["data"]["decision"]["kind"], "transfer");
        assert_eq!(fallback["data"]["decision"]["staff"]["name"], "Quentin Ross");
    });
}

#[test]
fn dispatch_rejects_unreadable_call_state() {
    with_workspace(&[], |options, dir| {
        let call = write_call(dir, "{ not json");

        let result = dispatch::run(options, &call, Some(WEDNESDAY_MORNING), &[]);
        assert_eq!(result.exit_code, 4);
        assert_eq!(parse_payload(&result.output)["error_class"], "invalid_input");
    });
}

#[test]
fn config_returns_failure_for_missing_explicit_file() {
    with_workspace(&[], |_, dir| {
        let options = LoadOptions {
            config_path: Some(dir.join("absent.toml")),
            require_file: true,
            ..LoadOptions::default()
        };

        let result = config::run(&options);
        assert_eq!(result.exit_code, 2, "expected config validation failure code");
        assert_eq!(parse_payload(&result.output)["error_class"], "config_validation");
    });
}

#[test]
fn config_attributes_env_overrides() {
    with_workspace(&[("FRONTDESK_LOG_LEVEL", "debug")], |options, _| {
        let result = config::run(options);
        assert_eq!(result.exit_code, 0);

        let message = parse_payload(&result.output)["message"].as_str().unwrap_or("").to_string();
        assert!(message.contains("- logging.level = debug (source: env (FRONTDESK_LOG_LEVEL))"));
        assert!(message.contains("directory.path"));
    });
}

#[test]
fn invalid_env_override_fails_every_command_with_config_code() {
    with_workspace(&[("FRONTDESK_DIRECTORY_VALIDATION", "relaxed")], |options, _| {
        assert_eq!(validate::run(options).exit_code, 2);
        assert_eq!(route_key::run(options, "Smith").exit_code, 2);
    });
}

#[test]
fn doctor_passes_with_sample_configuration() {
    with_workspace(&[], |options, _| {
        let result = doctor::run(options, true);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["overall_status"], "pass");
        assert_eq!(payload["data"]["checks"].as_array().map(Vec::len), Some(4));

        let human = doctor::run(options, false);
        assert!(human.output.starts_with("doctor: all readiness checks passed"));
        assert!(human.output.contains("- [ok] business_hours:"));
    });
}

#[test]
fn doctor_skips_directory_checks_when_config_fails() {
    with_workspace(&[("FRONTDESK_LOGGING_FORMAT", "xml")], |options, _| {
        let result = doctor::run(options, false);
        assert_eq!(result.exit_code, 2);
        assert!(result.output.contains("- [fail] config_validation:"));
        assert!(result.output.contains("- [skip] directory_load:"));
    });
}

fn sample_directory() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/directory.toml")
}

fn options_for(dir: &Path, directory: &Path) -> LoadOptions {
    let config_path = dir.join("frontdesk.toml");
    fs::write(
        &config_path,
        format!(
            "[directory]\npath = {:?}\nvalidation = \"strict\"\n\n[logging]\nlevel = \"info\"\n",
            directory.display().to_string()
        ),
    )
    .expect("write config");
    LoadOptions { config_path: Some(config_path), require_file: true, ..LoadOptions::default() }
}

fn write_call(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("call.json");
    fs::write(&path, body).expect("write call state");
    path
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_workspace(vars: &[(&str, &str)], test_fn: impl FnOnce(&LoadOptions, &Path)) {
    let dir = TempDir::new().expect("tempdir");
    let options = options_for(dir.path(), &sample_directory());
    with_env(vars, || test_fn(&options, dir.path()));
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "FRONTDESK_DIRECTORY_PATH",
        "FRONTDESK_DIRECTORY_VALIDATION",
        "FRONTDESK_LOGGING_LEVEL",
        "FRONTDESK_LOGGING_FORMAT",
        "FRONTDESK_LOG_LEVEL",
        "FRONTDESK_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
