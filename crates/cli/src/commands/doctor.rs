use chrono::Weekday;
use frontdesk_core::config::{AppConfig, LoadOptions};
use frontdesk_core::directory::{Directory, DirectoryError, LoadedDirectory};
use serde::Serialize;

use crate::commands::{to_value, CommandResult};

const COMMAND: &str = "doctor";
const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

impl DoctorCheck {
    fn pass(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Pass, details: details.into() }
    }

    fn fail(name: &'static str, details: impl Into<String>) -> Self {
        Self { name, status: CheckStatus::Fail, details: details.into() }
    }

    fn skipped(name: &'static str, because: &str) -> Self {
        Self { name, status: CheckStatus::Skipped, details: format!("skipped because {because}") }
    }
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
    #[serde(skip)]
    exit_code: u8,
}

pub fn run(options: &LoadOptions, json_output: bool) -> CommandResult {
    let report = build_report(options);

    if json_output {
        let outcome = if report.exit_code == 0 {
            CommandResult::success_with_data(COMMAND, report.summary.clone(), to_value(&report))
        } else {
            CommandResult::failure_with_data(
                COMMAND,
                failing_class(report.exit_code),
                report.summary.clone(),
                report.exit_code,
                to_value(&report),
            )
        };
        return outcome;
    }

    CommandResult { exit_code: report.exit_code, output: render_human(&report) }
}

fn build_report(options: &LoadOptions) -> DoctorReport {
    let mut checks = Vec::new();
    let mut exit_code = 0;

    match AppConfig::load(options.clone()) {
        Ok(config) => {
            checks.push(DoctorCheck::pass(
                "config_validation",
                "configuration loaded and validated",
            ));
            let loaded = check_directory(&config, &mut checks);
            match loaded {
                Some(loaded) => checks.push(check_business_hours(&loaded)),
                None => {
                    exit_code = 3;
                    checks.push(DoctorCheck::skipped(
                        "business_hours",
                        "the directory did not load",
                    ));
                }
            }
        }
        Err(error) => {
            exit_code = 2;
            checks.push(DoctorCheck::fail("config_validation", error.to_string()));
            for name in ["directory_load", "directory_validation", "business_hours"] {
                checks.push(DoctorCheck::skipped(name, "configuration did not load"));
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks, exit_code }
}

fn check_directory(config: &AppConfig, checks: &mut Vec<DoctorCheck>) -> Option<LoadedDirectory> {
    let path = config.directory.path.display();

    match Directory::load(&config.directory.path, config.directory.validation) {
        Ok(loaded) => {
            checks.push(DoctorCheck::pass(
                "directory_load",
                format!("loaded {} staff entries from `{path}`", loaded.directory.staff().len()),
            ));
            let details = if loaded.report.is_clean() {
                "no validation issues".to_string()
            } else {
                format!("{} issue(s) repaired in lenient mode", loaded.report.issues.len())
            };
            checks.push(DoctorCheck::pass("directory_validation", details));
            Some(loaded)
        }
        Err(DirectoryError::Invalid(report)) => {
            checks.push(DoctorCheck::pass("directory_load", format!("parsed `{path}`")));
            checks.push(DoctorCheck::fail(
                "directory_validation",
                format!("{} issue(s): {}", report.issues.len(), report.summary()),
            ));
            None
        }
        Err(error) => {
            checks.push(DoctorCheck::fail("directory_load", error.to_string()));
            checks.push(DoctorCheck::skipped(
                "directory_validation",
                "the directory file did not parse",
            ));
            None
        }
    }
}

fn check_business_hours(loaded: &LoadedDirectory) -> DoctorCheck {
    let hours = loaded.directory.hours();
    let open_days: Vec<String> = WEEK
        .iter()
        .filter(|day| hours.schedule().window(**day).is_some())
        .map(|day| day.to_string())
        .collect();

    if open_days.is_empty() {
        return DoctorCheck::fail(
            "business_hours",
            format!("no open weekdays configured in {}", hours.timezone().name()),
        );
    }

    DoctorCheck::pass(
        "business_hours",
        format!(
            "open {} in {}; {} closed date(s)",
            open_days.join(", "),
            hours.timezone().name(),
            hours.schedule().closed_dates().count()
        ),
    )
}

fn failing_class(exit_code: u8) -> &'static str {
    match exit_code {
        2 => "config_validation",
        _ => "directory_validation",
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
