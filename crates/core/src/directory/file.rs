use std::collections::BTreeMap;

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::carriers::{CarrierContact, CarrierTable, PhoneNumber};
use crate::directory::validation::{DirectoryIssue, IssueCode, ValidationReport};
use crate::directory::{DepartmentMap, Directory, IntentRoute, RingGroup};
use crate::domain::call::CallIntent;
use crate::domain::staff::{Assignment, BusinessPool, DepartmentId, Extension, StaffEntry};
use crate::hours::time_block::TimeBlock;
use crate::hours::{parse_time_of_day, parse_weekday, BusinessHours, DayWindow, WeeklySchedule};

/// On-disk shape of the staff directory (TOML or JSON).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryFile {
    pub non_alpha_letter: Option<String>,
    pub exception_prefixes: Vec<String>,
    pub restricted: Vec<String>,
    pub departments: DepartmentsRecord,
    pub business_hours: BusinessHoursRecord,
    pub staff: Vec<StaffRecord>,
    pub ring_groups: BTreeMap<String, Vec<String>>,
    pub intents: BTreeMap<String, IntentRouteRecord>,
    pub carriers: Vec<CarrierRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepartmentsRecord {
    pub business: String,
    pub personal: String,
}

impl Default for DepartmentsRecord {
    fn default() -> Self {
        Self { business: "CL".to_string(), personal: "PL".to_string() }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessHoursRecord {
    pub timezone: Option<String>,
    pub weekdays: Vec<String>,
    pub open: Option<String>,
    pub close: Option<String>,
    pub closed_dates: Vec<NaiveDate>,
    pub overrides: Vec<DayOverrideRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DayOverrideRecord {
    pub day: String,
    #[serde(default)]
    pub open: Option<String>,
    #[serde(default)]
    pub close: Option<String>,
    #[serde(default)]
    pub closed: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StaffRecord {
    pub department: String,
    pub name: String,
    pub assignment: String,
    #[serde(default)]
    pub pool: Option<BusinessPool>,
    pub extension: String,
    #[serde(default)]
    pub time_block: Option<TimeBlockRecord>,
    #[serde(default = "default_true")]
    pub transferable: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeBlockRecord {
    pub range: String,
    #[serde(default)]
    pub lunch: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentRouteRecord {
    pub ring_group: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub new_business: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarrierRecord {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub claims_number: String,
}

fn default_true() -> bool {
    true
}

impl DirectoryFile {
    /// Assembles a directory, collecting every defect instead of stopping at the first.
    /// Defective staff entries are kept but marked inactive.
    pub(crate) fn assemble(self) -> (Directory, ValidationReport) {
        let mut report = ValidationReport::default();

        let non_alpha_letter = match self.non_alpha_letter.as_deref().map(str::trim) {
            None => 'A',
            Some(raw) => match single_letter(raw) {
                Some(letter) => letter,
                None => {
                    report.push(DirectoryIssue::new(
                        IssueCode::InvalidSetting,
                        "non_alpha_letter",
                        format!("`{raw}` is not a single letter A-Z"),
                    ));
                    'A'
                }
            },
        };

        let exception_prefixes = cleaned(self.exception_prefixes);
        let restricted = cleaned(self.restricted);
        let staff = self.staff.into_iter().map(|record| build_staff(record, &mut report)).collect();
        let ring_groups = build_ring_groups(self.ring_groups, &mut report);
        let intents = build_intents(self.intents, &mut report);
        let departments = DepartmentMap {
            business: DepartmentId::new(self.departments.business),
            personal: DepartmentId::new(self.departments.personal),
        };
        let hours = build_hours(self.business_hours, &mut report);
        let carriers = build_carriers(self.carriers, &mut report);

        let directory = Directory {
            staff,
            restricted,
            exception_prefixes,
            ring_groups,
            intents,
            departments,
            hours,
            carriers,
            non_alpha_letter,
        };
        (directory, report)
    }
}

fn single_letter(raw: &str) -> Option<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter.is_ascii_alphabetic() => Some(letter.to_ascii_uppercase()),
        _ => None,
    }
}

fn cleaned(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|value| value.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|value| !value.is_empty())
        .collect()
}

fn build_staff(record: StaffRecord, report: &mut ValidationReport) -> StaffEntry {
    let name = record.name.trim().to_string();
    let mut active = true;

    let assignment = Assignment::parse(&record.assignment).unwrap_or_else(|error| {
        report.push(DirectoryIssue::new(IssueCode::InvalidAssignment, &name, error.to_string()));
        active = false;
        Assignment::Role(record.assignment.trim().to_string())
    });

    let extension = Extension::parse(&record.extension).unwrap_or_else(|error| {
        report.push(DirectoryIssue::new(IssueCode::InvalidExtension, &name, error.to_string()));
        active = false;
        Extension(record.extension.trim().to_string())
    });

    let time_block = match record.time_block {
        None => None,
        Some(block) => match TimeBlock::parse(&block.range, block.lunch) {
            Ok(parsed) => Some(parsed),
            Err(error) => {
                report.push(DirectoryIssue::new(
                    IssueCode::InvalidTimeBlock,
                    &name,
                    error.to_string(),
                ));
                active = false;
                None
            }
        },
    };

    StaffEntry {
        department: DepartmentId::new(record.department),
        name,
        assignment,
        pool: record.pool,
        extension,
        time_block,
        transferable: record.transferable,
        active,
    }
}

fn build_ring_groups(
    groups: BTreeMap<String, Vec<String>>,
    report: &mut ValidationReport,
) -> Vec<RingGroup> {
    groups
        .into_iter()
        .map(|(name, members)| {
            let members = members
                .iter()
                .filter_map(|raw| match Extension::parse(raw) {
                    Ok(extension) => Some(extension),
                    Err(error) => {
                        report.push(DirectoryIssue::new(
                            IssueCode::InvalidExtension,
                            &name,
                            error.to_string(),
                        ));
                        None
                    }
                })
                .collect();
            RingGroup { name: name.trim().to_string(), members }
        })
        .collect()
}

fn build_intents(
    intents: BTreeMap<String, IntentRouteRecord>,
    report: &mut ValidationReport,
) -> BTreeMap<CallIntent, IntentRoute> {
    let mut routes = BTreeMap::new();
    for (key, record) in intents {
        match key.parse::<CallIntent>() {
            Ok(intent) => {
                routes.insert(
                    intent,
                    IntentRoute {
                        ring_group: record.ring_group.map(|group| group.trim().to_string()),
                        role: record.role.map(|role| role.trim().to_string()),
                        department: record.department.map(DepartmentId::new),
                        new_business: record.new_business,
                    },
                );
            }
            Err(error) => {
                report.push(DirectoryIssue::new(IssueCode::UnknownIntent, key, error.to_string()))
            }
        }
    }
    routes
}

fn build_hours(record: BusinessHoursRecord, report: &mut ValidationReport) -> BusinessHours {
    let mut schedule_issue = |message: String| {
        report.push(DirectoryIssue::new(IssueCode::InvalidSchedule, "business_hours", message));
    };

    let timezone = match record.timezone.as_deref().map(str::trim) {
        None | Some("") => {
            schedule_issue(
                "business_hours.timezone is required (an IANA name such as `America/New_York`)"
                    .to_string(),
            );
            Tz::UTC
        }
        Some(raw) => raw.parse::<Tz>().unwrap_or_else(|_| {
            schedule_issue(format!("unknown timezone `{raw}`"));
            Tz::UTC
        }),
    };

    let mut schedule = WeeklySchedule::new();

    let default_window = match (record.open.as_deref(), record.close.as_deref()) {
        (Some(open), Some(close)) => match window(open, close) {
            Ok(window) => Some(window),
            Err(message) => {
                schedule_issue(message);
                None
            }
        },
        (None, None) => None,
        _ => {
            schedule_issue(
                "business_hours.open and business_hours.close must be set together".to_string(),
            );
            None
        }
    };
    if default_window.is_none() && !record.weekdays.is_empty() {
        schedule_issue("business_hours.weekdays requires open and close times".to_string());
    }

    if let Some(default_window) = default_window {
        for raw in &record.weekdays {
            match parse_weekday(raw) {
                Ok(day) => schedule = schedule.with_window(day, default_window),
                Err(error) => schedule_issue(error.to_string()),
            }
        }
    }

    for day_override in &record.overrides {
        let day = match parse_weekday(&day_override.day) {
            Ok(day) => day,
            Err(error) => {
                schedule_issue(error.to_string());
                continue;
            }
        };
        if day_override.closed {
            schedule = schedule.without_window(day);
            continue;
        }
        let (Some(open), Some(close)) = (&day_override.open, &day_override.close) else {
            schedule_issue(format!(
                "override for `{}` needs open and close times or `closed = true`",
                day_override.day
            ));
            continue;
        };
        match window(open, close) {
            Ok(window) => schedule = schedule.with_window(day, window),
            Err(message) => schedule_issue(message),
        }
    }

    for date in record.closed_dates {
        schedule = schedule.with_closed_date(date);
    }

    BusinessHours::new(timezone, schedule)
}

fn window(open: &str, close: &str) -> Result<DayWindow, String> {
    let open = parse_time_of_day(open).map_err(|error| error.to_string())?;
    let close = parse_time_of_day(close).map_err(|error| error.to_string())?;
    DayWindow::new(open, close).map_err(|error| error.to_string())
}

fn build_carriers(records: Vec<CarrierRecord>, report: &mut ValidationReport) -> CarrierTable {
    let carriers = records
        .into_iter()
        .filter_map(|record| match PhoneNumber::parse(&record.claims_number) {
            Ok(claims_number) => Some(CarrierContact {
                name: record.name.trim().to_string(),
                aliases: cleaned(record.aliases),
                claims_number,
            }),
            Err(error) => {
                report.push(DirectoryIssue::new(
                    IssueCode::InvalidPhoneNumber,
                    record.name.trim(),
                    error.to_string(),
                ));
                None
            }
        })
        .collect();
    CarrierTable::new(carriers)
}
