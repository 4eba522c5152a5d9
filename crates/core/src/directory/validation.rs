use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::directory::Directory;
use crate::domain::staff::{AlphaRange, BusinessPool, DepartmentId, StaffEntry};
use crate::routing::alpha::alpha_candidates;
use crate::routing::names::normalize_name;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    AlphaGap,
    AlphaOverlap,
    InvalidTimeBlock,
    InvalidAssignment,
    InvalidExtension,
    InvalidPhoneNumber,
    DuplicateStaffName,
    EmptyRingGroup,
    UnknownRingGroup,
    UnknownDepartment,
    UnknownIntent,
    InvalidSchedule,
    InvalidSetting,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AlphaGap => "ALPHA_GAP",
            Self::AlphaOverlap => "ALPHA_OVERLAP",
            Self::InvalidTimeBlock => "INVALID_TIME_BLOCK",
            Self::InvalidAssignment => "INVALID_ASSIGNMENT",
            Self::InvalidExtension => "INVALID_EXTENSION",
            Self::InvalidPhoneNumber => "INVALID_PHONE_NUMBER",
            Self::DuplicateStaffName => "DUPLICATE_STAFF_NAME",
            Self::EmptyRingGroup => "EMPTY_RING_GROUP",
            Self::UnknownRingGroup => "UNKNOWN_RING_GROUP",
            Self::UnknownDepartment => "UNKNOWN_DEPARTMENT",
            Self::UnknownIntent => "UNKNOWN_INTENT",
            Self::InvalidSchedule => "INVALID_SCHEDULE",
            Self::InvalidSetting => "INVALID_SETTING",
        }
    }

    /// Fatal issues block a load even in lenient mode.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidSchedule | Self::InvalidSetting)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryIssue {
    pub code: IssueCode,
    pub subject: String,
    pub message: String,
}

impl DirectoryIssue {
    pub fn new(code: IssueCode, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self { code, subject: subject.into(), message: message.into() }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<DirectoryIssue>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has(&self, code: IssueCode) -> bool {
        self.issues.iter().any(|issue| issue.code == code)
    }

    pub fn count(&self, code: IssueCode) -> usize {
        self.issues.iter().filter(|issue| issue.code == code).count()
    }

    pub fn has_fatal(&self) -> bool {
        self.issues.iter().any(|issue| issue.code.is_fatal())
    }

    pub fn push(&mut self, issue: DirectoryIssue) {
        self.issues.push(issue);
    }

    pub fn extend(&mut self, other: ValidationReport) {
        self.issues.extend(other.issues);
    }

    pub fn summary(&self) -> String {
        self.issues
            .iter()
            .map(|issue| format!("[{}] {}: {}", issue.code.as_str(), issue.subject, issue.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Structural checks over an assembled directory.
pub fn validate_directory(directory: &Directory) -> ValidationReport {
    let mut report = ValidationReport::default();
    check_alpha_partitions(directory, &mut report);
    check_duplicate_names(directory, &mut report);
    check_ring_groups(directory, &mut report);
    check_department_references(directory, &mut report);
    report
}

fn check_alpha_partitions(directory: &Directory, report: &mut ValidationReport) {
    let departments: BTreeSet<&DepartmentId> = directory
        .staff()
        .iter()
        .filter(|entry| entry.alpha_range().is_some())
        .map(|entry| &entry.department)
        .collect();

    for department in departments {
        let dedicated: Vec<BusinessPool> = [BusinessPool::NewBusiness, BusinessPool::Existing]
            .into_iter()
            .filter(|pool| {
                directory.staff().iter().any(|entry| {
                    &entry.department == department
                        && entry.alpha_range().is_some()
                        && entry.pool == Some(*pool)
                })
            })
            .collect();

        if dedicated.is_empty() {
            let partition = alpha_candidates(directory.staff(), department, BusinessPool::Existing);
            check_partition(department.as_str(), &partition, report);
            continue;
        }
        for pool in dedicated {
            let partition = alpha_candidates(directory.staff(), department, pool);
            let subject = match pool {
                BusinessPool::NewBusiness => format!("{department}/new_business"),
                BusinessPool::Existing => format!("{department}/existing"),
            };
            check_partition(&subject, &partition, report);
        }
    }
}

fn check_partition(subject: &str, partition: &[&StaffEntry], report: &mut ValidationReport) {
    let missing: Vec<String> = ('A'..='Z')
        .filter(|letter| {
            !partition
                .iter()
                .any(|entry| entry.alpha_range().is_some_and(|range| range.contains(*letter)))
        })
        .map(String::from)
        .collect();
    if !missing.is_empty() {
        report.push(DirectoryIssue::new(
            IssueCode::AlphaGap,
            subject,
            format!("no staff assigned to letters {}", missing.join(", ")),
        ));
    }

    for (index, first) in partition.iter().enumerate() {
        for second in &partition[index + 1..] {
            let overlap = match (first.alpha_range(), second.alpha_range()) {
                (Some(a), Some(b)) => a.intersection(b),
                _ => None,
            };
            if let Some(overlap) = overlap {
                report.push(DirectoryIssue::new(
                    IssueCode::AlphaOverlap,
                    subject,
                    format!(
                        "`{}` and `{}` both cover {}",
                        first.name,
                        second.name,
                        describe_range(&overlap)
                    ),
                ));
            }
        }
    }
}

fn describe_range(range: &AlphaRange) -> String {
    if range.start() == range.end() {
        format!("letter {range}")
    } else {
        format!("letters {range}")
    }
}

fn check_duplicate_names(directory: &Directory, report: &mut ValidationReport) {
    let mut seen: BTreeMap<String, &str> = BTreeMap::new();
    for entry in directory.staff() {
        let key = normalize_name(&entry.name);
        if let Some(previous) = seen.insert(key, entry.name.as_str()) {
            report.push(DirectoryIssue::new(
                IssueCode::DuplicateStaffName,
                &entry.name,
                format!("name collides with `{previous}`; requests by name will be ambiguous"),
            ));
        }
    }
}

fn check_ring_groups(directory: &Directory, report: &mut ValidationReport) {
    for group in directory.ring_groups() {
        if group.members.is_empty() {
            report.push(DirectoryIssue::new(
                IssueCode::EmptyRingGroup,
                &group.name,
                "ring group has no member extensions",
            ));
        }
    }

    for (intent, route) in directory.intent_routes() {
        if let Some(group) = &route.ring_group {
            if directory.ring_group(group).is_none() {
                report.push(DirectoryIssue::new(
                    IssueCode::UnknownRingGroup,
                    intent.as_str(),
                    format!("intent routes to undefined ring group `{group}`"),
                ));
            }
        }
    }
}

fn check_department_references(directory: &Directory, report: &mut ValidationReport) {
    let known = |department: &DepartmentId| {
        directory.staff().iter().any(|entry| &entry.department == department)
    };

    let departments = directory.departments();
    let mapped = [
        ("departments.business", &departments.business),
        ("departments.personal", &departments.personal),
    ];
    for (label, department) in mapped {
        if !known(department) {
            report.push(DirectoryIssue::new(
                IssueCode::UnknownDepartment,
                label,
                format!("department `{department}` has no staff entries"),
            ));
        }
    }

    for (intent, route) in directory.intent_routes() {
        if let Some(department) = &route.department {
            if !known(department) {
                report.push(DirectoryIssue::new(
                    IssueCode::UnknownDepartment,
                    intent.as_str(),
                    format!("intent routes to department `{department}` which has no staff entries"),
                ));
            }
        }
    }
}
