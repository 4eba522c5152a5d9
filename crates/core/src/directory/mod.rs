pub mod file;
pub mod handle;
pub mod validation;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::carriers::CarrierTable;
use crate::domain::call::{CallIntent, InsuranceType};
use crate::domain::staff::{DepartmentId, Extension, StaffEntry};
use crate::hours::BusinessHours;

pub use file::DirectoryFile;
pub use handle::DirectoryHandle;
pub use validation::{validate_directory, DirectoryIssue, IssueCode, ValidationReport};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingGroup {
    pub name: String,
    pub members: Vec<Extension>,
}

/// How a call intent is routed before (or instead of) the alpha split.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRoute {
    pub ring_group: Option<String>,
    pub role: Option<String>,
    pub department: Option<DepartmentId>,
    pub new_business: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentMap {
    pub business: DepartmentId,
    pub personal: DepartmentId,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Any issue rejects the directory.
    #[default]
    Strict,
    /// Non-fatal issues are logged and defective entries are marked inactive.
    Lenient,
}

impl std::str::FromStr for ValidationMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => {
                Err(format!("unsupported validation mode `{other}` (expected strict|lenient)"))
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("could not read directory file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse directory `{origin}`: {source}")]
    ParseToml { origin: String, source: toml::de::Error },
    #[error("could not parse directory `{origin}`: {source}")]
    ParseJson { origin: String, source: serde_json::Error },
    #[error("directory validation failed with {} issue(s): {}", .0.issues.len(), .0.summary())]
    Invalid(ValidationReport),
}

#[derive(Clone, Debug)]
pub struct LoadedDirectory {
    pub directory: Directory,
    pub report: ValidationReport,
}

/// Immutable routing data: staff, ring groups, restrictions, hours, and carriers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directory {
    pub(crate) staff: Vec<StaffEntry>,
    pub(crate) restricted: Vec<String>,
    pub(crate) exception_prefixes: Vec<String>,
    pub(crate) ring_groups: Vec<RingGroup>,
    pub(crate) intents: BTreeMap<CallIntent, IntentRoute>,
    pub(crate) departments: DepartmentMap,
    pub(crate) hours: BusinessHours,
    pub(crate) carriers: CarrierTable,
    pub(crate) non_alpha_letter: char,
}

impl Directory {
    pub fn load(path: &Path, mode: ValidationMode) -> Result<LoadedDirectory, DirectoryError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| DirectoryError::ReadFile { path: path.to_path_buf(), source })?;
        let origin = path.display().to_string();

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let file = if is_json {
            serde_json::from_str::<DirectoryFile>(&raw)
                .map_err(|source| DirectoryError::ParseJson { origin: origin.clone(), source })?
        } else {
            toml::from_str::<DirectoryFile>(&raw)
                .map_err(|source| DirectoryError::ParseToml { origin: origin.clone(), source })?
        };

        Self::from_file(file, mode, &origin)
    }

    pub fn from_toml_str(
        raw: &str,
        mode: ValidationMode,
    ) -> Result<LoadedDirectory, DirectoryError> {
        let file = toml::from_str::<DirectoryFile>(raw).map_err(|source| {
            DirectoryError::ParseToml { origin: "<inline>".to_string(), source }
        })?;
        Self::from_file(file, mode, "<inline>")
    }

    pub fn from_json_str(
        raw: &str,
        mode: ValidationMode,
    ) -> Result<LoadedDirectory, DirectoryError> {
        let file = serde_json::from_str::<DirectoryFile>(raw).map_err(|source| {
            DirectoryError::ParseJson { origin: "<inline>".to_string(), source }
        })?;
        Self::from_file(file, mode, "<inline>")
    }

    pub fn from_file(
        file: DirectoryFile,
        mode: ValidationMode,
        origin: &str,
    ) -> Result<LoadedDirectory, DirectoryError> {
        let (directory, mut report) = file.assemble();
        report.extend(directory.validate());

        if report.has_fatal() || (mode == ValidationMode::Strict && !report.is_clean()) {
            warn!(
                event_name = "directory.load.rejected",
                origin,
                issue_count = report.issues.len(),
                "directory rejected by validation"
            );
            return Err(DirectoryError::Invalid(report));
        }

        for issue in &report.issues {
            warn!(
                event_name = "directory.validation.issue",
                origin,
                code = issue.code.as_str(),
                subject = %issue.subject,
                "{}",
                issue.message
            );
        }
        info!(
            event_name = "directory.load.completed",
            origin,
            staff_count = directory.staff.len(),
            ring_group_count = directory.ring_groups.len(),
            carrier_count = directory.carriers.len(),
            issue_count = report.issues.len(),
            "directory loaded"
        );

        Ok(LoadedDirectory { directory, report })
    }

    pub fn validate(&self) -> ValidationReport {
        validate_directory(self)
    }

    pub fn staff(&self) -> &[StaffEntry] {
        &self.staff
    }

    pub fn restricted_names(&self) -> &[String] {
        &self.restricted
    }

    pub fn exception_prefixes(&self) -> &[String] {
        &self.exception_prefixes
    }

    pub fn ring_groups(&self) -> &[RingGroup] {
        &self.ring_groups
    }

    pub fn ring_group(&self, name: &str) -> Option<&RingGroup> {
        let name = name.trim();
        self.ring_groups.iter().find(|group| group.name.eq_ignore_ascii_case(name))
    }

    pub fn intent_route(&self, intent: CallIntent) -> Option<&IntentRoute> {
        self.intents.get(&intent)
    }

    pub fn intent_routes(&self) -> impl Iterator<Item = (&CallIntent, &IntentRoute)> {
        self.intents.iter()
    }

    pub fn departments(&self) -> &DepartmentMap {
        &self.departments
    }

    pub fn department_for(&self, insurance_type: InsuranceType) -> &DepartmentId {
        match insurance_type {
            InsuranceType::Business => &self.departments.business,
            InsuranceType::Personal => &self.departments.personal,
        }
    }

    pub fn hours(&self) -> &BusinessHours {
        &self.hours
    }

    pub fn carriers(&self) -> &CarrierTable {
        &self.carriers
    }

    pub fn non_alpha_letter(&self) -> char {
        self.non_alpha_letter
    }

    pub fn staff_by_extension(&self, extension: &Extension) -> Option<&StaffEntry> {
        self.staff.iter().find(|entry| &entry.extension == extension)
    }

    pub fn staff_with_role<'a>(
        &'a self,
        department: &'a DepartmentId,
        role: &'a str,
    ) -> impl Iterator<Item = &'a StaffEntry> + 'a {
        self.staff.iter().filter(move |entry| {
            &entry.department == department
                && entry.assignment.role().is_some_and(|own| own.eq_ignore_ascii_case(role))
        })
    }

    pub fn lookup_claims_number(
        &self,
        carrier_name: &str,
    ) -> Option<&crate::carriers::CarrierContact> {
        self.carriers.lookup_claims_number(carrier_name)
    }
}
