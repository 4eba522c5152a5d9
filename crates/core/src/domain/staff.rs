use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::hours::time_block::TimeBlock;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepartmentId(pub String);

impl DepartmentId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Extension(pub String);

impl Extension {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidExtension(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which caller population a staff entry serves within its department.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessPool {
    NewBusiness,
    Existing,
}

impl BusinessPool {
    pub fn from_flag(is_new_business: bool) -> Self {
        if is_new_business {
            Self::NewBusiness
        } else {
            Self::Existing
        }
    }
}

/// Inclusive letter range, e.g. `A-F` or the single-letter range `Q`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AlphaRange {
    start: char,
    end: char,
}

impl AlphaRange {
    pub fn new(start: char, end: char) -> Option<Self> {
        let start = start.to_ascii_uppercase();
        let end = end.to_ascii_uppercase();
        (start.is_ascii_uppercase() && end.is_ascii_uppercase() && start <= end)
            .then_some(Self { start, end })
    }

    pub fn start(&self) -> char {
        self.start
    }

    pub fn end(&self) -> char {
        self.end
    }

    pub fn contains(&self, letter: char) -> bool {
        let letter = letter.to_ascii_uppercase();
        self.start <= letter && letter <= self.end
    }

    pub fn intersection(&self, other: &AlphaRange) -> Option<AlphaRange> {
        AlphaRange::new(self.start.max(other.start), self.end.min(other.end))
    }

    pub fn letters(&self) -> impl Iterator<Item = char> {
        self.start..=self.end
    }
}

impl fmt::Display for AlphaRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Assignment {
    Range(AlphaRange),
    Role(String),
}

impl Assignment {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let invalid = || DomainError::InvalidAssignment(raw.to_string());

        let mut chars = trimmed.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (None, ..) => return Err(invalid()),
            (Some(letter), None, _) => {
                return AlphaRange::new(letter, letter).map(Self::Range).ok_or_else(invalid);
            }
            _ => {}
        }

        if let Some((start, end)) = trimmed.split_once('-') {
            let (start, end) = (start.trim(), end.trim());
            if let (Some(start), Some(end)) = (single_char(start), single_char(end)) {
                return AlphaRange::new(start, end).map(Self::Range).ok_or_else(invalid);
            }
        }

        Ok(Self::Role(trimmed.to_string()))
    }

    pub fn range(&self) -> Option<&AlphaRange> {
        match self {
            Self::Range(range) => Some(range),
            Self::Role(_) => None,
        }
    }

    pub fn role(&self) -> Option<&str> {
        match self {
            Self::Role(role) => Some(role),
            Self::Range(_) => None,
        }
    }
}

fn single_char(value: &str) -> Option<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range(range) => range.fmt(f),
            Self::Role(role) => f.write_str(role),
        }
    }
}

impl TryFrom<String> for Assignment {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Assignment> for String {
    fn from(value: Assignment) -> Self {
        value.to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffEntry {
    pub department: DepartmentId,
    pub name: String,
    pub assignment: Assignment,
    /// `None` serves both new and existing business.
    pub pool: Option<BusinessPool>,
    pub extension: Extension,
    pub time_block: Option<TimeBlock>,
    pub transferable: bool,
    /// Cleared when lenient directory validation found a defect in this entry.
    pub active: bool,
}

impl StaffEntry {
    pub fn serves(&self, pool: BusinessPool) -> bool {
        self.pool.map_or(true, |own| own == pool)
    }

    pub fn alpha_range(&self) -> Option<&AlphaRange> {
        self.assignment.range()
    }
}
