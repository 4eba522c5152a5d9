use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceType {
    #[serde(alias = "BUSINESS")]
    Business,
    #[serde(alias = "PERSONAL")]
    Personal,
}

/// Closed set of reasons a caller gives for calling, as classified upstream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallIntent {
    NewQuote,
    PolicyChange,
    Payment,
    Documents,
    Claim,
    Cancellation,
    CoverageQuestion,
    Other,
}

impl CallIntent {
    pub const ALL: [CallIntent; 8] = [
        Self::NewQuote,
        Self::PolicyChange,
        Self::Payment,
        Self::Documents,
        Self::Claim,
        Self::Cancellation,
        Self::CoverageQuestion,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewQuote => "new_quote",
            Self::PolicyChange => "policy_change",
            Self::Payment => "payment",
            Self::Documents => "documents",
            Self::Claim => "claim",
            Self::Cancellation => "cancellation",
            Self::CoverageQuestion => "coverage_question",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for CallIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallIntent {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|intent| intent.as_str() == normalized)
            .ok_or_else(|| DomainError::InvalidIntent(value.to_string()))
    }
}

/// Structured caller facts gathered by the conversation layer. The resolver only reads it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallState {
    pub caller_name: Option<String>,
    pub callback_number: Option<String>,
    pub insurance_type: Option<InsuranceType>,
    pub business_name: Option<String>,
    pub last_name: Option<String>,
    pub intent: Option<CallIntent>,
    pub requested_staff: Option<String>,
    pub notes: Option<String>,
}

impl CallState {
    pub fn requested_staff(&self) -> Option<&str> {
        non_blank(self.requested_staff.as_deref())
    }

    /// The name used for alpha-split routing, chosen by insurance type.
    pub fn routing_identifier(&self) -> Option<(InsuranceType, &str)> {
        let insurance_type = self.insurance_type?;
        let identifier = match insurance_type {
            InsuranceType::Business => non_blank(self.business_name.as_deref()),
            InsuranceType::Personal => non_blank(self.last_name.as_deref()),
        }?;
        Some((insurance_type, identifier))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
