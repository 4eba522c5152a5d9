use serde::{Deserialize, Serialize};

use crate::directory::RingGroup;
use crate::domain::staff::StaffEntry;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FallbackReason {
    UnknownStaff,
    AmbiguousStaff,
    StaffUnavailable,
    NoAgentAvailable,
    NoMatch,
    InsufficientInfo,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownStaff => "UNKNOWN_STAFF",
            Self::AmbiguousStaff => "AMBIGUOUS_STAFF",
            Self::StaffUnavailable => "STAFF_UNAVAILABLE",
            Self::NoAgentAvailable => "NO_AGENT_AVAILABLE",
            Self::NoMatch => "NO_MATCH",
            Self::InsufficientInfo => "INSUFFICIENT_INFO",
        }
    }

    /// Caller-safe wording the conversation layer can speak or paraphrase.
    pub fn recommended_message(&self, office_open: bool) -> &'static str {
        if !office_open && matches!(self, Self::StaffUnavailable | Self::NoAgentAvailable) {
            return "Our office is closed right now. I can take a message and someone will call you back next business day.";
        }

        match self {
            Self::UnknownStaff => {
                "I couldn't find that person in our directory. I can take a message and make sure it gets to the right person."
            }
            Self::AmbiguousStaff => {
                "We have more than one person by that name. Could you tell me their full name?"
            }
            Self::StaffUnavailable => {
                "They aren't available to take your call right now. I can take a message and have them call you back."
            }
            Self::NoAgentAvailable => {
                "Your account team isn't available right now. I can take a message and have them call you back."
            }
            Self::NoMatch => {
                "I wasn't able to find the right person for that. I can take a message and have someone call you back."
            }
            Self::InsufficientInfo => {
                "Before I transfer you, could you tell me whether this is for a business or personal policy, and the name on the policy?"
            }
        }
    }
}

/// Where a call goes next. Produced fresh for every resolver invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DispatchDecision {
    Transfer { staff: StaffEntry },
    RingGroupTransfer { group: RingGroup },
    Fallback { reason: FallbackReason, message: String },
    Restricted { staff_name: String },
}

impl DispatchDecision {
    pub fn fallback(reason: FallbackReason, office_open: bool) -> Self {
        Self::Fallback { reason, message: reason.recommended_message(office_open).to_string() }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => "transfer",
            Self::RingGroupTransfer { .. } => "ring_group_transfer",
            Self::Fallback { .. } => "fallback",
            Self::Restricted { .. } => "restricted",
        }
    }

    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        match self {
            Self::Fallback { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// Extension or group name the telephony layer should dial, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Transfer { staff } => Some(staff.extension.0.as_str()),
            Self::RingGroupTransfer { group } => Some(group.name.as_str()),
            Self::Fallback { .. } | Self::Restricted { .. } => None,
        }
    }
}
