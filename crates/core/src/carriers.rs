use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

const NOISE_SUFFIXES: [&str; 7] = ["insurance", "ins", "company", "co", "group", "mutual", "inc"];

pub const UNKNOWN_CARRIER_MESSAGE: &str =
    "I don't have a claims number for that carrier. The claims phone number is usually printed on your insurance card or policy documents.";

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        let national = match digits.len() {
            10 => digits.as_str(),
            11 if digits.starts_with('1') => &digits[1..],
            _ => return Err(DomainError::InvalidPhoneNumber(raw.to_string())),
        };
        if raw.chars().any(|ch| ch.is_ascii_alphabetic()) {
            return Err(DomainError::InvalidPhoneNumber(raw.to_string()));
        }
        Ok(Self(format!("{}-{}-{}", &national[..3], &national[3..6], &national[6..])))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierContact {
    pub name: String,
    pub aliases: Vec<String>,
    pub claims_number: PhoneNumber,
}

/// Static carrier → claims line table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CarrierTable {
    carriers: Vec<CarrierContact>,
}

impl CarrierTable {
    pub fn new(carriers: Vec<CarrierContact>) -> Self {
        Self { carriers }
    }

    pub fn len(&self) -> usize {
        self.carriers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.carriers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CarrierContact> {
        self.carriers.iter()
    }

    /// Exact match on the normalized name or an alias, then on the name with trailing
    /// corporate words removed. Never guesses beyond that.
    pub fn lookup_claims_number(&self, carrier_name: &str) -> Option<&CarrierContact> {
        let wanted = normalize_carrier(carrier_name);
        if wanted.is_empty() {
            return None;
        }

        let exact = self
            .carriers
            .iter()
            .find(|carrier| carrier_keys(carrier).any(|key| normalize_carrier(key) == wanted));
        if exact.is_some() {
            return exact;
        }

        let wanted_core = strip_noise(carrier_name);
        if wanted_core.is_empty() {
            return None;
        }
        self.carriers
            .iter()
            .find(|carrier| carrier_keys(carrier).any(|key| strip_noise(key) == wanted_core))
    }
}

fn carrier_keys(carrier: &CarrierContact) -> impl Iterator<Item = &str> {
    std::iter::once(carrier.name.as_str()).chain(carrier.aliases.iter().map(String::as_str))
}

fn normalize_carrier(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_alphanumeric).map(|ch| ch.to_ascii_lowercase()).collect()
}

fn strip_noise(raw: &str) -> String {
    let mut words: Vec<String> =
        raw.split_whitespace().map(normalize_carrier).filter(|word| !word.is_empty()).collect();
    while words.len() > 1
        && words.last().is_some_and(|word| NOISE_SUFFIXES.contains(&word.as_str()))
    {
        words.pop();
    }
    words.concat()
}
