use thiserror::Error;

use crate::config::ConfigError;
use crate::directory::DirectoryError;
use crate::hours::time_block::TimeBlockError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid staff assignment `{0}` (expected a letter range such as `A-F` or a role name)")]
    InvalidAssignment(String),
    #[error("invalid extension `{0}` (expected digits only)")]
    InvalidExtension(String),
    #[error("invalid phone number `{0}` (expected 10 digits, optionally prefixed by 1)")]
    InvalidPhoneNumber(String),
    #[error("invalid weekday `{0}`")]
    InvalidWeekday(String),
    #[error("invalid time of day `{0}`")]
    InvalidTimeOfDay(String),
    #[error("invalid call intent `{0}`")]
    InvalidIntent(String),
    #[error(transparent)]
    TimeBlock(#[from] TimeBlockError),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("configuration failure: {0}")]
    Configuration(String),
    #[error("directory failure: {0}")]
    Directory(String),
    #[error("invalid input: {0}")]
    Input(String),
}

impl ApplicationError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(_) | Self::Input(_) => "invalid_input",
            Self::Configuration(_) => "config_validation",
            Self::Directory(_) => "directory_validation",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 2,
            Self::Directory(_) => 3,
            Self::Domain(_) | Self::Input(_) => 4,
        }
    }
}

impl From<ConfigError> for ApplicationError {
    fn from(value: ConfigError) -> Self {
        Self::Configuration(value.to_string())
    }
}

impl From<DirectoryError> for ApplicationError {
    fn from(value: DirectoryError) -> Self {
        Self::Directory(value.to_string())
    }
}
