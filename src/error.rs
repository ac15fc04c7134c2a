use strum::IntoStaticStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum AccountError {
    /// The input is shorter than the shortest length the scheme accepts
    #[error("Input is too short: {len} characters, at least {min} are required")]
    TooShort { len: usize, min: usize },

    /// A character is neither an ASCII digit nor an uppercase letter A-Z
    #[error("Invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("Malformed account structure: {0}")]
    MalformedStructure(MalformedReason),

    /// The 4-character country/bank prefix is absent from the registry
    #[error("Unrecognized prefix {0:?}")]
    UnrecognizedPrefix(String),
}

/// Why an account identifier does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum MalformedReason {
    /// A NIB payload must be 19 digits, or a full 21-digit NIB
    #[error("a NIB payload has 19 or 21 digits, got {0}")]
    BadLength(usize),

    #[error("non-digit character in NIB payload at position {position}")]
    NonDigit { position: usize },

    /// Uppercase letters found after the digits started
    #[error("letters {0:?} found after the first digit")]
    Clutter(String),
}

impl AccountError {
    /// A stable snake_case name for the error kind, suitable as a metric label value.
    pub fn reason(&self) -> &'static str {
        match self {
            AccountError::MalformedStructure(reason) => reason.into(),
            other => other.into(),
        }
    }
}

impl From<MalformedReason> for AccountError {
    fn from(reason: MalformedReason) -> Self {
        AccountError::MalformedStructure(reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Prefix {0:?} is not 2 uppercase letters followed by 2 digits")]
    InvalidPrefixCode(String),

    #[error("Prefix {0:?} has an empty country name")]
    EmptyCountryName(String),
}
