use crate::error::{AccountError, MalformedReason};
use crate::secondary_validation::Validator;

/// Length of a full NIB: 19 payload digits and 2 check digits.
pub const NIB_LENGTH: usize = 21;
pub const NIB_PAYLOAD_LENGTH: usize = 19;

/// Banco de Portugal weights, one per payload digit.
const WEIGHTS: &[u32; NIB_PAYLOAD_LENGTH] = &[
    73, 17, 89, 38, 62, 45, 53, 15, 50, 5, 49, 34, 81, 76, 27, 90, 9, 30, 3,
];

/// The check digits of a Portuguese NIB payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NibCheckDigit {
    check_digits: String,
    value: u32,
    nib: String,
}

impl NibCheckDigit {
    /// The check digits, zero-padded to two characters
    pub fn check_digits(&self) -> &str {
        &self.check_digits
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// The 19 payload digits followed by the check digits
    pub fn nib(&self) -> &str {
        &self.nib
    }
}

/// Computes the NIB check digits of a 19-digit payload.
///
/// A full 21-character NIB is also accepted: only its first 19 digits are used,
/// and its trailing check digits are ignored.
pub fn compute_nib_check_digit(payload: &str) -> Result<NibCheckDigit, AccountError> {
    let len = payload.chars().count();
    if len != NIB_PAYLOAD_LENGTH && len != NIB_LENGTH {
        return Err(MalformedReason::BadLength(len).into());
    }

    let mut nib = String::with_capacity(NIB_LENGTH);
    let mut sum = 0;
    for (position, (c, weight)) in payload.chars().zip(WEIGHTS).enumerate() {
        let digit = c
            .to_digit(10)
            .ok_or(MalformedReason::NonDigit { position })?;
        sum += weight * digit;
        nib.push(c);
    }

    let value = 98 - (sum % 97);
    let check_digits = format!("{value:02}");
    nib.push_str(&check_digits);
    Ok(NibCheckDigit {
        check_digits,
        value,
        nib,
    })
}

/// Whether `nib` is exactly 21 digits whose last two are the check digits of the first 19.
pub fn is_valid_nib(nib: &str) -> bool {
    nib.len() == NIB_LENGTH
        && compute_nib_check_digit(nib).is_ok_and(|computed| computed.nib() == nib)
}

/// Validates a NIB written with any separators between its digits.
pub struct NibChecksum;

impl Validator for NibChecksum {
    fn is_valid_match(&self, regex_match: &str) -> bool {
        let digits: String = regex_match.chars().filter(|c| c.is_ascii_digit()).collect();
        is_valid_nib(&digits)
    }
}
