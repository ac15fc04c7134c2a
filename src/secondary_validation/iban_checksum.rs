use crate::encoding::{check_charset, encode, encoded_mod97};
use crate::error::AccountError;
use crate::normalization::normalize;
use crate::secondary_validation::Validator;
use ethereum_types::U256;
use std::fmt;
use std::str::FromStr;

/// Norway has the shortest IBANs.
pub const SHORTEST_IBAN_LENGTH: usize = 15;
/// Malta has the longest IBANs. Longer inputs are still reduced.
pub const MAX_IBAN_LENGTH: usize = 34;

/// Country code and check digits, moved to the end before reduction.
const PREFIX_LENGTH: usize = 4;
const CHECK_DIGITS_LENGTH: usize = 2;

/// Result of the ISO 13616 mod-97 reduction of an IBAN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IbanModulus {
    modulus: u32,
    value: Option<U256>,
    rearranged: String,
}

impl IbanModulus {
    /// The residue; 1 for a valid IBAN
    pub fn modulus(&self) -> u32 {
        self.modulus
    }

    /// The encoded, rearranged IBAN as a number. Any input up to
    /// [MAX_IBAN_LENGTH] characters fits, longer ones may not and give `None`.
    pub fn value(&self) -> Option<&U256> {
        self.value.as_ref()
    }

    /// The IBAN with its first 4 characters moved to the end
    pub fn rearranged(&self) -> &str {
        &self.rearranged
    }
}

fn rotate_left(input: &str, mid: usize) -> String {
    input.chars().skip(mid).chain(input.chars().take(mid)).collect()
}

fn rotate_right(input: &str, mid: usize) -> String {
    let len = input.chars().count();
    rotate_left(input, len.saturating_sub(mid))
}

/// Rearranges `iban`, encodes its letters and reduces the result modulo 97.
pub fn compute_iban_modulus(iban: &str) -> Result<IbanModulus, AccountError> {
    let len = iban.chars().count();
    if len <= PREFIX_LENGTH {
        return Err(AccountError::TooShort {
            len,
            min: PREFIX_LENGTH + 1,
        });
    }
    check_charset(iban)?;

    let rearranged = rotate_left(iban, PREFIX_LENGTH);
    let modulus = encoded_mod97(&rearranged)?;
    let value = U256::from_dec_str(&encode(&rearranged)?).ok();
    Ok(IbanModulus {
        modulus,
        value,
        rearranged,
    })
}

/// Completes the check digits of an IBAN stub given in rearranged form
/// (e.g. "512108001245126199DE00"), returning the completed rearranged form.
///
/// The last two characters are placeholders and are overwritten. A stub shorter
/// than [SHORTEST_IBAN_LENGTH] yields an empty string rather than an error.
pub fn complete_rearranged(rearranged: &str) -> Result<String, AccountError> {
    let len = rearranged.chars().count();
    if len < SHORTEST_IBAN_LENGTH {
        return Ok(String::new());
    }

    let body: String = rearranged.chars().take(len - CHECK_DIGITS_LENGTH).collect();
    let remainder = encoded_mod97(&format!("{body}00"))?;
    Ok(format!("{body}{:02}", 98 - remainder))
}

/// Moves the last 4 characters of a rearranged IBAN back to the front.
/// Empty when shorter than [SHORTEST_IBAN_LENGTH].
pub fn rearranged_to_iban(rearranged: &str) -> String {
    if rearranged.chars().count() < SHORTEST_IBAN_LENGTH {
        return String::new();
    }
    rotate_right(rearranged, PREFIX_LENGTH)
}

/// Computes the check digits of an IBAN whose positions 3-4 are placeholders
/// (conventionally "00") and returns the complete IBAN.
///
/// A stub shorter than [SHORTEST_IBAN_LENGTH] yields an empty string rather than
/// an error, so that batch callers only need to test for emptiness.
pub fn compute_iban_check_digits(stub: &str) -> Result<String, AccountError> {
    if stub.chars().count() < SHORTEST_IBAN_LENGTH {
        return Ok(String::new());
    }
    // the placeholders are replaced, whatever they are
    if let Some((position, character)) = stub
        .chars()
        .enumerate()
        .filter(|(position, _)| !(2..PREFIX_LENGTH).contains(position))
        .find(|(_, c)| !c.is_ascii_digit() && !c.is_ascii_uppercase())
    {
        return Err(AccountError::InvalidCharacter {
            character,
            position,
        });
    }

    let completed = complete_rearranged(&rotate_left(stub, PREFIX_LENGTH))?;
    Ok(rearranged_to_iban(&completed))
}

/// An IBAN that could be reduced modulo 97. It is not necessarily valid, see [Iban::is_valid].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iban {
    iban: String,
    modulus: IbanModulus,
}

impl Iban {
    /// Builds an IBAN from text that may contain spaces and dots.
    pub fn parse(raw: &str) -> Result<Self, AccountError> {
        let iban = normalize(raw);
        let modulus = compute_iban_modulus(&iban)?;
        Ok(Iban { iban, modulus })
    }

    pub fn as_str(&self) -> &str {
        &self.iban
    }

    pub fn modulus(&self) -> u32 {
        self.modulus.modulus()
    }

    pub fn value(&self) -> Option<&U256> {
        self.modulus.value()
    }

    pub fn rearranged(&self) -> &str {
        self.modulus.rearranged()
    }

    /// The 4 characters that rearrangement moved to the end, when they start with
    /// a letter. Empty otherwise.
    pub fn bban(&self) -> &str {
        let rearranged = self.modulus.rearranged();
        // charset was checked, so byte offsets are char offsets
        let tail = &rearranged[rearranged.len() - PREFIX_LENGTH..];
        if tail.starts_with(|c: char| c.is_ascii_uppercase()) {
            tail
        } else {
            ""
        }
    }

    /// The check digits, positions 3-4 of the IBAN as written. These are not
    /// characters 3-4 of [Iban::rearranged], which belong to the account number.
    pub fn check_digits(&self) -> &str {
        &self.iban[2..PREFIX_LENGTH]
    }

    pub fn is_valid(&self) -> bool {
        !self.bban().is_empty() && self.modulus() == 1
    }
}

impl FromStr for Iban {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Iban::parse(s)
    }
}

impl fmt::Display for Iban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.iban)
    }
}

/// Validates an IBAN inside free text, ignoring separators and case.
pub struct IbanChecksum;

impl Validator for IbanChecksum {
    fn is_valid_match(&self, regex_match: &str) -> bool {
        let candidate: String = regex_match
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_uppercase())
            .collect();
        if candidate.len() < SHORTEST_IBAN_LENGTH {
            return false;
        }
        Iban::parse(&candidate).is_ok_and(|iban| iban.is_valid())
    }
}
