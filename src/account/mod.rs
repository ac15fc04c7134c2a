use crate::error::{AccountError, MalformedReason};
use crate::normalization::normalize;
use crate::observability::labels::{Labels, NO_LABEL};
use crate::registry::{PrefixRegistry, DEFAULT_REGISTRY};
use crate::secondary_validation::{
    compute_iban_modulus, compute_nib_check_digit, is_valid_nib, NIB_LENGTH, NIB_PAYLOAD_LENGTH,
    SHORTEST_IBAN_LENGTH,
};
use lazy_static::lazy_static;
use rayon::prelude::*;

use self::metrics::ParserMetrics;
pub use self::record::{AccountKind, AccountRecord, CheckDigitVerdict};

pub mod metrics;
mod record;

#[cfg(test)]
mod test;

/// A registry prefix: 2 letters and 2 check digits.
const PREFIX_LENGTH: usize = 4;
/// A Portuguese IBAN is a prefix followed by a NIB.
const PT_IBAN_LENGTH: usize = PREFIX_LENGTH + NIB_LENGTH;

lazy_static! {
    /// Parser over [DEFAULT_REGISTRY], shared by the free functions.
    static ref DEFAULT_PARSER: AccountParser<'static> = AccountParser::default();
}

/// Parses account identifiers typed by users, against a fixed prefix registry.
pub struct AccountParser<'a> {
    registry: &'a PrefixRegistry,
    metrics: ParserMetrics,
}

impl Default for AccountParser<'static> {
    fn default() -> Self {
        AccountParser::new(&DEFAULT_REGISTRY)
    }
}

impl<'a> AccountParser<'a> {
    pub fn new(registry: &'a PrefixRegistry) -> Self {
        Self::with_labels(registry, &NO_LABEL)
    }

    /// Same as [AccountParser::new], with `labels` added to every metric.
    pub fn with_labels(registry: &'a PrefixRegistry, labels: &Labels) -> Self {
        AccountParser {
            registry,
            metrics: ParserMetrics::new(labels),
        }
    }

    pub fn registry(&self) -> &PrefixRegistry {
        self.registry
    }

    /// Parses an IBAN or a bare NIB, such as "PT50 0033 0000 5013 1901 2290 5"
    /// or "0033.0000.5013.1901.2290.5", and checks its NIB check digits.
    pub fn parse(&self, raw: &str) -> AccountRecord {
        let record = self.parse_record(raw);

        match record.failure() {
            Some(failure) => {
                if let Some(counter) = self.metrics.rejected(failure) {
                    counter.increment(1);
                }
            }
            None => {
                self.metrics.parsed(record.kind()).increment(1);
                if !record.nib().is_empty() && !record.is_valid_crc() {
                    self.metrics.check_digit_mismatches.increment(1);
                }
            }
        }
        record
    }

    /// Parses every input independently, in parallel. Results keep the order of `inputs`.
    pub fn parse_batch(&self, inputs: &[&str]) -> Vec<AccountRecord> {
        inputs.par_iter().map(|raw| self.parse(raw)).collect()
    }

    fn parse_record(&self, raw: &str) -> AccountRecord {
        let normalized = normalize(raw);

        let mut country_code = String::new();
        let mut digits = String::new();
        let mut clutter = String::new();
        let mut invalid_character = None;
        for (position, character) in normalized.chars().enumerate() {
            match character {
                '0'..='9' => digits.push(character),
                'A'..='Z' if digits.is_empty() => country_code.push(character),
                'A'..='Z' => clutter.push(character),
                _ if invalid_character.is_none() => {
                    invalid_character = Some(AccountError::InvalidCharacter {
                        character,
                        position,
                    });
                }
                _ => {}
            }
        }

        if let Some(error) = invalid_character {
            return AccountRecord::failed(error, clutter);
        }
        if !clutter.is_empty() {
            return AccountRecord::failed(MalformedReason::Clutter(clutter.clone()).into(), clutter);
        }
        let account_number = format!("{country_code}{digits}");
        if account_number.len() < NIB_LENGTH {
            let error = AccountError::TooShort {
                len: account_number.len(),
                min: NIB_LENGTH,
            };
            return AccountRecord::failed(error, clutter);
        }

        let (kind, nib) = if self.registry.has_country_code(&country_code) {
            // skip the country code and the IBAN check digits
            (AccountKind::Iban, account_number[PREFIX_LENGTH..].to_string())
        } else if country_code.is_empty() {
            (AccountKind::BareNib, digits)
        } else {
            (AccountKind::Unrecognized, digits)
        };
        let valid_crc = is_valid_nib(&nib);
        AccountRecord::parsed(account_number, kind, nib, valid_crc)
    }

    /// Checks the NIB check digits of a bare 21-digit NIB, or of a 25-character
    /// IBAN whose prefix is in the registry. Only surrounding whitespace is ignored.
    pub fn verify_check_digit(&self, raw: &str) -> CheckDigitVerdict {
        let input = raw.trim();
        let len = input.chars().count();

        let is_bare_nib = len == NIB_LENGTH;
        let nib = if is_bare_nib {
            input
        } else if len == PT_IBAN_LENGTH
            && input
                .get(..PREFIX_LENGTH)
                .is_some_and(|prefix| self.registry.is_valid_prefix(prefix))
        {
            &input[PREFIX_LENGTH..]
        } else {
            return CheckDigitVerdict::default();
        };

        let payload: String = nib.chars().take(NIB_PAYLOAD_LENGTH).collect();
        let check_digits: String = nib.chars().skip(NIB_PAYLOAD_LENGTH).collect();
        match compute_nib_check_digit(&payload) {
            Ok(computed) => CheckDigitVerdict {
                is_valid: computed.check_digits() == check_digits,
                is_bare_nib,
                check_digits: computed.check_digits().to_string(),
            },
            Err(_) => CheckDigitVerdict {
                is_valid: false,
                is_bare_nib,
                check_digits: String::new(),
            },
        }
    }

    /// The mod-97 residue of an IBAN whose prefix is in the registry.
    pub fn check_iban(&self, iban: &str) -> Result<u32, AccountError> {
        let len = iban.chars().count();
        if len < SHORTEST_IBAN_LENGTH {
            return Err(AccountError::TooShort {
                len,
                min: SHORTEST_IBAN_LENGTH,
            });
        }
        match iban.get(..PREFIX_LENGTH) {
            Some(prefix) if self.registry.is_valid_prefix(prefix) => {
                Ok(compute_iban_modulus(iban)?.modulus())
            }
            _ => Err(AccountError::UnrecognizedPrefix(
                iban.chars().take(PREFIX_LENGTH).collect(),
            )),
        }
    }

    /// Same as [AccountParser::check_iban], except that a too-short IBAN or an
    /// unknown prefix gives -1. A valid IBAN gives 1.
    pub fn validate_iban(&self, iban: &str) -> Result<i32, AccountError> {
        match self.check_iban(iban) {
            Ok(modulus) => Ok(modulus as i32),
            Err(AccountError::TooShort { .. } | AccountError::UnrecognizedPrefix(_)) => Ok(-1),
            Err(err) => Err(err),
        }
    }
}

/// Parses `raw` with the default registry, see [AccountParser::parse].
pub fn parse_account(raw: &str) -> AccountRecord {
    DEFAULT_PARSER.parse(raw)
}

/// See [AccountParser::verify_check_digit].
pub fn verify_check_digit(raw: &str) -> CheckDigitVerdict {
    DEFAULT_PARSER.verify_check_digit(raw)
}

/// See [AccountParser::validate_iban].
pub fn validate_iban(iban: &str) -> Result<i32, AccountError> {
    DEFAULT_PARSER.validate_iban(iban)
}
