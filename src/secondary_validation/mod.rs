mod iban_checksum;
mod nib_checksum;

pub use crate::secondary_validation::iban_checksum::{
    complete_rearranged, compute_iban_check_digits, compute_iban_modulus, rearranged_to_iban,
    Iban, IbanChecksum, IbanModulus, MAX_IBAN_LENGTH, SHORTEST_IBAN_LENGTH,
};
pub use crate::secondary_validation::nib_checksum::{
    compute_nib_check_digit, is_valid_nib, NibCheckDigit, NibChecksum, NIB_LENGTH,
    NIB_PAYLOAD_LENGTH,
};

/// A check that can be run over a loosely formatted match (separators, spacing).
pub trait Validator: Send + Sync {
    fn is_valid_match(&self, regex_match: &str) -> bool;
}
