// This blocks accidental use of `println`. If one is actually needed, you can
// override with `#[allow(clippy::print_stdout)]`.
#![deny(clippy::print_stdout)]

mod account;
mod encoding;
mod error;
mod normalization;
mod observability;
mod registry;
mod secondary_validation;

// This is the public API of the account validation library
pub use account::{
    parse_account, validate_iban, verify_check_digit, AccountKind, AccountParser, AccountRecord,
    CheckDigitVerdict,
};
pub use encoding::{char_value, encode, encoded_mod97};
pub use error::{AccountError, MalformedReason, RegistryError};
pub use normalization::normalize;
pub use observability::labels::Labels;
pub use registry::{is_valid_prefix, prefix_for, PrefixRegistry, DEFAULT_REGISTRY};
pub use secondary_validation::{
    complete_rearranged, compute_iban_check_digits, compute_iban_modulus, compute_nib_check_digit,
    is_valid_nib, rearranged_to_iban, Iban, IbanChecksum, IbanModulus, NibCheckDigit,
    NibChecksum, Validator, MAX_IBAN_LENGTH, NIB_LENGTH, NIB_PAYLOAD_LENGTH, SHORTEST_IBAN_LENGTH,
};
