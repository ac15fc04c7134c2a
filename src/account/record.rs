use crate::error::AccountError;
use serde::Serialize;
use strum::IntoStaticStr;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AccountKind {
    /// A country code from the registry, its check digits and a NIB
    Iban,
    /// Digits only
    #[strum(serialize = "nib")]
    BareNib,
    /// Anything else, including inputs that failed to parse
    Unrecognized,
}

/// The outcome of parsing one account identifier.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct AccountRecord {
    account_number: String,
    kind: AccountKind,
    nib: String,
    valid_nib: bool,
    valid_crc: bool,
    clutter: String,
    #[serde(skip)]
    failure: Option<AccountError>,
}

impl AccountRecord {
    pub(crate) fn parsed(
        account_number: String,
        kind: AccountKind,
        nib: String,
        valid_crc: bool,
    ) -> Self {
        AccountRecord {
            account_number,
            kind,
            nib,
            valid_nib: kind != AccountKind::Unrecognized,
            valid_crc,
            clutter: String::new(),
            failure: None,
        }
    }

    pub(crate) fn failed(failure: AccountError, clutter: String) -> Self {
        AccountRecord {
            account_number: String::new(),
            kind: AccountKind::Unrecognized,
            nib: String::new(),
            valid_nib: false,
            valid_crc: false,
            clutter,
            failure: Some(failure),
        }
    }

    /// Country code followed by all the digits, e.g. "PT50003300005013190122905".
    /// Empty when parsing failed.
    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    /// The NIB part of the account number. Empty when there is none.
    pub fn nib(&self) -> &str {
        &self.nib
    }

    /// Whether the input has the shape of a Portuguese NIB or IBAN
    pub fn is_valid_nib(&self) -> bool {
        self.valid_nib
    }

    /// Whether the NIB check digits are correct
    pub fn is_valid_crc(&self) -> bool {
        self.valid_crc
    }

    /// Letters that appeared after the first digit
    pub fn clutter(&self) -> &str {
        &self.clutter
    }

    pub fn failure(&self) -> Option<&AccountError> {
        self.failure.as_ref()
    }

    pub fn all_valid(&self) -> bool {
        self.valid_nib && self.valid_crc
    }

    /// The NIB grouped as bank, branch, account and check digits
    /// ("0033 0000 50131901229 05"). Empty unless [Self::all_valid].
    pub fn readable_nib(&self) -> String {
        if !self.all_valid() {
            return String::new();
        }
        let nib = &self.nib;
        format!("{} {} {} {}", &nib[..4], &nib[4..8], &nib[8..19], &nib[19..])
    }
}

/// Outcome of [crate::verify_check_digit].
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckDigitVerdict {
    pub is_valid: bool,
    /// The input was a bare 21-digit NIB rather than an IBAN
    pub is_bare_nib: bool,
    /// The computed check digits, empty when they could not be computed
    pub check_digits: String,
}
