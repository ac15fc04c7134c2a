use crate::account::record::AccountKind;
use crate::error::{AccountError, MalformedReason};
use crate::observability::labels::Labels;
use metrics::{counter, Counter};

const TYPE: &str = "type";
const REASON: &str = "reason";

pub struct ParserMetrics {
    pub parsed_ibans: Counter,
    pub parsed_nibs: Counter,
    pub parsed_unrecognized: Counter,

    pub rejected_too_short: Counter,
    pub rejected_clutter: Counter,
    pub rejected_invalid_character: Counter,

    // a NIB was found but its check digits are wrong
    pub check_digit_mismatches: Counter,
}

impl ParserMetrics {
    pub fn new(labels: &Labels) -> Self {
        ParserMetrics {
            parsed_ibans: counter!("account.parsed", labels.with(TYPE, AccountKind::Iban.into())),
            parsed_nibs: counter!("account.parsed", labels.with(TYPE, AccountKind::BareNib.into())),
            parsed_unrecognized: counter!(
                "account.parsed",
                labels.with(TYPE, AccountKind::Unrecognized.into())
            ),
            rejected_too_short: counter!("account.rejected", labels.with(REASON, "too_short")),
            rejected_clutter: counter!("account.rejected", labels.with(REASON, "clutter")),
            rejected_invalid_character: counter!(
                "account.rejected",
                labels.with(REASON, "invalid_character")
            ),
            check_digit_mismatches: counter!("account.check_digit_mismatch", labels.clone()),
        }
    }

    pub fn parsed(&self, kind: AccountKind) -> &Counter {
        match kind {
            AccountKind::Iban => &self.parsed_ibans,
            AccountKind::BareNib => &self.parsed_nibs,
            AccountKind::Unrecognized => &self.parsed_unrecognized,
        }
    }

    pub fn rejected(&self, error: &AccountError) -> Option<&Counter> {
        match error {
            AccountError::TooShort { .. } => Some(&self.rejected_too_short),
            AccountError::MalformedStructure(MalformedReason::Clutter(_)) => {
                Some(&self.rejected_clutter)
            }
            AccountError::InvalidCharacter { .. } => Some(&self.rejected_invalid_character),
            _ => None,
        }
    }
}
