use crate::error::RegistryError;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

lazy_static! {
    /// The registry used by the free functions of this crate.
    pub static ref DEFAULT_REGISTRY: PrefixRegistry = PrefixRegistry::default();
}

/// Read-only table of the IBAN prefixes (country code + check digits, e.g. "PT50")
/// that are accepted, with the name of their country.
///
/// Deserializes from a map such as `{"PT50": "Portugal"}`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct PrefixRegistry {
    prefixes: BTreeMap<String, String>,
}

fn is_prefix_code(code: &str) -> bool {
    let bytes = code.as_bytes();
    bytes.len() == 4
        && bytes[..2].iter().all(u8::is_ascii_uppercase)
        && bytes[2..].iter().all(u8::is_ascii_digit)
}

/// The letters of a prefix, e.g. "PT" for "PT50"
fn country_code(prefix: &str) -> &str {
    &prefix[..2]
}

impl PrefixRegistry {
    pub fn new(
        entries: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Result<Self, RegistryError> {
        let mut prefixes = BTreeMap::new();
        for (prefix, country) in entries {
            let (prefix, country) = (prefix.into(), country.into());
            if !is_prefix_code(&prefix) {
                return Err(RegistryError::InvalidPrefixCode(prefix));
            }
            if country.trim().is_empty() {
                return Err(RegistryError::EmptyCountryName(prefix));
            }
            prefixes.insert(prefix, country);
        }
        Ok(PrefixRegistry { prefixes })
    }

    pub fn is_valid_prefix(&self, code: &str) -> bool {
        self.prefixes.contains_key(code)
    }

    pub fn country(&self, code: &str) -> Option<&str> {
        self.prefixes.get(code).map(String::as_str)
    }

    /// Whether some prefix starts with the 2-letter `code`
    pub fn has_country_code(&self, code: &str) -> bool {
        self.prefixes.keys().any(|prefix| country_code(prefix) == code)
    }

    /// Finds the prefix of a country, given its name or its 2-letter code
    /// (case-insensitive). `None` when no entry matches, and also when the
    /// match is ambiguous.
    pub fn prefix_for(&self, country_name: &str) -> Option<&str> {
        let name = country_name.trim();
        if name.is_empty() {
            return None;
        }

        let mut candidates = self.prefixes.iter().filter(|(prefix, country)| {
            country.eq_ignore_ascii_case(name) || country_code(prefix).eq_ignore_ascii_case(name)
        });
        match (candidates.next(), candidates.next()) {
            (Some((prefix, _)), None) => Some(prefix.as_str()),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes
            .iter()
            .map(|(prefix, country)| (prefix.as_str(), country.as_str()))
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

impl Default for PrefixRegistry {
    fn default() -> Self {
        PrefixRegistry {
            prefixes: BTreeMap::from([("PT50".to_string(), "Portugal".to_string())]),
        }
    }
}

impl TryFrom<BTreeMap<String, String>> for PrefixRegistry {
    type Error = RegistryError;

    fn try_from(prefixes: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        PrefixRegistry::new(prefixes)
    }
}

impl From<PrefixRegistry> for BTreeMap<String, String> {
    fn from(registry: PrefixRegistry) -> Self {
        registry.prefixes
    }
}

/// Forward lookup in the default registry.
pub fn is_valid_prefix(code: &str) -> bool {
    DEFAULT_REGISTRY.is_valid_prefix(code)
}

/// Reverse lookup in the default registry.
pub fn prefix_for(country_name: &str) -> Option<&'static str> {
    DEFAULT_REGISTRY.prefix_for(country_name)
}
