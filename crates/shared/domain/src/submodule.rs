//! Module and submodule identifiers.
//!
//! A submodule code is a dotted, upper-case identifier such as `CRM.SEGMENTS`. Its first
//! segment conventionally names the parent [`ModuleCode`].

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Coarse product area a submodule belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ModuleCode {
    Crm,
    Orders,
    Warehouse,
    Quotes,
    Catalog,
    Reports,
    Measurements,
}

/// Globally unique submodule identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmoduleCode(String);

impl SubmoduleCode {
    /// Wraps a code without validating it; see [`SubmoduleCode::is_well_formed`].
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// At least two non-empty segments of `[A-Z0-9_]`, separated by single dots.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let mut segments = 0usize;
        for segment in self.0.split('.') {
            if segment.is_empty()
                || !segment.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
            {
                return false;
            }
            segments += 1;
        }
        segments >= 2
    }

    /// The first dotted segment (`CRM` for `CRM.SEGMENTS`).
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.0.split_once('.').map_or(self.0.as_str(), |(prefix, _)| prefix)
    }
}

impl fmt::Display for SubmoduleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubmoduleCode {
    fn from(code: &str) -> Self {
        Self(code.to_owned())
    }
}

impl From<String> for SubmoduleCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl Borrow<str> for SubmoduleCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SubmoduleCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn well_formed_codes() {
        assert!(SubmoduleCode::from("CRM.SEGMENTS").is_well_formed());
        assert!(SubmoduleCode::from("WAREHOUSE.MULTI_SITE.BINS").is_well_formed());
        assert!(SubmoduleCode::from("REPORTS.V2").is_well_formed());

        assert!(!SubmoduleCode::from("CRM").is_well_formed());
        assert!(!SubmoduleCode::from("crm.segments").is_well_formed());
        assert!(!SubmoduleCode::from("CRM..SEGMENTS").is_well_formed());
        assert!(!SubmoduleCode::from(".CRM").is_well_formed());
        assert!(!SubmoduleCode::from("").is_well_formed());
    }

    #[test]
    fn prefix_is_first_segment() {
        assert_eq!(SubmoduleCode::from("CRM.SEGMENTS").prefix(), "CRM");
        assert_eq!(SubmoduleCode::from("CRM").prefix(), "CRM");
    }

    #[test]
    fn module_codes_parse_case_insensitively() {
        assert_eq!(ModuleCode::from_str("crm"), Ok(ModuleCode::Crm));
        assert_eq!(ModuleCode::from_str("WAREHOUSE"), Ok(ModuleCode::Warehouse));
        assert_eq!(ModuleCode::Measurements.to_string(), "MEASUREMENTS");
    }
}
