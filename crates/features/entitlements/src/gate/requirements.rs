use crate::catalog::Catalog;
use crate::error::EntitlementError;
use bizhub_domain::config::RequirementConfig;
use bizhub_domain::submodule::SubmoduleCode;
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A gated application operation, addressed as `group` + `name` (`crm` / `segments.export`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationId {
    pub group: String,
    pub name: String,
}

impl OperationId {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self { group: group.into(), name: name.into() }
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)
    }
}

/// Capability declarations: which submodules an operation needs.
///
/// Lookup order is operation first, then group; an operation entry replaces the group entry
/// rather than adding to it. Operations without either are not gated.
#[derive(Debug, Clone, Default)]
pub struct RequirementTable {
    groups: FxHashMap<String, BTreeSet<SubmoduleCode>>,
    operations: FxHashMap<OperationId, BTreeSet<SubmoduleCode>>,
}

impl RequirementTable {
    #[must_use]
    pub fn builder() -> RequirementTableBuilder {
        RequirementTableBuilder::default()
    }

    /// Builds the table from configuration, rejecting codes the catalog does not define.
    ///
    /// # Errors
    /// Returns [`EntitlementError::Catalog`] naming the first unknown or malformed code.
    pub fn from_config(
        entries: &[RequirementConfig],
        catalog: &Catalog,
    ) -> Result<Self, EntitlementError> {
        let table = entries
            .iter()
            .fold(Self::builder(), |builder, entry| match &entry.operation {
                Some(operation) => builder.operation(
                    OperationId::new(&entry.group, operation),
                    entry.requires.iter().map(String::as_str),
                ),
                None => builder.group(&entry.group, entry.requires.iter().map(String::as_str)),
            })
            .build();

        table.validate(catalog)?;
        Ok(table)
    }

    /// Effective requirement for `operation`, if any is declared.
    #[must_use]
    pub fn required(&self, operation: &OperationId) -> Option<&BTreeSet<SubmoduleCode>> {
        self.operations.get(operation).or_else(|| self.groups.get(operation.group.as_str()))
    }

    /// # Errors
    /// Returns [`EntitlementError::Catalog`] naming the first code missing from `catalog`.
    pub fn validate(&self, catalog: &Catalog) -> Result<(), EntitlementError> {
        let declared = self
            .groups
            .iter()
            .map(|(group, codes)| (group.clone(), codes))
            .chain(self.operations.iter().map(|(op, codes)| (op.to_string(), codes)));

        for (target, codes) in declared {
            if let Some(unknown) = codes.iter().find(|code| !catalog.contains(code.as_str())) {
                return Err(EntitlementError::catalog(format!(
                    "requirement for '{target}' names unknown submodule '{unknown}'"
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len() + self.operations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.operations.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct RequirementTableBuilder {
    table: RequirementTable,
}

impl RequirementTableBuilder {
    /// Declares codes required by every operation of `group`. Repeated calls accumulate.
    #[must_use]
    pub fn group<I, C>(mut self, group: impl Into<String>, codes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<SubmoduleCode>,
    {
        self.table
            .groups
            .entry(group.into())
            .or_default()
            .extend(codes.into_iter().map(Into::into));
        self
    }

    /// Declares codes required by one operation, overriding its group. Repeated calls accumulate.
    #[must_use]
    pub fn operation<I, C>(mut self, operation: OperationId, codes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<SubmoduleCode>,
    {
        self.table
            .operations
            .entry(operation)
            .or_default()
            .extend(codes.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn build(self) -> RequirementTable {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(set: Option<&BTreeSet<SubmoduleCode>>) -> Vec<&str> {
        set.map(|s| s.iter().map(SubmoduleCode::as_str).collect()).unwrap_or_default()
    }

    #[test]
    fn operation_overrides_group() {
        let table = RequirementTable::builder()
            .group("crm", ["CRM.CONTACTS"])
            .operation(OperationId::new("crm", "segments.export"), ["CRM.EXPORT"])
            .build();

        assert_eq!(
            codes(table.required(&OperationId::new("crm", "segments.export"))),
            ["CRM.EXPORT"]
        );
        assert_eq!(codes(table.required(&OperationId::new("crm", "contacts.list"))), ["CRM.CONTACTS"]);
        assert!(table.required(&OperationId::new("orders", "list")).is_none());
    }

    #[test]
    fn config_entries_are_checked_against_the_catalog() {
        let catalog = Catalog::standard().unwrap();
        let entries = [
            RequirementConfig {
                group: "quotes".into(),
                operation: None,
                requires: vec!["QUOTES.CORE".into()],
            },
            RequirementConfig {
                group: "quotes".into(),
                operation: Some("sign".into()),
                requires: vec!["QUOTES.E_SIGNATURE".into()],
            },
        ];
        let table = RequirementTable::from_config(&entries, &catalog).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            codes(table.required(&OperationId::new("quotes", "sign"))),
            ["QUOTES.E_SIGNATURE"]
        );

        let bad = [RequirementConfig {
            group: "quotes".into(),
            operation: None,
            requires: vec!["QUOTES.TELEPATHY".into()],
        }];
        let err = RequirementTable::from_config(&bad, &catalog).unwrap_err();
        assert!(err.to_string().contains("QUOTES.TELEPATHY"), "{err}");
    }
}
