//! # Submodule Catalog
//!
//! The immutable registry of every submodule the platform knows about. It is built once at
//! startup (from the built-in [`Catalog::standard`] definitions or a JSON file), validated as
//! a whole, and then shared by `Arc` with the entitlement service and the gate.
//!
//! Validation rejects catalogs the service could not honour:
//! * malformed or duplicated codes, or a code whose prefix does not name its module;
//! * relationships pointing at unknown codes or at the entry itself;
//! * an entry that both requires and conflicts with the same code;
//! * prices on `INCLUDED` entries;
//! * cycles in the requirement graph;
//! * default-enabled entries that require non-default ones or conflict with each other.

mod entry;
mod standard;

pub use entry::{CatalogEntry, Category, LocalizedText, Money, PricingEntry};

use crate::error::{EntitlementError, EntitlementErrorExt, join};
use bizhub_domain::submodule::{ModuleCode, SubmoduleCode};
use fxhash::FxHashMap;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info};

/// Validated, read-only set of submodule definitions.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: FxHashMap<SubmoduleCode, usize>,
}

impl Catalog {
    #[must_use]
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Parses and validates a JSON array of entries.
    ///
    /// # Errors
    /// Returns [`EntitlementError::Catalog`] for malformed JSON or an inconsistent catalog.
    pub fn from_json(json: &str) -> Result<Self, EntitlementError> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)
            .map_err(|err| EntitlementError::catalog(err.to_string()))?;
        Self::builder().entries(entries).build()
    }

    /// Loads a catalog file.
    ///
    /// # Errors
    /// Returns [`EntitlementError::Catalog`] if the file cannot be read or is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EntitlementError> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading submodule catalog");

        let json = std::fs::read_to_string(path)
            .map_err(|err| EntitlementError::catalog(err.to_string()))
            .context(path.display().to_string())?;
        Self::from_json(&json).context(path.display().to_string())
    }

    /// Every entry, in authoring order.
    #[must_use]
    pub fn all(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn by_module(&self, module: ModuleCode) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(move |entry| entry.module == module)
    }

    #[must_use]
    pub fn get(&self, code: &str) -> Option<&CatalogEntry> {
        self.index.get(code).map(|&i| &self.entries[i])
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    /// Active addons that carry a price.
    pub fn addons(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(|entry| entry.is_for_sale())
    }

    #[must_use]
    pub fn pricing(&self) -> Vec<PricingEntry> {
        self.addons().filter_map(PricingEntry::project).collect()
    }

    /// Active entries every tenant starts with.
    pub fn defaults(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(|entry| entry.default_enabled && entry.is_active)
    }

    /// Entries that list `code` among their requirements.
    pub fn dependents_of<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a CatalogEntry> {
        self.entries.iter().filter(move |entry| entry.required_submodules.contains(code))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects entries and validates them into a [`Catalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    entries: Vec<CatalogEntry>,
}

impl CatalogBuilder {
    #[must_use]
    pub fn entry(mut self, entry: CatalogEntry) -> Self {
        self.entries.push(entry);
        self
    }

    #[must_use]
    pub fn entries(mut self, entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        self.entries.extend(entries);
        self
    }

    /// Validates the collected entries.
    ///
    /// # Errors
    /// Returns [`EntitlementError::Catalog`] describing the first inconsistency found.
    pub fn build(self) -> Result<Catalog, EntitlementError> {
        let mut index = FxHashMap::default();
        for (i, entry) in self.entries.iter().enumerate() {
            check_identity(entry)?;
            if index.insert(entry.code.clone(), i).is_some() {
                return Err(EntitlementError::catalog(format!(
                    "duplicate submodule code '{}'",
                    entry.code
                )));
            }
        }

        let catalog = Catalog { entries: self.entries, index };
        for entry in &catalog.entries {
            check_relations(&catalog, entry)?;
        }
        check_acyclic(&catalog)?;
        check_defaults(&catalog)?;

        debug!(entries = catalog.len(), "Catalog validated");
        Ok(catalog)
    }
}

fn check_identity(entry: &CatalogEntry) -> Result<(), EntitlementError> {
    if !entry.code.is_well_formed() {
        return Err(EntitlementError::catalog(format!("malformed submodule code '{}'", entry.code)));
    }
    let module: &str = entry.module.as_ref();
    if entry.code.prefix() != module {
        return Err(EntitlementError::catalog(format!(
            "'{}' does not belong to module {}",
            entry.code, entry.module
        )));
    }
    if entry.category == Category::Included && entry.price.is_some() {
        return Err(EntitlementError::catalog(format!(
            "included submodule '{}' cannot carry a price",
            entry.code
        )));
    }
    Ok(())
}

fn check_relations(catalog: &Catalog, entry: &CatalogEntry) -> Result<(), EntitlementError> {
    let code = &entry.code;
    for (relation, codes) in
        [("requires", &entry.required_submodules), ("conflicts with", &entry.conflicts_with)]
    {
        if codes.contains(code) {
            return Err(EntitlementError::catalog(format!("'{code}' {relation} itself")));
        }
        if let Some(unknown) = codes.iter().find(|c| !catalog.contains(c.as_str())) {
            return Err(EntitlementError::catalog(format!(
                "'{code}' {relation} unknown submodule '{unknown}'"
            )));
        }
    }

    let both: Vec<_> =
        entry.required_submodules.intersection(&entry.conflicts_with).cloned().collect();
    if !both.is_empty() {
        return Err(EntitlementError::catalog(format!(
            "'{code}' both requires and conflicts with {}",
            join(&both)
        )));
    }

    if let Some(other) = entry.conflicts_with.iter().find(|other| {
        catalog.get(other.as_str()).is_some_and(|o| !o.conflicts_with.contains(code))
    }) {
        return Err(EntitlementError::catalog(format!(
            "'{code}' conflicts with '{other}' but '{other}' does not list '{code}' as a conflict"
        )));
    }
    Ok(())
}

/// Depth-first search over `required_submodules`, reporting the first cycle found.
fn check_acyclic(catalog: &Catalog) -> Result<(), EntitlementError> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        Unvisited,
        Active,
        Done,
    }

    fn visit(
        catalog: &Catalog,
        i: usize,
        marks: &mut [Mark],
        path: &mut Vec<SubmoduleCode>,
    ) -> Result<(), EntitlementError> {
        match marks[i] {
            Mark::Done => return Ok(()),
            Mark::Active => {
                path.push(catalog.entries[i].code.clone());
                return Err(EntitlementError::catalog(format!(
                    "requirement cycle: {}",
                    path.iter().map(SubmoduleCode::as_str).collect::<Vec<_>>().join(" -> ")
                )));
            },
            Mark::Unvisited => {},
        }

        marks[i] = Mark::Active;
        path.push(catalog.entries[i].code.clone());
        for required in &catalog.entries[i].required_submodules {
            if let Some(&next) = catalog.index.get(required) {
                visit(catalog, next, marks, path)?;
            }
        }
        path.pop();
        marks[i] = Mark::Done;
        Ok(())
    }

    let mut marks = vec![Mark::Unvisited; catalog.entries.len()];
    let mut path = Vec::new();
    for i in 0..catalog.entries.len() {
        visit(catalog, i, &mut marks, &mut path)?;
    }
    Ok(())
}

fn check_defaults(catalog: &Catalog) -> Result<(), EntitlementError> {
    let defaults: BTreeSet<&SubmoduleCode> = catalog.defaults().map(|entry| &entry.code).collect();

    for entry in catalog.defaults() {
        if let Some(required) = entry.required_submodules.iter().find(|c| !defaults.contains(c)) {
            return Err(EntitlementError::catalog(format!(
                "default submodule '{}' requires non-default '{required}'",
                entry.code
            )));
        }
    }

    // Defaults are written without the conflict check, so nothing may conflict with them.
    for entry in &catalog.entries {
        if defaults.contains(&entry.code) {
            if let Some(conflict) = entry.conflicts_with.iter().next() {
                return Err(EntitlementError::catalog(format!(
                    "default submodule '{}' conflicts with '{conflict}'",
                    entry.code
                )));
            }
        } else if let Some(default) = entry.conflicts_with.iter().find(|c| defaults.contains(c)) {
            return Err(EntitlementError::catalog(format!(
                "'{}' conflicts with default submodule '{default}'",
                entry.code
            )));
        }
    }
    Ok(())
}
