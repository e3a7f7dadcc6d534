use bizhub_domain::submodule::{ModuleCode, SubmoduleCode};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Whether a submodule ships with the module or is sold on top of it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub enum Category {
    Included,
    Addon,
}

/// A price in minor currency units (cents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct Money {
    pub amount_minor: u64,
    /// ISO 4217 code, e.g. `EUR`.
    pub currency: String,
}

impl Money {
    pub fn new(amount_minor: u64, currency: impl Into<String>) -> Self {
        Self { amount_minor, currency: currency.into() }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02} {}", self.amount_minor / 100, self.amount_minor % 100, self.currency)
    }
}

/// Display text with optional per-locale variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct LocalizedText {
    pub text: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub localized: BTreeMap<String, String>,
}

impl LocalizedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), localized: BTreeMap::new() }
    }

    #[must_use]
    pub fn with(mut self, locale: impl Into<String>, text: impl Into<String>) -> Self {
        self.localized.insert(locale.into(), text.into());
        self
    }

    /// Text for `locale`, falling back to the default text.
    #[must_use]
    pub fn resolve(&self, locale: &str) -> &str {
        self.localized.get(locale).map_or(self.text.as_str(), String::as_str)
    }
}

impl From<&str> for LocalizedText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// One submodule definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct CatalogEntry {
    #[cfg_attr(feature = "server", schema(value_type = String, example = "CRM.SEGMENTS"))]
    pub code: SubmoduleCode,
    #[cfg_attr(feature = "server", schema(value_type = String, example = "CRM"))]
    pub module: ModuleCode,
    pub name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub is_beta: bool,
    #[serde(default)]
    pub default_enabled: bool,
    #[serde(default)]
    #[cfg_attr(feature = "server", schema(value_type = Vec<String>))]
    pub required_submodules: BTreeSet<SubmoduleCode>,
    #[serde(default)]
    #[cfg_attr(feature = "server", schema(value_type = Vec<String>))]
    pub conflicts_with: BTreeSet<SubmoduleCode>,
    #[serde(default)]
    pub features: Vec<String>,
}

const fn default_active() -> bool {
    true
}

impl CatalogEntry {
    /// Starts an active, non-default entry with no relationships.
    pub fn new(
        code: impl Into<SubmoduleCode>,
        module: ModuleCode,
        name: impl Into<LocalizedText>,
        category: Category,
    ) -> Self {
        Self {
            code: code.into(),
            module,
            name: name.into(),
            description: LocalizedText::default(),
            category,
            price: None,
            is_active: true,
            is_beta: false,
            default_enabled: false,
            required_submodules: BTreeSet::new(),
            conflicts_with: BTreeSet::new(),
            features: Vec::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<LocalizedText>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn price(mut self, price: Money) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub const fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    #[must_use]
    pub const fn beta(mut self) -> Self {
        self.is_beta = true;
        self
    }

    #[must_use]
    pub const fn default_enabled(mut self) -> Self {
        self.default_enabled = true;
        self
    }

    #[must_use]
    pub fn requires<I, C>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<SubmoduleCode>,
    {
        self.required_submodules.extend(codes.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn conflicts<I, C>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<SubmoduleCode>,
    {
        self.conflicts_with.extend(codes.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features.extend(features.into_iter().map(Into::into));
        self
    }

    /// Purchasable: an active addon with a price.
    #[must_use]
    pub const fn is_for_sale(&self) -> bool {
        matches!(self.category, Category::Addon) && self.is_active && self.price.is_some()
    }
}

/// Price-sheet projection of a purchasable addon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct PricingEntry {
    #[cfg_attr(feature = "server", schema(value_type = String))]
    pub code: SubmoduleCode,
    #[cfg_attr(feature = "server", schema(value_type = String))]
    pub module: ModuleCode,
    pub name: LocalizedText,
    pub description: LocalizedText,
    pub price: Money,
    pub features: Vec<String>,
    pub is_beta: bool,
}

impl PricingEntry {
    pub(crate) fn project(entry: &CatalogEntry) -> Option<Self> {
        let price = entry.price.clone().filter(|_| entry.is_for_sale())?;
        Some(Self {
            code: entry.code.clone(),
            module: entry.module,
            name: entry.name.clone(),
            description: entry.description.clone(),
            price,
            features: entry.features.clone(),
            is_beta: entry.is_beta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localized_text_falls_back() {
        let text = LocalizedText::new("Segments").with("uk", "Сегменти");
        assert_eq!(text.resolve("uk"), "Сегменти");
        assert_eq!(text.resolve("de"), "Segments");
    }

    #[test]
    fn money_display() {
        assert_eq!(Money::new(1905, "EUR").to_string(), "19.05 EUR");
    }

    #[test]
    fn entry_json_defaults() {
        let entry: CatalogEntry = serde_json::from_str(
            r#"{ "code": "CRM.EXPORT", "module": "CRM", "name": { "text": "Export" },
                 "category": "ADDON", "requiredSubmodules": ["CRM.SEGMENTS"] }"#,
        )
        .unwrap();

        assert!(entry.is_active);
        assert!(!entry.default_enabled);
        assert!(entry.required_submodules.contains("CRM.SEGMENTS"));
        assert!(!entry.is_for_sale());
    }

    #[test]
    fn only_priced_active_addons_project() {
        let addon = CatalogEntry::new("CRM.EXPORT", ModuleCode::Crm, "Export", Category::Addon)
            .price(Money::new(900, "EUR"));
        assert!(PricingEntry::project(&addon).is_some());
        assert!(PricingEntry::project(&addon.clone().inactive()).is_none());

        let included = CatalogEntry::new("CRM.CORE", ModuleCode::Crm, "Core", Category::Included);
        assert!(PricingEntry::project(&included).is_none());
    }
}
