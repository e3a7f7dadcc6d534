//! Built-in submodule definitions shipped with the platform.

use super::{Catalog, CatalogEntry, Category, LocalizedText, Money};
use crate::error::EntitlementError;
use bizhub_domain::submodule::ModuleCode;

const CURRENCY: &str = "EUR";

fn included(code: &str, module: ModuleCode, name: LocalizedText) -> CatalogEntry {
    CatalogEntry::new(code, module, name, Category::Included)
}

fn addon(code: &str, module: ModuleCode, name: LocalizedText, cents: u64) -> CatalogEntry {
    CatalogEntry::new(code, module, name, Category::Addon).price(Money::new(cents, CURRENCY))
}

fn text(en: &str, uk: &str) -> LocalizedText {
    LocalizedText::new(en).with("uk", uk)
}

impl Catalog {
    /// The catalog used when no catalog file is configured.
    ///
    /// # Errors
    /// Never fails for the shipped definitions; the signature mirrors [`Catalog::from_json`].
    pub fn standard() -> Result<Self, EntitlementError> {
        use ModuleCode::{Catalog as Products, Crm, Measurements, Orders, Quotes, Reports, Warehouse};

        Self::builder()
            // CRM
            .entry(
                included("CRM.CONTACTS", Crm, text("Contacts", "Контакти"))
                    .description("Companies, people and their history")
                    .default_enabled()
                    .features(["Contact cards", "Activity timeline"]),
            )
            .entry(
                included("CRM.SEGMENTS", Crm, text("Segments", "Сегменти"))
                    .description("Rule-based customer segments")
                    .features(["Dynamic segments", "Segment filters"]),
            )
            .entry(
                addon("CRM.EXPORT", Crm, text("Segment export", "Експорт сегментів"), 1_500)
                    .description("Export segments to CSV and mailing tools")
                    .requires(["CRM.SEGMENTS"])
                    .features(["CSV export", "Scheduled exports"]),
            )
            .entry(
                addon("CRM.LOYALTY", Crm, text("Loyalty program", "Програма лояльності"), 2_900)
                    .requires(["CRM.CONTACTS"])
                    .beta()
                    .features(["Points", "Tiers"]),
            )
            // Orders
            .entry(
                included("ORDERS.CORE", Orders, text("Orders", "Замовлення"))
                    .default_enabled()
                    .requires(["CRM.CONTACTS"])
                    .features(["Order entry", "Status workflow"]),
            )
            .entry(
                addon("ORDERS.RECURRING", Orders, text("Recurring orders", "Регулярні замовлення"), 1_900)
                    .requires(["ORDERS.CORE"])
                    .features(["Subscriptions", "Automatic reorders"]),
            )
            .entry(
                addon("ORDERS.DROPSHIP", Orders, text("Drop shipping", "Дропшипінг"), 2_500)
                    .description("Suppliers ship directly to customers")
                    .requires(["ORDERS.CORE"])
                    .conflicts(["WAREHOUSE.RESERVATIONS"]),
            )
            // Warehouse
            .entry(
                included("WAREHOUSE.STOCK", Warehouse, text("Stock", "Залишки"))
                    .default_enabled()
                    .features(["Stock levels", "Movements"]),
            )
            .entry(
                addon("WAREHOUSE.MULTI_SITE", Warehouse, text("Multiple sites", "Кілька складів"), 3_900)
                    .requires(["WAREHOUSE.STOCK"])
                    .features(["Transfers between sites"]),
            )
            .entry(
                addon("WAREHOUSE.RESERVATIONS", Warehouse, text("Stock reservations", "Резервування"), 1_200)
                    .requires(["WAREHOUSE.STOCK", "ORDERS.CORE"])
                    .conflicts(["ORDERS.DROPSHIP"]),
            )
            // Quotes
            .entry(
                included("QUOTES.CORE", Quotes, text("Quotes", "Комерційні пропозиції"))
                    .requires(["CRM.CONTACTS"]),
            )
            .entry(
                addon("QUOTES.PDF_TEMPLATES", Quotes, text("PDF templates", "PDF-шаблони"), 900)
                    .requires(["QUOTES.CORE"]),
            )
            .entry(
                addon("QUOTES.E_SIGNATURE", Quotes, text("E-signature", "Електронний підпис"), 2_000)
                    .requires(["QUOTES.CORE"])
                    .beta(),
            )
            // Catalog
            .entry(
                included("CATALOG.PRODUCTS", Products, text("Products", "Товари"))
                    .default_enabled()
                    .features(["Product cards", "Variants"]),
            )
            .entry(
                addon("CATALOG.PRICE_LISTS", Products, text("Price lists", "Прайс-листи"), 1_000)
                    .requires(["CATALOG.PRODUCTS"]),
            )
            // Reports
            .entry(included("REPORTS.BASIC", Reports, text("Reports", "Звіти")).default_enabled())
            .entry(
                addon("REPORTS.ADVANCED", Reports, text("Advanced reports", "Розширені звіти"), 2_400)
                    .requires(["REPORTS.BASIC"])
                    .features(["Custom dashboards", "Scheduled delivery"]),
            )
            .entry(included("REPORTS.LEGACY", Reports, text("Legacy reports", "Старі звіти")).inactive())
            // Measurements
            .entry(
                addon("MEASUREMENTS.SCHEDULING", Measurements, text("Measurement visits", "Заміри"), 1_800)
                    .requires(["CRM.CONTACTS"]),
            )
            .entry(
                addon(
                    "MEASUREMENTS.ROUTE_PLANNING",
                    Measurements,
                    text("Route planning", "Планування маршрутів"),
                    2_200,
                )
                .requires(["MEASUREMENTS.SCHEDULING"])
                .beta(),
            )
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_is_valid() {
        let catalog = Catalog::standard().unwrap();

        assert!(catalog.get("CRM.SEGMENTS").is_some_and(|e| e.required_submodules.is_empty()));
        assert!(catalog.get("CRM.EXPORT").is_some_and(|e| e.required_submodules.contains("CRM.SEGMENTS")));
        assert!(catalog.get("REPORTS.LEGACY").is_some_and(|e| !e.is_active));
        assert!(catalog.defaults().all(|e| e.category == Category::Included));
        assert!(catalog.pricing().iter().all(|p| p.price.currency == CURRENCY));
    }
}
