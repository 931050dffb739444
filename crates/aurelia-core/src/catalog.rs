//! The antiques catalog: immutable reference data for the storefront.
//!
//! A built-in collection ships with the library. A TOML file with `[[items]]`
//! tables can replace it via `[catalog] path` in the config.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A single piece offered by the shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    /// Currency-agnostic asking price
    pub price: f64,
    pub category: String,
    pub era: String,
    pub description: String,
    /// Provenance notes, fed to the curator as context
    pub history: String,
    /// Image URL or path
    pub image: String,
    #[serde(default)]
    pub sold: bool,
}

/// An ordered, read-only collection of catalog items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate or empty ids and negative prices.
    pub fn new(items: Vec<CatalogItem>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for item in &items {
            if item.id.trim().is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "item '{}' has an empty id",
                    item.name
                )));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate item id '{}'",
                    item.id
                )));
            }
            if !(item.price >= 0.0) {
                return Err(CatalogError::Invalid(format!(
                    "item '{}' has an invalid price {}",
                    item.id, item.price
                )));
            }
        }
        Ok(Self { items })
    }

    /// Load a catalog from a TOML file containing `[[items]]` tables.
    pub fn load_from(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog: Catalog = toml::from_str(&content).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded {} catalog items from {}", catalog.len(), path.display());
        Self::new(catalog.items)
    }

    /// The collection the shop ships with.
    pub fn builtin() -> Self {
        Self {
            items: builtin_items(),
        }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn find(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[allow(clippy::too_many_arguments)]
fn item(
    id: &str,
    name: &str,
    price: f64,
    category: &str,
    era: &str,
    description: &str,
    history: &str,
    image: &str,
) -> CatalogItem {
    CatalogItem {
        id: id.to_string(),
        name: name.to_string(),
        price,
        category: category.to_string(),
        era: era.to_string(),
        description: description.to_string(),
        history: history.to_string(),
        image: image.to_string(),
        sold: false,
    }
}

fn builtin_items() -> Vec<CatalogItem> {
    vec![
        item(
            "1",
            "Victorian Mantel Clock",
            420.0,
            "Clocks",
            "1880s",
            "Black slate mantel clock with malachite inlay columns and an eight-day \
             movement striking on a gong.",
            "Made in the Marti workshops for the English market, this clock stood in a \
             Yorkshire vicarage until the 1960s. The movement was serviced in 2019.",
            "https://images.aurelia.example/items/victorian-mantel-clock.jpg",
        ),
        item(
            "2",
            "Georgian Mahogany Writing Desk",
            3800.0,
            "Furniture",
            "1790s",
            "Cuban mahogany kneehole desk with original brass swan-neck handles and a \
             tooled leather writing surface.",
            "Attributed to a London cabinetmaker in the circle of Gillows. Passed through \
             three generations of a Bath legal family before its first sale in 1978.",
            "https://images.aurelia.example/items/georgian-writing-desk.jpg",
        ),
        item(
            "3",
            "Art Nouveau Silver Hand Mirror",
            650.0,
            "Silver",
            "1900s",
            "Sterling silver hand mirror with a repousse maiden and poppy motif, \
             Birmingham hallmarks.",
            "Acquired from the estate of a Parisian milliner whose shop on Rue de la Paix \
             supplied the Belle Epoque stage.",
            "https://images.aurelia.example/items/art-nouveau-mirror.jpg",
        ),
        item(
            "4",
            "Ming-Style Blue and White Vase",
            1250.0,
            "Ceramics",
            "Late 19th century",
            "Baluster vase painted in cobalt with scrolling lotus, bearing an apocryphal \
             Xuande mark.",
            "A Qing-period homage to Ming wares, brought to Boston by a China trade merchant \
             and recorded in a family inventory of 1902.",
            "https://images.aurelia.example/items/blue-white-vase.jpg",
        ),
        item(
            "5",
            "Edwardian Brass Telescope",
            890.0,
            "Scientific Instruments",
            "1905",
            "Three-draw brass telescope with leather-wrapped barrel and original lens caps, \
             signed by a Liverpool optician.",
            "Carried aboard a merchant steamer on the Liverpool to Valparaiso route; the \
             captain's initials are scratched into the eyepiece collar.",
            "https://images.aurelia.example/items/brass-telescope.jpg",
        ),
        item(
            "6",
            "Persian Tabriz Rug",
            5200.0,
            "Textiles",
            "1920s",
            "Hand-knotted wool rug with a central medallion on an ivory field, roughly \
             nine by twelve feet.",
            "Woven in a Tabriz workshop for export and purchased in Istanbul in 1931 by a \
             diplomat who kept it in his Geneva residence.",
            "https://images.aurelia.example/items/tabriz-rug.jpg",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_contains_mantel_clock() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 6);
        let clock = catalog.find("1").unwrap();
        assert_eq!(clock.name, "Victorian Mantel Clock");
        assert_eq!(clock.era, "1880s");
        assert_eq!(clock.price, 420.0);
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        assert!(Catalog::new(builtin_items()).is_ok());
    }

    #[test]
    fn test_find_unknown_id() {
        assert!(Catalog::builtin().find("999").is_none());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut items = builtin_items();
        items[1].id = "1".to_string();
        let err = Catalog::new(items).unwrap_err();
        assert!(err.to_string().contains("duplicate item id '1'"));
    }

    #[test]
    fn test_rejects_negative_price() {
        let mut items = builtin_items();
        items[0].price = -5.0;
        assert!(Catalog::new(items).is_err());
    }

    #[test]
    fn test_load_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(
            &path,
            r#"
[[items]]
id = "lamp-1"
name = "Tiffany-Style Lamp"
price = 975.5
category = "Lighting"
era = "1910s"
description = "Leaded glass dragonfly shade."
history = "From a Long Island summer house."
image = "lamp.jpg"
sold = true
"#,
        )
        .unwrap();

        let catalog = Catalog::load_from(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        let lamp = catalog.find("lamp-1").unwrap();
        assert_eq!(lamp.price, 975.5);
        assert!(lamp.sold);
    }

    #[test]
    fn test_load_from_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(&path, "[[items]]\nid = 3\n").unwrap();

        let err = Catalog::load_from(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = Catalog::load_from(Path::new("/nonexistent/catalog.toml")).unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }
}
