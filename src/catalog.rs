//! # Catalog Module
//!
//! The café's orderable items and prices, loaded once from configuration
//! and read-only for the process lifetime.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// A single orderable item with its price in whole currency units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub price: u32,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, price: u32) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    /// Keyboard label for this entry. The label is also accepted back from
    /// the user as an item selection, so it must stay stable.
    pub fn label(&self) -> String {
        format!("{} — {}₽", self.name, self.price)
    }
}

/// Ordered collection of menu entries. Iteration order is the order the
/// entries appeared in the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn items(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the price of an item by display name. Matches exactly first,
    /// then case-insensitively.
    pub fn price_of(&self, name: &str) -> Result<u32, CatalogError> {
        if let Some(entry) = self.entries.iter().find(|e| e.name == name) {
            return Ok(entry.price);
        }
        let lowered = name.to_lowercase();
        self.entries
            .iter()
            .find(|e| e.name.to_lowercase() == lowered)
            .map(|e| e.price)
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }
}

// The menu is a JSON object of name → price. A plain map type would lose the
// document order, so the catalog deserializes itself entry by entry.
impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = Catalog;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of item name to price")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Catalog, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::new();
                while let Some((name, price)) = map.next_entry::<String, u32>()? {
                    entries.push(CatalogEntry { name, price });
                }
                Ok(Catalog { entries })
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}

/// Custom error type for catalog lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The requested item is not on the menu
    NotFound(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::NotFound(name) => write!(f, "Item not found in catalog: {name}"),
        }
    }
}

impl std::error::Error for CatalogError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::from_entries(vec![
            CatalogEntry::new("Эспрессо", 150),
            CatalogEntry::new("Капучино", 200),
        ])
    }

    #[test]
    fn test_price_lookup() {
        let catalog = sample();
        assert_eq!(catalog.price_of("Эспрессо").unwrap(), 150);
        assert_eq!(catalog.price_of("капучино").unwrap(), 200);
        assert_eq!(
            catalog.price_of("Борщ"),
            Err(CatalogError::NotFound("Борщ".to_string()))
        );
    }

    #[test]
    fn test_label_format() {
        let entry = CatalogEntry::new("Латте", 250);
        assert_eq!(entry.label(), "Латте — 250₽");
    }

    #[test]
    fn test_json_order_is_preserved() {
        let json = r#"{"Чай": 120, "Латте": 250, "Эспрессо": 150}"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = catalog.items().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Чай", "Латте", "Эспрессо"]);
    }
}
