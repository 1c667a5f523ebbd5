//! Product catalog: the owned set of products every other layer refers to by name.
//!
//! Rows enter through [`ProductRow`], are validated by [`Product::from_row`], and
//! are kept in row order with an O(1) name index.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Result type for catalog operations.
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// The sourcing channel of a product.
///
/// Free-form label, except for [`Source::FACTORY`]: bulk raw material that is
/// left out of profit accounting but counted in factory demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Source(String);

impl Source {
    /// Reserved label for bulk-purchasable raw material.
    pub const FACTORY: &'static str = "factory";

    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this source equals the given reserved label.
    pub fn is(&self, label: &str) -> bool {
        self.0 == label
    }

    pub fn is_factory(&self) -> bool {
        self.is(Self::FACTORY)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Source {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// A products-table row as it arrives from a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    pub name: String,
    pub price: i64,
    pub duration: f64,
    pub source: String,
}

/// A validated catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    /// Unique key.
    pub name: String,
    /// Sale price.
    pub price: i64,
    /// Production time for one unit.
    pub duration: f64,
    pub source: Source,
}

impl Product {
    /// Validate a row and build a product from it.
    pub fn from_row(row: ProductRow) -> CatalogResult<Self> {
        let invalid = |message: &str| CatalogError::InvalidRow {
            name: row.name.clone(),
            message: message.into(),
        };
        if row.name.trim().is_empty() {
            return Err(invalid("name is empty"));
        }
        if row.source.trim().is_empty() {
            return Err(invalid("source is empty"));
        }
        if !row.duration.is_finite() || row.duration < 0.0 {
            return Err(invalid("duration must be finite and non-negative"));
        }
        Ok(Self {
            name: row.name,
            price: row.price,
            duration: row.duration,
            source: Source(row.source),
        })
    }

    /// Turn the product back into the row it was loaded from.
    pub fn to_row(&self) -> ProductRow {
        ProductRow {
            name: self.name.clone(),
            price: self.price,
            duration: self.duration,
            source: self.source.0.clone(),
        }
    }
}

/// All products of an economy, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from product rows. Names must be unique.
    pub fn load(rows: impl IntoIterator<Item = ProductRow>) -> CatalogResult<Self> {
        let mut catalog = Self::default();
        for row in rows {
            let product = Product::from_row(row)?;
            if catalog.index.contains_key(&product.name) {
                return Err(CatalogError::DuplicateKey { name: product.name });
            }
            catalog
                .index
                .insert(product.name.clone(), catalog.products.len());
            catalog.products.push(product);
        }
        tracing::info!(products = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Option<&Product> {
        self.index.get(name).map(|&i| &self.products[i])
    }

    /// Like [`Catalog::get`], failing with `UnknownProduct` when absent.
    pub fn require(&self, name: &str) -> CatalogResult<&Product> {
        self.get(name).ok_or_else(|| CatalogError::UnknownProduct { name: name.into() })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Products in row order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Serialize back to rows, in load order.
    pub fn to_rows(&self) -> Vec<ProductRow> {
        self.products.iter().map(Product::to_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, price: i64, duration: f64, source: &str) -> ProductRow {
        ProductRow {
            name: name.into(),
            price,
            duration,
            source: source.into(),
        }
    }

    #[test]
    fn row_round_trip_is_exact() {
        let original = row("lawn mower", 1_234_567, 0.1 + 0.2, "hardware");
        let product = Product::from_row(original.clone()).unwrap();
        let back = product.to_row();
        assert_eq!(back, original);
        assert_eq!(back.duration.to_bits(), original.duration.to_bits());
        assert_eq!(back.price, 1_234_567);
    }

    #[test]
    fn load_indexes_by_name_in_row_order() {
        let catalog = Catalog::load(vec![
            row("sugar", 1, 0.0, "factory"),
            row("donuts", 30, 2.5, "bakery"),
        ])
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("donuts").unwrap().price, 30);
        assert!(catalog.get("bagels").is_none());
        let names: Vec<_> = catalog.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["sugar", "donuts"]);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let err = Catalog::load(vec![
            row("sugar", 1, 0.0, "factory"),
            row("sugar", 2, 0.0, "factory"),
        ])
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateKey { name } if name == "sugar"));
    }

    #[test]
    fn invalid_rows_are_rejected() {
        assert!(Product::from_row(row("", 1, 1.0, "x")).is_err());
        assert!(Product::from_row(row("a", 1, 1.0, " ")).is_err());
        assert!(Product::from_row(row("a", 1, -1.0, "x")).is_err());
        assert!(Product::from_row(row("a", 1, f64::NAN, "x")).is_err());
    }

    #[test]
    fn require_reports_unknown_product() {
        let catalog = Catalog::load(vec![row("sugar", 1, 0.0, "factory")]).unwrap();
        assert!(catalog.require("sugar").is_ok());
        assert!(matches!(
            catalog.require("salt"),
            Err(CatalogError::UnknownProduct { .. })
        ));
    }

    #[test]
    fn factory_source_is_recognized() {
        assert!(Source::new("factory").is_factory());
        assert!(!Source::new("Factory").is_factory());
        assert!(Source::new("farm").is("farm"));
    }

    #[test]
    fn to_rows_reproduces_input() {
        let rows = vec![
            row("sugar", 1, 0.0, "factory"),
            row("couch", 500, 12.75, "furniture"),
        ];
        let catalog = Catalog::load(rows.clone()).unwrap();
        assert_eq!(catalog.to_rows(), rows);
    }
}
