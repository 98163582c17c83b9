//! In-memory product catalog.
//!
//! The catalog is an ordered sequence with no gaps: positions are always
//! `0..len`, and deleting an element renumbers everything behind it. Callers
//! must tolerate identity reassignment after any delete.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::domain::product::{Product, ProductPatch};

/// Shared handle to the process-wide catalog. Each operation takes the lock
/// once for its whole read-modify-write, so concurrent writers cannot
/// interleave inside an operation.
pub type SharedCatalog = Arc<RwLock<Catalog>>;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("no product at position {index} (catalog holds {len})")]
    OutOfRange { index: i64, len: usize },
}

/// Query filter for [`Catalog::list`]. Both predicates are optional, and an
/// empty string counts as "not supplied".
#[derive(Clone, Debug, Default)]
pub struct ProductFilter {
    /// Case-insensitive exact match on the product category.
    pub category: Option<String>,
    /// Case-insensitive substring match on the product name.
    pub name: Option<String>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = match self.category.as_deref().filter(|value| !value.is_empty()) {
            Some(category) => product.category.to_lowercase() == category.to_lowercase(),
            None => true,
        };
        let name_ok = match self.name.as_deref().filter(|value| !value.is_empty()) {
            Some(name) => product.name.to_lowercase().contains(&name.to_lowercase()),
            None => true,
        };

        category_ok && name_ok
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog preloaded with the three demo records the service ships with.
    pub fn with_demo_data() -> Self {
        Self {
            products: vec![
                Product {
                    name: "Croquetas perro".to_string(),
                    price: 50.0,
                    category: "alimento".to_string(),
                    stock: 20,
                },
                Product {
                    name: "Pelota".to_string(),
                    price: 15.5,
                    category: "juguetes".to_string(),
                    stock: 50,
                },
                Product {
                    name: "Correa".to_string(),
                    price: 25.0,
                    category: "accesorios".to_string(),
                    stock: 15,
                },
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products matching `filter`, in catalog order. No match is an empty
    /// list, not an error.
    pub fn list(&self, filter: &ProductFilter) -> Vec<Product> {
        self.products.iter().filter(|product| filter.matches(product)).cloned().collect()
    }

    pub fn get(&self, index: i64) -> Result<Product, CatalogError> {
        let slot = self.slot(index)?;
        Ok(self.products[slot].clone())
    }

    /// Append `product` and return its position (the length before the append).
    pub fn create(&mut self, product: Product) -> usize {
        self.products.push(product);
        self.products.len() - 1
    }

    /// Overwrite every field of the product at `index`; the position itself
    /// is unchanged.
    pub fn replace(&mut self, index: i64, product: Product) -> Result<Product, CatalogError> {
        let slot = self.slot(index)?;
        self.products[slot] = product;
        Ok(self.products[slot].clone())
    }

    /// Merge the supplied fields of `patch` into the product at `index` and
    /// return the full merged record.
    pub fn apply_patch(&mut self, index: i64, patch: &ProductPatch) -> Result<Product, CatalogError> {
        let slot = self.slot(index)?;
        patch.apply_to(&mut self.products[slot]);
        Ok(self.products[slot].clone())
    }

    /// Remove and return the product at `index`. Every later product shifts
    /// down one position.
    pub fn delete(&mut self, index: i64) -> Result<Product, CatalogError> {
        let slot = self.slot(index)?;
        Ok(self.products.remove(slot))
    }

    // Positions arrive as signed integers straight off the wire; anything
    // outside 0..len is the same out-of-range error, never a parse failure.
    fn slot(&self, index: i64) -> Result<usize, CatalogError> {
        let len = self.products.len();
        usize::try_from(index)
            .ok()
            .filter(|slot| *slot < len)
            .ok_or(CatalogError::OutOfRange { index, len })
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, CatalogError, ProductFilter};
    use crate::domain::product::{Product, ProductPatch};

    fn correa() -> Product {
        Product {
            name: "Correa".to_string(),
            price: 25.0,
            category: "accesorios".to_string(),
            stock: 15,
        }
    }

    #[test]
    fn demo_catalog_matches_seed_contract() {
        let catalog = Catalog::with_demo_data();

        assert_eq!(catalog.len(), 3);
        let pelota = catalog.get(1).expect("position 1 is seeded");
        assert_eq!(pelota.name, "Pelota");
        assert_eq!(pelota.price, 15.5);
        assert_eq!(pelota.category, "juguetes");
        assert_eq!(pelota.stock, 50);
    }

    #[test]
    fn list_without_filters_returns_everything_in_order() {
        let catalog = Catalog::with_demo_data();

        let all = catalog.list(&ProductFilter::default());

        assert_eq!(all.len(), 3);
        assert_eq!(all[0].name, "Croquetas perro");
        assert_eq!(all[2].name, "Correa");
    }

    #[test]
    fn category_filter_is_case_insensitive_exact_match() {
        let catalog = Catalog::with_demo_data();

        let matches = catalog.list(&ProductFilter {
            category: Some("ALIMENTO".to_string()),
            ..ProductFilter::default()
        });

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Croquetas perro");
    }

    #[test]
    fn name_filter_is_case_insensitive_substring() {
        let catalog = Catalog::with_demo_data();

        let matches = catalog
            .list(&ProductFilter { name: Some("croq".to_string()), ..ProductFilter::default() });

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Croquetas perro");
    }

    #[test]
    fn empty_filter_strings_are_not_applied() {
        let catalog = Catalog::with_demo_data();

        let matches = catalog.list(&ProductFilter {
            category: Some(String::new()),
            name: Some(String::new()),
        });

        assert_eq!(matches.len(), 3);
    }

    #[test]
    fn filters_combine_and_no_match_is_empty() {
        let catalog = Catalog::with_demo_data();

        let matches = catalog.list(&ProductFilter {
            category: Some("juguetes".to_string()),
            name: Some("correa".to_string()),
        });

        assert!(matches.is_empty());
    }

    #[test]
    fn create_appends_at_previous_length() {
        let mut catalog = Catalog::with_demo_data();

        let position = catalog.create(correa());

        assert_eq!(position, 3);
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.get(3).expect("appended product"), correa());
    }

    #[test]
    fn replace_overwrites_in_place() {
        let mut catalog = Catalog::with_demo_data();

        let replaced = catalog.replace(1, correa()).expect("position 1 exists");

        assert_eq!(replaced, correa());
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(1).expect("position 1 still exists"), correa());
    }

    #[test]
    fn apply_patch_touches_only_supplied_fields() {
        let mut catalog = Catalog::with_demo_data();

        let merged = catalog
            .apply_patch(1, &ProductPatch { price: Some(99.0), ..ProductPatch::default() })
            .expect("position 1 exists");

        assert_eq!(merged.price, 99.0);
        assert_eq!(merged.name, "Pelota");
        assert_eq!(merged.category, "juguetes");
        assert_eq!(merged.stock, 50);
    }

    #[test]
    fn delete_shifts_later_positions_down() {
        let mut catalog = Catalog::with_demo_data();
        let former_second = catalog.get(1).expect("position 1 before delete");

        let removed = catalog.delete(0).expect("position 0 exists");

        assert_eq!(removed.name, "Croquetas perro");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).expect("shifted product"), former_second);
    }

    #[test]
    fn out_of_range_positions_are_rejected() {
        let mut catalog = Catalog::with_demo_data();

        assert_eq!(catalog.get(3), Err(CatalogError::OutOfRange { index: 3, len: 3 }));
        assert_eq!(catalog.get(-1), Err(CatalogError::OutOfRange { index: -1, len: 3 }));
        assert!(catalog.replace(7, correa()).is_err());
        assert!(catalog.apply_patch(7, &ProductPatch::default()).is_err());
        assert!(catalog.delete(7).is_err());
        assert_eq!(catalog.len(), 3, "failed operations must not mutate the catalog");
    }

    #[test]
    fn every_position_fails_on_an_empty_catalog() {
        let catalog = Catalog::new();

        assert!(catalog.is_empty());
        assert_eq!(catalog.get(0), Err(CatalogError::OutOfRange { index: 0, len: 0 }));
    }
}
