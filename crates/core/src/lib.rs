pub mod catalog;
pub mod config;
pub mod domain;

pub use catalog::{Catalog, CatalogError, ProductFilter, SharedCatalog};
pub use domain::product::{Product, ProductPatch};
