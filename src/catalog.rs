//! Catalog
//!
//! Product lookup used by gifting rules to load the products they give away.

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use thiserror::Error;

use crate::products::{Product, ProductKey};

/// Errors returned by catalog lookups.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// No product exists for the key.
    #[error("Product {0:?} not found")]
    NotFound(ProductKey),
}

/// Read access to a product catalog.
pub trait Catalog<'a> {
    /// Resolve a SKU to a product key.
    fn id_by_sku(&self, sku: &str) -> Option<ProductKey>;

    /// Load a fresh copy of a product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no product exists for the key.
    fn load(&self, key: ProductKey) -> Result<Product<'a>, CatalogError>;
}

impl<'a, C: Catalog<'a> + ?Sized> Catalog<'a> for &C {
    fn id_by_sku(&self, sku: &str) -> Option<ProductKey> {
        (**self).id_by_sku(sku)
    }

    fn load(&self, key: ProductKey) -> Result<Product<'a>, CatalogError> {
        (**self).load(key)
    }
}

/// Catalog held in memory, keyed by slotmap keys with a SKU index.
#[derive(Debug, Default)]
pub struct InMemoryCatalog<'a> {
    products: SlotMap<ProductKey, Product<'a>>,
    skus: FxHashMap<String, ProductKey>,
}

impl<'a> InMemoryCatalog<'a> {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            products: SlotMap::with_key(),
            skus: FxHashMap::default(),
        }
    }

    /// Insert a product, assigning its key. A product with the same SKU replaces
    /// the previous one in the SKU index.
    pub fn insert(&mut self, mut product: Product<'a>) -> ProductKey {
        let sku = product.sku.clone();

        let key = self.products.insert_with_key(|key| {
            product.key = key;
            product
        });

        self.skus.insert(sku, key);

        key
    }

    /// Borrow a product without copying it.
    pub fn get(&self, key: ProductKey) -> Option<&Product<'a>> {
        self.products.get(key)
    }

    /// Borrow a product by SKU.
    pub fn get_by_sku(&self, sku: &str) -> Option<&Product<'a>> {
        self.skus.get(sku).and_then(|key| self.products.get(*key))
    }

    /// Number of products in the catalog.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl<'a> Catalog<'a> for InMemoryCatalog<'a> {
    fn id_by_sku(&self, sku: &str) -> Option<ProductKey> {
        self.skus.get(sku).copied()
    }

    fn load(&self, key: ProductKey) -> Result<Product<'a>, CatalogError> {
        self.products
            .get(key)
            .cloned()
            .ok_or(CatalogError::NotFound(key))
    }
}
