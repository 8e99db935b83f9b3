//! Products and the product catalog.

use crate::error::CommerceError;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name, also what cart queries are matched against.
    pub name: String,
}

impl Product {
    /// Create a new product.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// The set of products a cart can be built from. Loaded once, never mutated.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate product ids.
    pub fn new(products: Vec<Product>) -> Result<Self, CommerceError> {
        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(product.id) {
                return Err(CommerceError::DuplicateProduct(product.id.get()));
            }
        }
        Ok(Self { products })
    }

    /// Resolve a user query to a product.
    ///
    /// An exact name match wins; otherwise the first product (catalog order)
    /// whose name contains the query case-insensitively. Blank queries never match.
    pub fn resolve(&self, query: &str) -> Result<&Product, CommerceError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CommerceError::ProductNotFound(query.to_string()));
        }

        if let Some(product) = self.products.iter().find(|p| p.name == query) {
            return Ok(product);
        }

        let needle = query.to_lowercase();
        self.products
            .iter()
            .find(|p| p.name.to_lowercase().contains(&needle))
            .ok_or_else(|| CommerceError::ProductNotFound(query.to_string()))
    }

    /// Get a product by id.
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Check whether a product id is known.
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// All products, in load order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Product names, for input suggestions.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.products.iter().map(|p| p.name.as_str())
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
