//! Cache types for catalog responses.

use mamiejago_core::ProductId;

use crate::catalog::{Banner, Product};

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    Product(ProductId),
    Variants(ProductId),
    Banners,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<Product>),
    Product(Box<Product>),
    Variants(Vec<String>),
    Banners(Vec<Banner>),
}
