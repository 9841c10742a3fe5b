//! Menu catalog: products, banners, filtering and search.
//!
//! The catalog is read-only from the storefront's point of view. Products are
//! turned into cart line items through [`Product::to_line_item`], which takes
//! the denormalized snapshot the cart keeps.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mamiejago_core::{BannerId, Category, CategoryFilter, ProductId, Rupiah};

use crate::backend::BackendError;
use crate::cart::NewLineItem;

/// Image used when a product has no uploaded picture.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Minimum rating for the "popular" strip on the home page.
pub const POPULAR_MIN_RATING: f64 = 4.6;

/// Spice levels offered for noodle and wonton dishes, mildest first.
pub const SPICE_LEVELS: [&str; 4] = ["Tidak Pedas", "Pedas", "Extra Pedas", "Pedas Nampol"];

/// How long each banner stays on screen before the slider advances.
pub const BANNER_ROTATE_INTERVAL: Duration = Duration::from_secs(4);

/// A menu item, as stored in the `products` table plus its variant names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Rupiah,
    pub category: Category,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Variant names from `product_variants`, not a column of `products`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<String>,
}

const fn default_true() -> bool {
    true
}

impl Product {
    /// Image to show, falling back to the placeholder.
    #[must_use]
    pub fn image(&self) -> &str {
        self.image_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(PLACEHOLDER_IMAGE)
    }

    /// The variant preselected on the product page.
    #[must_use]
    pub fn default_variant(&self) -> Option<&str> {
        self.variants.first().map(String::as_str)
    }

    /// Spice levels offered for this product.
    #[must_use]
    pub fn spice_levels(&self) -> &'static [&'static str] {
        spice_levels(self.category)
    }

    /// Snapshot this product for the cart.
    ///
    /// Spice level is deliberately not part of the line item: cart identity is
    /// `(product, variant)` only.
    #[must_use]
    pub fn to_line_item(&self, variant: Option<&str>) -> NewLineItem {
        NewLineItem {
            product_id: self.id.clone(),
            name: self.name.clone(),
            unit_price: self.price,
            image: self.image().to_string(),
            variant: variant.map(str::to_string),
        }
    }
}

/// Spice levels for a category; empty when the category has none.
#[must_use]
pub fn spice_levels(category: Category) -> &'static [&'static str] {
    if category.has_spice_levels() {
        &SPICE_LEVELS
    } else {
        &[]
    }
}

/// Products matching the category chip and the search box, in input order.
///
/// Search is a case-insensitive substring match on the product name, used
/// as typed with no trimming; an empty search matches everything.
#[must_use]
pub fn filter_products<'a>(
    products: &'a [Product],
    filter: CategoryFilter,
    search: &str,
) -> Vec<&'a Product> {
    let needle = search.to_lowercase();
    products
        .iter()
        .filter(|p| filter.matches(p.category))
        .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .collect()
}

/// Highly rated products for the home page, at most `limit`.
#[must_use]
pub fn popular(products: &[Product], limit: usize) -> Vec<&Product> {
    products
        .iter()
        .filter(|p| p.rating >= POPULAR_MIN_RATING)
        .take(limit)
        .collect()
}

/// A promotional banner on the home page slider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub id: BannerId,
    pub image_url: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Index of the banner shown after `current`, wrapping around.
///
/// Returns `None` when there are no banners.
#[must_use]
pub const fn next_banner_index(current: usize, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some((current + 1) % len)
    }
}

/// Read access to the menu.
pub trait CatalogProvider {
    /// Active products, newest first, with their variant names.
    fn list_products(&self) -> impl Future<Output = Result<Vec<Product>, BackendError>> + Send;

    /// A single product with its variant names.
    fn get_product(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<Product, BackendError>> + Send;

    /// Variant names for a product.
    fn list_variants(
        &self,
        product_id: &ProductId,
    ) -> impl Future<Output = Result<Vec<String>, BackendError>> + Send;

    /// Active banners in display order.
    fn list_banners(&self) -> impl Future<Output = Result<Vec<Banner>, BackendError>> + Send;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn product(id: &str, name: &str, price: i64, category: Category, rating: f64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Rupiah::new(price),
            category,
            description: None,
            image_url: Some(format!("https://img.example/{id}.jpg")),
            rating,
            is_active: true,
            created_at: None,
            variants: Vec::new(),
        }
    }

    pub(crate) fn menu() -> Vec<Product> {
        vec![
            product("p1", "Mie Jebew Original", 15_000, Category::Mie, 4.8),
            product("p2", "Mie Jebew Carbonara", 18_000, Category::Mie, 4.6),
            product("p3", "Dimsum Ayam", 12_000, Category::Dimsum, 4.7),
            product("p5", "Wonton Kuah", 13_000, Category::Wonton, 4.5),
            product("p7", "Es Teh Manis", 5_000, Category::Minuman, 4.3),
        ]
    }

    #[test]
    fn test_filter_all_keeps_order() {
        let menu = menu();
        let ids: Vec<&str> = filter_products(&menu, CategoryFilter::All, "")
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, ["p1", "p2", "p3", "p5", "p7"]);
    }

    #[test]
    fn test_filter_by_category() {
        let menu = menu();
        let found = filter_products(&menu, CategoryFilter::Only(Category::Mie), "");
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.category == Category::Mie));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let menu = menu();
        let found = filter_products(&menu, CategoryFilter::All, "CARBO");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_str(), "p2");
    }

    #[test]
    fn test_search_is_not_trimmed() {
        let menu = menu();
        assert!(filter_products(&menu, CategoryFilter::All, "carbo ").is_empty());
        assert_eq!(filter_products(&menu, CategoryFilter::All, "jebew ").len(), 2);
    }

    #[test]
    fn test_search_and_category_combine() {
        let menu = menu();
        assert!(filter_products(&menu, CategoryFilter::Only(Category::Dimsum), "mie").is_empty());
    }

    #[test]
    fn test_popular_threshold_and_limit() {
        let menu = menu();
        let ids: Vec<&str> = popular(&menu, 4).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p1", "p2", "p3"]);
        assert_eq!(popular(&menu, 1).len(), 1);
    }

    #[test]
    fn test_spice_levels_by_category() {
        let menu = menu();
        assert_eq!(menu[0].spice_levels().len(), 4);
        assert!(menu[2].spice_levels().is_empty());
    }

    #[test]
    fn test_to_line_item_snapshots_product() {
        let mut p = product("p1", "Mie Jebew Original", 15_000, Category::Mie, 4.8);
        p.image_url = None;
        let line = p.to_line_item(Some("Keju"));

        assert_eq!(line.product_id.as_str(), "p1");
        assert_eq!(line.unit_price, Rupiah::new(15_000));
        assert_eq!(line.image, PLACEHOLDER_IMAGE);
        assert_eq!(line.variant.as_deref(), Some("Keju"));
    }

    #[test]
    fn test_product_row_deserializes() {
        let row = serde_json::json!({
            "id": "3f1c",
            "name": "Dimsum Udang",
            "price": 14000,
            "category": "Dimsum",
            "description": null,
            "image_url": null,
            "rating": 4.9,
            "is_active": true,
            "created_at": "2025-02-10T08:00:00Z"
        });
        let p: Product = serde_json::from_value(row).unwrap();
        assert_eq!(p.category, Category::Dimsum);
        assert!(p.variants.is_empty());
        assert_eq!(p.image(), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_next_banner_index_wraps() {
        assert_eq!(next_banner_index(0, 0), None);
        assert_eq!(next_banner_index(0, 3), Some(1));
        assert_eq!(next_banner_index(2, 3), Some(0));
        assert_eq!(next_banner_index(0, 1), Some(0));
    }
}
