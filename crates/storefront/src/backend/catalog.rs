//! Catalog and review reads against the backend tables.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::instrument;

use mamiejago_core::{ProductId, ReviewFilter};

use super::cache::{CacheKey, CacheValue};
use super::{BackendClient, BackendError, Query};
use crate::catalog::{Banner, CatalogProvider, Product};
use crate::reviews::{Review, ReviewDraft};

/// A row of `product_variants`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct VariantRow {
    pub product_id: ProductId,
    pub variant_name: String,
}

/// Variant names per product, in row order.
pub(crate) fn group_variants(rows: Vec<VariantRow>) -> HashMap<ProductId, Vec<String>> {
    let mut grouped: HashMap<ProductId, Vec<String>> = HashMap::new();
    for row in rows {
        grouped
            .entry(row.product_id)
            .or_default()
            .push(row.variant_name);
    }
    grouped
}

/// Fill in each product's variant names.
fn attach_variants(products: &mut [Product], mut grouped: HashMap<ProductId, Vec<String>>) {
    for product in products {
        product.variants = grouped.remove(&product.id).unwrap_or_default();
    }
}

impl BackendClient {
    /// Every product, active or not, newest first, with variant names.
    ///
    /// # Errors
    ///
    /// Returns an error if either request fails.
    #[instrument(skip(self))]
    pub async fn list_all_products(&self) -> Result<Vec<Product>, BackendError> {
        let mut products: Vec<Product> = self
            .select(&Query::table("products").select("*").order("created_at", false))
            .await?;
        let rows: Vec<VariantRow> = self
            .select(&Query::table("product_variants").select("product_id, variant_name"))
            .await?;
        attach_variants(&mut products, group_variants(rows));
        Ok(products)
    }

    /// Reviews for the moderation queue or the public feed, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_reviews(&self, filter: ReviewFilter) -> Result<Vec<Review>, BackendError> {
        let mut query = Query::table("reviews")
            .select("*")
            .order("created_at", false);
        if let Some(approved) = filter.approved() {
            query = query.eq("is_approved", approved);
        }
        self.select(&query).await
    }

    /// Store a new review. It stays hidden until approved.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or is rejected.
    #[instrument(skip(self, draft), fields(rating = %draft.rating))]
    pub async fn submit_review(&self, draft: &ReviewDraft) -> Result<Review, BackendError> {
        let rows: Vec<Review> = self.insert("reviews", draft).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound("inserted review".to_string()))
    }
}

impl CatalogProvider for BackendClient {
    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, BackendError> {
        if let Some(CacheValue::Products(products)) = self.cached(&CacheKey::Products).await {
            return Ok(products);
        }

        let mut products: Vec<Product> = self
            .select(
                &Query::table("products")
                    .select("*")
                    .eq("is_active", true)
                    .order("created_at", false),
            )
            .await?;
        let rows: Vec<VariantRow> = self
            .select(&Query::table("product_variants").select("product_id, variant_name"))
            .await?;
        attach_variants(&mut products, group_variants(rows));

        self.store(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_product(&self, id: &ProductId) -> Result<Product, BackendError> {
        let key = CacheKey::Product(id.clone());
        if let Some(CacheValue::Product(product)) = self.cached(&key).await {
            return Ok(*product);
        }

        let mut product: Product = self
            .select_one(Query::table("products").select("*").eq("id", id))
            .await?
            .ok_or_else(|| BackendError::NotFound(format!("Product not found: {id}")))?;
        product.variants = self.list_variants(id).await?;

        self.store(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn list_variants(&self, product_id: &ProductId) -> Result<Vec<String>, BackendError> {
        let key = CacheKey::Variants(product_id.clone());
        if let Some(CacheValue::Variants(names)) = self.cached(&key).await {
            return Ok(names);
        }

        let rows: Vec<VariantRow> = self
            .select(
                &Query::table("product_variants")
                    .select("product_id, variant_name")
                    .eq("product_id", product_id),
            )
            .await?;
        let names: Vec<String> = rows.into_iter().map(|r| r.variant_name).collect();

        self.store(key, CacheValue::Variants(names.clone())).await;
        Ok(names)
    }

    #[instrument(skip(self))]
    async fn list_banners(&self) -> Result<Vec<Banner>, BackendError> {
        if let Some(CacheValue::Banners(banners)) = self.cached(&CacheKey::Banners).await {
            return Ok(banners);
        }

        let banners: Vec<Banner> = self
            .select(
                &Query::table("banners")
                    .select("*")
                    .eq("is_active", true)
                    .order("sort_order", true),
            )
            .await?;

        self.store(CacheKey::Banners, CacheValue::Banners(banners.clone()))
            .await;
        Ok(banners)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use mamiejago_core::Category;

    use super::*;
    use crate::catalog::tests::product;

    fn row(product_id: &str, name: &str) -> VariantRow {
        VariantRow {
            product_id: ProductId::new(product_id),
            variant_name: name.to_string(),
        }
    }

    #[test]
    fn test_group_variants_keeps_row_order() {
        let grouped = group_variants(vec![
            row("p1", "Original"),
            row("p2", "Kuah"),
            row("p1", "Goreng"),
        ]);

        assert_eq!(grouped[&ProductId::new("p1")], ["Original", "Goreng"]);
        assert_eq!(grouped[&ProductId::new("p2")], ["Kuah"]);
    }

    #[test]
    fn test_attach_variants() {
        let mut products = vec![
            product("p1", "Mie Jebew", 15_000, Category::Mie, 4.8),
            product("p3", "Es Teh", 5_000, Category::Minuman, 4.2),
        ];
        attach_variants(
            &mut products,
            group_variants(vec![row("p1", "Original"), row("p9", "Orphan")]),
        );

        assert_eq!(products[0].variants, ["Original"]);
        assert!(products[1].variants.is_empty());
    }

    #[test]
    fn test_variant_row_from_json() {
        let rows: Vec<VariantRow> = serde_json::from_str(
            r#"[{"id":"v1","product_id":"p1","variant_name":"Original","created_at":"2025-01-01T00:00:00Z"}]"#,
        )
        .unwrap();
        assert_eq!(rows[0].variant_name, "Original");
    }

    #[test]
    fn test_product_row_from_json() {
        let products: Vec<Product> = serde_json::from_str(
            r#"[{
                "id": "p1",
                "name": "Mie Jebew Original",
                "price": 15000,
                "category": "Mie",
                "description": null,
                "image_url": null,
                "rating": 4.8,
                "is_active": true,
                "created_at": "2025-02-01T10:00:00+00:00"
            }]"#,
        )
        .unwrap();

        assert_eq!(products[0].price.amount(), 15_000);
        assert_eq!(products[0].image(), crate::catalog::PLACEHOLDER_IMAGE);
        assert!(products[0].variants.is_empty());
    }
}
