//! Menu management.

use serde::Serialize;
use serde::de::IgnoredAny;
use tracing::{info, instrument};

use mamiejago_core::{Category, ProductId, Rupiah};
use mamiejago_storefront::backend::Query;
use mamiejago_storefront::catalog::Product;

use crate::AdminConsole;
use crate::error::{AdminError, Result};

/// Product form contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub price: Rupiah,
    pub category: Category,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub variant_names: Vec<String>,
}

impl ProductDraft {
    /// Prefill the form from an existing product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price,
            category: product.category,
            description: product.description.clone(),
            image_url: product.image_url.clone(),
            variant_names: product.variants.clone(),
        }
    }

    /// Trim fields, drop blank and repeated variant names.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::MissingName` or `AdminError::InvalidPrice`.
    pub fn validate(self) -> Result<Self> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AdminError::MissingName);
        }
        if !self.price.is_positive() {
            return Err(AdminError::InvalidPrice);
        }

        let mut variant_names: Vec<String> = Vec::with_capacity(self.variant_names.len());
        for variant in &self.variant_names {
            let variant = variant.trim();
            if !variant.is_empty() && !variant_names.iter().any(|v| v == variant) {
                variant_names.push(variant.to_string());
            }
        }

        Ok(Self {
            name,
            price: self.price,
            category: self.category,
            description: non_blank(self.description),
            image_url: non_blank(self.image_url),
            variant_names,
        })
    }

    fn row(&self) -> ProductRow<'_> {
        ProductRow {
            name: &self.name,
            price: self.price,
            category: self.category,
            description: self.description.as_deref(),
            image_url: self.image_url.as_deref(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Columns written to `products`.
#[derive(Debug, Serialize)]
struct ProductRow<'a> {
    name: &'a str,
    price: Rupiah,
    category: Category,
    description: Option<&'a str>,
    image_url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct VariantInsert<'a> {
    product_id: &'a ProductId,
    variant_name: &'a str,
}

#[derive(Debug, Serialize)]
struct ActivePatch {
    is_active: bool,
}

impl AdminConsole {
    /// Every product, including hidden ones, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self.backend().list_all_products().await?)
    }

    /// Create a product, or update `existing` and replace its variants.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `AdminError::NotFound` when `existing` is
    /// gone, or a backend error.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn save_product(
        &self,
        draft: ProductDraft,
        existing: Option<&ProductId>,
    ) -> Result<Product> {
        let draft = draft.validate()?;
        let backend = self.backend();

        let mut product = if let Some(id) = existing {
            let updated: Vec<Product> = backend
                .update(&Query::table("products").eq("id", id), &draft.row())
                .await?;
            let product = updated
                .into_iter()
                .next()
                .ok_or_else(|| AdminError::NotFound(format!("product {id}")))?;
            backend
                .delete(&Query::table("product_variants").eq("product_id", id))
                .await?;
            product
        } else {
            let inserted: Vec<Product> = backend.insert("products", &draft.row()).await?;
            inserted
                .into_iter()
                .next()
                .ok_or_else(|| AdminError::NotFound("inserted product".to_string()))?
        };

        if !draft.variant_names.is_empty() {
            let rows: Vec<VariantInsert<'_>> = draft
                .variant_names
                .iter()
                .map(|name| VariantInsert {
                    product_id: &product.id,
                    variant_name: name,
                })
                .collect();
            let _: Vec<IgnoredAny> = backend.insert("product_variants", rows.as_slice()).await?;
        }
        product.variants = draft.variant_names;

        backend.invalidate_catalog().await;
        info!(product_id = %product.id, created = existing.is_none(), "Product saved");
        Ok(product)
    }

    /// Show or hide a product on the menu.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn set_product_active(&self, id: &ProductId, is_active: bool) -> Result<()> {
        let _: Vec<IgnoredAny> = self
            .backend()
            .update(&Query::table("products").eq("id", id), &ActivePatch { is_active })
            .await?;
        self.backend().invalidate_catalog().await;
        Ok(())
    }

    /// Delete a product. Its variants go with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<()> {
        self.backend()
            .delete(&Query::table("products").eq("id", id))
            .await?;
        self.backend().invalidate_catalog().await;
        info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "  Mie Jebew Carbonara ".to_string(),
            price: Rupiah::new(18_000),
            category: Category::Mie,
            description: Some("   ".to_string()),
            image_url: None,
            variant_names: vec![
                "Original".to_string(),
                " ".to_string(),
                " Goreng ".to_string(),
                "Original".to_string(),
                String::new(),
            ],
        }
    }

    #[test]
    fn test_validate_normalizes() {
        let valid = draft().validate().unwrap();
        assert_eq!(valid.name, "Mie Jebew Carbonara");
        assert_eq!(valid.description, None);
        assert_eq!(valid.variant_names, ["Original", "Goreng"]);
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let mut d = draft();
        d.name = "   ".to_string();
        assert!(matches!(d.validate(), Err(AdminError::MissingName)));
    }

    #[test]
    fn test_validate_rejects_non_positive_price() {
        let mut d = draft();
        d.price = Rupiah::ZERO;
        assert!(matches!(d.validate(), Err(AdminError::InvalidPrice)));

        let mut d = draft();
        d.price = Rupiah::new(-500);
        assert!(matches!(d.validate(), Err(AdminError::InvalidPrice)));
    }

    #[test]
    fn test_row_payload() {
        let valid = draft().validate().unwrap();
        assert_eq!(
            serde_json::to_value(valid.row()).unwrap(),
            serde_json::json!({
                "name": "Mie Jebew Carbonara",
                "price": 18000,
                "category": "Mie",
                "description": null,
                "image_url": null,
            })
        );
    }

    #[test]
    fn test_variant_payload() {
        let id = ProductId::new("p9");
        let row = VariantInsert {
            product_id: &id,
            variant_name: "Kuah",
        };
        assert_eq!(
            serde_json::to_value(&row).unwrap(),
            serde_json::json!({"product_id": "p9", "variant_name": "Kuah"})
        );
    }

    #[test]
    fn test_from_product_round_trips_form() {
        let product = Product {
            id: ProductId::new("p1"),
            name: "Dimsum Ayam".to_string(),
            price: Rupiah::new(12_000),
            category: Category::Dimsum,
            description: Some("Isi 4".to_string()),
            image_url: Some("https://img/p1.jpg".to_string()),
            rating: 4.7,
            is_active: true,
            created_at: None,
            variants: vec!["Kukus".to_string()],
        };
        let form = ProductDraft::from_product(&product);
        assert_eq!(form.variant_names, ["Kukus"]);
        assert_eq!(form.clone().validate().unwrap(), form);
    }
}
