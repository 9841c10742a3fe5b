//! Cart line items and the identity key that decides merging.

use serde::{Deserialize, Serialize};

use mamiejago_core::{ProductId, Rupiah};

/// Variant name used for identity when a line item has no variant.
pub const DEFAULT_VARIANT: &str = "default";

/// One orderable configuration of a product in the cart.
///
/// `name`, `unit_price` and `image` are a snapshot taken when the item was
/// added. A later catalog price change does not touch items already in the
/// cart.
///
/// Serialized field names match the persisted cart format:
/// `{id, name, price, image, variant?, qty}`. A stored record missing `name`
/// or `image` still loads, with that field empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "price")]
    pub unit_price: Rupiah,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// Always at least 1 while the item is in a cart.
    #[serde(rename = "qty")]
    pub quantity: u32,
}

impl CartLineItem {
    /// Identity key of this line.
    #[must_use]
    pub fn key(&self) -> LineKey<'_> {
        LineKey::new(&self.product_id, self.variant.as_deref())
    }

    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Rupiah {
        self.unit_price.times(self.quantity)
    }

    /// Variant label for display, `"-"` when there is none.
    #[must_use]
    pub fn variant_label(&self) -> &str {
        self.variant.as_deref().unwrap_or("-")
    }
}

/// Product snapshot supplied by the catalog when adding to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Rupiah,
    pub image: String,
    pub variant: Option<String>,
}

impl NewLineItem {
    /// Identity key the new item will merge under.
    #[must_use]
    pub fn key(&self) -> LineKey<'_> {
        LineKey::new(&self.product_id, self.variant.as_deref())
    }

    pub(crate) fn into_line(self, quantity: u32) -> CartLineItem {
        CartLineItem {
            product_id: self.product_id,
            name: self.name,
            unit_price: self.unit_price,
            image: self.image,
            variant: self.variant,
            quantity,
        }
    }
}

/// The `(product, variant)` pair that identifies a line item.
///
/// An absent variant compares equal to [`DEFAULT_VARIANT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineKey<'a> {
    product_id: &'a str,
    variant: &'a str,
}

impl<'a> LineKey<'a> {
    /// Build a key, normalizing a missing variant.
    #[must_use]
    pub fn new(product_id: &'a ProductId, variant: Option<&'a str>) -> Self {
        Self {
            product_id: product_id.as_str(),
            variant: variant.unwrap_or(DEFAULT_VARIANT),
        }
    }

    #[must_use]
    pub const fn product_id(&self) -> &'a str {
        self.product_id
    }

    #[must_use]
    pub const fn variant(&self) -> &'a str {
        self.variant
    }
}

/// Read-only copy of the cart handed to display components and the order
/// channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSnapshot {
    pub items: Vec<CartLineItem>,
    pub total_price: Rupiah,
}

impl CartSnapshot {
    /// Sum of all quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
