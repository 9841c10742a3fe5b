//! Integration tests for MamieJago.
//!
//! # Running Tests
//!
//! ```bash
//! # Offline tests (cart persistence, order submission, admin gate)
//! cargo test -p mamiejago-integration-tests
//!
//! # Tests against a live backend project
//! MAMIEJAGO_BACKEND_URL=... MAMIEJAGO_BACKEND_ANON_KEY=... \
//!     cargo test -p mamiejago-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - cart store reloads across instances from disk
//! - `order_submission` - checkout flow from cart to WhatsApp link
//! - `admin_gate` - admin area access across session states
//! - `backend_catalog` - live catalog reads (ignored by default)

use mamiejago_core::{ProductId, Rupiah};
use mamiejago_storefront::cart::NewLineItem;

/// A menu item ready to add to the cart.
#[must_use]
pub fn line_item(id: &str, name: &str, price: i64, variant: Option<&str>) -> NewLineItem {
    NewLineItem {
        product_id: ProductId::new(id),
        name: name.to_string(),
        unit_price: Rupiah::new(price),
        image: format!("https://img.mamiejago.id/{id}.jpg"),
        variant: variant.map(str::to_string),
    }
}

/// Install a test subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
