//! MamieJago Storefront library.
//!
//! Customer-facing storefront logic for the MamieJago food-ordering app:
//!
//! - [`cart`] - Cart store with merge-on-add semantics and durable persistence
//! - [`catalog`] - Menu products, category filtering and search
//! - [`order`] - WhatsApp order submission channel
//! - [`reviews`] - Review feed and rating aggregation
//! - [`backend`] - Client for the hosted backend-as-a-service
//! - [`auth`] - Identity provider (sign-in, role lookup)
//!
//! # Example
//!
//! ```rust,no_run
//! use mamiejago_storefront::cart::{CartStore, FileStorage, NewLineItem};
//! use mamiejago_core::{ProductId, Rupiah};
//!
//! let mut cart = CartStore::load(FileStorage::new(".mamiejago"));
//! cart.add(
//!     NewLineItem {
//!         product_id: ProductId::new("p1"),
//!         name: "Mie Jebew Original".to_string(),
//!         unit_price: Rupiah::new(15_000),
//!         image: "/placeholder.svg".to_string(),
//!         variant: Some("Original".to_string()),
//!     },
//!     2,
//! );
//! assert_eq!(cart.total_price(), Rupiah::new(30_000));
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod backend;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod order;
pub mod reviews;
