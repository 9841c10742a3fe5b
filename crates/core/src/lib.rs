//! MamieJago Core - Shared types library.
//!
//! This crate provides common types used across all MamieJago components:
//! - `storefront` - Customer-facing menu, cart, order submission and reviews
//! - `admin` - Admin console operations (products, banners, review moderation)
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no network
//! clients, no storage access. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, rupiah amounts, ratings, phone
//!   numbers, categories and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
