//! Core types for MamieJago.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod phone;
pub mod price;
pub mod rating;
pub mod status;

pub use category::{Category, CategoryError, CategoryFilter};
pub use id::*;
pub use phone::{Phone, PhoneError};
pub use price::Rupiah;
pub use rating::{Rating, RatingError};
pub use status::*;
