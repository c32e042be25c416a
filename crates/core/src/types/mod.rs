//! Core types for the storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use address::{AddressError, AddressField, AddressForm};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Discount, Rupiah};
pub use status::*;
