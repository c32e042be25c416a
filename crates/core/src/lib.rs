//! PusatOlehOleh Core - Shared domain types and pure storefront logic.
//!
//! The storefront binary renders pages over a remote REST API. Everything in
//! this crate is free of I/O so it can be unit tested in isolation:
//!
//! - [`types`] - Newtype IDs, Rupiah prices, statuses, addresses, emails
//! - [`catalog`] - Seller product listing: tabs, search, sort, row selection
//! - [`stats`] - Seller home statistics aggregated from transaction statuses
//! - [`media`] - CDN media URL normalization and upload size limits

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod media;
pub mod stats;
pub mod types;

pub use types::*;
