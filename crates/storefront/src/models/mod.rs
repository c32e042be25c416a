//! Session models for the storefront.
//!
//! The storefront keeps no data of its own; everything here lives in the
//! session store for the duration of a login.

pub mod session;

pub use session::{CurrentUser, keys as session_keys};
