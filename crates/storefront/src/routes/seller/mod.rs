//! Seller dashboard route handlers.
//!
//! Every route here requires a logged-in seller.

pub mod home;
pub mod products;

/// Sidebar entry for the seller dashboard.
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
    pub active: bool,
}

/// Sidebar entries with `current` highlighted.
#[must_use]
pub fn sidebar(current: &str) -> Vec<NavItem> {
    [
        ("Home", "/dashboard/seller"),
        ("Produk", "/dashboard/seller/products"),
    ]
    .into_iter()
    .map(|(label, href)| NavItem {
        label,
        href,
        active: href == current,
    })
    .collect()
}
