//! Seller product listing logic.
//!
//! The seller "Data Produk" page shows one tab of products at a time
//! (active or inactive), narrowed by a case-insensitive name search and
//! optionally sorted by price or creation date. Rows can be selected
//! individually or all at once for bulk status changes.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Rupiah;

/// Anything that can appear in the seller product table.
pub trait CatalogItem {
    /// Product name used for search.
    fn name(&self) -> &str;
    /// Whether the product is currently listed.
    fn is_active(&self) -> bool;
    /// Price used for price ordering.
    fn price(&self) -> Rupiah;
    /// Creation time used for date ordering.
    fn created_at(&self) -> Option<DateTime<Utc>>;
}

/// Which products the listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductTab {
    #[default]
    Active,
    Inactive,
}

impl ProductTab {
    /// Both tabs in display order.
    pub const ALL: [Self; 2] = [Self::Active, Self::Inactive];

    /// Query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Tab label shown to sellers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Aktif",
            Self::Inactive => "Nonaktif",
        }
    }

    /// Whether an item belongs in this tab.
    #[must_use]
    pub fn includes<T: CatalogItem + ?Sized>(self, item: &T) -> bool {
        match self {
            Self::Active => item.is_active(),
            Self::Inactive => !item.is_active(),
        }
    }
}

impl fmt::Display for ProductTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sort order for the seller listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductSort {
    /// Lowest price first.
    Cheapest,
    /// Highest price first.
    Priciest,
    /// Oldest first. Products without a creation date come first.
    Oldest,
    /// Newest first. Products without a creation date come last.
    Newest,
}

impl ProductSort {
    /// All sort orders in menu order.
    pub const ALL: [Self; 4] = [Self::Cheapest, Self::Priciest, Self::Oldest, Self::Newest];

    /// Query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cheapest => "cheapest",
            Self::Priciest => "priciest",
            Self::Oldest => "oldest",
            Self::Newest => "newest",
        }
    }

    /// Menu label shown to sellers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cheapest => "Termurah",
            Self::Priciest => "Termahal",
            Self::Oldest => "Terlama",
            Self::Newest => "Terbaru",
        }
    }

    fn compare<T: CatalogItem>(self, a: &T, b: &T) -> std::cmp::Ordering {
        match self {
            Self::Cheapest => a.price().cmp(&b.price()),
            Self::Priciest => b.price().cmp(&a.price()),
            Self::Oldest => a.created_at().cmp(&b.created_at()),
            Self::Newest => b.created_at().cmp(&a.created_at()),
        }
    }
}

/// A listing option that is not one of the known values.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown listing option: {0}")]
pub struct UnknownOption(pub String);

impl std::str::FromStr for ProductTab {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tab| tab.as_str() == s)
            .ok_or_else(|| UnknownOption(s.to_string()))
    }
}

impl std::str::FromStr for ProductSort {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sort| sort.as_str() == s)
            .ok_or_else(|| UnknownOption(s.to_string()))
    }
}

/// The listing state carried in the seller products page query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuery {
    #[serde(default)]
    pub tab: ProductTab,
    #[serde(default, rename = "q")]
    pub search: String,
    #[serde(default)]
    pub sort: Option<ProductSort>,
}

impl ProductQuery {
    /// Build from raw query-string values, ignoring blank or unknown options.
    #[must_use]
    pub fn from_params(tab: Option<&str>, search: Option<&str>, sort: Option<&str>) -> Self {
        Self {
            tab: tab.and_then(|t| t.trim().parse().ok()).unwrap_or_default(),
            search: search.map(str::trim).unwrap_or_default().to_string(),
            sort: sort.and_then(|s| s.trim().parse().ok()),
        }
    }

    /// Encode as a query string (without the leading `?`), omitting an empty
    /// search and an unset sort.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query.append_pair("tab", self.tab.as_str());
        if !self.search.is_empty() {
            query.append_pair("q", &self.search);
        }
        if let Some(sort) = self.sort {
            query.append_pair("sort", sort.as_str());
        }
        query.finish()
    }

    /// Whether the item passes the tab and search filters.
    #[must_use]
    pub fn matches<T: CatalogItem>(&self, item: &T) -> bool {
        if !self.tab.includes(item) {
            return false;
        }
        let needle = self.search.trim();
        needle.is_empty()
            || item
                .name()
                .to_lowercase()
                .contains(&needle.to_lowercase())
    }

    /// Filter and order items for display.
    ///
    /// Sorting is stable, so items that compare equal keep their API order.
    #[must_use]
    pub fn apply<'a, T: CatalogItem>(&self, items: &'a [T]) -> Vec<&'a T> {
        let mut visible: Vec<&T> = items.iter().filter(|item| self.matches(*item)).collect();
        if let Some(sort) = self.sort {
            visible.sort_by(|a, b| sort.compare(*a, *b));
        }
        visible
    }

    /// The same listing state on another tab.
    #[must_use]
    pub fn with_tab(&self, tab: ProductTab) -> Self {
        Self {
            tab,
            ..self.clone()
        }
    }

    /// The same listing state with another sort order.
    #[must_use]
    pub fn with_sort(&self, sort: ProductSort) -> Self {
        Self {
            sort: Some(sort),
            ..self.clone()
        }
    }
}

/// The rows ticked in the product table's bulk form.
///
/// The header checkbox counts as checked only while every row is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    rows: Vec<bool>,
}

impl Selection {
    /// Build a selection over `ids`, marking the rows whose id is in `checked`.
    ///
    /// Checked ids that are not in `ids` are ignored.
    #[must_use]
    pub fn from_checked<S: AsRef<str>>(ids: &[S], checked: &[S]) -> Self {
        Self {
            rows: ids
                .iter()
                .map(|id| checked.iter().any(|c| c.as_ref() == id.as_ref()))
                .collect(),
        }
    }

    /// Whether the header checkbox is checked.
    #[must_use]
    pub fn all_selected(&self) -> bool {
        !self.rows.is_empty() && self.rows.iter().all(|selected| *selected)
    }

    /// Number of selected rows.
    #[must_use]
    pub fn count(&self) -> usize {
        self.rows.iter().filter(|selected| **selected).count()
    }

    /// The items at selected positions.
    pub fn pick<'a, T>(&'a self, items: &'a [T]) -> impl Iterator<Item = &'a T> + 'a {
        items
            .iter()
            .zip(self.rows.iter())
            .filter_map(|(item, selected)| selected.then_some(item))
    }
}
