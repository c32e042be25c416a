//! Status enums for remote API entities.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Transaction status as reported by the seller transaction endpoint.
///
/// Only the statuses that drive the seller dashboard get their own variant.
/// Anything else is kept verbatim so it round-trips and can be logged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionStatus {
    /// Paid by the buyer, waiting for the seller to process.
    Paid,
    /// Processed by the seller, ready to ship.
    Processed,
    /// Delivered and closed.
    Completed,
    /// Any other status string.
    Other(String),
}

impl TransactionStatus {
    /// The wire representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Paid => "Paid",
            Self::Processed => "Processed",
            Self::Completed => "Completed",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for TransactionStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Paid" => Self::Paid,
            "Processed" => Self::Processed,
            "Completed" => Self::Completed,
            _ => Self::Other(s),
        }
    }
}

impl From<TransactionStatus> for String {
    fn from(status: TransactionStatus) -> Self {
        match status {
            TransactionStatus::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account role.
///
/// The API calls buyers `user`; both spellings are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A shopper browsing and buying products.
    #[default]
    #[serde(alias = "user")]
    Buyer,
    /// A shop owner managing products and orders.
    Seller,
}

impl Role {
    /// Whether this role may access the seller dashboard.
    #[must_use]
    pub const fn is_seller(self) -> bool {
        matches!(self, Self::Seller)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buyer => write!(f, "buyer"),
            Self::Seller => write!(f, "seller"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" | "buyer" => Ok(Self::Buyer),
            "seller" => Ok(Self::Seller),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}
