//! Seller home statistics.

use serde::Serialize;

use crate::types::TransactionStatus;

/// Counters shown on the seller home page ("Penting Hari Ini").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SellerStats {
    /// Paid transactions waiting to be processed.
    pub new_orders: u64,
    /// Processed transactions waiting for pickup.
    pub ready_to_ship: u64,
    /// Unread chats. Chat is not wired to the API, so this stays zero.
    pub new_chats: u64,
    /// Completed transactions.
    pub total_sales: u64,
}

/// A labelled counter card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: u64,
}

impl SellerStats {
    /// Count transactions by status. Statuses other than Paid, Processed and
    /// Completed are ignored.
    #[must_use]
    pub fn from_statuses<'a, I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = &'a TransactionStatus>,
    {
        statuses
            .into_iter()
            .fold(Self::default(), |mut acc, status| {
                match status {
                    TransactionStatus::Paid => acc.new_orders += 1,
                    TransactionStatus::Processed => acc.ready_to_ship += 1,
                    TransactionStatus::Completed => acc.total_sales += 1,
                    TransactionStatus::Other(_) => {}
                }
                acc
            })
    }

    /// Cards in display order.
    #[must_use]
    pub const fn cards(&self) -> [StatCard; 4] {
        [
            StatCard {
                label: "Pesanan Baru",
                value: self.new_orders,
            },
            StatCard {
                label: "Siap Terkirim",
                value: self.ready_to_ship,
            },
            StatCard {
                label: "Chat Baru",
                value: self.new_chats,
            },
            StatCard {
                label: "Total Sales",
                value: self.total_sales,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_status() {
        let statuses = vec![
            TransactionStatus::Paid,
            TransactionStatus::Paid,
            TransactionStatus::Processed,
            TransactionStatus::Completed,
            TransactionStatus::Completed,
            TransactionStatus::Completed,
            TransactionStatus::Other("Cancelled".to_string()),
        ];

        let stats = SellerStats::from_statuses(&statuses);
        assert_eq!(
            stats,
            SellerStats {
                new_orders: 2,
                ready_to_ship: 1,
                new_chats: 0,
                total_sales: 3,
            }
        );
    }

    #[test]
    fn test_empty_is_all_zero() {
        assert_eq!(SellerStats::from_statuses(&[]), SellerStats::default());
    }

    #[test]
    fn test_card_order() {
        let stats = SellerStats {
            new_orders: 4,
            ready_to_ship: 2,
            new_chats: 0,
            total_sales: 9,
        };
        let cards = stats.cards();
        let labels: Vec<_> = cards.iter().map(|c| c.label).collect();
        assert_eq!(
            labels,
            vec!["Pesanan Baru", "Siap Terkirim", "Chat Baru", "Total Sales"]
        );
        let values: Vec<_> = cards.iter().map(|c| c.value).collect();
        assert_eq!(values, vec![4, 2, 0, 9]);
    }
}
