//! The order record.

use chrono::{DateTime, Utc};
use common::{OrderId, UserId};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::pricing::Totals;

use super::{OrderLine, OrderStatus, PaymentInfo, PaymentMethod, ShippingAddress};

/// An order: an immutable snapshot of a cart at purchase time.
///
/// Everything except `status`, `payment_info`, and the two timestamps is
/// frozen at creation. The order references the books it snapshots but
/// never owns them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,

    /// The user who placed the order.
    pub user_id: UserId,

    /// Snapshot lines, one per distinct book in the cart.
    pub lines: Vec<OrderLine>,

    /// Shipping destination.
    pub shipping_address: ShippingAddress,

    /// How the order is paid for.
    pub payment_method: PaymentMethod,

    /// Sum of `unit_price × quantity` over the lines.
    pub items_price: Money,

    /// Flat fee, waived above the free-shipping threshold.
    pub shipping_price: Money,

    /// Flat-rate tax on the items price.
    pub tax_price: Money,

    /// `items_price + shipping_price + tax_price`.
    pub total_price: Money,

    /// Current fulfilment status.
    pub status: OrderStatus,

    /// Free-text note from the customer.
    pub notes: Option<String>,

    /// Payment transaction details once captured.
    pub payment_info: Option<PaymentInfo>,

    /// When the order was placed.
    pub created_at: DateTime<Utc>,

    /// Stamped when the status reaches `Delivered`.
    pub delivered_at: Option<DateTime<Utc>>,

    /// Stamped when the status reaches `Cancelled`.
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Creates a new `Pending` order from snapshot lines and computed totals.
    pub fn place(
        user_id: UserId,
        lines: Vec<OrderLine>,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
        notes: Option<String>,
        totals: Totals,
    ) -> Self {
        Self {
            id: OrderId::new(),
            user_id,
            lines,
            shipping_address,
            payment_method,
            items_price: totals.items_price,
            shipping_price: totals.shipping_price,
            tax_price: totals.tax_price,
            total_price: totals.total_price,
            status: OrderStatus::Pending,
            notes,
            payment_info: None,
            created_at: Utc::now(),
            delivered_at: None,
            cancelled_at: None,
        }
    }

    /// Returns true if `user_id` placed this order.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use common::BookId;

    use crate::pricing;

    use super::*;

    fn sample_lines() -> Vec<OrderLine> {
        vec![
            OrderLine {
                book_id: BookId::new(),
                title: "Tắt Đèn".to_string(),
                cover_image: "tat-den.jpg".to_string(),
                unit_price: Money::from_minor(85_000),
                quantity: 2,
            },
            OrderLine {
                book_id: BookId::new(),
                title: "Lão Hạc".to_string(),
                cover_image: "lao-hac.jpg".to_string(),
                unit_price: Money::from_minor(60_000),
                quantity: 1,
            },
        ]
    }

    fn sample_address() -> ShippingAddress {
        ShippingAddress {
            full_name: "Trần Thị B".to_string(),
            phone: "0909876543".to_string(),
            address: "12 Nguyễn Huệ".to_string(),
            city: "Đà Nẵng".to_string(),
            country: "Việt Nam".to_string(),
        }
    }

    #[test]
    fn placed_order_starts_pending_with_totals() {
        let lines = sample_lines();
        let totals = pricing::quote(&lines);
        let order = Order::place(
            UserId::new(),
            lines.clone(),
            sample_address(),
            PaymentMethod::Cod,
            None,
            totals,
        );

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.items_price.minor(), 230_000);
        assert_eq!(
            order.total_price,
            order.items_price + order.shipping_price + order.tax_price
        );
        assert!(order.delivered_at.is_none());
        assert!(order.cancelled_at.is_none());
        assert!(order.payment_info.is_none());
    }

    #[test]
    fn ownership_check() {
        let user_id = UserId::new();
        let lines = sample_lines();
        let totals = pricing::quote(&lines);
        let order = Order::place(
            user_id,
            lines,
            sample_address(),
            PaymentMethod::Card,
            Some("Giao giờ hành chính".to_string()),
            totals,
        );

        assert!(order.is_owned_by(user_id));
        assert!(!order.is_owned_by(UserId::new()));
    }

    #[test]
    fn total_quantity_sums_lines() {
        let lines = sample_lines();
        let totals = pricing::quote(&lines);
        let order = Order::place(
            UserId::new(),
            lines,
            sample_address(),
            PaymentMethod::Cod,
            None,
            totals,
        );
        assert_eq!(order.total_quantity(), 3);
    }
}
