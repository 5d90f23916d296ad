//! Read models returned by the workflows.

use common::BookId;
use domain::{Money, Order, User};
use serde::Serialize;

/// The subset of the owning account shown alongside an order.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerSummary {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl From<User> for CustomerSummary {
    fn from(user: User) -> Self {
        Self {
            name: user.name,
            email: user.email,
            phone: user.phone,
        }
    }
}

/// An order together with its owner's contact details.
///
/// The summary is absent when the owning account has since been removed;
/// the order itself carries everything needed to display it.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub customer: Option<CustomerSummary>,
}

/// One cart line joined with the current catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub book_id: BookId,
    pub title: String,
    pub cover_image: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub line_total: Money,
    /// Units currently in stock, shown so the client can cap the quantity
    /// picker before the server rejects the change.
    pub available: u32,
}

/// A cart as displayed to its owner.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub items_price: Money,
}
