//! Value objects embedded in order records.

use chrono::{DateTime, Utc};
use common::BookId;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// One snapshot line of an order.
///
/// Title, cover image, and unit price are copied from the book at purchase
/// time and never change afterwards, even if the catalog entry does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// The referenced book (reference only, never ownership).
    pub book_id: BookId,

    /// Title at purchase time.
    pub title: String,

    /// Cover image at purchase time.
    pub cover_image: String,

    /// Unit price at purchase time, post-discount.
    pub unit_price: Money,

    /// Quantity ordered, at least 1.
    pub quantity: u32,
}

impl OrderLine {
    /// Returns the total for this line (`unit_price × quantity`).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// Shipping destination captured with the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Recipient full name.
    pub full_name: String,

    /// Recipient phone number.
    pub phone: String,

    /// Street address.
    pub address: String,

    /// City.
    pub city: String,

    /// Country, defaulting to the store's home market.
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "Việt Nam".to_string()
}

/// Accepted payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[serde(rename = "COD")]
    Cod,
    /// Card payment.
    Card,
    /// VNPay gateway.
    #[serde(rename = "VNPay")]
    VnPay,
    /// PayPal.
    PayPal,
}

/// Payment transaction details, filled in after capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PaymentInfo {
    /// Gateway transaction id.
    pub transaction_id: Option<String>,

    /// Gateway status string.
    pub status: Option<String>,

    /// When the payment was captured.
    pub paid_at: Option<DateTime<Utc>>,
}
