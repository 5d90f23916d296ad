//! Pricing rules for order totals.
//!
//! All amounts are integer minor units; the only rounding point is the
//! tax computation, which rounds half up (see [`Money::percent`]).

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::order::OrderLine;

/// Orders above this items price ship for free.
pub const FREE_SHIPPING_THRESHOLD: Money = Money::from_minor(500_000);

/// Flat shipping fee below the free-shipping threshold.
pub const FLAT_SHIPPING_FEE: Money = Money::from_minor(30_000);

/// Flat tax rate applied to the items price, in percent.
pub const TAX_RATE_PERCENT: u32 = 10;

/// Computed totals for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of `unit_price × quantity` over the lines.
    pub items_price: Money,

    /// Zero above the free-shipping threshold, the flat fee otherwise.
    pub shipping_price: Money,

    /// `TAX_RATE_PERCENT` of the items price, rounded half up.
    pub tax_price: Money,

    /// `items_price + shipping_price + tax_price`.
    pub total_price: Money,
}

/// Computes the totals for a set of order lines.
pub fn quote(lines: &[OrderLine]) -> Totals {
    let items_price = lines
        .iter()
        .fold(Money::zero(), |total, line| total + line.line_total());

    let shipping_price = if items_price > FREE_SHIPPING_THRESHOLD {
        Money::zero()
    } else {
        FLAT_SHIPPING_FEE
    };

    let tax_price = items_price.percent(TAX_RATE_PERCENT);

    Totals {
        items_price,
        shipping_price,
        tax_price,
        total_price: items_price + shipping_price + tax_price,
    }
}
