//! Domain layer for the bookstore backend.
//!
//! This crate provides the core domain types:
//! - `Money` with integer minor-unit arithmetic
//! - `Book` catalog entries with stock and sold-count invariants
//! - `Cart` with merged, stock-bounded line items
//! - `Order` snapshots with the `OrderStatus` state machine
//! - pricing rules for shipping, tax, and totals

pub mod book;
pub mod cart;
pub mod money;
pub mod order;
pub mod pricing;
pub mod user;

pub use book::{Book, BookError};
pub use cart::{Cart, CartItem};
pub use money::Money;
pub use order::{
    Order, OrderError, OrderLine, OrderStatus, PaymentInfo, PaymentMethod, ShippingAddress,
};
pub use pricing::Totals;
pub use user::{Role, User};
