//! Cart and checkout workflows for the bookstore backend.
//!
//! Two services sit between the HTTP layer and the stores:
//! [`CartService`] for stock-checked cart mutations, and
//! [`CheckoutService`] for order placement, status transitions, and
//! cancellation with compensating stock restoration.

mod cart;
mod error;
mod service;
mod views;

pub use cart::CartService;
pub use error::{CheckoutError, Result};
pub use service::{CheckoutService, PlaceOrder};
pub use views::{CartLine, CartView, CustomerSummary, OrderDetails};
