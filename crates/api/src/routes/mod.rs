//! HTTP route handlers.

use checkout::{CartService, CheckoutService};
use store::Store;

pub mod books;
pub mod cart;
pub mod health;
pub mod metrics;
pub mod orders;

/// Shared application state accessible from all handlers.
pub struct AppState<S: Store> {
    pub store: S,
    pub carts: CartService<S>,
    pub checkout: CheckoutService<S>,
}
