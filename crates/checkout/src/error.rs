use domain::{OrderError, OrderStatus};
use store::StoreError;
use thiserror::Error;

/// Errors surfaced by the cart and checkout workflows.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// An order cannot be placed from an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// The book has some stock, but less than was requested.
    #[error("Only {available} left of \"{title}\"")]
    InsufficientStock { title: String, available: u32 },

    /// The book is completely sold out.
    #[error("\"{title}\" is out of stock")]
    OutOfStock { title: String },

    /// The book does not exist.
    #[error("Book not found")]
    BookNotFound,

    /// The book exists but has been removed from sale.
    #[error("Book is no longer available")]
    BookUnavailable,

    /// The cart has no line for the given book.
    #[error("Item not in cart")]
    ItemNotFound,

    /// Quantities must be at least one.
    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    /// The order does not exist.
    #[error("Order not found")]
    OrderNotFound,

    /// The caller is neither the order's owner nor an administrator.
    #[error("Not allowed to access this order")]
    Forbidden,

    /// The requested status is not a recognised order status.
    #[error("Invalid order status: {value}")]
    InvalidStatus { value: String },

    /// The order has already been cancelled.
    #[error("Order is already cancelled")]
    AlreadyCancelled,

    /// The status change is not legal from the order's current state.
    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<OrderError> for CheckoutError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::InvalidStatus { value } => CheckoutError::InvalidStatus { value },
            OrderError::AlreadyCancelled => CheckoutError::AlreadyCancelled,
            OrderError::InvalidTransition { from, to } => {
                CheckoutError::InvalidTransition { from, to }
            }
        }
    }
}

/// Result type for workflow operations.
pub type Result<T> = std::result::Result<T, CheckoutError>;
