use common::{BookId, OrderId};
use domain::OrderStatus;
use thiserror::Error;

/// Errors that can occur when interacting with the stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The book does not exist.
    #[error("Book not found: {0}")]
    BookNotFound(BookId),

    /// The order does not exist.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// A stock reservation failed because fewer units are available than
    /// were requested. Carries the current stock count for display.
    #[error("Insufficient stock for book {book_id}: {available} available")]
    StockConflict { book_id: BookId, available: u32 },

    /// A status compare-and-set failed because the transition is not legal
    /// from the order's current state.
    #[error("Invalid status transition: {from} -> {to}")]
    TransitionConflict { from: OrderStatus, to: OrderStatus },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
