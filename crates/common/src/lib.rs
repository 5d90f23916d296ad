//! Shared types for the bookstore backend.

mod types;

pub use types::{BookId, OrderId, UserId};
