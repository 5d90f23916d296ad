//! Orders and their lifecycle.

mod record;
mod status;
mod value_objects;

pub use record::Order;
pub use status::OrderStatus;
pub use value_objects::{OrderLine, PaymentInfo, PaymentMethod, ShippingAddress};

use thiserror::Error;

/// Errors raised by the order status state machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// The status value is not one of the known states.
    #[error("Invalid order status: {value}")]
    InvalidStatus { value: String },

    /// The requested transition is not legal from the current state.
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// The order was already cancelled.
    #[error("Order has already been cancelled")]
    AlreadyCancelled,
}
