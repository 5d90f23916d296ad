//! Order store trait.

use async_trait::async_trait;
use common::{OrderId, UserId};
use domain::{Order, OrderStatus};

use crate::Result;

/// Store for order records.
///
/// `transition_status` is a compare-and-set: the state machine check and
/// the write happen under the store's lock or transaction, so two racing
/// transitions cannot both succeed.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts a newly placed order.
    async fn insert_order(&self, order: &Order) -> Result<()>;

    /// Loads an order by id.
    async fn find_order(&self, id: OrderId) -> Result<Option<Order>>;

    /// Lists a user's orders, newest first.
    async fn list_orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>>;

    /// Lists all orders, newest first.
    async fn list_orders(&self) -> Result<Vec<Order>>;

    /// Atomically moves an order to `next` if the transition is legal from
    /// its current status, stamping `delivered_at`/`cancelled_at` as
    /// appropriate. Returns the updated order.
    ///
    /// Fails with `OrderNotFound` for a missing order and
    /// `TransitionConflict` (carrying the current status) when the state
    /// machine rejects the move.
    async fn transition_status(&self, id: OrderId, next: OrderStatus) -> Result<Order>;
}
