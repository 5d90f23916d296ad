//! Cart store trait.

use async_trait::async_trait;
use common::UserId;
use domain::Cart;

use crate::Result;

/// Store for shopping carts, one per user.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Loads the cart owned by `user_id`, if one has been created.
    async fn find_cart(&self, user_id: UserId) -> Result<Option<Cart>>;

    /// Saves a cart, inserting or replacing the user's single cart record.
    async fn save_cart(&self, cart: &Cart) -> Result<()>;
}
