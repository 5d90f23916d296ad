//! User store trait.

use async_trait::async_trait;
use common::UserId;
use domain::User;

use crate::Result;

/// Store for user accounts and their API tokens.
///
/// Registration and credential management live outside this system; users
/// are provisioned directly with an opaque bearer token the access gate
/// resolves.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user with their bearer token.
    async fn insert_user(&self, user: &User, token: &str) -> Result<()>;

    /// Loads a user by id.
    async fn find_user(&self, id: UserId) -> Result<Option<User>>;

    /// Resolves a bearer token to the owning user.
    async fn find_user_by_token(&self, token: &str) -> Result<Option<User>>;
}
