//! User accounts as seen by the order workflow.
//!
//! Registration, login, and password handling live outside this system;
//! only the fields the access gate and the display summaries need are
//! modelled here.

use common::UserId;
use serde::{Deserialize, Serialize};

/// Access role attached to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular shopper: owns a cart and their own orders.
    #[default]
    Customer,

    /// Administrator: catalog writes, all orders, status transitions.
    Admin,
}

impl Role {
    /// Returns true for administrator accounts.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,

    /// Display name.
    pub name: String,

    /// Contact email.
    pub email: String,

    /// Contact phone number.
    pub phone: String,

    /// Access role.
    pub role: Role,

    /// Disabled accounts authenticate but are rejected by the access gate.
    pub is_active: bool,
}

impl User {
    /// Creates a new active customer account.
    pub fn customer(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            role: Role::Customer,
            is_active: true,
        }
    }

    /// Creates a new active administrator account.
    pub fn admin(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Admin,
            ..Self::customer(name, email, phone)
        }
    }

    /// Returns true for administrator accounts.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
