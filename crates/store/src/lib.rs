//! Persistence layer for the bookstore backend.
//!
//! Four store traits form the seam between the workflow and the database:
//! [`CatalogStore`], [`CartStore`], [`OrderStore`], and [`UserStore`],
//! combined as [`Store`]. Two implementations are provided: an in-memory
//! store for tests and development, and a PostgreSQL store.
//!
//! The two operations with real invariants are first-class store calls
//! rather than read-then-write sequences: stock reservation is one
//! conditional update, and status transitions are one compare-and-set.

mod carts;
mod catalog;
mod error;
mod memory;
mod orders;
mod postgres;
mod users;

pub use carts::CartStore;
pub use catalog::{BookPage, BookQuery, CatalogStore};
pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use orders::OrderStore;
pub use postgres::PostgresStore;
pub use users::UserStore;

/// Everything the workflow needs from persistence, in one bound.
pub trait Store: CatalogStore + CartStore + OrderStore + UserStore {}

impl<T: CatalogStore + CartStore + OrderStore + UserStore> Store for T {}
