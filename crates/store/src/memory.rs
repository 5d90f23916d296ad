use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{BookId, OrderId, UserId};
use domain::{Book, Cart, Order, OrderStatus, User};
use tokio::sync::RwLock;

use crate::{
    BookPage, BookQuery, CartStore, CatalogStore, OrderStore, Result, StoreError, UserStore,
};

#[derive(Default)]
struct Inner {
    books: HashMap<BookId, Book>,
    carts: HashMap<UserId, Cart>,
    orders: HashMap<OrderId, Order>,
    users: HashMap<UserId, User>,
    tokens: HashMap<String, UserId>,
}

/// In-memory store implementation for testing and development.
///
/// All collections live behind a single lock, so multi-step operations
/// such as `reserve_stock` and `transition_status` are atomic with respect
/// to each other, matching the guarantees of the PostgreSQL implementation.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all records.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.books.clear();
        inner.carts.clear();
        inner.orders.clear();
        inner.users.clear();
        inner.tokens.clear();
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn insert_book(&self, book: &Book) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.books.insert(book.id, book.clone());
        Ok(())
    }

    async fn update_book(&self, book: &Book) -> Result<()> {
        let mut inner = self.inner.write().await;
        if !inner.books.contains_key(&book.id) {
            return Err(StoreError::BookNotFound(book.id));
        }
        inner.books.insert(book.id, book.clone());
        Ok(())
    }

    async fn find_book(&self, id: BookId) -> Result<Option<Book>> {
        let inner = self.inner.read().await;
        Ok(inner.books.get(&id).cloned())
    }

    async fn list_books(&self, query: BookQuery) -> Result<BookPage> {
        let inner = self.inner.read().await;

        let needle = query.search.as_deref().map(str::to_lowercase);
        let mut books: Vec<Book> = inner
            .books
            .values()
            .filter(|book| book.is_active)
            .filter(|book| match &needle {
                Some(needle) => book.title.to_lowercase().contains(needle),
                None => true,
            })
            .cloned()
            .collect();

        books.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = books.len() as u64;
        let books: Vec<Book> = books
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .collect();

        Ok(BookPage {
            books,
            total,
            page: query.page,
            limit: query.limit,
        })
    }

    async fn reserve_stock(&self, id: BookId, quantity: u32) -> Result<()> {
        let mut inner = self.inner.write().await;
        let book = inner
            .books
            .get_mut(&id)
            .ok_or(StoreError::BookNotFound(id))?;

        if book.stock < quantity {
            return Err(StoreError::StockConflict {
                book_id: id,
                available: book.stock,
            });
        }

        book.stock -= quantity;
        book.sold_count += quantity;
        Ok(())
    }

    async fn release_stock(&self, id: BookId, quantity: u32) -> Result<()> {
        let mut inner = self.inner.write().await;
        if let Some(book) = inner.books.get_mut(&id) {
            book.stock += quantity;
            book.sold_count = book.sold_count.saturating_sub(quantity);
        }
        Ok(())
    }

    async fn deactivate_book(&self, id: BookId) -> Result<()> {
        let mut inner = self.inner.write().await;
        let book = inner
            .books
            .get_mut(&id)
            .ok_or(StoreError::BookNotFound(id))?;
        book.is_active = false;
        Ok(())
    }
}

#[async_trait]
impl CartStore for InMemoryStore {
    async fn find_cart(&self, user_id: UserId) -> Result<Option<Cart>> {
        let inner = self.inner.read().await;
        Ok(inner.carts.get(&user_id).cloned())
    }

    async fn save_cart(&self, cart: &Cart) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.carts.insert(cart.user_id, cart.clone());
        Ok(())
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn insert_order(&self, order: &Order) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn find_order(&self, id: OrderId) -> Result<Option<Order>> {
        let inner = self.inner.read().await;
        Ok(inner.orders.get(&id).cloned())
    }

    async fn list_orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        let inner = self.inner.read().await;
        let mut orders: Vec<Order> = inner
            .orders
            .values()
            .filter(|order| order.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn list_orders(&self) -> Result<Vec<Order>> {
        let inner = self.inner.read().await;
        let mut orders: Vec<Order> = inner.orders.values().cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn transition_status(&self, id: OrderId, next: OrderStatus) -> Result<Order> {
        let mut inner = self.inner.write().await;
        let order = inner
            .orders
            .get_mut(&id)
            .ok_or(StoreError::OrderNotFound(id))?;

        if !order.status.can_transition_to(next) {
            return Err(StoreError::TransitionConflict {
                from: order.status,
                to: next,
            });
        }

        order.status = next;
        match next {
            OrderStatus::Delivered => order.delivered_at = Some(Utc::now()),
            OrderStatus::Cancelled => order.cancelled_at = Some(Utc::now()),
            _ => {}
        }

        Ok(order.clone())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert_user(&self, user: &User, token: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.users.insert(user.id, user.clone());
        inner.tokens.insert(token.to_string(), user.id);
        Ok(())
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn find_user_by_token(&self, token: &str) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        let user_id = match inner.tokens.get(token) {
            Some(id) => *id,
            None => return Ok(None),
        };
        Ok(inner.users.get(&user_id).cloned())
    }
}
