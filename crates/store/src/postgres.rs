use async_trait::async_trait;
use chrono::Utc;
use common::{BookId, OrderId, UserId};
use domain::{Book, Cart, Money, Order, OrderStatus, Role, User};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    BookPage, BookQuery, CartStore, CatalogStore, OrderStore, Result, StoreError, UserStore,
};

/// PostgreSQL-backed store implementation.
///
/// Books and users are stored with explicit columns. Carts and orders are
/// stored as JSONB documents, with the columns the queries filter and sort
/// on (owner, status, creation time) duplicated alongside the body.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_book(row: PgRow) -> Result<Book> {
        Ok(Book {
            id: BookId::from_uuid(row.try_get::<Uuid, _>("id")?),
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            price: Money::from_minor(row.try_get("price")?),
            discount_price: row
                .try_get::<Option<i64>, _>("discount_price")?
                .map(Money::from_minor),
            cover_image: row.try_get("cover_image")?,
            stock: row.try_get::<i32, _>("stock")? as u32,
            sold_count: row.try_get::<i32, _>("sold_count")? as u32,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_user(row: PgRow) -> Result<User> {
        let role: String = row.try_get("role")?;
        Ok(User {
            id: UserId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            role: if role == "admin" {
                Role::Admin
            } else {
                Role::Customer
            },
            is_active: row.try_get("is_active")?,
        })
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        let body: serde_json::Value = row.try_get("body")?;
        Ok(serde_json::from_value(body)?)
    }
}

#[async_trait]
impl CatalogStore for PostgresStore {
    async fn insert_book(&self, book: &Book) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO books (id, title, description, price, discount_price, cover_image, stock, sold_count, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(book.id.as_uuid())
        .bind(&book.title)
        .bind(&book.description)
        .bind(book.price.minor())
        .bind(book.discount_price.map(|price| price.minor()))
        .bind(&book.cover_image)
        .bind(book.stock as i32)
        .bind(book.sold_count as i32)
        .bind(book.is_active)
        .bind(book.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_book(&self, book: &Book) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $2, description = $3, price = $4, discount_price = $5,
                cover_image = $6, stock = $7, sold_count = $8, is_active = $9
            WHERE id = $1
            "#,
        )
        .bind(book.id.as_uuid())
        .bind(&book.title)
        .bind(&book.description)
        .bind(book.price.minor())
        .bind(book.discount_price.map(|price| price.minor()))
        .bind(&book.cover_image)
        .bind(book.stock as i32)
        .bind(book.sold_count as i32)
        .bind(book.is_active)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::BookNotFound(book.id));
        }

        Ok(())
    }

    async fn find_book(&self, id: BookId) -> Result<Option<Book>> {
        let row = sqlx::query("SELECT * FROM books WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_book).transpose()
    }

    async fn list_books(&self, query: BookQuery) -> Result<BookPage> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM books
            WHERE is_active AND ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
            "#,
        )
        .bind(query.search.as_deref())
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query(
            r#"
            SELECT * FROM books
            WHERE is_active AND ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(query.search.as_deref())
        .bind(i64::from(query.limit))
        .bind(query.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(BookPage {
            books: rows
                .into_iter()
                .map(Self::row_to_book)
                .collect::<Result<_>>()?,
            total: total as u64,
            page: query.page,
            limit: query.limit,
        })
    }

    async fn reserve_stock(&self, id: BookId, quantity: u32) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET stock = stock - $2, sold_count = sold_count + $2
            WHERE id = $1 AND stock >= $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(quantity as i32)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // The conditional update touched nothing: either the book is gone
        // or the stock ran short. Read back to tell the two apart.
        let available: Option<i32> = sqlx::query_scalar("SELECT stock FROM books WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        match available {
            Some(available) => Err(StoreError::StockConflict {
                book_id: id,
                available: available as u32,
            }),
            None => Err(StoreError::BookNotFound(id)),
        }
    }

    async fn release_stock(&self, id: BookId, quantity: u32) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE books
            SET stock = stock + $2, sold_count = GREATEST(sold_count - $2, 0)
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(quantity as i32)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn deactivate_book(&self, id: BookId) -> Result<()> {
        let result = sqlx::query("UPDATE books SET is_active = FALSE WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::BookNotFound(id));
        }

        Ok(())
    }
}

#[async_trait]
impl CartStore for PostgresStore {
    async fn find_cart(&self, user_id: UserId) -> Result<Option<Cart>> {
        let items: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT items FROM carts WHERE user_id = $1")
                .bind(user_id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        match items {
            Some(items) => Ok(Some(Cart {
                user_id,
                items: serde_json::from_value(items)?,
            })),
            None => Ok(None),
        }
    }

    async fn save_cart(&self, cart: &Cart) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO carts (user_id, items)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET items = EXCLUDED.items
            "#,
        )
        .bind(cart.user_id.as_uuid())
        .bind(serde_json::to_value(&cart.items)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl OrderStore for PostgresStore {
    async fn insert_order(&self, order: &Order) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, status, created_at, body)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.user_id.as_uuid())
        .bind(order.status.as_str())
        .bind(order.created_at)
        .bind(serde_json::to_value(order)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_order(&self, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query("SELECT body FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn list_orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        let rows = sqlx::query(
            "SELECT body FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn list_orders(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query("SELECT body FROM orders ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn transition_status(&self, id: OrderId, next: OrderStatus) -> Result<Order> {
        // The row lock makes the check-then-write a compare-and-set: a
        // racing transition waits here and then sees the new status.
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT body FROM orders WHERE id = $1 FOR UPDATE")
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await?;

        let mut order = match row {
            Some(row) => Self::row_to_order(row)?,
            None => return Err(StoreError::OrderNotFound(id)),
        };

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

        sqlx::query("UPDATE orders SET status = $2, body = $3 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(order.status.as_str())
            .bind(serde_json::to_value(&order)?)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(order)
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn insert_user(&self, user: &User, token: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, phone, role, is_active, api_token)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(if user.role.is_admin() {
            "admin"
        } else {
            "customer"
        })
        .bind(user.is_active)
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_user).transpose()
    }

    async fn find_user_by_token(&self, token: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE api_token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_user).transpose()
    }
}
