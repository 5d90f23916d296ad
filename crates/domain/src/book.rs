//! Catalog entries.

use chrono::{DateTime, Utc};
use common::BookId;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// A book in the catalog.
///
/// `stock` and `sold_count` are shared mutable state contended by concurrent
/// order placements; they are only ever changed through the store's atomic
/// reserve/release operations, never by writing the whole record back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Unique book identifier.
    pub id: BookId,

    /// Title, unique within the catalog.
    pub title: String,

    /// Free-text description.
    pub description: String,

    /// Base price.
    pub price: Money,

    /// Promotional price; must be strictly below `price` when set.
    pub discount_price: Option<Money>,

    /// Cover image path for display.
    pub cover_image: String,

    /// Units available for sale.
    pub stock: u32,

    /// Units sold across all non-cancelled orders.
    pub sold_count: u32,

    /// Soft-delete flag; inactive books are hidden from the public catalog
    /// and cannot be added to carts.
    pub is_active: bool,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Errors raised when validating a catalog entry.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BookError {
    /// Title must not be empty.
    #[error("Book title must not be empty")]
    EmptyTitle,

    /// Base price must not be negative.
    #[error("Price must not be negative: {price}")]
    NegativePrice { price: i64 },

    /// Discount price must be strictly below the base price.
    #[error("Discount price {discount} must be below the base price {price}")]
    DiscountNotBelowPrice { discount: i64, price: i64 },
}

impl Book {
    /// Creates a new active book with zero sold count, validating the
    /// price invariants.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        discount_price: Option<Money>,
        cover_image: impl Into<String>,
        stock: u32,
    ) -> Result<Self, BookError> {
        let title = title.into();
        Self::validate(&title, price, discount_price)?;

        Ok(Self {
            id: BookId::new(),
            title,
            description: description.into(),
            price,
            discount_price,
            cover_image: cover_image.into(),
            stock,
            sold_count: 0,
            is_active: true,
            created_at: Utc::now(),
        })
    }

    /// Validates the title and price invariants.
    pub fn validate(
        title: &str,
        price: Money,
        discount_price: Option<Money>,
    ) -> Result<(), BookError> {
        if title.trim().is_empty() {
            return Err(BookError::EmptyTitle);
        }

        if price.is_negative() {
            return Err(BookError::NegativePrice {
                price: price.minor(),
            });
        }

        if let Some(discount) = discount_price {
            if discount.is_negative() {
                return Err(BookError::NegativePrice {
                    price: discount.minor(),
                });
            }
            if discount >= price {
                return Err(BookError::DiscountNotBelowPrice {
                    discount: discount.minor(),
                    price: price.minor(),
                });
            }
        }

        Ok(())
    }

    /// Returns the effective unit price: the discount price when set,
    /// the base price otherwise.
    pub fn unit_price(&self) -> Money {
        self.discount_price.unwrap_or(self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(price: i64, discount: Option<i64>) -> Result<Book, BookError> {
        Book::new(
            "Dế Mèn Phiêu Lưu Ký",
            "Classic",
            Money::from_minor(price),
            discount.map(Money::from_minor),
            "de-men.jpg",
            10,
        )
    }

    #[test]
    fn new_book_is_active_with_zero_sales() {
        let book = book(100_000, None).unwrap();
        assert!(book.is_active);
        assert_eq!(book.sold_count, 0);
        assert_eq!(book.stock, 10);
    }

    #[test]
    fn unit_price_prefers_discount() {
        let discounted = book(100_000, Some(85_000)).unwrap();
        assert_eq!(discounted.unit_price().minor(), 85_000);

        let plain = book(100_000, None).unwrap();
        assert_eq!(plain.unit_price().minor(), 100_000);
    }

    #[test]
    fn discount_must_be_strictly_below_price() {
        assert!(matches!(
            book(100_000, Some(100_000)),
            Err(BookError::DiscountNotBelowPrice { .. })
        ));
        assert!(book(100_000, Some(99_999)).is_ok());
    }

    #[test]
    fn negative_prices_rejected() {
        assert!(matches!(
            book(-1, None),
            Err(BookError::NegativePrice { .. })
        ));
        assert!(matches!(
            book(100_000, Some(-1)),
            Err(BookError::NegativePrice { .. })
        ));
    }

    #[test]
    fn empty_title_rejected() {
        let result = Book::new(
            "   ",
            "desc",
            Money::from_minor(1),
            None,
            "cover.jpg",
            0,
        );
        assert_eq!(result.unwrap_err(), BookError::EmptyTitle);
    }
}
