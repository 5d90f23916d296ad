//! Catalog store trait and query types.

use async_trait::async_trait;
use common::BookId;
use domain::Book;

use crate::Result;

/// Pagination and filtering for catalog listings.
///
/// Only active books are returned; the soft-delete flag is filtered here,
/// at the query boundary, so workflow code never has to re-check it.
#[derive(Debug, Clone)]
pub struct BookQuery {
    /// 1-based page number.
    pub page: u32,

    /// Page size.
    pub limit: u32,

    /// Case-insensitive substring match on the title.
    pub search: Option<String>,
}

impl Default for BookQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 12,
            search: None,
        }
    }
}

impl BookQuery {
    /// Returns the number of records to skip for this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// One page of catalog results.
#[derive(Debug, Clone)]
pub struct BookPage {
    /// Books on this page, newest first.
    pub books: Vec<Book>,

    /// Total matching books across all pages.
    pub total: u64,

    /// The page that was requested.
    pub page: u32,

    /// The page size that was requested.
    pub limit: u32,
}

impl BookPage {
    /// Returns the total number of pages.
    pub fn pages(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.limit))
    }
}

/// Store for catalog entries.
///
/// `reserve_stock` is the single invariant-preserving mutation of the two
/// contended counters: it decrements `stock` and increments `sold_count`
/// atomically, and only when enough stock is available. Callers never
/// read-then-write stock themselves.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Inserts a new book.
    async fn insert_book(&self, book: &Book) -> Result<()>;

    /// Replaces an existing book record.
    ///
    /// Fails with `BookNotFound` if the book does not exist.
    async fn update_book(&self, book: &Book) -> Result<()>;

    /// Loads a book by id.
    async fn find_book(&self, id: BookId) -> Result<Option<Book>>;

    /// Lists active books with pagination and optional title search.
    async fn list_books(&self, query: BookQuery) -> Result<BookPage>;

    /// Atomically decrements stock and increments sold count by `quantity`,
    /// but only if `stock >= quantity`.
    ///
    /// Fails with `StockConflict` (carrying the available count) when the
    /// condition does not hold, and `BookNotFound` for a missing book.
    async fn reserve_stock(&self, id: BookId, quantity: u32) -> Result<()>;

    /// Compensating action for `reserve_stock`: increments stock and
    /// decrements sold count by `quantity`.
    ///
    /// A missing book is ignored so that cancellation can always finish
    /// restoring the remaining lines.
    async fn release_stock(&self, id: BookId, quantity: u32) -> Result<()>;

    /// Soft-deletes a book by clearing its active flag.
    async fn deactivate_book(&self, id: BookId) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_query_is_first_page_of_twelve() {
        let query = BookQuery::default();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 12);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn offset_skips_previous_pages() {
        let query = BookQuery {
            page: 3,
            limit: 12,
            search: None,
        };
        assert_eq!(query.offset(), 24);
    }

    #[test]
    fn page_count_rounds_up() {
        let page = BookPage {
            books: vec![],
            total: 25,
            page: 1,
            limit: 12,
        };
        assert_eq!(page.pages(), 3);
    }
}
