//! Cart workflow: stock-checked additions, quantity updates, and removal.

use common::{BookId, UserId};
use domain::{Book, Cart, Money};
use store::Store;

use crate::error::{CheckoutError, Result};
use crate::views::{CartLine, CartView};

/// Cart operations for a single user.
///
/// Every mutation re-validates against current stock before persisting, and
/// leaves the stored cart untouched when validation fails. Carts are created
/// lazily: reading a user's cart before their first addition yields an
/// empty view.
pub struct CartService<S: Store> {
    store: S,
}

impl<S: Store> CartService<S> {
    /// Creates a new cart service backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    async fn load_or_empty(&self, user_id: UserId) -> Result<Cart> {
        Ok(self
            .store
            .find_cart(user_id)
            .await?
            .unwrap_or_else(|| Cart::empty(user_id)))
    }

    /// Loads an active book for a cart mutation.
    async fn sellable_book(&self, book_id: BookId) -> Result<Book> {
        let book = self
            .store
            .find_book(book_id)
            .await?
            .ok_or(CheckoutError::BookNotFound)?;

        if !book.is_active {
            return Err(CheckoutError::BookUnavailable);
        }

        Ok(book)
    }

    fn check_stock(book: &Book, requested: u32) -> Result<()> {
        if book.stock == 0 {
            return Err(CheckoutError::OutOfStock {
                title: book.title.clone(),
            });
        }
        if requested > book.stock {
            return Err(CheckoutError::InsufficientStock {
                title: book.title.clone(),
                available: book.stock,
            });
        }
        Ok(())
    }

    /// Returns the user's cart joined with current catalog entries.
    ///
    /// Lines whose book has been removed or deactivated since it was added
    /// are hidden from the view rather than failing the whole cart.
    pub async fn get_cart(&self, user_id: UserId) -> Result<CartView> {
        let cart = self.load_or_empty(user_id).await?;

        let mut items = Vec::with_capacity(cart.items.len());
        for item in &cart.items {
            let book = match self.store.find_book(item.book_id).await? {
                Some(book) if book.is_active => book,
                _ => continue,
            };

            items.push(CartLine {
                book_id: book.id,
                title: book.title.clone(),
                cover_image: book.cover_image.clone(),
                unit_price: book.unit_price(),
                quantity: item.quantity,
                line_total: book.unit_price().multiply(item.quantity),
                available: book.stock,
            });
        }

        let items_price = items
            .iter()
            .fold(Money::zero(), |sum, line| sum + line.line_total);

        Ok(CartView { items, items_price })
    }

    /// Adds `quantity` of a book, merging into any existing line.
    ///
    /// The merged quantity is checked against current stock; on failure the
    /// stored cart is left unchanged.
    #[tracing::instrument(skip(self))]
    pub async fn add_item(
        &self,
        user_id: UserId,
        book_id: BookId,
        quantity: u32,
    ) -> Result<CartView> {
        if quantity == 0 {
            return Err(CheckoutError::InvalidQuantity);
        }

        let book = self.sellable_book(book_id).await?;

        let mut cart = self.load_or_empty(user_id).await?;
        let merged = cart.merge_item(book_id, quantity);
        Self::check_stock(&book, merged)?;

        self.store.save_cart(&cart).await?;
        self.get_cart(user_id).await
    }

    /// Sets the absolute quantity of an existing line.
    #[tracing::instrument(skip(self))]
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        book_id: BookId,
        quantity: u32,
    ) -> Result<CartView> {
        if quantity == 0 {
            return Err(CheckoutError::InvalidQuantity);
        }

        let book = self.sellable_book(book_id).await?;

        let mut cart = self.load_or_empty(user_id).await?;
        if !cart.set_quantity(book_id, quantity) {
            return Err(CheckoutError::ItemNotFound);
        }
        Self::check_stock(&book, quantity)?;

        self.store.save_cart(&cart).await?;
        self.get_cart(user_id).await
    }

    /// Removes a book's line from the cart. Removing an absent line
    /// succeeds silently.
    #[tracing::instrument(skip(self))]
    pub async fn remove_item(&self, user_id: UserId, book_id: BookId) -> Result<CartView> {
        let mut cart = self.load_or_empty(user_id).await?;
        cart.remove_item(book_id);
        self.store.save_cart(&cart).await?;
        self.get_cart(user_id).await
    }

    /// Empties the cart.
    #[tracing::instrument(skip(self))]
    pub async fn clear(&self, user_id: UserId) -> Result<()> {
        let mut cart = self.load_or_empty(user_id).await?;
        cart.clear();
        self.store.save_cart(&cart).await?;
        Ok(())
    }
}
