//! Shopping carts.

use common::{BookId, UserId};
use serde::{Deserialize, Serialize};

/// A (book, quantity) pair within a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// The referenced book.
    pub book_id: BookId,

    /// Quantity, always at least 1 once persisted.
    pub quantity: u32,
}

/// A user's shopping cart.
///
/// One cart per user. Line items never reference the same book twice:
/// additions merge into the existing line. A cart is created lazily on
/// first access and emptied rather than deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    /// The owning user.
    pub user_id: UserId,

    /// Line items, at most one per book.
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Creates an empty cart for a user.
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            items: Vec::new(),
        }
    }

    /// Returns the line item for a book, if present.
    pub fn item(&self, book_id: BookId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.book_id == book_id)
    }

    /// Returns true if the cart has no line items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Merges `quantity` into the line for `book_id`, inserting a new line
    /// if absent. Returns the resulting line quantity. The merged quantity
    /// saturates rather than overflowing.
    ///
    /// The caller validates the returned quantity against current stock
    /// before persisting.
    pub fn merge_item(&mut self, book_id: BookId, quantity: u32) -> u32 {
        if let Some(item) = self.items.iter_mut().find(|item| item.book_id == book_id) {
            item.quantity = item.quantity.saturating_add(quantity);
            item.quantity
        } else {
            self.items.push(CartItem { book_id, quantity });
            quantity
        }
    }

    /// Sets the absolute quantity for an existing line. Returns false if
    /// the book is not in the cart.
    pub fn set_quantity(&mut self, book_id: BookId, quantity: u32) -> bool {
        match self.items.iter_mut().find(|item| item.book_id == book_id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Removes the line for a book. Removing an absent line is a no-op.
    pub fn remove_item(&mut self, book_id: BookId) {
        self.items.retain(|item| item.book_id != book_id);
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_inserts_then_accumulates() {
        let mut cart = Cart::empty(UserId::new());
        let book = BookId::new();

        assert_eq!(cart.merge_item(book, 2), 2);
        assert_eq!(cart.merge_item(book, 3), 5);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.item(book).unwrap().quantity, 5);
    }

    #[test]
    fn merge_saturates_instead_of_overflowing() {
        let mut cart = Cart::empty(UserId::new());
        let book = BookId::new();
        cart.merge_item(book, 2);

        assert_eq!(cart.merge_item(book, u32::MAX), u32::MAX);
        assert_eq!(cart.item(book).unwrap().quantity, u32::MAX);
    }

    #[test]
    fn no_duplicate_lines_for_same_book() {
        let mut cart = Cart::empty(UserId::new());
        let book = BookId::new();
        cart.merge_item(book, 1);
        cart.merge_item(book, 1);

        assert_eq!(cart.items.len(), 1);
    }

    #[test]
    fn set_quantity_requires_existing_line() {
        let mut cart = Cart::empty(UserId::new());
        let book = BookId::new();

        assert!(!cart.set_quantity(book, 3));

        cart.merge_item(book, 1);
        assert!(cart.set_quantity(book, 3));
        assert_eq!(cart.item(book).unwrap().quantity, 3);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut cart = Cart::empty(UserId::new());
        let book = BookId::new();
        cart.merge_item(book, 2);

        cart.remove_item(book);
        assert!(cart.is_empty());

        // Removing again succeeds silently.
        cart.remove_item(book);
        assert!(cart.is_empty());
    }

    #[test]
    fn clear_empties_the_cart() {
        let mut cart = Cart::empty(UserId::new());
        cart.merge_item(BookId::new(), 1);
        cart.merge_item(BookId::new(), 4);

        cart.clear();
        assert!(cart.is_empty());

        // Clearing an empty cart succeeds silently.
        cart.clear();
        assert!(cart.is_empty());
    }
}
