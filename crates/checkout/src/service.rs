//! Order placement and lifecycle workflow.

use common::{OrderId, UserId};
use domain::{
    Order, OrderLine, OrderStatus, PaymentMethod, ShippingAddress, User, pricing,
};
use store::{Store, StoreError};

use crate::error::{CheckoutError, Result};
use crate::views::{CustomerSummary, OrderDetails};

/// Everything the buyer supplies at checkout; the prices come from the
/// catalog, never from the client.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

/// Drives orders through placement, fulfilment, and cancellation.
///
/// Placement reserves stock line by line and compensates already-reserved
/// lines when a later line fails, so a failed checkout never leaks
/// reservations. Cancellation runs the reverse: the status compare-and-set
/// goes first, so the stock restoration can only ever run once per order.
pub struct CheckoutService<S: Store> {
    store: S,
}

impl<S: Store> CheckoutService<S> {
    /// Creates a new checkout service backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Places an order from the user's cart.
    ///
    /// Snapshots each cart line at its current effective price, reserves
    /// stock for every line, computes the totals, persists the order, and
    /// empties the cart.
    #[tracing::instrument(skip(self, request))]
    pub async fn place_order(&self, user_id: UserId, request: PlaceOrder) -> Result<Order> {
        metrics::counter!("order_placements_total").increment(1);
        let start = std::time::Instant::now();

        let cart = self
            .store
            .find_cart(user_id)
            .await?
            .filter(|cart| !cart.is_empty())
            .ok_or(CheckoutError::EmptyCart)?;

        // Snapshot the lines before touching stock so a validation failure
        // costs nothing to undo.
        let mut lines = Vec::with_capacity(cart.items.len());
        for item in &cart.items {
            let book = self
                .store
                .find_book(item.book_id)
                .await?
                .ok_or(CheckoutError::BookNotFound)?;

            if !book.is_active {
                return Err(CheckoutError::BookUnavailable);
            }

            let unit_price = book.unit_price();
            lines.push(OrderLine {
                book_id: book.id,
                title: book.title,
                cover_image: book.cover_image,
                unit_price,
                quantity: item.quantity,
            });
        }

        // Reserve stock line by line, compensating on the first failure.
        let mut reserved: Vec<&OrderLine> = Vec::with_capacity(lines.len());
        for line in &lines {
            match self.store.reserve_stock(line.book_id, line.quantity).await {
                Ok(()) => reserved.push(line),
                Err(err) => {
                    self.release_lines(reserved.into_iter()).await;
                    metrics::counter!("order_placements_failed").increment(1);
                    tracing::warn!(%user_id, book_id = %line.book_id, "order placement failed, reservations rolled back");
                    return Err(Self::map_stock_error(err, &line.title));
                }
            }
        }

        let totals = pricing::quote(&lines);
        let order = Order::place(
            user_id,
            lines,
            request.shipping_address,
            request.payment_method,
            request.notes,
            totals,
        );

        if let Err(err) = self.store.insert_order(&order).await {
            self.release_lines(order.lines.iter()).await;
            metrics::counter!("order_placements_failed").increment(1);
            return Err(err.into());
        }

        let mut emptied = cart;
        emptied.clear();
        self.store.save_cart(&emptied).await?;

        let duration = start.elapsed().as_secs_f64();
        metrics::histogram!("order_placement_duration_seconds").record(duration);
        metrics::counter!("orders_placed").increment(1);
        tracing::info!(order_id = %order.id, %user_id, total = %order.total_price, "order placed");

        Ok(order)
    }

    /// Cancels an order on behalf of its owner or an administrator,
    /// restoring the stock of every line.
    #[tracing::instrument(skip(self, caller), fields(caller_id = %caller.id))]
    pub async fn cancel_order(&self, caller: &User, order_id: OrderId) -> Result<Order> {
        let order = self
            .store
            .find_order(order_id)
            .await?
            .ok_or(CheckoutError::OrderNotFound)?;

        if !order.is_owned_by(caller.id) && !caller.is_admin() {
            return Err(CheckoutError::Forbidden);
        }

        self.cancel_and_restore(order).await
    }

    /// Moves an order to a new status.
    ///
    /// Moving to `Cancelled` goes through the same stock-restoring path as
    /// a cancellation; every other move is a plain forward transition.
    #[tracing::instrument(skip(self))]
    pub async fn update_status(&self, order_id: OrderId, next: OrderStatus) -> Result<Order> {
        if next == OrderStatus::Cancelled {
            let order = self
                .store
                .find_order(order_id)
                .await?
                .ok_or(CheckoutError::OrderNotFound)?;
            return self.cancel_and_restore(order).await;
        }

        self.store
            .transition_status(order_id, next)
            .await
            .map_err(Self::map_transition_error)
    }

    /// Loads an order with its owner's contact details, for the owner or
    /// an administrator.
    pub async fn get_order(&self, caller: &User, order_id: OrderId) -> Result<OrderDetails> {
        let order = self
            .store
            .find_order(order_id)
            .await?
            .ok_or(CheckoutError::OrderNotFound)?;

        if !order.is_owned_by(caller.id) && !caller.is_admin() {
            return Err(CheckoutError::Forbidden);
        }

        self.with_customer(order).await
    }

    /// Lists the caller's own orders, newest first.
    pub async fn list_user_orders(&self, user_id: UserId) -> Result<Vec<Order>> {
        Ok(self.store.list_orders_for_user(user_id).await?)
    }

    /// Lists every order with owner contact details, newest first.
    pub async fn list_all_orders(&self) -> Result<Vec<OrderDetails>> {
        let orders = self.store.list_orders().await?;

        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            details.push(self.with_customer(order).await?);
        }
        Ok(details)
    }

    /// Transitions to `Cancelled` and restores stock for every line.
    ///
    /// The compare-and-set runs before any stock is touched: if it loses a
    /// race with another cancellation, the restoration never starts, so
    /// stock cannot be restored twice.
    async fn cancel_and_restore(&self, order: Order) -> Result<Order> {
        if order.status == OrderStatus::Cancelled {
            return Err(CheckoutError::AlreadyCancelled);
        }
        if !order.status.can_cancel() {
            return Err(CheckoutError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Cancelled,
            });
        }

        let cancelled = self
            .store
            .transition_status(order.id, OrderStatus::Cancelled)
            .await
            .map_err(Self::map_transition_error)?;

        self.release_lines(cancelled.lines.iter()).await;

        metrics::counter!("orders_cancelled").increment(1);
        tracing::info!(order_id = %cancelled.id, "order cancelled, stock restored");

        Ok(cancelled)
    }

    /// Restores stock for every line, continuing past individual failures
    /// so one bad release cannot strand the remaining restorations.
    async fn release_lines(&self, lines: impl Iterator<Item = &OrderLine>) {
        for line in lines {
            if let Err(err) = self.store.release_stock(line.book_id, line.quantity).await {
                metrics::counter!("stock_release_failures").increment(1);
                tracing::error!(book_id = %line.book_id, quantity = line.quantity, error = %err, "failed to restore stock");
            }
        }
    }

    fn map_stock_error(err: StoreError, title: &str) -> CheckoutError {
        match err {
            StoreError::StockConflict { available: 0, .. } => CheckoutError::OutOfStock {
                title: title.to_string(),
            },
            StoreError::StockConflict { available, .. } => CheckoutError::InsufficientStock {
                title: title.to_string(),
                available,
            },
            StoreError::BookNotFound(_) => CheckoutError::BookNotFound,
            other => CheckoutError::Store(other),
        }
    }

    fn map_transition_error(err: StoreError) -> CheckoutError {
        match err {
            StoreError::TransitionConflict {
                from: OrderStatus::Cancelled,
                to: OrderStatus::Cancelled,
            } => CheckoutError::AlreadyCancelled,
            StoreError::TransitionConflict { from, to } => {
                CheckoutError::InvalidTransition { from, to }
            }
            StoreError::OrderNotFound(_) => CheckoutError::OrderNotFound,
            other => CheckoutError::Store(other),
        }
    }

    async fn with_customer(&self, order: Order) -> Result<OrderDetails> {
        let customer = self
            .store
            .find_user(order.user_id)
            .await?
            .map(CustomerSummary::from);

        Ok(OrderDetails { order, customer })
    }
}
