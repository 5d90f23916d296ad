//! Order endpoints: placement, history, status management, and cancellation.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use checkout::{CheckoutError, OrderDetails, PlaceOrder};
use common::OrderId;
use domain::{Order, OrderStatus, PaymentMethod, ShippingAddress};
use serde::Deserialize;
use store::Store;

use crate::auth;
use crate::error::ApiError;
use crate::routes::AppState;

// -- Request types --

#[derive(Deserialize)]
pub struct PlaceOrderRequest {
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

// -- Handlers --

/// POST /orders — place an order from the caller's cart.
#[tracing::instrument(skip(state, headers, req))]
pub async fn place<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let user = auth::authenticate(&state.store, &headers).await?;

    let order = state
        .checkout
        .place_order(
            user.id,
            PlaceOrder {
                shipping_address: req.shipping_address,
                payment_method: req.payment_method,
                notes: req.notes,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders/my-orders — the caller's orders, newest first.
#[tracing::instrument(skip(state, headers))]
pub async fn my_orders<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Order>>, ApiError> {
    let user = auth::authenticate(&state.store, &headers).await?;
    Ok(Json(state.checkout.list_user_orders(user.id).await?))
}

/// GET /orders/:id — one order with owner contact details, for the owner
/// or an administrator.
#[tracing::instrument(skip(state, headers))]
pub async fn get<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<OrderDetails>, ApiError> {
    let user = auth::authenticate(&state.store, &headers).await?;
    let order_id = parse_order_id(&id)?;

    Ok(Json(state.checkout.get_order(&user, order_id).await?))
}

/// GET /orders — every order with owner contact details (admin).
#[tracing::instrument(skip(state, headers))]
pub async fn list<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<Vec<OrderDetails>>, ApiError> {
    auth::authenticate_admin(&state.store, &headers).await?;
    Ok(Json(state.checkout.list_all_orders().await?))
}

/// PUT /orders/:id/status — move an order to a new status (admin).
///
/// Cancelling through this route restores the stock of every line, the
/// same as a buyer cancellation.
#[tracing::instrument(skip(state, headers, req))]
pub async fn update_status<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, ApiError> {
    auth::authenticate_admin(&state.store, &headers).await?;
    let order_id = parse_order_id(&id)?;

    let next: OrderStatus = req.status.parse().map_err(CheckoutError::from)?;
    let order = state.checkout.update_status(order_id, next).await?;

    Ok(Json(order))
}

/// PUT /orders/:id/cancel — cancel an order, restoring its stock, for the
/// owner or an administrator.
#[tracing::instrument(skip(state, headers))]
pub async fn cancel<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Order>, ApiError> {
    let user = auth::authenticate(&state.store, &headers).await?;
    let order_id = parse_order_id(&id)?;

    Ok(Json(state.checkout.cancel_order(&user, order_id).await?))
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid order ID: {e}")))?;
    Ok(OrderId::from(uuid))
}
