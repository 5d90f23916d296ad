//! Cart endpoints. All routes require an authenticated user and operate on
//! the caller's own cart.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use checkout::CartView;
use serde::Deserialize;
use store::Store;

use crate::auth;
use crate::error::ApiError;
use crate::routes::AppState;
use crate::routes::books::parse_book_id;

// -- Request types --

#[derive(Deserialize)]
pub struct AddItemRequest {
    pub book_id: String,
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: u32,
}

// -- Handlers --

/// GET /cart — the caller's cart joined with current catalog entries.
#[tracing::instrument(skip(state, headers))]
pub async fn get<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<CartView>, ApiError> {
    let user = auth::authenticate(&state.store, &headers).await?;
    Ok(Json(state.carts.get_cart(user.id).await?))
}

/// POST /cart/items — add a quantity of a book, merging into any existing line.
#[tracing::instrument(skip(state, headers, req))]
pub async fn add_item<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<CartView>, ApiError> {
    let user = auth::authenticate(&state.store, &headers).await?;
    let book_id = parse_book_id(&req.book_id)?;

    Ok(Json(
        state.carts.add_item(user.id, book_id, req.quantity).await?,
    ))
}

/// PUT /cart/items/:book_id — set the absolute quantity of a line.
#[tracing::instrument(skip(state, headers, req))]
pub async fn set_quantity<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(book_id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<SetQuantityRequest>,
) -> Result<Json<CartView>, ApiError> {
    let user = auth::authenticate(&state.store, &headers).await?;
    let book_id = parse_book_id(&book_id)?;

    Ok(Json(
        state
            .carts
            .set_quantity(user.id, book_id, req.quantity)
            .await?,
    ))
}

/// DELETE /cart/items/:book_id — remove a line from the cart.
#[tracing::instrument(skip(state, headers))]
pub async fn remove_item<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(book_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<CartView>, ApiError> {
    let user = auth::authenticate(&state.store, &headers).await?;
    let book_id = parse_book_id(&book_id)?;

    Ok(Json(state.carts.remove_item(user.id, book_id).await?))
}

/// DELETE /cart — empty the caller's cart.
#[tracing::instrument(skip(state, headers))]
pub async fn clear<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let user = auth::authenticate(&state.store, &headers).await?;
    state.carts.clear(user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
