//! Catalog endpoints: public browsing plus admin catalog management.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use common::BookId;
use domain::{Book, Money};
use serde::{Deserialize, Serialize};
use store::{BookQuery, Store};

use crate::auth;
use crate::error::ApiError;
use crate::routes::AppState;

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateBookRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: i64,
    pub discount_price: Option<i64>,
    #[serde(default)]
    pub cover_image: String,
    pub stock: u32,
}

/// Full-replace update; omitting `discount_price` clears any discount.
#[derive(Deserialize)]
pub struct UpdateBookRequest {
    pub title: String,
    pub description: String,
    pub price: i64,
    pub discount_price: Option<i64>,
    pub cover_image: String,
    pub stock: u32,
}

// -- Response types --

#[derive(Serialize)]
pub struct BookListResponse {
    pub books: Vec<Book>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

// -- Handlers --

/// GET /books — list active books with pagination and title search.
#[tracing::instrument(skip(state))]
pub async fn list<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<ListParams>,
) -> Result<Json<BookListResponse>, ApiError> {
    let defaults = BookQuery::default();
    let query = BookQuery {
        page: params.page.unwrap_or(defaults.page).max(1),
        limit: params.limit.unwrap_or(defaults.limit).clamp(1, 100),
        search: params.search.filter(|s| !s.trim().is_empty()),
    };

    let page = state.store.list_books(query).await?;

    Ok(Json(BookListResponse {
        page: page.page,
        limit: page.limit,
        total: page.total,
        total_pages: page.pages(),
        books: page.books,
    }))
}

/// GET /books/:id — load one active book.
#[tracing::instrument(skip(state))]
pub async fn get<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    let id = parse_book_id(&id)?;
    let book = state
        .store
        .find_book(id)
        .await?
        .filter(|book| book.is_active)
        .ok_or_else(|| ApiError::NotFound(format!("Book {id} not found")))?;

    Ok(Json(book))
}

/// POST /books — add a book to the catalog (admin).
#[tracing::instrument(skip(state, headers, req))]
pub async fn create<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(req): Json<CreateBookRequest>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    auth::authenticate_admin(&state.store, &headers).await?;

    let book = Book::new(
        req.title,
        req.description,
        Money::from_minor(req.price),
        req.discount_price.map(Money::from_minor),
        req.cover_image,
        req.stock,
    )?;

    state.store.insert_book(&book).await?;
    tracing::info!(book_id = %book.id, title = %book.title, "book created");

    Ok((StatusCode::CREATED, Json(book)))
}

/// PUT /books/:id — replace a book's catalog fields (admin).
#[tracing::instrument(skip(state, headers, req))]
pub async fn update<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<UpdateBookRequest>,
) -> Result<Json<Book>, ApiError> {
    auth::authenticate_admin(&state.store, &headers).await?;

    let id = parse_book_id(&id)?;
    let mut book = state
        .store
        .find_book(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Book {id} not found")))?;

    let price = Money::from_minor(req.price);
    let discount_price = req.discount_price.map(Money::from_minor);
    Book::validate(&req.title, price, discount_price)?;

    book.title = req.title;
    book.description = req.description;
    book.price = price;
    book.discount_price = discount_price;
    book.cover_image = req.cover_image;
    book.stock = req.stock;

    state.store.update_book(&book).await?;

    Ok(Json(book))
}

/// DELETE /books/:id — soft-delete a book (admin).
///
/// The book disappears from the public catalog but stays loadable so that
/// existing carts and order histories keep working.
#[tracing::instrument(skip(state, headers))]
pub async fn remove<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    auth::authenticate_admin(&state.store, &headers).await?;

    let id = parse_book_id(&id)?;
    state.store.deactivate_book(id).await?;
    tracing::info!(book_id = %id, "book deactivated");

    Ok(StatusCode::NO_CONTENT)
}

pub(crate) fn parse_book_id(id: &str) -> Result<BookId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid book ID: {e}")))?;
    Ok(BookId::from(uuid))
}
