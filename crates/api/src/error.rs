//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use checkout::CheckoutError;
use domain::BookError;
use store::StoreError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Missing or invalid credentials.
    Unauthorized(String),
    /// Authenticated but not allowed.
    Forbidden(String),
    /// Cart or order workflow error.
    Checkout(CheckoutError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Checkout(err) => checkout_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn checkout_error_to_response(err: CheckoutError) -> (StatusCode, String) {
    match &err {
        CheckoutError::EmptyCart
        | CheckoutError::InsufficientStock { .. }
        | CheckoutError::OutOfStock { .. }
        | CheckoutError::BookUnavailable
        | CheckoutError::InvalidQuantity
        | CheckoutError::InvalidStatus { .. }
        | CheckoutError::AlreadyCancelled
        | CheckoutError::InvalidTransition { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        CheckoutError::BookNotFound
        | CheckoutError::ItemNotFound
        | CheckoutError::OrderNotFound => (StatusCode::NOT_FOUND, err.to_string()),
        CheckoutError::Forbidden => (StatusCode::FORBIDDEN, err.to_string()),
        CheckoutError::Store(inner) => {
            tracing::error!(error = %inner, "store error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            )
        }
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::Checkout(err)
    }
}

impl From<BookError> for ApiError {
    fn from(err: BookError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::BookNotFound(id) => ApiError::NotFound(format!("Book {id} not found")),
            StoreError::OrderNotFound(id) => ApiError::NotFound(format!("Order {id} not found")),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
