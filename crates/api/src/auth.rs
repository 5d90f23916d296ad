//! Bearer-token access gate.
//!
//! Tokens are opaque credentials resolved against the user store on every
//! request. Token issuance and credential management live outside this
//! system; accounts arrive already provisioned with a token.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use domain::User;
use store::Store;

use crate::error::ApiError;

/// Resolves the request's bearer token to an active user account.
///
/// Missing, malformed, and unknown tokens are all rejected with 401.
/// A valid token on a disabled account is rejected with 403.
pub async fn authenticate<S: Store>(store: &S, headers: &HeaderMap) -> Result<User, ApiError> {
    let token = bearer_token(headers)
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    let user = store
        .find_user_by_token(token)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .ok_or_else(|| ApiError::Unauthorized("Invalid bearer token".to_string()))?;

    if !user.is_active {
        return Err(ApiError::Forbidden("Account is disabled".to_string()));
    }

    Ok(user)
}

/// Resolves the bearer token and additionally requires the admin role.
pub async fn authenticate_admin<S: Store>(
    store: &S,
    headers: &HeaderMap,
) -> Result<User, ApiError> {
    let user = authenticate(store, headers).await?;
    if !user.is_admin() {
        return Err(ApiError::Forbidden("Administrator role required".to_string()));
    }
    Ok(user)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer abc123".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn rejects_other_schemes_and_missing_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Basic abc123".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
