//! Session guard: password hashing, the authenticated-seller extractor,
//! and the public API key layer.

use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, Method},
    middleware::Next,
    response::Response,
};
use rand_core::OsRng;
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;
use shared::SellerPreferences;

/// Header carrying the public API key, as the hosted client library sends it.
pub const API_KEY_HEADER: &str = "apikey";

pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}

/// The authenticated identity, resolved once per request and injected
/// wherever a protected handler runs.
#[derive(Debug, Clone)]
pub struct CurrentSeller {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub preferences: SellerPreferences,
}

/// Pull the bearer token out of an Authorization header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentSeller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Resolved at most once per request.
        if let Some(seller) = parts.extensions.get::<CurrentSeller>() {
            return Ok(seller.clone());
        }

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(bearer_token)
            .ok_or(ApiError::Unauthorized)?;

        // A resolution failure is treated the same as no session.
        let seller = match state.sellers.resolve_session(token).await {
            Ok(Some(seller)) => seller,
            Ok(None) => return Err(ApiError::Unauthorized),
            Err(err) => {
                warn!("session resolution failed: {err}");
                return Err(ApiError::Unauthorized);
            }
        };

        parts.extensions.insert(seller.clone());
        Ok(seller)
    }
}

/// Reject any request not presenting the configured public API key.
///
/// CORS preflights pass through so the browser can learn the header is
/// required in the first place.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if request.method() == Method::OPTIONS {
        return Ok(next.run(request).await);
    }

    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok());
    if presented != Some(state.api_key.as_str()) {
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("correct horse").expect("hashing should succeed");
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
        assert!(!verify_password("correct horse", "not-a-phc-string"));
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic abc123"), None);
        assert_eq!(bearer_token("abc123"), None);
    }
}
