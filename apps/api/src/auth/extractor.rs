use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::errors::AppError;
use crate::ownership::Scoped;
use crate::state::AppState;

/// The authenticated caller, resolved from an `Authorization: Bearer <token>` header.
///
/// Adding this extractor to a handler is what makes the route protected:
/// a missing token rejects with 401, a token that fails verification with 403.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
}

impl AuthUser {
    /// Database access restricted to this caller's rows.
    pub fn scope<'a>(&self, state: &'a AppState) -> Scoped<'a> {
        Scoped::new(&state.db, self.id)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::Unauthorized)?;
        let id = state
            .tokens
            .verify(token)
            .map_err(|_| AppError::Forbidden)?;
        Ok(AuthUser { id })
    }
}

/// Extracts the token from `Authorization: Bearer <token>`.
/// Returns `None` when the header or the token part is absent.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
