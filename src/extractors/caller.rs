//! Extract and check the caller's `token` query parameter.

use crate::auth::Principal;
use crate::error::AppError;
use crate::model::Record;
use crate::state::EntityState;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

/// Query parameter carrying the caller token.
pub const TOKEN_PARAM: &str = "token";

#[derive(Deserialize)]
struct TokenParam {
    token: Option<String>,
}

/// Caller of an entity endpoint. `None` when the entity is open.
#[derive(Clone, Debug)]
pub struct Caller(pub Option<Principal>);

#[async_trait]
impl<R: Record> FromRequestParts<EntityState<R>> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &EntityState<R>,
    ) -> Result<Self, Self::Rejection> {
        let Some(authenticator) = &state.authenticator else {
            return Ok(Caller(None));
        };
        let token = Query::<TokenParam>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(p)| p.token)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Unauthorized(format!("missing {}", TOKEN_PARAM)))?;
        let principal = authenticator.authenticate(&token).await?;
        tracing::debug!(subject = %principal.subject, "caller authenticated");
        Ok(Caller(Some(principal)))
    }
}
