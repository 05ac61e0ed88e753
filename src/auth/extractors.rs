use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use super::jwt::{JwtKeys, TokenKind};
use crate::error::ApiError;
use crate::state::AppState;

/// Extracts and validates the bearer token, returning the caller's user ID.
///
/// Also refreshes the caller's `last_seen` stamp and confirms the account
/// still exists, so a token for a deleted user fails closed with 401.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or_else(|| ApiError::unauthorized("invalid Authorization header"))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|_| {
            warn!("invalid or expired token");
            ApiError::unauthorized("invalid or expired token")
        })?;

        if claims.kind != TokenKind::Access {
            return Err(ApiError::unauthorized("access token required"));
        }

        let seen = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE users SET last_seen = now()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(claims.sub)
        .fetch_optional(&state.db)
        .await?;

        match seen {
            Some(id) => Ok(AuthUser(id)),
            None => {
                warn!(user_id = %claims.sub, "token for unknown user");
                Err(ApiError::unauthorized("user not found"))
            }
        }
    }
}
