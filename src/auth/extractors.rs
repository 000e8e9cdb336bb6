use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use time::OffsetDateTime;

use crate::{
    auth::{jwt::JwtKeys, service},
    error::{ApiError, AuthError},
    state::AppState,
};

/// Extracts the bearer token from `Authorization` and resolves it to the
/// requesting user. Rejections render as 401 with a Bearer challenge.
pub struct CurrentUser(pub crate::store::User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AuthError::Malformed)?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .ok_or(AuthError::Malformed)?;

        let keys = JwtKeys::from_ref(state);
        let user = service::authenticate(
            state.store.as_ref(),
            &keys,
            token,
            OffsetDateTime::now_utc(),
        )
        .await?;

        Ok(CurrentUser(user))
    }
}
