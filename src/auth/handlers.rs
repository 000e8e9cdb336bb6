use axum::{
    extract::{FromRef, State},
    routing::post,
    Form, Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoginRequest, ResetPasswordRequest, TokenRequest, TokenResponse},
        jwt::JwtKeys,
        service,
    },
    error::ApiError,
    state::AppState,
    users::dto::UserModel,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/token", post(token))
        .route("/reset", post(reset))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let token = service::login(
        state.store.as_ref(),
        &keys,
        &payload.email,
        &payload.password,
        OffsetDateTime::now_utc(),
    )
    .await?;
    Ok(Json(TokenResponse::bearer(token)))
}

/// OAuth2 password-grant endpoint; the form's `username` field carries the
/// email.
#[instrument(skip(state, form))]
async fn token(
    State(state): State<AppState>,
    Form(form): Form<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let token = service::login(
        state.store.as_ref(),
        &keys,
        &form.username,
        &form.password,
        OffsetDateTime::now_utc(),
    )
    .await?;
    Ok(Json(TokenResponse::bearer(token)))
}

#[instrument(skip(state, payload))]
async fn reset(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<UserModel>, ApiError> {
    let user = service::reset_password(
        state.store.as_ref(),
        &payload.email,
        &payload.password,
        &payload.confirm_password,
    )
    .await?;
    let groups = state.store.groups_for_owner(user.id).await?;
    Ok(Json(UserModel::from_parts(user, groups)))
}
