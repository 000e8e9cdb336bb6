use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{extractors::CurrentUser, password},
    error::{ApiError, AuthError},
    state::AppState,
    store::{NewUser, User},
    users::dto::{CreateUserRequest, Pagination, UserModel},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", post(register).get(list_users))
        .route("/users/me", get(me))
        .route("/users/:user_id", get(get_user))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<UserModel>, ApiError> {
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "registration with invalid email");
        return Err(ApiError::message(StatusCode::BAD_REQUEST, "Invalid email"));
    }

    if payload.password.len() < 8 {
        return Err(ApiError::message(
            StatusCode::BAD_REQUEST,
            "Password too short",
        ));
    }

    if payload.password != payload.confirm_password {
        return Err(AuthError::Mismatch.into());
    }

    if state
        .store
        .find_user_by_email(&payload.email)
        .await?
        .is_some()
    {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::message(
            StatusCode::BAD_REQUEST,
            "Email already registered",
        ));
    }

    let hashed_password = password::hash_password(&payload.password)?;
    let user = state
        .store
        .insert_user(NewUser {
            email: payload.email,
            username: payload.username,
            given_name: payload.given_name,
            family_name: payload.family_name,
            hashed_password,
        })
        .await?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok(Json(UserModel::from_parts(user, vec![])))
}

#[instrument(skip(state))]
async fn list_users(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<UserModel>>, ApiError> {
    let users = state.store.list_users(page.offset, page.limit).await?;
    let mut models = Vec::with_capacity(users.len());
    for user in users {
        let groups = state.store.groups_for_owner(user.id).await?;
        models.push(UserModel::from_parts(user, groups));
    }
    Ok(Json(models))
}

#[instrument(skip(state, current))]
async fn me(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
) -> Result<Json<UserModel>, ApiError> {
    with_groups(&state, current).await
}

#[instrument(skip(state))]
async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserModel>, ApiError> {
    let user = state
        .store
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::message(StatusCode::NOT_FOUND, "User not found"))?;
    with_groups(&state, user).await
}

async fn with_groups(state: &AppState, user: User) -> Result<Json<UserModel>, ApiError> {
    let groups = state.store.groups_for_owner(user.id).await?;
    Ok(Json(UserModel::from_parts(user, groups)))
}
