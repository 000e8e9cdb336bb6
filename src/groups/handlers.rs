use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::extractors::CurrentUser,
    error::ApiError,
    groups::dto::{CreateGroupRequest, GroupModel},
    state::AppState,
    store::NewGroup,
    users::dto::Pagination,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/groups", get(list_groups))
        .route("/users/:user_id/groups", post(create_group_for_user))
}

#[instrument(skip(state, current, payload))]
async fn create_group_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    CurrentUser(current): CurrentUser,
    Json(payload): Json<CreateGroupRequest>,
) -> Result<Json<GroupModel>, ApiError> {
    if current.id != user_id {
        warn!(
            user_id = current.id,
            target = user_id,
            "group creation for another user rejected"
        );
        return Err(ApiError::message(
            StatusCode::FORBIDDEN,
            "Cannot create a group for another user",
        ));
    }

    let group = state
        .store
        .insert_group(NewGroup {
            name: payload.name,
            description: payload.description,
            owner_id: user_id,
        })
        .await?;

    info!(group_id = group.id, owner_id = user_id, "group created");
    Ok(Json(GroupModel::from(group)))
}

#[instrument(skip(state))]
async fn list_groups(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<GroupModel>>, ApiError> {
    let groups = state.store.list_groups(page.offset, page.limit).await?;
    Ok(Json(groups.into_iter().map(GroupModel::from).collect()))
}
