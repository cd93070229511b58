use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use common::types::{IdReply, StatusReply};
use service::users::UserCollection;

use crate::errors::ApiError;
use crate::extract::UserFields;
use crate::routes::ServerState;

/// Path ids arrive as text; the store compares integers.
pub fn parse_user_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim().parse::<i64>().map_err(|_| ApiError::InvalidId(raw.to_string()))
}

#[utoipa::path(get, path = "/api/v1/users", tag = "users", responses((status = 200, description = "All users"), (status = 502, description = "Seed source unreachable")))]
pub async fn list_users(State(state): State<ServerState>) -> Result<Json<UserCollection>, ApiError> {
    let users = state.users.list().await?;
    Ok(Json(users))
}

#[utoipa::path(post, path = "/api/v1/users", tag = "users", request_body = crate::openapi::UserFieldsDoc, responses((status = 200, description = "Created, returns the assigned id")))]
pub async fn create_user(
    State(state): State<ServerState>,
    UserFields(fields): UserFields,
) -> Result<Json<IdReply>, ApiError> {
    let user = state.users.create(fields).await?;
    let id = user.id().unwrap_or_default();
    info!(id, "user created");
    Ok(Json(IdReply::success(id)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(("user_id" = i64, Path, description = "User id")),
    request_body = crate::openapi::UserFieldsDoc,
    responses((status = 200, description = "Full collection after the merge"), (status = 400, description = "Id is not an integer"))
)]
pub async fn update_user(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
    UserFields(fields): UserFields,
) -> Result<Json<UserCollection>, ApiError> {
    let id = parse_user_id(&user_id)?;
    let users = state.users.update(id, fields).await?;
    Ok(Json(users))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(("user_id" = i64, Path, description = "User id")),
    responses((status = 200, description = "Deleted, or already absent"), (status = 400, description = "Id is not an integer"))
)]
pub async fn delete_user(
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> Result<Json<IdReply>, ApiError> {
    let id = parse_user_id(&user_id)?;
    let ack = state.users.delete_by_id(id).await?;
    info!(id, removed = ack.removed, "user delete");
    Ok(Json(IdReply::success(ack.id)))
}

#[utoipa::path(delete, path = "/api/v1/users", tag = "users", responses((status = 200, description = "`success` or `No such file`")))]
pub async fn delete_all_users(State(state): State<ServerState>) -> Result<Json<StatusReply>, ApiError> {
    let outcome = state.users.delete_all().await?;
    Ok(Json(StatusReply { status: outcome.status() }))
}
