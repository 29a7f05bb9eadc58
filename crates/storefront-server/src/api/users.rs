use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Serialize;
use storefront_auth::{User, UserUpdate};
use storefront_commerce::UserId;

use crate::middleware::{AdminUser, CurrentUser, RequestId};
use crate::state::AppState;

use super::{map_auth_error, parse_body, run_blocking, ApiError, ApiResponse};

#[derive(Debug, Serialize)]
pub(super) struct Deleted {
    id: UserId,
}

fn forbidden(request_id: &str, message: &str) -> ApiError {
    ApiError::new(request_id, "forbidden", message)
}

pub(super) async fn list_users(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    _admin: AdminUser,
) -> Result<Json<ApiResponse<Vec<User>>>, ApiError> {
    let users = state
        .auth
        .list_users()
        .map_err(|e| map_auth_error(&req_id.0, &e))?;
    Ok(Json(ApiResponse::new(users, req_id.0)))
}

pub(super) async fn get_user(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let id = UserId::new(id);
    if !current.user.can_manage(&id) {
        return Err(forbidden(&req_id.0, "you can only view your own profile"));
    }
    let user = state
        .auth
        .get_user(&id)
        .map_err(|e| map_auth_error(&req_id.0, &e))?;
    Ok(Json(ApiResponse::new(user, req_id.0)))
}

pub(super) async fn update_user(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    current: CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<UserUpdate>, JsonRejection>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let update = parse_body(&req_id.0, payload)?;
    let id = UserId::new(id);
    if !current.user.can_manage(&id) {
        return Err(forbidden(&req_id.0, "you can only edit your own profile"));
    }
    if update.role.is_some() && !current.user.is_admin() {
        return Err(forbidden(&req_id.0, "only administrators can change roles"));
    }

    let auth = Arc::clone(&state.auth);
    let user = run_blocking(&req_id.0, move || auth.update_user(&id, &update)).await?;
    tracing::info!(user_id = %user.id, by = %current.user.id, "user updated");
    Ok(Json(ApiResponse::new(user, req_id.0)))
}

pub(super) async fn delete_user(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Deleted>>, ApiError> {
    let id = UserId::new(id);
    if id == admin.id {
        return Err(ApiError::new(
            &req_id.0,
            "bad_request",
            "administrators cannot delete their own account",
        ));
    }
    state
        .auth
        .delete_user(&id)
        .map_err(|e| map_auth_error(&req_id.0, &e))?;
    tracing::info!(user_id = %id, admin = %admin.id, "user deleted");
    Ok(Json(ApiResponse::new(Deleted { id }, req_id.0)))
}
