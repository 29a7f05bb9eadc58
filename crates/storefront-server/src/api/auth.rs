use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use storefront_auth::{AuthResponse, Credentials, RegisterRequest, User};

use crate::middleware::{CurrentUser, RequestId};
use crate::state::AppState;

use super::{map_auth_error, parse_body, run_blocking, ApiError, ApiResponse};

#[derive(Debug, Serialize)]
pub(super) struct MeData {
    user: User,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LogoutData {
    logged_out: bool,
}

pub(super) async fn register(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    let request = parse_body(&req_id.0, payload)?;
    let auth = Arc::clone(&state.auth);
    let response = run_blocking(&req_id.0, move || auth.register(&request)).await?;

    tracing::info!(user_id = %response.user.id, "user registered");
    Ok((StatusCode::CREATED, Json(ApiResponse::new(response, req_id.0))))
}

pub(super) async fn login(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let credentials = parse_body(&req_id.0, payload)?;
    let auth = Arc::clone(&state.auth);
    let response = run_blocking(&req_id.0, move || auth.login(&credentials)).await?;
    Ok(Json(ApiResponse::new(response, req_id.0)))
}

pub(super) async fn logout(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    current: CurrentUser,
) -> Result<Json<ApiResponse<LogoutData>>, ApiError> {
    let logged_out = state
        .auth
        .logout(&current.token)
        .map_err(|e| map_auth_error(&req_id.0, &e))?;
    Ok(Json(ApiResponse::new(LogoutData { logged_out }, req_id.0)))
}

pub(super) async fn me(
    Extension(req_id): Extension<RequestId>,
    current: CurrentUser,
) -> Json<ApiResponse<MeData>> {
    Json(ApiResponse::new(MeData { user: current.user }, req_id.0))
}
