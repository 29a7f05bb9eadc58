mod auth;
mod categories;
mod products;
mod users;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use storefront_auth::AuthError;
use storefront_cache::CacheError;
use storefront_commerce::ValidationErrors;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

impl<T: Serialize> ApiResponse<T> {
    pub(crate) fn new(data: T, request_id: String) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    /// Per-field messages of a rejected form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<ValidationErrors>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    store: &'static str,
}

#[derive(Debug, Serialize)]
struct Banner {
    name: &'static str,
    version: &'static str,
    message: &'static str,
}

impl ResponseMeta {
    pub(crate) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
                fields: None,
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    pub fn validation(request_id: impl Into<String>, errors: ValidationErrors) -> Self {
        let mut err = Self::new(request_id, "validation_error", errors.to_string());
        err.error.fields = Some(errors);
        err
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "forbidden" => StatusCode::FORBIDDEN,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(crate) fn map_auth_error(request_id: &str, error: &AuthError) -> ApiError {
    match error {
        AuthError::InvalidCredentials => {
            ApiError::new(request_id, "unauthorized", "invalid email or password")
        }
        AuthError::InvalidToken | AuthError::TokenExpired => {
            ApiError::new(request_id, "unauthorized", error.to_string())
        }
        AuthError::InsufficientPermissions => {
            ApiError::new(request_id, "forbidden", "admin access required")
        }
        AuthError::UserNotFound(_) => ApiError::new(request_id, "not_found", "user not found"),
        AuthError::UserAlreadyExists(_) => ApiError::new(
            request_id,
            "conflict",
            "a user with this email already exists",
        ),
        AuthError::Validation(errors) => ApiError::validation(request_id, errors.clone()),
        AuthError::Cache(_) | AuthError::Internal(_) => {
            tracing::error!(error = %error, "auth operation failed");
            ApiError::new(request_id, "internal_error", "internal error")
        }
    }
}

pub(crate) fn map_store_error(request_id: &str, error: &CacheError) -> ApiError {
    tracing::error!(error = %error, "document store operation failed");
    ApiError::new(request_id, "internal_error", "document store operation failed")
}

/// Unwrap a JSON body, turning axum's rejection into our error shape.
pub(crate) fn parse_body<T>(
    request_id: &str,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::new(request_id, "bad_request", rejection.body_text()))
}

/// Run a blocking auth call (password hashing) off the async workers.
pub(crate) async fn run_blocking<T, F>(request_id: &str, f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(|e| map_auth_error(request_id, &e)),
        Err(e) => {
            tracing::error!(error = %e, "blocking auth task failed");
            Err(ApiError::new(request_id, "internal_error", "internal error"))
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api", get(banner))
        .route("/api/health", get(health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route(
            "/api/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/api/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/api/categories", get(categories::list_categories))
        .route("/api/users", get(users::list_users))
        .route(
            "/api/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn banner(Extension(req_id): Extension<RequestId>) -> Json<ApiResponse<Banner>> {
    Json(ApiResponse::new(
        Banner {
            name: "storefront",
            version: env!("CARGO_PKG_VERSION"),
            message: "Storefront API is running",
        },
        req_id.0,
    ))
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    match state.products.count() {
        Ok(_) => (
            StatusCode::OK,
            Json(ApiResponse::new(
                HealthData {
                    status: "ok",
                    store: "ok",
                },
                req_id.0,
            )),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::new(
                    HealthData {
                        status: "degraded",
                        store: "unavailable",
                    },
                    req_id.0,
                )),
            )
        }
    }
}
