use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::auth::{LoginRequest, LoginResponse, RegisterRequest, RegisteredUser},
    error::AppResult,
    middleware::{auth::AuthUser, tab::TabContext},
    models::CurrentUser,
    response::{ApiResponse, Meta},
    services::auth_service::{login_user, logout_user, register_user},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    params(
        ("x-tab-id" = Uuid, Header, description = "Tab ID")
    ),
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Register user", body = ApiResponse<RegisteredUser>),
        (status = 400, description = "Email already registered"),
        (status = 422, description = "Invalid fields")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    tab: TabContext,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<RegisteredUser>>> {
    let resp = register_user(&state, &tab, payload)?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    params(
        ("x-tab-id" = Uuid, Header, description = "Tab ID")
    ),
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid credentials"),
        (status = 422, description = "Invalid fields")
    ),
    tag = "Auth"
)]
pub async fn login(
    tab: TabContext,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = login_user(&tab, payload)?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    params(
        ("x-tab-id" = Uuid, Header, description = "Tab ID")
    ),
    responses(
        (status = 200, description = "Session marker and token removed", body = ApiResponse<serde_json::Value>)
    ),
    tag = "Auth"
)]
pub async fn logout(tab: TabContext) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = logout_user(&tab)?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    params(
        ("x-tab-id" = Uuid, Header, description = "Tab ID")
    ),
    responses(
        (status = 200, description = "Logged-in user", body = ApiResponse<CurrentUser>),
        (status = 401, description = "Not logged in")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn me(AuthUser(user): AuthUser) -> Json<ApiResponse<CurrentUser>> {
    Json(ApiResponse::success("OK", user, Some(Meta::empty())))
}
