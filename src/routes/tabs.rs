use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use uuid::Uuid;

use crate::{
    dto::tabs::TabOpened,
    error::{AppError, AppResult},
    middleware::tab::TabContext,
    response::{ApiResponse, Meta},
    state::AppState,
    storage::TabId,
    sync::Badges,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(open_tab))
        .route("/badges", get(badges))
        .route("/{id}", delete(close_tab))
}

#[utoipa::path(
    post,
    path = "/api/tabs",
    responses(
        (status = 200, description = "Tab opened", body = ApiResponse<TabOpened>)
    ),
    tag = "Tabs"
)]
pub async fn open_tab(State(state): State<AppState>) -> Json<ApiResponse<TabOpened>> {
    let tab = state.tabs.open();
    let data = TabOpened {
        tab_id: tab.id().as_uuid(),
        badges: tab.badges(),
    };
    Json(ApiResponse::success("Tab opened", data, Some(Meta::empty())))
}

#[utoipa::path(
    delete,
    path = "/api/tabs/{id}",
    params(
        ("id" = Uuid, Path, description = "Tab ID")
    ),
    responses(
        (status = 200, description = "Tab closed", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Tab not found"),
    ),
    tag = "Tabs"
)]
pub async fn close_tab(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    if !state.tabs.close(TabId::from(id)) {
        return Err(AppError::NotFound);
    }
    Ok(Json(ApiResponse::success(
        "Tab closed",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/tabs/badges",
    params(
        ("x-tab-id" = Uuid, Header, description = "Tab ID")
    ),
    responses(
        (status = 200, description = "Navbar badges of the tab", body = ApiResponse<Badges>)
    ),
    tag = "Tabs"
)]
pub async fn badges(tab: TabContext) -> Json<ApiResponse<Badges>> {
    Json(ApiResponse::success("OK", tab.badges(), Some(Meta::empty())))
}
