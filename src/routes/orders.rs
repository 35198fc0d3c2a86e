use axum::{Json, Router, routing::get};
use uuid::Uuid;

use crate::{
    middleware::tab::TabContext, models::Order, response::ApiResponse,
    services::checkout_service, state::AppState,
};

pub fn route() -> Router<AppState> {
    Router::new().route("/", get(list_order))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        ("x-tab-id" = Uuid, Header, description = "Tab ID")
    ),
    responses(
        (status = 200, description = "Confirmed orders, oldest first", body = ApiResponse<Vec<Order>>)
    ),
    tag = "Orders"
)]
pub async fn list_order(tab: TabContext) -> Json<ApiResponse<Vec<Order>>> {
    Json(checkout_service::order_history(&tab))
}
