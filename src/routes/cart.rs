use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, SetQuantityRequest, UpdateQuantityRequest},
    error::AppResult,
    middleware::tab::TabContext,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
    store::CartView,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart_list).post(add_to_cart))
        .route(
            "/{product_id}",
            patch(update_quantity)
                .put(set_quantity)
                .delete(remove_from_cart),
        )
}

#[utoipa::path(
    get,
    path = "/api/cart",
    params(
        ("x-tab-id" = Uuid, Header, description = "Tab ID")
    ),
    responses(
        (status = 200, description = "Cart lines and totals", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn cart_list(tab: TabContext) -> Json<ApiResponse<CartView>> {
    Json(cart_service::get_cart(&tab))
}

#[utoipa::path(
    post,
    path = "/api/cart",
    params(
        ("x-tab-id" = Uuid, Header, description = "Tab ID")
    ),
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Add a product or increase its quantity", body = ApiResponse<CartView>),
        (status = 400, description = "Unknown or sold out product"),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    tab: TabContext,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::add_to_cart(&state, &tab, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/cart/{product_id}",
    params(
        ("x-tab-id" = Uuid, Header, description = "Tab ID"),
        ("product_id" = String, Path, description = "Product ID")
    ),
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Quantity changed by delta; lines below one unit are removed", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn update_quantity(
    tab: TabContext,
    Path(product_id): Path<String>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::update_quantity(&tab, &product_id, payload.delta)?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/cart/{product_id}",
    params(
        ("x-tab-id" = Uuid, Header, description = "Tab ID"),
        ("product_id" = String, Path, description = "Product ID")
    ),
    request_body = SetQuantityRequest,
    responses(
        (status = 200, description = "Quantity set, clamped to 1..=10", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn set_quantity(
    tab: TabContext,
    Path(product_id): Path<String>,
    Json(payload): Json<SetQuantityRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::set_quantity(&tab, &product_id, payload.quantity)?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{product_id}",
    params(
        ("x-tab-id" = Uuid, Header, description = "Tab ID"),
        ("product_id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Line removed", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    tab: TabContext,
    Path(product_id): Path<String>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::remove_item(&tab, &product_id)?;
    Ok(Json(resp))
}
