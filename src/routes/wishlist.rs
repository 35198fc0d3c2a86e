use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::wishlist::{ButtonsQuery, WishlistButtons, WishlistProducts, WishlistView},
    error::AppResult,
    middleware::tab::TabContext,
    response::ApiResponse,
    services::wishlist_service,
    state::AppState,
    store::WishlistToggle,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_wishlist))
        .route("/products", get(wishlist_products))
        .route("/buttons", get(wishlist_buttons))
        .route("/{id}/toggle", post(toggle_wishlist))
}

#[utoipa::path(
    get,
    path = "/api/wishlist",
    params(
        ("x-tab-id" = Uuid, Header, description = "Tab ID")
    ),
    responses(
        (status = 200, description = "Wishlisted product ids", body = ApiResponse<WishlistView>)
    ),
    tag = "Wishlist"
)]
pub async fn list_wishlist(tab: TabContext) -> Json<ApiResponse<WishlistView>> {
    Json(wishlist_service::list_wishlist(&tab))
}

#[utoipa::path(
    get,
    path = "/api/wishlist/products",
    params(
        ("x-tab-id" = Uuid, Header, description = "Tab ID")
    ),
    responses(
        (status = 200, description = "Wishlisted catalog products", body = ApiResponse<WishlistProducts>),
        (status = 503, description = "Catalog unavailable"),
    ),
    tag = "Wishlist"
)]
pub async fn wishlist_products(
    State(state): State<AppState>,
    tab: TabContext,
) -> AppResult<Json<ApiResponse<WishlistProducts>>> {
    let resp = wishlist_service::wishlist_products(&state, &tab).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/wishlist/buttons",
    params(
        ("x-tab-id" = Uuid, Header, description = "Tab ID"),
        ("ids" = Option<String>, Query, description = "Comma separated product ids rendered on the page")
    ),
    responses(
        (status = 200, description = "Button state per product id", body = ApiResponse<WishlistButtons>)
    ),
    tag = "Wishlist"
)]
pub async fn wishlist_buttons(
    tab: TabContext,
    Query(query): Query<ButtonsQuery>,
) -> Json<ApiResponse<WishlistButtons>> {
    Json(wishlist_service::buttons(&tab, query.ids.as_deref()))
}

#[utoipa::path(
    post,
    path = "/api/wishlist/{id}/toggle",
    params(
        ("x-tab-id" = Uuid, Header, description = "Tab ID"),
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Added when absent, removed when present", body = ApiResponse<WishlistToggle>)
    ),
    tag = "Wishlist"
)]
pub async fn toggle_wishlist(
    tab: TabContext,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<WishlistToggle>>> {
    let resp = wishlist_service::toggle(&tab, &id)?;
    Ok(Json(resp))
}
