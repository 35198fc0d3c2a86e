use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::products::{ProductDetail, ProductList},
    error::AppResult,
    response::{ApiResponse, Meta},
    routes::params::ProductQuery,
    services::catalog_service::RELATED_LIMIT,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/{id}", get(get_product))
        .route("/{id}/related", get(related_products))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search in product names"),
        ("categoria" = Option<String>, Query, description = "Category, case-insensitive"),
        ("available" = Option<bool>, Query, description = "Only products in stock"),
        ("sort_by" = Option<String>, Query, description = "price or name"),
        ("sort_order" = Option<String>, Query, description = "asc or desc"),
    ),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>),
        (status = 503, description = "Catalog unavailable"),
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let (page, limit, _) = query.pagination().normalize();
    let (items, total) = state.catalog.list(&query).await?;
    let meta = Meta::new(page, limit, total as i64);
    Ok(Json(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<ProductDetail>),
        (status = 404, description = "Product not found"),
        (status = 503, description = "Catalog unavailable"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    let product = state.catalog.get(&id).await?;
    let data = ProductDetail {
        stock_label: product.stock_label().map(str::to_string),
        product,
    };
    Ok(Json(ApiResponse::success("Product", data, None)))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/related",
    params(
        ("id" = String, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Other products to show on a product page", body = ApiResponse<ProductList>),
        (status = 503, description = "Catalog unavailable"),
    ),
    tag = "Products"
)]
pub async fn related_products(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let items = state.catalog.related(&id, RELATED_LIMIT).await?;
    let meta = Meta::whole(items.len());
    Ok(Json(ApiResponse::success(
        "Related products",
        ProductList { items },
        Some(meta),
    )))
}
