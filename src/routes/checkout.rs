use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::checkout::{CheckoutSummary, CustomerForm, PaymentForm},
    error::AppResult,
    middleware::tab::TabContext,
    models::Order,
    response::{ApiResponse, Meta},
    services::checkout_service::{self, CheckoutStage},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(begin_checkout))
        .route("/customer", post(submit_customer))
        .route("/payment", post(submit_payment))
        .route("/cancel", post(cancel_payment))
        .route("/stage", get(checkout_stage))
        .route("/confirmation", get(confirmation))
}

#[utoipa::path(
    post,
    path = "/api/checkout",
    params(
        ("x-tab-id" = Uuid, Header, description = "Tab ID")
    ),
    responses(
        (status = 200, description = "Cart copied into the tab's checkout", body = ApiResponse<CheckoutSummary>),
        (status = 400, description = "Cart is empty"),
    ),
    tag = "Checkout"
)]
pub async fn begin_checkout(tab: TabContext) -> AppResult<Json<ApiResponse<CheckoutSummary>>> {
    let resp = checkout_service::begin(&tab)?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/checkout/customer",
    params(
        ("x-tab-id" = Uuid, Header, description = "Tab ID")
    ),
    request_body = CustomerForm,
    responses(
        (status = 200, description = "Customer stored with shipping and totals", body = ApiResponse<CheckoutSummary>),
        (status = 400, description = "Cart is empty"),
        (status = 422, description = "Invalid fields"),
    ),
    tag = "Checkout"
)]
pub async fn submit_customer(
    State(state): State<AppState>,
    tab: TabContext,
    Json(payload): Json<CustomerForm>,
) -> AppResult<Json<ApiResponse<CheckoutSummary>>> {
    let resp = checkout_service::submit_customer(&state, &tab, payload)?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/checkout/payment",
    params(
        ("x-tab-id" = Uuid, Header, description = "Tab ID")
    ),
    request_body = PaymentForm,
    responses(
        (status = 200, description = "Payment processed and order confirmed", body = ApiResponse<Order>),
        (status = 400, description = "Checkout data missing or payment already processing"),
        (status = 422, description = "Invalid card fields"),
    ),
    tag = "Checkout"
)]
pub async fn submit_payment(
    State(state): State<AppState>,
    tab: TabContext,
    Json(payload): Json<PaymentForm>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = checkout_service::submit_payment(&state, &tab, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/checkout/cancel",
    params(
        ("x-tab-id" = Uuid, Header, description = "Tab ID")
    ),
    responses(
        (status = 200, description = "Back to the checkout form", body = ApiResponse<CheckoutStage>),
        (status = 400, description = "Payment already processing"),
    ),
    tag = "Checkout"
)]
pub async fn cancel_payment(tab: TabContext) -> AppResult<Json<ApiResponse<CheckoutStage>>> {
    let resp = checkout_service::cancel_payment(&tab)?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/checkout/stage",
    params(
        ("x-tab-id" = Uuid, Header, description = "Tab ID")
    ),
    responses(
        (status = 200, description = "Current checkout stage", body = ApiResponse<CheckoutStage>)
    ),
    tag = "Checkout"
)]
pub async fn checkout_stage(tab: TabContext) -> Json<ApiResponse<CheckoutStage>> {
    Json(ApiResponse::success(
        "OK",
        checkout_service::stage(&tab),
        Some(Meta::empty()),
    ))
}

#[utoipa::path(
    get,
    path = "/api/checkout/confirmation",
    params(
        ("x-tab-id" = Uuid, Header, description = "Tab ID")
    ),
    responses(
        (status = 200, description = "Last confirmed order", body = ApiResponse<Order>),
        (status = 404, description = "No confirmed order in this tab"),
    ),
    tag = "Checkout"
)]
pub async fn confirmation(tab: TabContext) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = checkout_service::confirmation(&tab)?;
    Ok(Json(resp))
}
