use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod products;
pub mod tabs;
pub mod wishlist;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/tabs", tabs::router())
        .nest("/products", products::router())
        .nest("/cart", cart::router())
        .nest("/wishlist", wishlist::router())
        .nest("/checkout", checkout::router())
        .nest("/orders", orders::route())
        .nest("/auth", auth::router())
}
