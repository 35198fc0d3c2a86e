use crate::{
    dto::wishlist::{WishlistButtons, WishlistProducts, WishlistView},
    error::AppResult,
    response::{ApiResponse, Meta},
    state::AppState,
    store::WishlistToggle,
    tab::Tab,
};

pub fn list_wishlist(tab: &Tab) -> ApiResponse<WishlistView> {
    let ids = tab.wishlist().get();
    let meta = Meta::whole(ids.len());
    let data = WishlistView {
        count: ids.len(),
        ids,
    };
    ApiResponse::success("OK", data, Some(meta))
}

/// Products of the wishlist page, in catalog order. Ids missing from the
/// catalog are skipped.
pub async fn wishlist_products(
    state: &AppState,
    tab: &Tab,
) -> AppResult<ApiResponse<WishlistProducts>> {
    let catalog = state.catalog.load().await?;
    let items = tab.wishlist().products(&catalog);
    let meta = Meta::whole(items.len());
    Ok(ApiResponse::success(
        "OK",
        WishlistProducts { items },
        Some(meta),
    ))
}

pub fn toggle(tab: &Tab, id: &str) -> AppResult<ApiResponse<WishlistToggle>> {
    let toggled = tab.wishlist().toggle(id)?;
    tab.refresh_badges();
    let message = if toggled.active {
        "Agregado a favoritos"
    } else {
        "Eliminado de favoritos"
    };
    Ok(ApiResponse::success(message, toggled, Some(Meta::empty())))
}

/// Button states for a comma separated list of rendered product ids.
pub fn buttons(tab: &Tab, ids: Option<&str>) -> ApiResponse<WishlistButtons> {
    let rendered: Vec<&str> = ids
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect();
    let buttons = tab.wishlist().buttons(&rendered);
    ApiResponse::success("OK", WishlistButtons { buttons }, Some(Meta::empty()))
}
