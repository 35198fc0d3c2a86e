use crate::{
    dto::cart::AddToCartRequest,
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    state::AppState,
    store::CartView,
    tab::Tab,
};

fn cart_response(message: &str, view: CartView) -> ApiResponse<CartView> {
    let meta = Meta::whole(view.items.len());
    ApiResponse::success(message, view, Some(meta))
}

pub fn get_cart(tab: &Tab) -> ApiResponse<CartView> {
    cart_response("OK", tab.cart().view())
}

/// "Add to cart" from a product card or the product page.
pub async fn add_to_cart(
    state: &AppState,
    tab: &Tab,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartView>> {
    let product = match state.catalog.get(&payload.product_id).await {
        Ok(product) => product,
        Err(AppError::NotFound) => {
            return Err(AppError::BadRequest("Product not found".into()));
        }
        Err(err) => return Err(err),
    };
    if product.stock == Some(0) {
        return Err(AppError::BadRequest(format!(
            "{} está agotado",
            product.nombre
        )));
    }

    let quantity = payload.quantity.unwrap_or(1);
    let view = tab.cart().add(product.to_cart_item(quantity), quantity)?;
    tab.refresh_badges();
    Ok(cart_response("Producto agregado al carrito", view))
}

pub fn update_quantity(tab: &Tab, id: &str, delta: i64) -> AppResult<ApiResponse<CartView>> {
    let view = tab.cart().update_quantity(id, delta)?;
    tab.refresh_badges();
    Ok(cart_response("OK", view))
}

pub fn set_quantity(tab: &Tab, id: &str, quantity: i64) -> AppResult<ApiResponse<CartView>> {
    let view = tab.cart().set_quantity(id, quantity)?;
    tab.refresh_badges();
    Ok(cart_response("OK", view))
}

pub fn remove_item(tab: &Tab, id: &str) -> AppResult<ApiResponse<CartView>> {
    let view = tab.cart().remove(id)?;
    tab.refresh_badges();
    Ok(cart_response("Removed from cart", view))
}
