//! Storage key names, kept identical to what the storefront pages persist.

pub const WISHLIST: &str = "wishlist";
pub const CART: &str = "carritoEternia";
pub const USERS: &str = "users";
pub const CURRENT_USER: &str = "currentUser";
pub const AUTH_TOKEN: &str = "authToken";
pub const ORDERS: &str = "eterniaOrders";

/// Keys that live in a tab's session storage.
pub mod session {
    pub const CHECKOUT_CART: &str = "checkoutCarrito";
    pub const CHECKOUT_CUSTOMER: &str = "checkoutCustomer";
    pub const CHECKOUT_TOTAL: &str = "checkoutTotal";
    pub const CHECKOUT_SUBTOTAL: &str = "checkoutSubtotal";
    pub const CHECKOUT_SHIPPING: &str = "checkoutShipping";
    pub const LAST_ORDER: &str = "lastOrder";

    pub const CHECKOUT_KEYS: [&str; 5] = [
        CHECKOUT_CART,
        CHECKOUT_CUSTOMER,
        CHECKOUT_TOTAL,
        CHECKOUT_SUBTOTAL,
        CHECKOUT_SHIPPING,
    ];
}
