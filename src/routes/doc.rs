use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest, RegisteredUser},
        cart::{AddToCartRequest, SetQuantityRequest, UpdateQuantityRequest},
        checkout::{CheckoutSummary, CustomerForm, PaymentForm},
        products::{ProductDetail, ProductList},
        tabs::TabOpened,
        wishlist::{WishlistButtons, WishlistProducts, WishlistView},
    },
    models::{
        CartItem, CurrentUser, Customer, Order, OrderStatus, PaymentMethod, Product,
        ProductDetails, ShippingMethod,
    },
    response::{ApiResponse, Meta},
    routes::{auth, cart, checkout, health, orders, params, products, tabs, wishlist},
    services::checkout_service::CheckoutStage,
    store::{CartView, WishlistButton, WishlistToggle},
    sync::Badges,
    validation::{FieldError, ValidationErrors},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("UUID")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        tabs::open_tab,
        tabs::close_tab,
        tabs::badges,
        products::list_products,
        products::get_product,
        products::related_products,
        cart::cart_list,
        cart::add_to_cart,
        cart::update_quantity,
        cart::set_quantity,
        cart::remove_from_cart,
        wishlist::list_wishlist,
        wishlist::wishlist_products,
        wishlist::wishlist_buttons,
        wishlist::toggle_wishlist,
        checkout::begin_checkout,
        checkout::submit_customer,
        checkout::submit_payment,
        checkout::cancel_payment,
        checkout::checkout_stage,
        checkout::confirmation,
        orders::list_order,
        auth::register,
        auth::login,
        auth::logout,
        auth::me
    ),
    components(
        schemas(
            Product,
            ProductDetails,
            CartItem,
            Customer,
            ShippingMethod,
            PaymentMethod,
            OrderStatus,
            Order,
            CurrentUser,
            CartView,
            WishlistButton,
            WishlistToggle,
            Badges,
            CheckoutStage,
            FieldError,
            ValidationErrors,
            TabOpened,
            ProductList,
            ProductDetail,
            AddToCartRequest,
            UpdateQuantityRequest,
            SetQuantityRequest,
            WishlistView,
            WishlistProducts,
            WishlistButtons,
            CustomerForm,
            PaymentForm,
            CheckoutSummary,
            RegisterRequest,
            RegisteredUser,
            LoginRequest,
            LoginResponse,
            params::Pagination,
            params::ProductQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<CartView>,
            ApiResponse<Order>,
            ApiResponse<Badges>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Tabs", description = "Client tabs sharing local storage"),
        (name = "Products", description = "Catalog endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Wishlist", description = "Wishlist endpoints"),
        (name = "Checkout", description = "Checkout and simulated payment"),
        (name = "Orders", description = "Order history"),
        (name = "Auth", description = "Account endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
