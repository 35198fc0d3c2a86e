use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{models::Product, store::WishlistButton};

#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistView {
    pub ids: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct WishlistProducts {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

/// Ids of the wishlist buttons currently rendered on a page.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ButtonsQuery {
    pub ids: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct WishlistButtons {
    #[schema(value_type = Vec<WishlistButton>)]
    pub buttons: Vec<WishlistButton>,
}
