use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Product;

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

/// A product plus the labels the detail page derives from it.
#[derive(Serialize, ToSchema)]
pub struct ProductDetail {
    pub product: Product,
    pub stock_label: Option<String>,
}
