use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{CartItem, Customer, PaymentMethod, ShippingMethod};

/// Checkout form as posted by the client. Fields are validated and then
/// stored as a [`Customer`].
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerForm {
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub telefono: String,
    pub rut: String,
    pub tipo_envio: ShippingMethod,
    pub direccion: String,
    pub depto: String,
    pub comuna: String,
    pub ciudad: String,
    pub region: String,
    pub instrucciones: String,
    pub notas: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentForm {
    pub payment_method: PaymentMethod,
    pub card_number: String,
    pub card_name: String,
    pub card_expiry: String,
    pub card_cvv: String,
    /// Installment count, or `sin_cuotas`. Ignored for debit.
    pub cuotas: Option<String>,
}

/// Order summary shown beside the checkout and payment forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CheckoutSummary {
    pub items: Vec<CartItem>,
    pub subtotal: i64,
    pub shipping: Option<i64>,
    pub total: Option<i64>,
    pub customer: Option<Customer>,
}
