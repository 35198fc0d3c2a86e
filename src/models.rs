use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// A cart line as persisted under the cart key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub nombre: String,
    pub precio: i64,
    #[serde(default)]
    pub imagen: String,
    pub cantidad: u32,
}

impl CartItem {
    pub fn line_total(&self) -> i64 {
        self.precio * i64::from(self.cantidad)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductDetails {
    pub material: Option<String>,
    pub medidas: Option<String>,
    pub peso: Option<String>,
    pub interior: Option<String>,
    pub garantia: Option<String>,
}

/// A catalog entry from `catalogo.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub imagen: String,
    pub precio: i64,
    #[serde(default, deserialize_with = "lenient_price")]
    pub precio_anterior: Option<i64>,
    #[serde(default)]
    pub descuento: Option<String>,
    #[serde(default)]
    pub badge_color: Option<String>,
    #[serde(default)]
    pub categoria: Option<String>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub detalles: Option<ProductDetails>,
}

impl Product {
    pub fn to_cart_item(&self, cantidad: u32) -> CartItem {
        CartItem {
            id: self.id.clone(),
            nombre: self.nombre.clone(),
            precio: self.precio,
            imagen: self.imagen.clone(),
            cantidad,
        }
    }

    /// Label shown on product cards when stock runs low.
    pub fn stock_label(&self) -> Option<&'static str> {
        match self.stock {
            Some(0) => Some("Agotado"),
            Some(n) if n <= 3 => Some("¡Últimas unidades!"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ShippingMethod {
    #[default]
    Domicilio,
    Retiro,
}

/// Customer data captured on the checkout page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub telefono: String,
    pub rut: String,
    pub tipo_envio: ShippingMethod,
    #[serde(default)]
    pub direccion: String,
    #[serde(default)]
    pub depto: String,
    #[serde(default)]
    pub comuna: String,
    #[serde(default)]
    pub ciudad: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub instrucciones: String,
    #[serde(default)]
    pub notas: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Credito,
    Debito,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Confirmed,
}

pub const NO_INSTALLMENTS: &str = "sin_cuotas";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_number: String,
    pub date: DateTime<Utc>,
    pub customer: Option<Customer>,
    pub items: Vec<CartItem>,
    pub subtotal: i64,
    pub shipping: i64,
    pub total: i64,
    pub payment_method: PaymentMethod,
    pub cuotas: String,
    pub status: OrderStatus,
}

/// A registered account. The password is kept as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub nombre_completo: String,
    pub telefono: String,
    pub email: String,
    pub password: String,
}

/// Session marker written on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub email: String,
    pub nombre_completo: String,
    pub login_at: DateTime<Utc>,
}

/// Format an amount of pesos the way `es-CL` does: `1234567` -> `1.234.567`.
pub fn format_clp(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
        Id::Float(f) => f.to_string(),
    })
}

// `precioAnterior` shows up as a number, a numeric string, "" or null.
fn lenient_price<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| match v {
            serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f as i64),
            _ => None,
        })
        .filter(|n| *n > 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_pesos_with_dots() {
        assert_eq!(format_clp(0), "0");
        assert_eq!(format_clp(999), "999");
        assert_eq!(format_clp(15_000), "15.000");
        assert_eq!(format_clp(1_234_567), "1.234.567");
        assert_eq!(format_clp(-2_500), "-2.500");
    }

    #[test]
    fn product_accepts_numeric_ids_and_loose_prices() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": 42,
            "nombre": "Mesa Roble",
            "precio": 250000,
            "precioAnterior": "",
            "stock": 2
        }))
        .expect("product");
        assert_eq!(product.id, "42");
        assert_eq!(product.precio_anterior, None);
        assert_eq!(product.stock_label(), Some("¡Últimas unidades!"));

        let product: Product = serde_json::from_value(serde_json::json!({
            "id": "7",
            "nombre": "Silla",
            "precio": 90000,
            "precioAnterior": "120000"
        }))
        .expect("product");
        assert_eq!(product.precio_anterior, Some(120_000));
        assert_eq!(product.stock_label(), None);
    }

    #[test]
    fn order_uses_storefront_field_names() {
        let order = Order {
            order_number: "ETR-1-ABCD".into(),
            date: Utc::now(),
            customer: None,
            items: vec![],
            subtotal: 0,
            shipping: 0,
            total: 0,
            payment_method: PaymentMethod::Debito,
            cuotas: NO_INSTALLMENTS.into(),
            status: OrderStatus::Confirmed,
        };
        let json = serde_json::to_value(&order).expect("json");
        assert_eq!(json["orderNumber"], "ETR-1-ABCD");
        assert_eq!(json["paymentMethod"], "debito");
        assert_eq!(json["status"], "confirmed");
    }
}
