use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    config::AppConfig,
    dto::checkout::{CheckoutSummary, CustomerForm, PaymentForm},
    error::{AppError, AppResult},
    models::{
        CartItem, Customer, NO_INSTALLMENTS, Order, OrderStatus, PaymentMethod, ShippingMethod,
    },
    response::{ApiResponse, Meta},
    state::AppState,
    storage::keys::session,
    store::cart,
    tab::Tab,
    validation::{self, ValidationErrors},
};

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Where a tab is in the checkout flow, derived from what its storage holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStage {
    Empty,
    CartPopulated,
    CustomerPending,
    PaymentPending,
    Processing,
    Confirmed,
}

pub fn stage(tab: &Tab) -> CheckoutStage {
    let storage = tab.session();
    if tab.payment_in_flight() {
        CheckoutStage::Processing
    } else if storage.get_item(session::CHECKOUT_CUSTOMER).is_some()
        && storage.get_item(session::CHECKOUT_TOTAL).is_some()
    {
        CheckoutStage::PaymentPending
    } else if !storage
        .read_list::<CartItem>(session::CHECKOUT_CART)
        .is_empty()
    {
        CheckoutStage::CustomerPending
    } else if !tab.cart().get().is_empty() {
        CheckoutStage::CartPopulated
    } else if storage.get_item(session::LAST_ORDER).is_some() {
        CheckoutStage::Confirmed
    } else {
        CheckoutStage::Empty
    }
}

/// Copy the cart into the tab's session and start a fresh checkout.
pub fn begin(tab: &Tab) -> AppResult<ApiResponse<CheckoutSummary>> {
    let items = tab.cart().get();
    if items.is_empty() {
        return Err(AppError::BadRequest("El carrito está vacío".into()));
    }

    let storage = tab.session();
    for key in session::CHECKOUT_KEYS {
        storage.remove_item(key)?;
    }
    storage.write_json(session::CHECKOUT_CART, &items)?;
    tracing::info!(tab = %tab.id(), lines = items.len(), "checkout started");

    let summary = CheckoutSummary {
        subtotal: cart::subtotal(&items),
        items,
        shipping: None,
        total: None,
        customer: None,
    };
    Ok(ApiResponse::success(
        "Checkout started",
        summary,
        Some(Meta::empty()),
    ))
}

pub fn validate_customer(form: CustomerForm) -> Result<Customer, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let nombre = errors.check(
        "nombre",
        &validation::required("Ingresa tu nombre"),
        &form.nombre,
    );
    let apellido = errors.check(
        "apellido",
        &validation::required("Ingresa tu apellido"),
        &form.apellido,
    );
    let email = errors.check("email", &validation::email(), &form.email);
    let telefono = errors.check(
        "telefono",
        &validation::required("Ingresa tu teléfono"),
        &form.telefono,
    );
    let rut = errors.check("rut", &validation::rut(), &form.rut);

    let home = form.tipo_envio == ShippingMethod::Domicilio;
    let direccion = delivery_field(&mut errors, home, "direccion", "Ingresa tu dirección", &form.direccion);
    let comuna = delivery_field(&mut errors, home, "comuna", "Ingresa tu comuna", &form.comuna);
    let ciudad = delivery_field(&mut errors, home, "ciudad", "Ingresa tu ciudad", &form.ciudad);
    let region = delivery_field(&mut errors, home, "region", "Selecciona tu región", &form.region);

    errors.into_result()?;
    Ok(Customer {
        nombre: nombre.unwrap_or_default(),
        apellido: apellido.unwrap_or_default(),
        email: email.unwrap_or_default(),
        telefono: telefono.unwrap_or_default(),
        rut: rut.unwrap_or_default(),
        tipo_envio: form.tipo_envio,
        direccion,
        comuna,
        ciudad,
        region,
        depto: form.depto.trim().to_string(),
        instrucciones: form.instrucciones.trim().to_string(),
        notas: form.notas.trim().to_string(),
    })
}

// Address fields are only required for home delivery.
fn delivery_field(
    errors: &mut ValidationErrors,
    home: bool,
    field: &str,
    message: &'static str,
    value: &str,
) -> String {
    if home {
        errors
            .check(field, &validation::required(message), value)
            .unwrap_or_default()
    } else {
        value.trim().to_string()
    }
}

pub fn shipping_cost(config: &AppConfig, method: ShippingMethod) -> i64 {
    match method {
        ShippingMethod::Domicilio => config.shipping_cost,
        ShippingMethod::Retiro => 0,
    }
}

/// Store the customer and the totals the payment step charges.
pub fn submit_customer(
    state: &AppState,
    tab: &Tab,
    form: CustomerForm,
) -> AppResult<ApiResponse<CheckoutSummary>> {
    let customer = validate_customer(form)?;

    let storage = tab.session();
    let mut items = storage.read_list::<CartItem>(session::CHECKOUT_CART);
    if items.is_empty() {
        items = tab.cart().get();
    }
    if items.is_empty() {
        return Err(AppError::BadRequest("El carrito está vacío".into()));
    }

    let subtotal = cart::subtotal(&items);
    let shipping = shipping_cost(&state.config, customer.tipo_envio);
    let total = subtotal + shipping;

    storage.write_json(session::CHECKOUT_CART, &items)?;
    storage.write_json(session::CHECKOUT_CUSTOMER, &customer)?;
    storage.write_json(session::CHECKOUT_SUBTOTAL, &subtotal)?;
    storage.write_json(session::CHECKOUT_SHIPPING, &shipping)?;
    storage.write_json(session::CHECKOUT_TOTAL, &total)?;
    tracing::info!(tab = %tab.id(), subtotal, shipping, total, "checkout customer saved");

    let summary = CheckoutSummary {
        items,
        subtotal,
        shipping: Some(shipping),
        total: Some(total),
        customer: Some(customer),
    };
    Ok(ApiResponse::success(
        "Customer saved",
        summary,
        Some(Meta::empty()),
    ))
}

// Inputs are shaped the way the payment form masks them before they are checked.
fn validate_card(form: &PaymentForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.check(
        "cardNumber",
        &validation::card_number(),
        &validation::format_card_number(&form.card_number),
    );
    errors.check(
        "cardName",
        &validation::card_holder(),
        &validation::format_card_holder(&form.card_name),
    );
    errors.check(
        "cardExpiry",
        &validation::card_expiry(),
        &validation::format_expiry(&form.card_expiry),
    );
    errors.check("cardCvv", &validation::card_cvv(), &form.card_cvv);
    errors.into_result()
}

fn installments(form: &PaymentForm) -> String {
    match form.payment_method {
        PaymentMethod::Debito => NO_INSTALLMENTS.to_string(),
        PaymentMethod::Credito => form
            .cuotas
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(NO_INSTALLMENTS)
            .to_string(),
    }
}

fn payment_delay(config: &AppConfig) -> Duration {
    let min = config.payment_delay_min.as_millis() as u64;
    let max = config.payment_delay_max.as_millis() as u64;
    if max > min {
        Duration::from_millis(rand::rng().random_range(min..=max))
    } else {
        Duration::from_millis(min)
    }
}

// Clears the tab's processing flag however the payment task ends.
struct PaymentGuard(Arc<Tab>);

impl Drop for PaymentGuard {
    fn drop(&mut self) {
        self.0.finish_payment();
    }
}

/// Simulate the card payment and confirm the order.
///
/// The processing delay runs in its own task: once started it completes
/// even if the caller stops waiting.
pub async fn submit_payment(
    state: &AppState,
    tab: &Arc<Tab>,
    form: PaymentForm,
) -> AppResult<ApiResponse<Order>> {
    let storage = tab.session();
    let (Some(total), Some(customer)) = (
        storage.read_json::<i64>(session::CHECKOUT_TOTAL),
        storage.read_json::<Customer>(session::CHECKOUT_CUSTOMER),
    ) else {
        return Err(AppError::BadRequest(
            "Completa primero los datos de envío".into(),
        ));
    };

    validate_card(&form)?;
    let cuotas = installments(&form);

    if !tab.start_payment() {
        return Err(AppError::BadRequest("Ya hay un pago en proceso".into()));
    }
    let guard = PaymentGuard(tab.clone());
    let delay = payment_delay(&state.config);
    tracing::info!(tab = %tab.id(), total, delay_ms = delay.as_millis() as u64, "processing payment");

    let payment_method = form.payment_method;
    let task = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let result = complete_payment(&guard.0, customer, total, payment_method, cuotas);
        drop(guard);
        result
    });

    let order = task.await.map_err(|err| AppError::Internal(err.into()))??;
    Ok(ApiResponse::success(
        "Payment confirmed",
        order,
        Some(Meta::empty()),
    ))
}

fn complete_payment(
    tab: &Tab,
    customer: Customer,
    total: i64,
    payment_method: PaymentMethod,
    cuotas: String,
) -> AppResult<Order> {
    let storage = tab.session();
    let mut items = storage.read_list::<CartItem>(session::CHECKOUT_CART);
    if items.is_empty() {
        items = tab.cart().get();
    }
    let subtotal = storage
        .read_json::<i64>(session::CHECKOUT_SUBTOTAL)
        .unwrap_or_else(|| cart::subtotal(&items));
    let shipping = storage
        .read_json::<i64>(session::CHECKOUT_SHIPPING)
        .unwrap_or(total - subtotal);

    let date = Utc::now();
    let order = Order {
        order_number: order_number(date),
        date,
        customer: Some(customer),
        items,
        subtotal,
        shipping,
        total,
        payment_method,
        cuotas,
        status: OrderStatus::Confirmed,
    };

    storage.write_json(session::LAST_ORDER, &order)?;
    tab.orders().append(order.clone())?;

    tab.cart().clear()?;
    for key in [
        session::CHECKOUT_CART,
        session::CHECKOUT_TOTAL,
        session::CHECKOUT_SUBTOTAL,
        session::CHECKOUT_SHIPPING,
    ] {
        storage.remove_item(key)?;
    }
    tab.refresh_badges();

    tracing::info!(
        tab = %tab.id(),
        order_number = %order.order_number,
        total = order.total,
        "order confirmed"
    );
    Ok(order)
}

/// `ETR-<base36 millis>-<4 random base36 chars>`, upper case.
pub fn order_number(at: DateTime<Utc>) -> String {
    let millis = at.timestamp_millis().max(0) as u64;
    let mut rng = rand::rng();
    let suffix: String = (0..4)
        .map(|_| char::from(BASE36[rng.random_range(0..BASE36.len())]))
        .collect();
    format!("ETR-{}-{suffix}", to_base36(millis))
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// Leave the payment step. The cart and customer data stay untouched, only
/// the totals are dropped so the checkout form recomputes them.
pub fn cancel_payment(tab: &Tab) -> AppResult<ApiResponse<CheckoutStage>> {
    if tab.payment_in_flight() {
        return Err(AppError::BadRequest(
            "El pago ya se está procesando".into(),
        ));
    }
    let storage = tab.session();
    for key in [
        session::CHECKOUT_TOTAL,
        session::CHECKOUT_SUBTOTAL,
        session::CHECKOUT_SHIPPING,
    ] {
        storage.remove_item(key)?;
    }
    tracing::info!(tab = %tab.id(), "payment cancelled");
    Ok(ApiResponse::success(
        "Payment cancelled",
        stage(tab),
        Some(Meta::empty()),
    ))
}

/// The last confirmed order of this tab. Leftover checkout keys are
/// cleaned; the order itself stays so the page can be reloaded.
pub fn confirmation(tab: &Tab) -> AppResult<ApiResponse<Order>> {
    let storage = tab.session();
    let order = storage
        .read_json::<Order>(session::LAST_ORDER)
        .ok_or(AppError::NotFound)?;
    for key in session::CHECKOUT_KEYS {
        storage.remove_item(key)?;
    }
    Ok(ApiResponse::success("Order", order, Some(Meta::empty())))
}

pub fn order_history(tab: &Tab) -> ApiResponse<Vec<Order>> {
    let orders = tab.orders().get();
    let meta = Meta::whole(orders.len());
    ApiResponse::success("Orders", orders, Some(meta))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SharedStorage;

    #[test]
    fn base36_matches_js_radix_formatting() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_700_000_000_000), "LOYW3V28");
    }

    #[test]
    fn order_numbers_have_the_expected_shape() {
        let at = DateTime::from_timestamp_millis(1_700_000_000_000).expect("timestamp");
        let number = order_number(at);
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ETR");
        assert_eq!(parts[1], "LOYW3V28");
        assert_eq!(parts[2].len(), 4);
        assert!(parts[2].bytes().all(|b| BASE36.contains(&b)));
    }

    fn retiro_form() -> CustomerForm {
        CustomerForm {
            nombre: "Ana".into(),
            apellido: "Rojas".into(),
            email: "Ana@Mail.cl".into(),
            telefono: "+56 9 1234 5678".into(),
            rut: "12.345.678-5".into(),
            tipo_envio: ShippingMethod::Retiro,
            ..Default::default()
        }
    }

    #[test]
    fn address_is_only_required_for_home_delivery() {
        let customer = validate_customer(retiro_form()).expect("retiro");
        assert_eq!(customer.email, "ana@mail.cl");
        assert_eq!(customer.rut, "123456785");

        let errors = validate_customer(CustomerForm {
            tipo_envio: ShippingMethod::Domicilio,
            direccion: "Av. Siempre Viva 742".into(),
            ..retiro_form()
        })
        .unwrap_err();
        assert!(!errors.has("direccion"));
        assert!(errors.has("comuna"));
        assert!(errors.has("ciudad"));
        assert!(errors.has("region"));
    }

    #[test]
    fn customer_errors_are_reported_together() {
        let errors = validate_customer(CustomerForm::default()).unwrap_err();
        for field in ["nombre", "apellido", "email", "telefono", "rut", "direccion"] {
            assert!(errors.has(field), "{field} should be invalid");
        }
    }

    #[test]
    fn debit_never_has_installments() {
        let form = PaymentForm {
            payment_method: PaymentMethod::Debito,
            cuotas: Some("6".into()),
            ..Default::default()
        };
        assert_eq!(installments(&form), NO_INSTALLMENTS);

        let form = PaymentForm {
            payment_method: PaymentMethod::Credito,
            cuotas: Some("6".into()),
            ..Default::default()
        };
        assert_eq!(installments(&form), "6");
    }

    #[test]
    fn card_inputs_are_masked_before_checking() {
        let form = PaymentForm {
            payment_method: PaymentMethod::Credito,
            card_number: "4111-1111-1111-1111".into(),
            card_name: "camila soto".into(),
            card_expiry: "1229".into(),
            card_cvv: "123".into(),
            cuotas: None,
        };
        assert!(validate_card(&form).is_ok());

        let form = PaymentForm {
            card_name: "12".into(),
            ..form
        };
        let errors = validate_card(&form).unwrap_err();
        assert!(errors.has("cardName"));
        assert!(!errors.has("cardExpiry"));
    }

    #[test]
    fn shipping_depends_on_delivery() {
        let config = AppConfig::default();
        assert_eq!(shipping_cost(&config, ShippingMethod::Domicilio), 15_000);
        assert_eq!(shipping_cost(&config, ShippingMethod::Retiro), 0);
    }

    #[tokio::test]
    async fn stage_follows_the_flow() {
        let config = AppConfig::default().without_payment_delay();
        let state = AppState::with_storage(config, SharedStorage::in_memory());
        let tab = state.tabs.open();
        assert_eq!(stage(&tab), CheckoutStage::Empty);
        assert!(begin(&tab).is_err());

        tab.cart()
            .add(
                CartItem {
                    id: "1".into(),
                    nombre: "Mesa".into(),
                    precio: 10_000,
                    imagen: String::new(),
                    cantidad: 1,
                },
                2,
            )
            .expect("add");
        assert_eq!(stage(&tab), CheckoutStage::CartPopulated);

        begin(&tab).expect("begin");
        assert_eq!(stage(&tab), CheckoutStage::CustomerPending);

        let summary = submit_customer(&state, &tab, retiro_form())
            .expect("customer")
            .data
            .expect("summary");
        assert_eq!(summary.total, Some(20_000));
        assert_eq!(stage(&tab), CheckoutStage::PaymentPending);

        cancel_payment(&tab).expect("cancel");
        assert_eq!(stage(&tab), CheckoutStage::CustomerPending);
        assert_eq!(tab.cart().get().len(), 1);
    }

    #[tokio::test]
    async fn payment_requires_customer_and_total() {
        let state = AppState::with_storage(
            AppConfig::default().without_payment_delay(),
            SharedStorage::in_memory(),
        );
        let tab = state.tabs.open();
        let result = submit_payment(&state, &tab, PaymentForm::default()).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(!tab.payment_in_flight());
    }
}
