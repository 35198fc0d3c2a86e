//! Form field rules shared by every form in the storefront.
//!
//! A [`FieldRule`] optionally trims and normalizes the raw input, then
//! checks its length and pattern. Errors are collected per field in
//! [`ValidationErrors`] so a form reports all of its problems at once.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::Serialize;
use utoipa::ToSchema;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").expect("Invalid regex"));
static RUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{7,8}[0-9K]$").expect("Invalid regex"));
static CARD_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{15,16}$").expect("Invalid regex"));
static CARD_EXPIRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}/\d{2}$").expect("Invalid regex"));
static CARD_CVV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3,4}$").expect("Invalid regex"));

pub type Normalizer = fn(&str) -> Option<String>;

#[derive(Debug, Clone)]
pub struct FieldRule {
    pub trim: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<&'static Regex>,
    pub normalizer: Option<Normalizer>,
    pub message: &'static str,
}

impl FieldRule {
    pub fn new(message: &'static str) -> Self {
        Self {
            trim: true,
            min_length: None,
            max_length: None,
            pattern: None,
            normalizer: None,
            message,
        }
    }

    pub fn untrimmed(mut self) -> Self {
        self.trim = false;
        self
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub fn pattern(mut self, re: &'static Regex) -> Self {
        self.pattern = Some(re);
        self
    }

    pub fn normalizer(mut self, f: Normalizer) -> Self {
        self.normalizer = Some(f);
        self
    }

    /// Returns the normalized value, or the rule's message.
    pub fn apply(&self, raw: &str) -> Result<String, &'static str> {
        let value = if self.trim { raw.trim() } else { raw };
        let value = match self.normalizer {
            Some(normalize) => normalize(value).ok_or(self.message)?,
            None => value.to_string(),
        };

        let len = value.chars().count();
        if self.min_length.is_some_and(|min| len < min) {
            return Err(self.message);
        }
        if self.max_length.is_some_and(|max| len > max) {
            return Err(self.message);
        }
        if self.pattern.is_some_and(|re| !re.is_match(&value)) {
            return Err(self.message);
        }
        Ok(value)
    }
}

// Rules used across the pages.

pub fn required(message: &'static str) -> FieldRule {
    FieldRule::new(message).min_length(1)
}

pub fn full_name() -> FieldRule {
    FieldRule::new("Ingresa tu nombre completo (mínimo 3 caracteres).").min_length(3)
}

pub fn email() -> FieldRule {
    FieldRule::new("Email inválido. Ej: correo@ejemplo.com")
        .normalizer(|v| Some(v.to_lowercase()))
        .pattern(&EMAIL_RE)
}

pub fn phone() -> FieldRule {
    FieldRule::new("Teléfono inválido. Ej: +56 9 1234 5678").normalizer(normalize_cl_phone)
}

pub fn password(min_length: usize) -> FieldRule {
    FieldRule::new("La contraseña es demasiado corta.")
        .untrimmed()
        .min_length(min_length)
}

pub fn rut() -> FieldRule {
    FieldRule::new("RUT inválido.")
        .normalizer(|v| Some(v.replace(['.', '-'], "").to_uppercase()))
        .pattern(&RUT_RE)
}

pub fn card_number() -> FieldRule {
    FieldRule::new("Por favor ingresa un número de tarjeta válido")
        .normalizer(|v| Some(v.chars().filter(|c| !c.is_whitespace()).collect()))
        .pattern(&CARD_NUMBER_RE)
}

pub fn card_holder() -> FieldRule {
    FieldRule::new("Por favor ingresa el nombre como aparece en la tarjeta").min_length(3)
}

pub fn card_expiry() -> FieldRule {
    FieldRule::new("Por favor ingresa una fecha de vencimiento válida (MM/AA)")
        .pattern(&CARD_EXPIRY_RE)
}

pub fn card_cvv() -> FieldRule {
    FieldRule::new("Por favor ingresa un CVV válido").pattern(&CARD_CVV_RE)
}

/// Normalize a Chilean mobile number to `+569XXXXXXXX`.
///
/// Accepts `+56 9 1234 5678`, `56912345678`, `0056912345678` and
/// `912345678`, with any separators.
pub fn normalize_cl_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    let mut local = digits.as_str();
    if let Some(rest) = local.strip_prefix("00") {
        local = rest;
    }
    if let Some(rest) = local.strip_prefix("56") {
        local = rest;
    }
    if local.len() == 9 && local.starts_with('9') {
        return Some(format!("+56{local}"));
    }
    None
}

/// Group card digits by four: `4111111111111111` -> `4111 1111 1111 1111`.
pub fn format_card_number(raw: &str) -> String {
    let digits: Vec<char> = raw.chars().filter(char::is_ascii_digit).collect();
    digits
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Insert the slash of an `MM/YY` expiry as the user types.
pub fn format_expiry(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() >= 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}

/// Card holder names keep ASCII letters and spaces only, upper-cased.
pub fn format_card_holder(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check `value` against `rule`, recording a failure under `field`.
    pub fn check(&mut self, field: &str, rule: &FieldRule, value: &str) -> Option<String> {
        match rule.apply(value) {
            Ok(value) => Some(value),
            Err(message) => {
                self.add(field, message);
                None
            }
        }
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.errors.iter().map(|e| e.field.as_str()).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_numbers_normalize_to_plus_56() {
        assert_eq!(normalize_cl_phone("+56 9 1234 5678").as_deref(), Some("+56912345678"));
        assert_eq!(normalize_cl_phone("912345678").as_deref(), Some("+56912345678"));
        assert_eq!(normalize_cl_phone("56912345678").as_deref(), Some("+56912345678"));
        assert_eq!(normalize_cl_phone("0056912345678").as_deref(), Some("+56912345678"));
        assert_eq!(normalize_cl_phone("9-1234-5678").as_deref(), Some("+56912345678"));
        assert_eq!(normalize_cl_phone("22345678"), None);
        assert_eq!(normalize_cl_phone("812345678"), None);
        assert_eq!(normalize_cl_phone(""), None);
    }

    #[test]
    fn email_rule_trims_and_lowercases() {
        assert_eq!(email().apply("  Ana@Example.CL ").as_deref(), Ok("ana@example.cl"));
        assert!(email().apply("ana@example.c").is_err());
        assert!(email().apply("ana example@mail.com").is_err());
        assert!(email().apply("").is_err());
    }

    #[test]
    fn rut_ignores_dots_and_dash() {
        assert_eq!(rut().apply("12.345.678-k").as_deref(), Ok("12345678K"));
        assert!(rut().apply("1.234.567-8").is_ok());
        assert!(rut().apply("123-4").is_err());
    }

    #[test]
    fn password_length_is_configurable_and_untrimmed() {
        assert!(password(8).apply("Eternia1").is_ok());
        assert!(password(8).apply("short").is_err());
        assert!(password(6).apply("sixsix").is_ok());
        assert!(password(8).apply("  abcd  ").is_ok());
    }

    #[test]
    fn card_fields() {
        assert_eq!(
            card_number().apply("4111 1111 1111 1111").as_deref(),
            Ok("4111111111111111")
        );
        assert!(card_number().apply("3782 822463 10005").is_ok());
        assert!(card_number().apply("4111").is_err());
        assert!(card_expiry().apply("12/27").is_ok());
        assert!(card_expiry().apply("1227").is_err());
        assert!(card_cvv().apply("123").is_ok());
        assert!(card_cvv().apply("12a").is_err());
        assert!(card_holder().apply(" AL ").is_err());
    }

    #[test]
    fn formatters() {
        assert_eq!(format_card_number("4111-1111 1111x1111"), "4111 1111 1111 1111");
        assert_eq!(format_expiry("1227"), "12/27");
        assert_eq!(format_expiry("1"), "1");
        assert_eq!(format_card_holder("Ana María 2"), "ANA MARA ");
    }

    #[test]
    fn errors_are_collected_per_field() {
        let mut errors = ValidationErrors::new();
        assert!(errors.check("email", &email(), "bad").is_none());
        assert_eq!(errors.check("rut", &rut(), "12345678-9").as_deref(), Some("123456789"));
        assert!(errors.check("telefono", &phone(), "123").is_none());

        assert!(errors.has("email"));
        assert!(errors.has("telefono"));
        assert!(!errors.has("rut"));
        assert_eq!(errors.into_result().unwrap_err().errors.len(), 2);
    }
}
