use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::storage::keys;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub catalog_path: PathBuf,
    /// JSON file backing local storage. `None` keeps local storage in memory.
    pub storage_path: Option<PathBuf>,
    pub cart_key: String,
    pub min_password_length: usize,
    pub shipping_cost: i64,
    pub payment_delay_min: Duration,
    pub payment_delay_max: Duration,
    /// Tabs untouched for longer than this are dropped when another tab opens.
    pub tab_idle_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            catalog_path: PathBuf::from("data/catalogo.json"),
            storage_path: None,
            cart_key: keys::CART.to_string(),
            min_password_length: 8,
            shipping_cost: 15_000,
            payment_delay_min: Duration::from_millis(3_000),
            payment_delay_max: Duration::from_millis(5_000),
            tab_idle_timeout: Duration::from_secs(30 * 60),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let host = env::var("APP_HOST").unwrap_or(defaults.host);
        let port = parse_var("APP_PORT").unwrap_or(defaults.port);
        let catalog_path = env::var("CATALOG_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.catalog_path);
        let storage_path = env::var("STORAGE_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let cart_key = env::var("CART_STORAGE_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .unwrap_or(defaults.cart_key);
        let min_password_length =
            parse_var("MIN_PASSWORD_LENGTH").unwrap_or(defaults.min_password_length);
        let shipping_cost = parse_var("SHIPPING_COST").unwrap_or(defaults.shipping_cost);
        let payment_delay_min = parse_var("PAYMENT_DELAY_MIN_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.payment_delay_min);
        let payment_delay_max = parse_var("PAYMENT_DELAY_MAX_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.payment_delay_max);
        let tab_idle_timeout = parse_var("TAB_IDLE_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.tab_idle_timeout);

        if payment_delay_max < payment_delay_min {
            anyhow::bail!("PAYMENT_DELAY_MAX_MS must not be lower than PAYMENT_DELAY_MIN_MS");
        }

        Ok(Self {
            host,
            port,
            catalog_path,
            storage_path,
            cart_key,
            min_password_length,
            shipping_cost,
            payment_delay_min,
            payment_delay_max,
            tab_idle_timeout,
        })
    }

    /// Same defaults with the payment delay removed.
    pub fn without_payment_delay(mut self) -> Self {
        self.payment_delay_min = Duration::ZERO;
        self.payment_delay_max = Duration::ZERO;
        self
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse::<T>().ok())
}
