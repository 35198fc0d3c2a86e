use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{CartItem, format_clp},
    storage::StorageHandle,
};

pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 10;

/// What the cart page and the navbar badge show after each change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub subtotal: i64,
    pub count: u32,
    pub subtotal_display: String,
    pub count_label: String,
}

impl CartView {
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let subtotal = subtotal(&items);
        let count = item_count(&items);
        Self {
            subtotal_display: format!("${}", format_clp(subtotal)),
            count_label: format!(
                "{count} {}",
                if count == 1 { "producto" } else { "productos" }
            ),
            items,
            subtotal,
            count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub fn subtotal(items: &[CartItem]) -> i64 {
    items.iter().map(CartItem::line_total).sum()
}

pub fn item_count(items: &[CartItem]) -> u32 {
    items.iter().map(|item| item.cantidad).sum()
}

fn clamp_quantity(quantity: i64) -> u32 {
    quantity.clamp(i64::from(MIN_QUANTITY), i64::from(MAX_QUANTITY)) as u32
}

/// The cart list under one storage key.
#[derive(Clone)]
pub struct CartStore {
    storage: StorageHandle,
    key: String,
}

impl CartStore {
    pub fn new(storage: StorageHandle, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> Vec<CartItem> {
        self.storage.read_list(&self.key)
    }

    pub fn save(&self, items: &[CartItem]) -> AppResult<()> {
        self.storage.write_json(&self.key, items)
    }

    pub fn view(&self) -> CartView {
        CartView::from_items(self.get())
    }

    /// Add `quantity` units of `item`, merging with an existing line.
    pub fn add(&self, item: CartItem, quantity: u32) -> AppResult<CartView> {
        let mut items = self.get();
        match items.iter_mut().find(|line| line.id == item.id) {
            Some(line) => {
                line.cantidad = clamp_quantity(i64::from(line.cantidad) + i64::from(quantity));
            }
            None => items.push(CartItem {
                cantidad: clamp_quantity(i64::from(quantity)),
                ..item
            }),
        }
        self.save(&items)?;
        tracing::debug!(key = %self.key, "cart item added");
        Ok(CartView::from_items(items))
    }

    /// Add `delta` to a line. Lines dropping below one unit are removed;
    /// lines above the maximum are capped. Unknown ids change nothing.
    pub fn update_quantity(&self, id: &str, delta: i64) -> AppResult<CartView> {
        let mut items = self.get();
        let Some(index) = items.iter().position(|line| line.id == id) else {
            return Ok(CartView::from_items(items));
        };

        let quantity = i64::from(items[index].cantidad).saturating_add(delta);
        if quantity < i64::from(MIN_QUANTITY) {
            items.remove(index);
        } else {
            items[index].cantidad = quantity.min(i64::from(MAX_QUANTITY)) as u32;
        }

        self.save(&items)?;
        tracing::debug!(key = %self.key, id, delta, "cart quantity updated");
        Ok(CartView::from_items(items))
    }

    pub fn set_quantity(&self, id: &str, quantity: i64) -> AppResult<CartView> {
        let mut items = self.get();
        let Some(line) = items.iter_mut().find(|line| line.id == id) else {
            return Ok(CartView::from_items(items));
        };

        line.cantidad = clamp_quantity(quantity);
        self.save(&items)?;
        tracing::debug!(key = %self.key, id, quantity, "cart quantity set");
        Ok(CartView::from_items(items))
    }

    pub fn remove(&self, id: &str) -> AppResult<CartView> {
        let mut items = self.get();
        items.retain(|line| line.id != id);
        self.save(&items)?;
        tracing::debug!(key = %self.key, id, "cart item removed");
        Ok(CartView::from_items(items))
    }

    pub fn clear(&self) -> AppResult<()> {
        self.storage.remove_item(&self.key)
    }
}
