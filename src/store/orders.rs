use crate::{
    error::AppResult,
    models::Order,
    storage::{StorageHandle, keys},
};

/// Confirmed orders, oldest first.
#[derive(Clone)]
pub struct OrderHistory {
    storage: StorageHandle,
}

impl OrderHistory {
    pub fn new(storage: StorageHandle) -> Self {
        Self { storage }
    }

    pub fn get(&self) -> Vec<Order> {
        self.storage.read_list(keys::ORDERS)
    }

    pub fn append(&self, order: Order) -> AppResult<()> {
        let mut orders = self.get();
        orders.push(order);
        self.storage.write_json(keys::ORDERS, &orders)
    }
}
