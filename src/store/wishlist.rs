use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::Product,
    storage::{StorageHandle, keys},
};

/// State of one wishlist button (`is-active` class and heart icon).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct WishlistButton {
    pub id: String,
    pub active: bool,
    pub icon: String,
}

impl WishlistButton {
    fn new(id: String, active: bool) -> Self {
        Self {
            id,
            active,
            icon: if active { "fa-solid" } else { "fa-regular" }.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct WishlistToggle {
    pub id: String,
    pub active: bool,
    pub count: usize,
    pub buttons: Vec<WishlistButton>,
}

#[derive(Clone)]
pub struct WishlistStore {
    storage: StorageHandle,
}

impl WishlistStore {
    pub fn new(storage: StorageHandle) -> Self {
        Self { storage }
    }

    pub fn get(&self) -> Vec<String> {
        self.storage.read_list(keys::WISHLIST)
    }

    pub fn save(&self, ids: &[String]) -> AppResult<()> {
        self.storage.write_json(keys::WISHLIST, ids)
    }

    pub fn count(&self) -> usize {
        self.get().len()
    }

    pub fn is_in_wishlist(&self, id: &str) -> bool {
        self.get().iter().any(|entry| entry == id)
    }

    /// Add `id` when absent, remove it when present.
    pub fn toggle(&self, id: impl ToString) -> AppResult<WishlistToggle> {
        let id = id.to_string();
        let mut ids = self.get();
        let active = match ids.iter().position(|entry| *entry == id) {
            Some(index) => {
                ids.remove(index);
                false
            }
            None => {
                ids.push(id.clone());
                true
            }
        };
        self.save(&ids)?;
        tracing::debug!(id = %id, active, "wishlist toggled");

        let buttons = ids
            .iter()
            .map(|entry| WishlistButton::new(entry.clone(), true))
            .chain((!active).then(|| WishlistButton::new(id.clone(), false)))
            .collect();

        Ok(WishlistToggle {
            count: ids.len(),
            id,
            active,
            buttons,
        })
    }

    /// Button states for the ids currently rendered on a page.
    pub fn buttons<S: AsRef<str>>(&self, rendered: &[S]) -> Vec<WishlistButton> {
        let ids = self.get();
        rendered
            .iter()
            .map(|id| {
                let id = id.as_ref();
                WishlistButton::new(id.to_string(), ids.iter().any(|entry| entry == id))
            })
            .collect()
    }

    /// Catalog products in the wishlist, in catalog order.
    pub fn products(&self, catalog: &[Product]) -> Vec<Product> {
        let ids = self.get();
        catalog
            .iter()
            .filter(|product| ids.contains(&product.id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{SharedStorage, TabId};

    fn store() -> WishlistStore {
        WishlistStore::new(SharedStorage::in_memory().handle(TabId::new()))
    }

    #[test]
    fn toggle_twice_restores_the_list() {
        let wishlist = store();
        wishlist.save(&["7".to_string()]).expect("save");
        let before = wishlist.get();

        let first = wishlist.toggle("42").expect("toggle");
        assert!(first.active);
        assert_eq!(first.count, 2);
        assert!(wishlist.is_in_wishlist("42"));

        let second = wishlist.toggle("42").expect("toggle");
        assert!(!second.active);
        assert!(!wishlist.is_in_wishlist("42"));
        assert_eq!(wishlist.get(), before);
        assert!(second.buttons.contains(&WishlistButton::new("42".into(), false)));
    }

    #[test]
    fn numeric_ids_are_compared_as_strings() {
        let wishlist = store();
        wishlist.toggle(42).expect("toggle");
        assert!(wishlist.is_in_wishlist("42"));
    }

    #[test]
    fn buttons_follow_membership() {
        let wishlist = store();
        wishlist.toggle("1").expect("toggle");
        let buttons = wishlist.buttons(&["1", "2"]);
        assert_eq!(buttons[0].icon, "fa-solid");
        assert!(buttons[0].active);
        assert_eq!(buttons[1].icon, "fa-regular");
        assert!(!buttons[1].active);
    }

    #[test]
    fn malformed_wishlist_reads_as_empty() {
        let storage = SharedStorage::in_memory().handle(TabId::new());
        storage.set_item(keys::WISHLIST, "oops".to_string()).expect("set");
        let wishlist = WishlistStore::new(storage);
        assert_eq!(wishlist.count(), 0);
        assert!(wishlist.toggle("1").expect("toggle").active);
    }
}
