//! A tab is one client context: it shares the origin's local storage with
//! every other tab and owns a private session storage.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, PoisonError, RwLock,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use tokio::{sync::watch, task::JoinHandle, time::Instant};

use crate::{
    config::AppConfig,
    storage::{SharedStorage, StorageHandle, TabId},
    store::{CartStore, OrderHistory, UserStore, WishlistStore},
    sync::{BadgeSync, Badges, spawn_observer},
};

pub struct Tab {
    id: TabId,
    local: StorageHandle,
    session: StorageHandle,
    cart: CartStore,
    wishlist: WishlistStore,
    badges: Arc<BadgeSync>,
    payment_in_flight: AtomicBool,
    last_seen: Mutex<Instant>,
    sync_task: JoinHandle<()>,
}

impl Tab {
    /// Open a tab on `local`. Must be called inside a tokio runtime.
    pub fn open(local: &SharedStorage, cart_key: &str) -> Self {
        let id = TabId::new();
        let local = local.handle(id);
        let session = SharedStorage::in_memory().handle(id);
        let cart = CartStore::new(local.clone(), cart_key);
        let wishlist = WishlistStore::new(local.clone());

        let (badges, _) = BadgeSync::new(cart.clone(), wishlist.clone());
        let badges = Arc::new(badges);
        let sync_task = spawn_observer(local.subscribe(), id, badges.clone());

        tracing::debug!(tab = %id, "tab opened");
        Self {
            id,
            local,
            session,
            cart,
            wishlist,
            badges,
            payment_in_flight: AtomicBool::new(false),
            last_seen: Mutex::new(Instant::now()),
            sync_task,
        }
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn local(&self) -> &StorageHandle {
        &self.local
    }

    pub fn session(&self) -> &StorageHandle {
        &self.session
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    pub fn orders(&self) -> OrderHistory {
        OrderHistory::new(self.local.clone())
    }

    pub fn users(&self) -> UserStore {
        UserStore::new(self.local.clone())
    }

    pub fn badges(&self) -> Badges {
        self.badges.current()
    }

    pub fn watch_badges(&self) -> watch::Receiver<Badges> {
        self.badges.subscribe()
    }

    /// Recompute badges after a write made by this tab.
    pub fn refresh_badges(&self) {
        self.badges.refresh();
    }

    /// Mark a payment as processing. Returns `false` if one already is.
    pub(crate) fn start_payment(&self) -> bool {
        self.payment_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn finish_payment(&self) {
        self.payment_in_flight.store(false, Ordering::Release);
    }

    pub fn payment_in_flight(&self) -> bool {
        self.payment_in_flight.load(Ordering::Acquire)
    }

    fn touch(&self) {
        *self.last_seen.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed()
    }
}

impl Drop for Tab {
    fn drop(&mut self) {
        self.sync_task.abort();
    }
}

/// Open tabs by id.
#[derive(Clone)]
pub struct TabRegistry {
    local: SharedStorage,
    cart_key: String,
    idle_timeout: Duration,
    tabs: Arc<RwLock<HashMap<TabId, Arc<Tab>>>>,
}

impl TabRegistry {
    pub fn new(local: SharedStorage, config: &AppConfig) -> Self {
        Self {
            local,
            cart_key: config.cart_key.clone(),
            idle_timeout: config.tab_idle_timeout,
            tabs: Arc::default(),
        }
    }

    pub fn open(&self) -> Arc<Tab> {
        self.expire_idle();
        let tab = Arc::new(Tab::open(&self.local, &self.cart_key));
        self.tabs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(tab.id(), tab.clone());
        tab
    }

    /// Look up a tab and mark it as active.
    pub fn get(&self, id: TabId) -> Option<Arc<Tab>> {
        let tab = self
            .tabs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()?;
        tab.touch();
        Some(tab)
    }

    /// Drop tabs idle past the timeout. Tabs with a payment processing stay.
    pub fn expire_idle(&self) -> usize {
        let mut tabs = self.tabs.write().unwrap_or_else(PoisonError::into_inner);
        let before = tabs.len();
        tabs.retain(|id, tab| {
            let keep = tab.payment_in_flight() || tab.idle_for() <= self.idle_timeout;
            if !keep {
                tracing::debug!(tab = %id, "idle tab expired");
            }
            keep
        });
        before - tabs.len()
    }

    pub fn close(&self, id: TabId) -> bool {
        let removed = self
            .tabs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        if removed.is_some() {
            tracing::debug!(tab = %id, "tab closed");
        }
        removed.is_some()
    }

    pub fn len(&self) -> usize {
        self.tabs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn local(&self) -> &SharedStorage {
        &self.local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(idle: Duration) -> TabRegistry {
        let config = AppConfig {
            tab_idle_timeout: idle,
            ..AppConfig::default()
        };
        TabRegistry::new(SharedStorage::in_memory(), &config)
    }

    #[tokio::test(start_paused = true)]
    async fn idle_tabs_expire_when_another_opens() {
        let tabs = registry(Duration::from_secs(60));
        let idle = tabs.open();
        let active = tabs.open();

        tokio::time::advance(Duration::from_secs(45)).await;
        assert!(tabs.get(active.id()).is_some());
        tokio::time::advance(Duration::from_secs(30)).await;

        let fresh = tabs.open();
        assert!(tabs.get(idle.id()).is_none());
        assert!(tabs.get(active.id()).is_some());
        assert!(tabs.get(fresh.id()).is_some());
        assert_eq!(tabs.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn processing_tabs_are_kept() {
        let tabs = registry(Duration::from_secs(60));
        let paying = tabs.open();
        assert!(paying.start_payment());

        tokio::time::advance(Duration::from_secs(120)).await;
        assert_eq!(tabs.expire_idle(), 0);

        paying.finish_payment();
        assert_eq!(tabs.expire_idle(), 1);
        assert!(tabs.is_empty());
    }
}
