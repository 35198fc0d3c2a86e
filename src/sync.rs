//! Cross-tab synchronization.
//!
//! A tab reacts to writes made by *other* tabs through a
//! [`StorageObserver`]. The default transport is the shared storage's
//! broadcast channel; anything that can produce [`StorageEvent`]s can feed
//! an observer instead. Writes are last-writer-wins: observers only refresh
//! what they display, they never merge.

use serde::Serialize;
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use utoipa::ToSchema;

use crate::{
    storage::{StorageEvent, TabId, keys},
    store::{CartStore, WishlistStore, cart},
};

pub trait StorageObserver: Send + Sync + 'static {
    fn storage_changed(&self, event: &StorageEvent);

    /// Called when events were missed and local state may be stale.
    fn resync(&self) {}
}

/// Forward events from other tabs to `observer` until the channel closes.
pub fn spawn_observer<O: StorageObserver>(
    mut events: broadcast::Receiver<StorageEvent>,
    tab: TabId,
    observer: O,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) if event.source == tab => {}
                Ok(event) => observer.storage_changed(&event),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(%tab, missed, "storage events lagged, resyncing");
                    observer.resync();
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

/// Navbar counters plus the ids whose wishlist buttons are active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct Badges {
    pub cart_count: u32,
    pub wishlist_count: usize,
    pub wishlist: Vec<String>,
}

impl Badges {
    pub fn read(cart: &CartStore, wishlist: &WishlistStore) -> Self {
        let ids = wishlist.get();
        Self {
            cart_count: cart::item_count(&cart.get()),
            wishlist_count: ids.len(),
            wishlist: ids,
        }
    }
}

/// Keeps a tab's [`Badges`] current when the cart or wishlist keys change.
pub struct BadgeSync {
    cart: CartStore,
    wishlist: WishlistStore,
    badges: watch::Sender<Badges>,
}

impl BadgeSync {
    pub fn new(cart: CartStore, wishlist: WishlistStore) -> (Self, watch::Receiver<Badges>) {
        let (badges, rx) = watch::channel(Badges::read(&cart, &wishlist));
        (
            Self {
                cart,
                wishlist,
                badges,
            },
            rx,
        )
    }

    pub fn refresh(&self) {
        let next = Badges::read(&self.cart, &self.wishlist);
        self.badges.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    pub fn current(&self) -> Badges {
        self.badges.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Badges> {
        self.badges.subscribe()
    }

    fn watches(&self, key: &str) -> bool {
        key == self.cart.key() || key == keys::WISHLIST
    }
}

impl StorageObserver for BadgeSync {
    fn storage_changed(&self, event: &StorageEvent) {
        if self.watches(&event.key) {
            tracing::debug!(key = %event.key, source = %event.source, "resyncing badges");
            self.refresh();
        }
    }

    fn resync(&self) {
        self.refresh();
    }
}

// Lets a tab keep its own `BadgeSync` while the observer task holds a clone.
impl<O: StorageObserver> StorageObserver for std::sync::Arc<O> {
    fn storage_changed(&self, event: &StorageEvent) {
        (**self).storage_changed(event);
    }

    fn resync(&self) {
        (**self).resync();
    }
}
