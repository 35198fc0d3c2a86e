use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use eternia_storefront::{
    config::AppConfig,
    models::CartItem,
    state::AppState,
    storage::{SharedStorage, StorageEvent, TabId, keys},
    sync::{StorageObserver, spawn_observer},
};

fn item(id: &str) -> CartItem {
    CartItem {
        id: id.to_string(),
        nombre: "Urna".into(),
        precio: 1_000,
        imagen: String::new(),
        cantidad: 1,
    }
}

#[tokio::test]
async fn a_cart_write_updates_other_tabs_only() -> anyhow::Result<()> {
    let state = AppState::with_storage(AppConfig::default(), SharedStorage::in_memory());
    let tab_a = state.tabs.open();
    let tab_b = state.tabs.open();
    let mut watch_a = tab_a.watch_badges();
    let mut watch_b = tab_b.watch_badges();

    tab_a.cart().add(item("1"), 3)?;

    tokio::time::timeout(Duration::from_secs(1), watch_b.changed()).await??;
    assert_eq!(tab_b.badges().cart_count, 3);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!watch_a.has_changed()?);
    assert_eq!(tab_a.badges().cart_count, 0);
    Ok(())
}

#[tokio::test]
async fn wishlist_toggles_propagate_and_last_write_wins() -> anyhow::Result<()> {
    let state = AppState::with_storage(AppConfig::default(), SharedStorage::in_memory());
    let tab_a = state.tabs.open();
    let tab_b = state.tabs.open();
    let mut watch_a = tab_a.watch_badges();

    tab_b.wishlist().toggle("7")?;
    tokio::time::timeout(Duration::from_secs(1), watch_a.changed()).await??;
    let badges = tab_a.badges();
    assert_eq!(badges.wishlist_count, 1);
    assert_eq!(badges.wishlist, ["7"]);

    // Both tabs write the whole list; the later save replaces the earlier one.
    tab_a.wishlist().save(&["1".to_string()])?;
    tab_b.wishlist().save(&["2".to_string()])?;
    assert_eq!(tab_a.wishlist().get(), ["2"]);
    Ok(())
}

#[tokio::test]
async fn session_storage_is_private_to_a_tab() -> anyhow::Result<()> {
    let state = AppState::with_storage(AppConfig::default(), SharedStorage::in_memory());
    let tab_a = state.tabs.open();
    let tab_b = state.tabs.open();

    tab_a.session().set_item("checkoutTotal", "1000".to_string())?;
    assert!(tab_b.session().get_item("checkoutTotal").is_none());

    tab_a.local().set_item(keys::WISHLIST, "[\"1\"]".to_string())?;
    assert_eq!(tab_b.wishlist().get(), ["1"]);
    Ok(())
}

#[derive(Default)]
struct Recorder {
    keys: Mutex<Vec<String>>,
}

impl StorageObserver for Recorder {
    fn storage_changed(&self, event: &StorageEvent) {
        if let Ok(mut keys) = self.keys.lock() {
            keys.push(event.key.clone());
        }
    }
}

#[tokio::test]
async fn observers_skip_their_own_writes() -> anyhow::Result<()> {
    let local = SharedStorage::in_memory();
    let me = TabId::new();
    let other = TabId::new();
    let recorder = Arc::new(Recorder::default());
    let task = spawn_observer(local.subscribe(), me, recorder.clone());

    local.handle(me).set_item("mine", "1".to_string())?;
    local.handle(other).set_item("theirs", "1".to_string())?;
    // Unchanged values publish nothing.
    local.handle(other).set_item("theirs", "1".to_string())?;
    local.handle(other).remove_item("theirs")?;

    tokio::time::sleep(Duration::from_millis(50)).await;
    task.abort();

    let keys = recorder.keys.lock().map(|k| k.clone()).unwrap_or_default();
    assert_eq!(keys, ["theirs", "theirs"]);
    Ok(())
}
