use eternia_storefront::{
    config::AppConfig,
    services::auth_service::{DEMO_EMAIL, seed_demo_user},
    storage::{FileStorage, SharedStorage, TabId},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let Some(path) = config.storage_path else {
        anyhow::bail!("STORAGE_PATH is not set; nothing to seed");
    };

    let local = SharedStorage::new(FileStorage::open(&path)?);
    let inserted = seed_demo_user(&local.handle(TabId::new()))?;

    if inserted {
        println!("Seeded {DEMO_EMAIL} into {}", path.display());
    } else {
        println!("{DEMO_EMAIL} already present in {}", path.display());
    }
    Ok(())
}
