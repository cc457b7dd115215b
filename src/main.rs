use std::sync::Arc;

use topicseat::config::{Settings, StorageBackend, load_config};
use topicseat::persistence::admins::load_admins;
use topicseat::persistence::{JsonFileStorage, SledStorage, Storage};
use topicseat::service::{AdminSet, Handler, MemoryDirectory};
use topicseat::store::{StoreOptions, TopicStore};
use topicseat::transport::websocket::start_websocket_server;
use topicseat::utils::logging;

fn open_storage(settings: &Settings) -> Result<Box<dyn Storage>, Box<dyn std::error::Error>> {
    Ok(match settings.store.backend {
        StorageBackend::Json => Box::new(JsonFileStorage::new(&settings.store.data_path)),
        StorageBackend::Sled => Box::new(SledStorage::open(&settings.store.data_path)?),
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = load_config()?;
    logging::init(&config.logging.level);

    let store = Arc::new(TopicStore::open(
        open_storage(&config)?,
        StoreOptions {
            selection_limit: config.limits.max_selections_per_user,
        },
    ));
    let admins = AdminSet::from(load_admins(&config.store.admin_path));
    if admins.is_empty() {
        tracing::warn!("no admins configured in {}", config.store.admin_path);
    }

    let directory = Arc::new(MemoryDirectory::new());
    let handler = Arc::new(Handler::new(store.clone(), admins, directory.clone()));
    let addr = format!("{}:{}", config.server.host, config.server.port);

    tokio::select! {
        res = start_websocket_server(&addr, handler, directory) => res?,
        _ = tokio::signal::ctrl_c() => tracing::info!("shutting down"),
    }

    store.flush()?;
    Ok(())
}
