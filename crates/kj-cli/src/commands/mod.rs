pub mod init;
pub mod queue;
pub mod show;

use anyhow::Context;
use kj_core::KjConfig;
use kj_rotation::Rotation;
use kj_store::QueueStore;

/// Open the queue database named by the config.
pub fn open_rotation(config: &KjConfig) -> anyhow::Result<Rotation<QueueStore>> {
    std::fs::create_dir_all(&config.store.data_dir)?;
    let db_path = config.db_path();
    let store = QueueStore::open(&db_path)
        .with_context(|| format!("opening queue database {}", db_path.display()))?;
    Ok(Rotation::new(store))
}
