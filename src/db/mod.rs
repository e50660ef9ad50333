#[cfg(test)]
pub mod memory;
pub mod mongo;
pub mod store;

#[cfg(test)]
pub use memory::InMemoryAnnouncementStore;
pub use mongo::MongoAnnouncementStore;
pub use store::{AnnouncementStore, StoreError, StoreResult};

/// Connect to the announcements collection and verify the server answers.
pub async fn connect(
    uri: &str,
    database: &str,
    collection: &str,
) -> anyhow::Result<MongoAnnouncementStore> {
    let store = MongoAnnouncementStore::connect(uri, database, collection).await?;
    store.ping().await?;
    Ok(store)
}
