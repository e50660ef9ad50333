use bson::{doc, oid::ObjectId, Document};
use chrono::{DateTime, Utc};
use futures_util::{future::BoxFuture, TryStreamExt};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};

use super::store::{AnnouncementStore, StoreError, StoreResult};
use crate::models::announcement::{Announcement, AnnouncementChanges, NewAnnouncement};

/// On-disk shape of an announcement. Timestamps are BSON datetimes so range
/// queries compare chronologically.
#[derive(Debug, Serialize, Deserialize)]
struct AnnouncementDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    message: String,
    expires_at: bson::DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    starts_at: Option<bson::DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_by: Option<String>,
}

impl TryFrom<AnnouncementDocument> for Announcement {
    type Error = StoreError;

    fn try_from(doc: AnnouncementDocument) -> Result<Self, Self::Error> {
        let id = doc
            .id
            .ok_or_else(|| StoreError::Malformed("announcement without _id".into()))?;
        Ok(Announcement {
            id,
            message: doc.message,
            expires_at: doc.expires_at.to_chrono(),
            starts_at: doc.starts_at.map(|dt| dt.to_chrono()),
            created_by: doc.created_by,
        })
    }
}

/// `starts_at: null` matches both a missing field and an explicit null.
pub(crate) fn visible_filter(now: DateTime<Utc>) -> Document {
    let now = bson::DateTime::from_chrono(now);
    doc! {
        "$or": [
            { "starts_at": { "$lte": now } },
            { "starts_at": null },
        ],
        "expires_at": { "$gte": now },
    }
}

pub(crate) fn expired_filter(now: DateTime<Utc>) -> Document {
    doc! { "expires_at": { "$lt": bson::DateTime::from_chrono(now) } }
}

/// Builds the `$set` / `$unset` modifier for the fields present in `changes`.
pub(crate) fn update_document(changes: &AnnouncementChanges) -> Document {
    let mut set = Document::new();
    let mut unset = Document::new();

    if let Some(message) = &changes.message {
        set.insert("message", message.as_str());
    }
    if let Some(expires_at) = changes.expires_at {
        set.insert("expires_at", bson::DateTime::from_chrono(expires_at));
    }
    match changes.starts_at {
        Some(Some(starts_at)) => {
            set.insert("starts_at", bson::DateTime::from_chrono(starts_at));
        }
        Some(None) => {
            unset.insert("starts_at", "");
        }
        None => {}
    }
    match &changes.created_by {
        Some(Some(created_by)) => {
            set.insert("created_by", created_by.as_str());
        }
        Some(None) => {
            unset.insert("created_by", "");
        }
        None => {}
    }

    let mut update = Document::new();
    if !set.is_empty() {
        update.insert("$set", set);
    }
    if !unset.is_empty() {
        update.insert("$unset", unset);
    }
    update
}

#[derive(Clone)]
pub struct MongoAnnouncementStore {
    db: Database,
    collection: Collection<AnnouncementDocument>,
}

impl MongoAnnouncementStore {
    pub async fn connect(uri: &str, database: &str, collection: &str) -> anyhow::Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(database);
        let collection = db.collection::<AnnouncementDocument>(collection);
        Ok(Self { db, collection })
    }

    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<Announcement>> {
        self.collection
            .find_one(doc! { "_id": id })
            .await?
            .map(Announcement::try_from)
            .transpose()
    }
}

impl AnnouncementStore for MongoAnnouncementStore {
    fn find_visible(&self, now: DateTime<Utc>) -> BoxFuture<'_, StoreResult<Vec<Announcement>>> {
        Box::pin(async move {
            let docs: Vec<AnnouncementDocument> = self
                .collection
                .find(visible_filter(now))
                .await?
                .try_collect()
                .await?;
            docs.into_iter().map(Announcement::try_from).collect()
        })
    }

    fn insert(&self, new: NewAnnouncement) -> BoxFuture<'_, StoreResult<Announcement>> {
        Box::pin(async move {
            let doc = AnnouncementDocument {
                id: None,
                message: new.message,
                expires_at: bson::DateTime::from_chrono(new.expires_at),
                starts_at: Some(bson::DateTime::from_chrono(new.starts_at)),
                created_by: Some(new.created_by),
            };
            let result = self.collection.insert_one(&doc).await?;
            let id = result.inserted_id.as_object_id().ok_or_else(|| {
                StoreError::Malformed(format!("unexpected inserted id {}", result.inserted_id))
            })?;
            Announcement::try_from(AnnouncementDocument { id: Some(id), ..doc })
        })
    }

    fn update(
        &self,
        id: ObjectId,
        changes: AnnouncementChanges,
    ) -> BoxFuture<'_, StoreResult<Option<Announcement>>> {
        Box::pin(async move {
            // An empty modifier is rejected by the server, so just re-read.
            if !changes.is_empty() {
                let result = self
                    .collection
                    .update_one(doc! { "_id": id }, update_document(&changes))
                    .await?;
                if result.matched_count == 0 {
                    return Ok(None);
                }
            }
            self.find_by_id(id).await
        })
    }

    fn delete(&self, id: ObjectId) -> BoxFuture<'_, StoreResult<bool>> {
        Box::pin(async move {
            let result = self.collection.delete_one(doc! { "_id": id }).await?;
            Ok(result.deleted_count > 0)
        })
    }

    fn delete_expired(&self, now: DateTime<Utc>) -> BoxFuture<'_, StoreResult<u64>> {
        Box::pin(async move {
            let result = self.collection.delete_many(expired_filter(now)).await?;
            Ok(result.deleted_count)
        })
    }

    fn count_expired(&self, now: DateTime<Utc>) -> BoxFuture<'_, StoreResult<u64>> {
        Box::pin(async move { Ok(self.collection.count_documents(expired_filter(now)).await?) })
    }

    fn ping(&self) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            self.db.run_command(doc! { "ping": 1 }).await?;
            Ok(())
        })
    }
}
