use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::timestamp;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Announcement {
    #[serde(rename = "_id", serialize_with = "bson::serde_helpers::serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub message: String,
    pub expires_at: DateTime<Utc>,
    pub starts_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
}

impl Announcement {
    /// Visible iff the window has opened (or has no start) and has not yet closed.
    /// Both bounds are inclusive.
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        self.starts_at.map_or(true, |starts_at| starts_at <= now) && self.expires_at >= now
    }
}

/// Server-side shape of a record about to be inserted.
#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    pub message: String,
    pub expires_at: DateTime<Utc>,
    pub starts_at: DateTime<Utc>,
    pub created_by: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateAnnouncementRequest {
    pub message: String,
    #[serde(deserialize_with = "timestamp::required")]
    pub expires_at: DateTime<Utc>,
    /// Omitted, `null` or `""` all default to the creation time.
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub starts_at: Option<DateTime<Utc>>,
}

/// Partial update as sent by the client. On each field the outer `Option`
/// records whether the key was present, the inner one whether it carried a value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAnnouncementRequest {
    #[serde(default, deserialize_with = "present")]
    pub message: Option<Option<String>>,
    #[serde(default, deserialize_with = "timestamp::patch")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "timestamp::patch")]
    pub starts_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "present")]
    pub created_by: Option<Option<String>>,
}

/// Key present in the body, possibly as `null`. Pair with `#[serde(default)]`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Validated change set handed to the store: `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnouncementChanges {
    pub message: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    /// `Some(None)` removes the start, making the record visible immediately.
    pub starts_at: Option<Option<DateTime<Utc>>>,
    /// `Some(None)` clears the author.
    pub created_by: Option<Option<String>>,
}

impl AnnouncementChanges {
    pub fn is_empty(&self) -> bool {
        self.message.is_none()
            && self.expires_at.is_none()
            && self.starts_at.is_none()
            && self.created_by.is_none()
    }

    pub fn apply_to(&self, announcement: &mut Announcement) {
        if let Some(message) = &self.message {
            announcement.message = message.clone();
        }
        if let Some(expires_at) = self.expires_at {
            announcement.expires_at = expires_at;
        }
        if let Some(starts_at) = self.starts_at {
            announcement.starts_at = starts_at;
        }
        if let Some(created_by) = &self.created_by {
            announcement.created_by = created_by.clone();
        }
    }
}
