use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::{
    db::AnnouncementStore,
    error::AppError,
    models::{
        announcement::{
            Announcement, AnnouncementChanges, CreateAnnouncementRequest, NewAnnouncement,
            UpdateAnnouncementRequest,
        },
        auth::AuthenticatedUser,
    },
    services::metrics::record_write,
};

pub struct AnnouncementService;

fn require_identity(user: Option<&AuthenticatedUser>) -> Result<&AuthenticatedUser, AppError> {
    user.ok_or(AppError::Forbidden)
}

fn parse_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::InvalidArgument("Invalid announcement ID".into()))
}

fn require_message(message: &str) -> Result<(), AppError> {
    if message.trim().is_empty() {
        return Err(AppError::InvalidArgument("Message must not be empty".into()));
    }
    Ok(())
}

/// `message` and `expires_at` may be omitted but never nulled; a null
/// `starts_at` or `created_by` clears that field.
fn validate_changes(req: UpdateAnnouncementRequest) -> Result<AnnouncementChanges, AppError> {
    let message = match req.message {
        Some(Some(message)) => {
            require_message(&message)?;
            Some(message)
        }
        Some(None) => return Err(AppError::InvalidArgument("Message must not be null".into())),
        None => None,
    };
    let expires_at = match req.expires_at {
        Some(Some(expires_at)) => Some(expires_at),
        Some(None) => {
            return Err(AppError::InvalidArgument("Expiry must not be null".into()));
        }
        None => None,
    };
    Ok(AnnouncementChanges {
        message,
        expires_at,
        starts_at: req.starts_at,
        created_by: req.created_by,
    })
}

impl AnnouncementService {
    /// Everything whose visibility window contains `now`, in store order.
    pub async fn list_visible(
        store: &dyn AnnouncementStore,
        now: DateTime<Utc>,
    ) -> Result<Vec<Announcement>, AppError> {
        Ok(store.find_visible(now).await?)
    }

    /// Insert a new announcement stamped with the caller's username.
    /// A missing `starts_at` opens the window at `now`.
    pub async fn create(
        store: &dyn AnnouncementStore,
        user: Option<&AuthenticatedUser>,
        req: CreateAnnouncementRequest,
        now: DateTime<Utc>,
    ) -> Result<Announcement, AppError> {
        let result = async {
            let user = require_identity(user)?;
            require_message(&req.message)?;
            let new = NewAnnouncement {
                message: req.message,
                expires_at: req.expires_at,
                starts_at: req.starts_at.unwrap_or(now),
                created_by: user.username.clone(),
            };
            let created = store.insert(new).await?;
            info!("Announcement {} created by {}", created.id, user.username);
            Ok::<_, AppError>(created)
        }
        .await;
        record_write("create", &result);
        result
    }

    /// Merge the present fields into an existing announcement.
    pub async fn update(
        store: &dyn AnnouncementStore,
        user: Option<&AuthenticatedUser>,
        id: &str,
        req: UpdateAnnouncementRequest,
    ) -> Result<Announcement, AppError> {
        let result = async {
            let user = require_identity(user)?;
            let oid = parse_id(id)?;
            let changes = validate_changes(req)?;
            if let Some(created_by) = &changes.created_by {
                warn!(
                    "Announcement {} author overwritten with {:?} by {}",
                    oid, created_by, user.username
                );
            }
            let updated = store.update(oid, changes).await?.ok_or(AppError::NotFound)?;
            info!("Announcement {} updated by {}", oid, user.username);
            Ok::<_, AppError>(updated)
        }
        .await;
        record_write("update", &result);
        result
    }

    pub async fn delete(
        store: &dyn AnnouncementStore,
        user: Option<&AuthenticatedUser>,
        id: &str,
    ) -> Result<(), AppError> {
        let result = async {
            let user = require_identity(user)?;
            let oid = parse_id(id)?;
            if !store.delete(oid).await? {
                return Err(AppError::NotFound);
            }
            info!("Announcement {} deleted by {}", oid, user.username);
            Ok::<_, AppError>(())
        }
        .await;
        record_write("delete", &result);
        result
    }

    /// Remove announcements whose window closed before `now`.
    pub async fn purge_expired(
        store: &dyn AnnouncementStore,
        now: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        let removed = store.delete_expired(now).await?;
        info!("Purged {} expired announcements", removed);
        Ok(removed)
    }
}
