//! Notification Repository (collaborator table)

use super::{BaseRepository, RepoResult};
use crate::db::models::{Notification, NotificationKind};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const NOTIFICATION_TABLE: &str = "notification";

#[derive(Clone)]
pub struct NotificationRepository {
    base: BaseRepository,
}

impl NotificationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Write one notification row
    pub async fn create(
        &self,
        recipient_id: &str,
        kind: NotificationKind,
        order: Option<RecordId>,
        message: String,
    ) -> RepoResult<Notification> {
        let notification = Notification {
            id: None,
            recipient_id: recipient_id.to_string(),
            kind,
            order_id: order,
            message,
            read: false,
            created_at: now_millis(),
        };

        let created: Option<Notification> = self
            .base
            .db()
            .create(NOTIFICATION_TABLE)
            .content(notification)
            .await?;

        created.ok_or_else(|| {
            super::RepoError::Database("Failed to create notification".to_string())
        })
    }

    /// Unread notifications for a recipient, newest first
    pub async fn find_unread(&self, recipient_id: &str) -> RepoResult<Vec<Notification>> {
        let notifications: Vec<Notification> = self
            .base
            .db()
            .query(
                "SELECT * FROM notification WHERE recipient_id = $recipient AND read = false ORDER BY created_at DESC",
            )
            .bind(("recipient", recipient_id.to_string()))
            .await?
            .take(0)?;
        Ok(notifications)
    }
}
