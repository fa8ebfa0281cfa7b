// SPDX-License-Identifier: MIT

//! Notification repository.

use crate::db::{collections, FirestoreDb};
use crate::error::{AppError, Result};
use crate::models::{Notification, NotificationKind};

/// CRUD and read-state tracking for in-app notifications.
#[derive(Clone)]
pub struct NotificationRepository {
    db: FirestoreDb,
}

impl NotificationRepository {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Store a notification.
    pub async fn create(&self, notification: &Notification) -> Result<()> {
        self.db
            .upsert(collections::NOTIFICATIONS, &notification.id, notification)
            .await
    }

    /// Best-effort notification from an engagement action.
    ///
    /// Self-notifications are skipped, and a failed write is logged
    /// instead of failing the primary operation that triggered it.
    pub async fn notify_best_effort(
        &self,
        recipient_id: &str,
        actor_id: &str,
        kind: NotificationKind,
        item_id: Option<&str>,
    ) {
        if recipient_id == actor_id {
            return;
        }
        let notification = Notification::new(recipient_id, actor_id, kind, item_id);
        if let Err(e) = self.create(&notification).await {
            tracing::warn!(
                recipient_id,
                actor_id,
                error = %e,
                "Failed to write notification; primary operation unaffected"
            );
        }
    }

    /// All notifications for a user, newest first.
    pub async fn fetch_for_user(&self, user_id: &str) -> Result<Vec<Notification>> {
        let recipient = user_id.to_string();
        let docs = self
            .db
            .client()?
            .fluent()
            .select()
            .from(collections::NOTIFICATIONS)
            .filter(move |q| q.for_all([q.field("recipient_id").eq(recipient.clone())]))
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(self.db.decode_docs(collections::NOTIFICATIONS, docs))
    }

    /// Count of unread notifications for a user.
    pub async fn unread_count(&self, user_id: &str) -> Result<usize> {
        Ok(self
            .fetch_unread(user_id)
            .await?
            .len())
    }

    /// Mark every unread notification for a user as read, in atomic
    /// batches.
    pub async fn mark_all_read(&self, user_id: &str) -> Result<usize> {
        let mut unread = self.fetch_unread(user_id).await?;
        for notification in &mut unread {
            notification.read = true;
        }

        let client = self.db.client()?;
        for chunk in unread.chunks(crate::db::firestore::BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for notification in chunk {
                client
                    .fluent()
                    .update()
                    .in_col(collections::NOTIFICATIONS)
                    .document_id(&notification.id)
                    .object(notification)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!("Failed to add update to transaction: {}", e))
                    })?;
            }

            transaction
                .commit()
                .await
                .map_err(|e| AppError::Database(format!("Failed to commit mark-all-read: {}", e)))?;
        }

        tracing::debug!(user_id, count = unread.len(), "Marked notifications read");
        Ok(unread.len())
    }

    async fn fetch_unread(&self, user_id: &str) -> Result<Vec<Notification>> {
        let recipient = user_id.to_string();
        let docs = self
            .db
            .client()?
            .fluent()
            .select()
            .from(collections::NOTIFICATIONS)
            .filter(move |q| {
                q.for_all([
                    q.field("recipient_id").eq(recipient.clone()),
                    q.field("read").eq(false),
                ])
            })
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(self.db.decode_docs(collections::NOTIFICATIONS, docs))
    }
}
