// SPDX-License-Identifier: MIT

//! In-app notification records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What triggered a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Like,
    Comment,
    Follow,
    Event,
}

/// Notification delivered to a single recipient.
///
/// Created best-effort alongside likes/follows: a failed notification
/// write is logged and never fails the primary operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Notification id (UUID, also the document ID)
    pub id: String,
    pub recipient_id: String,
    /// User whose action triggered the notification.
    pub actor_id: String,
    pub kind: NotificationKind,
    /// Related activity item, where applicable.
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub read: bool,
    #[serde(
        with = "firestore::serialize_as_timestamp",
        default = "chrono::Utc::now"
    )]
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        recipient_id: &str,
        actor_id: &str,
        kind: NotificationKind,
        item_id: Option<&str>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            recipient_id: recipient_id.to_string(),
            actor_id: actor_id.to_string(),
            kind,
            item_id: item_id.map(str::to_string),
            read: false,
            created_at: Utc::now(),
        }
    }
}
