// SPDX-License-Identifier: MIT

//! Direct-message conversations and messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Conversation between two or more users.
///
/// The document id is derived from the sorted participant ids, so
/// concurrent "create conversation between A and B" calls converge on
/// the same document instead of racing to create duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub participant_ids: Vec<String>,
    #[serde(
        with = "firestore::serialize_as_timestamp",
        default = "chrono::Utc::now"
    )]
    pub created_at: DateTime<Utc>,
    #[serde(
        with = "firestore::serialize_as_timestamp",
        default = "chrono::Utc::now"
    )]
    pub updated_at: DateTime<Utc>,
    /// Preview of the most recent message.
    #[serde(default)]
    pub last_message: Option<String>,
    /// Per-user count of messages not yet read by that user. Advisory
    /// cache, reset by mark-all-read.
    #[serde(default)]
    pub unread_counts: HashMap<String, u32>,
}

impl Conversation {
    /// Deterministic conversation id: sorted participant ids joined
    /// with `_`.
    pub fn derive_id(participant_ids: &[String]) -> String {
        let mut sorted: Vec<&str> = participant_ids.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        sorted.join("_")
    }

    pub fn new(mut participant_ids: Vec<String>) -> Self {
        participant_ids.sort_unstable();
        let now = Utc::now();
        Self {
            id: Self::derive_id(&participant_ids),
            participant_ids,
            created_at: now,
            updated_at: now,
            last_message: None,
            unread_counts: HashMap::new(),
        }
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participant_ids.iter().any(|p| p == user_id)
    }
}

/// Single message within a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message id (UUID, also the document ID)
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub content: String,
    #[serde(
        with = "firestore::serialize_as_timestamp",
        default = "chrono::Utc::now"
    )]
    pub sent_at: DateTime<Utc>,
    /// Per-recipient read flags. The sender is implicitly read.
    #[serde(default)]
    pub read_status: HashMap<String, bool>,
}

impl Message {
    pub fn is_read_by(&self, user_id: &str) -> bool {
        self.sender_id == user_id || self.read_status.get(user_id).copied().unwrap_or(false)
    }
}
