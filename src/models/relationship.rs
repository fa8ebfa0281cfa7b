// SPDX-License-Identifier: MIT

//! Follow-graph edge model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Directed follow edge: `follower_id` follows `following_id`.
///
/// The document id is the deterministic composite
/// `{follower_id}_{following_id}`, so a duplicate follow collides at the
/// store level as well as failing the pre-write existence check. Legacy
/// edges created with random ids may still exist; unfollow therefore
/// deletes by query, not by derived id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRelationship {
    pub id: String,
    pub follower_id: String,
    pub following_id: String,
    #[serde(
        with = "firestore::serialize_as_timestamp",
        default = "chrono::Utc::now"
    )]
    pub created_at: DateTime<Utc>,
}

impl UserRelationship {
    /// Deterministic edge document id.
    pub fn edge_id(follower_id: &str, following_id: &str) -> String {
        format!("{}_{}", follower_id, following_id)
    }

    pub fn new(follower_id: &str, following_id: &str) -> Self {
        Self {
            id: Self::edge_id(follower_id, following_id),
            follower_id: follower_id.to_string(),
            following_id: following_id.to_string(),
            created_at: Utc::now(),
        }
    }
}
