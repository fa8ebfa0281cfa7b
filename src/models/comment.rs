// SPDX-License-Identifier: MIT

//! Comments owned by activity items.
//!
//! The parent item's `comment_count` is an advisory cache adjusted by the
//! comment repository on add/delete, clamped at 0.

use crate::models::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted comment record, queried by `item_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDoc {
    /// Comment id (UUID, also the document ID)
    pub id: String,
    /// Owning activity item
    pub item_id: String,
    pub author_id: String,
    pub content: String,
    #[serde(
        with = "firestore::serialize_as_timestamp",
        default = "chrono::Utc::now"
    )]
    pub created_at: DateTime<Utc>,
}

impl CommentDoc {
    /// Resolve into the domain shape with the author supplied by the caller.
    pub fn into_comment(self, author: User) -> Comment {
        Comment {
            id: self.id,
            author,
            content: self.content,
            created_at: self.created_at,
        }
    }
}

/// Comment with its author resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: String,
    pub author: User,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
