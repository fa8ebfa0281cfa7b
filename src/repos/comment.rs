// SPDX-License-Identifier: MIT

//! Comment repository.
//!
//! The parent item's `comment_count` is adjusted alongside each
//! add/delete. The pair of writes is sequential, not transactional: if
//! the counter write fails after the comment write succeeded, the
//! comment is authoritative and the counter drifts (accepted bound).

use crate::db::{collections, FirestoreDb};
use crate::error::{AppError, Result};
use crate::models::{ActivityDoc, Comment, CommentDoc, NotificationKind};
use crate::repos::{NotificationRepository, UserRepository};

/// Comments owned by activity items.
#[derive(Clone)]
pub struct CommentRepository {
    db: FirestoreDb,
    users: UserRepository,
    notifications: NotificationRepository,
}

impl CommentRepository {
    pub fn new(
        db: FirestoreDb,
        users: UserRepository,
        notifications: NotificationRepository,
    ) -> Self {
        Self {
            db,
            users,
            notifications,
        }
    }

    /// Comments for an item, oldest first, authors resolved.
    /// Comments with unresolvable authors are dropped, not errors.
    pub async fn fetch(&self, item_id: &str) -> Result<Vec<Comment>> {
        let item = item_id.to_string();
        let docs = self
            .db
            .client()?
            .fluent()
            .select()
            .from(collections::COMMENTS)
            .filter(move |q| q.for_all([q.field("item_id").eq(item.clone())]))
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let comment_docs: Vec<CommentDoc> = self.db.decode_docs(collections::COMMENTS, docs);

        let author_ids: Vec<String> = comment_docs.iter().map(|c| c.author_id.clone()).collect();
        let authors = self.users.get_many_as_map(&author_ids).await?;

        Ok(comment_docs
            .into_iter()
            .filter_map(|doc| match authors.get(&doc.author_id) {
                Some(author) => Some(doc.into_comment(author.clone())),
                None => {
                    tracing::warn!(
                        comment_id = %doc.id,
                        author_id = %doc.author_id,
                        "Dropping comment with unresolvable author"
                    );
                    None
                }
            })
            .collect())
    }

    /// Add a comment to an item and bump the item's comment count.
    pub async fn add(&self, item_id: &str, author_id: &str, content: &str) -> Result<Comment> {
        let author = self.users.get(author_id).await?;
        let item: ActivityDoc = self
            .db
            .get_doc(collections::ACTIVITIES, item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("activity item {}", item_id)))?;

        let doc = CommentDoc {
            id: uuid::Uuid::new_v4().to_string(),
            item_id: item_id.to_string(),
            author_id: author_id.to_string(),
            content: content.to_string(),
            created_at: chrono::Utc::now(),
        };
        self.db.upsert(collections::COMMENTS, &doc.id, &doc).await?;

        if let Err(e) = self.adjust_comment_count(item_id, 1).await {
            tracing::warn!(item_id, error = %e, "Comment count increment failed; count may drift");
        }

        self.notifications
            .notify_best_effort(
                &item.author_id,
                author_id,
                NotificationKind::Comment,
                Some(item_id),
            )
            .await;

        Ok(doc.into_comment(author))
    }

    /// Delete a comment and decrement the parent's comment count.
    pub async fn delete(&self, comment_id: &str) -> Result<()> {
        let doc: CommentDoc = self
            .db
            .get_doc(collections::COMMENTS, comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("comment {}", comment_id)))?;

        self.db.delete_doc(collections::COMMENTS, comment_id).await?;

        if let Err(e) = self.adjust_comment_count(&doc.item_id, -1).await {
            tracing::warn!(
                item_id = %doc.item_id,
                error = %e,
                "Comment count decrement failed; count may drift"
            );
        }

        Ok(())
    }

    /// Clamped read-modify-write of the parent item's comment counter.
    /// Not transactional; racing adjustments can lose an update
    /// (advisory cache, accepted bound).
    async fn adjust_comment_count(&self, item_id: &str, delta: i64) -> Result<()> {
        let mut item: ActivityDoc = self
            .db
            .get_doc(collections::ACTIVITIES, item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("activity item {}", item_id)))?;

        item.comment_count = (item.comment_count + delta).max(0);

        let _: () = self
            .db
            .client()?
            .fluent()
            .update()
            .fields(firestore::paths!(ActivityDoc::{comment_count}))
            .in_col(collections::ACTIVITIES)
            .document_id(item_id)
            .object(&item)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
