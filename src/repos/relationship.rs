// SPDX-License-Identifier: MIT

//! Follow-graph repository.
//!
//! Follow edges are written with deterministic ids
//! (`{follower}_{following}`) so duplicates collide at the store level,
//! but idempotence still relies on the pre-write existence check:
//! legacy edges with random ids may coexist, which is also why unfollow
//! deletes every matching edge rather than one derived id.

use crate::cache::FollowCache;
use crate::db::{collections, FirestoreDb};
use crate::error::{AppError, Result};
use crate::models::{NotificationKind, User, UserRelationship};
use crate::repos::{NotificationRepository, UserRepository};
use std::sync::Arc;

/// Follow/unfollow operations and follow-set resolution.
#[derive(Clone)]
pub struct RelationshipRepository {
    db: FirestoreDb,
    users: UserRepository,
    notifications: NotificationRepository,
    follow_cache: FollowCache,
}

impl RelationshipRepository {
    pub fn new(
        db: FirestoreDb,
        users: UserRepository,
        notifications: NotificationRepository,
        follow_cache: FollowCache,
    ) -> Self {
        Self {
            db,
            users,
            notifications,
            follow_cache,
        }
    }

    /// Follow a user. Idempotent: an existing edge makes this a no-op.
    /// Returns true when a new edge was written.
    pub async fn follow(&self, follower_id: &str, following_id: &str) -> Result<bool> {
        if self.is_following(follower_id, following_id).await? {
            return Ok(false);
        }

        let edge = UserRelationship::new(follower_id, following_id);
        self.db
            .upsert(collections::RELATIONSHIPS, &edge.id, &edge)
            .await?;
        self.follow_cache.invalidate(follower_id);

        self.notifications
            .notify_best_effort(following_id, follower_id, NotificationKind::Follow, None)
            .await;

        tracing::debug!(follower_id, following_id, "Follow edge created");
        Ok(true)
    }

    /// Unfollow a user, deleting all matching edges (defensive against
    /// legacy duplicates). A missing edge is a no-op.
    pub async fn unfollow(&self, follower_id: &str, following_id: &str) -> Result<()> {
        let edges = self.edges_between(follower_id, following_id).await?;
        let ids: Vec<String> = edges.into_iter().map(|e| e.id).collect();
        if !ids.is_empty() {
            self.db
                .batch_delete_ids(collections::RELATIONSHIPS, &ids)
                .await?;
        }
        self.follow_cache.invalidate(follower_id);
        tracing::debug!(follower_id, following_id, removed = ids.len(), "Unfollowed");
        Ok(())
    }

    /// Whether `follower_id` currently follows `following_id`,
    /// answered from the cached follow-set.
    pub async fn is_following(&self, follower_id: &str, following_id: &str) -> Result<bool> {
        let following = self.get_following_ids(follower_id).await?;
        Ok(following.iter().any(|id| id == following_id))
    }

    /// Ids of everyone `follower_id` follows. Cache-backed; invalidated
    /// only by follow/unfollow through this repository (reads may be
    /// stale by design).
    pub async fn get_following_ids(&self, follower_id: &str) -> Result<Arc<Vec<String>>> {
        if let Some(cached) = self.follow_cache.get(follower_id) {
            return Ok(cached);
        }

        let follower = follower_id.to_string();
        let docs = self
            .db
            .client()?
            .fluent()
            .select()
            .from(collections::RELATIONSHIPS)
            .filter(move |q| q.for_all([q.field("follower_id").eq(follower.clone())]))
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let edges: Vec<UserRelationship> = self.db.decode_docs(collections::RELATIONSHIPS, docs);
        let following: Vec<String> = edges.into_iter().map(|e| e.following_id).collect();
        self.follow_cache.put(follower_id, following.clone());
        Ok(Arc::new(following))
    }

    /// Users that `user_id` follows, resolved through the user
    /// repository (unresolvable profiles dropped).
    pub async fn get_following(&self, user_id: &str) -> Result<Vec<User>> {
        let ids = self.get_following_ids(user_id).await?;
        self.users.get_many(&ids).await
    }

    /// Users following `user_id`, resolved through the user repository.
    pub async fn get_followers(&self, user_id: &str) -> Result<Vec<User>> {
        let following = user_id.to_string();
        let docs = self
            .db
            .client()?
            .fluent()
            .select()
            .from(collections::RELATIONSHIPS)
            .filter(move |q| q.for_all([q.field("following_id").eq(following.clone())]))
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let edges: Vec<UserRelationship> = self.db.decode_docs(collections::RELATIONSHIPS, docs);
        let ids: Vec<String> = edges.into_iter().map(|e| e.follower_id).collect();
        self.users.get_many(&ids).await
    }

    async fn edges_between(
        &self,
        follower_id: &str,
        following_id: &str,
    ) -> Result<Vec<UserRelationship>> {
        let follower = follower_id.to_string();
        let following = following_id.to_string();
        let docs = self
            .db
            .client()?
            .fluent()
            .select()
            .from(collections::RELATIONSHIPS)
            .filter(move |q| {
                q.for_all([
                    q.field("follower_id").eq(follower.clone()),
                    q.field("following_id").eq(following.clone()),
                ])
            })
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(self.db.decode_docs(collections::RELATIONSHIPS, docs))
    }
}
