// SPDX-License-Identifier: MIT

//! User repository with cache-first lookups.

use crate::cache::UserCache;
use crate::db::firestore::MAX_CONCURRENT_DB_OPS;
use crate::db::{collections, FirestoreDb};
use crate::error::{AppError, Result};
use crate::models::User;
use futures_util::{stream, StreamExt};
use std::collections::HashMap;

/// CRUD and batch resolution for user profiles.
#[derive(Clone)]
pub struct UserRepository {
    db: FirestoreDb,
    cache: UserCache,
}

impl UserRepository {
    pub fn new(db: FirestoreDb, cache: UserCache) -> Self {
        Self { db, cache }
    }

    pub fn cache(&self) -> &UserCache {
        &self.cache
    }

    /// Get a user by id, cache-first. Fails with NotFound if absent.
    pub async fn get(&self, user_id: &str) -> Result<User> {
        if let Some(user) = self.cache.get(user_id) {
            return Ok(user);
        }

        let user: User = self
            .db
            .get_doc(collections::USERS, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))?;

        self.cache.put(user.clone());
        Ok(user)
    }

    /// Best-effort batch get: ids that fail to resolve are logged and
    /// skipped, never failing the whole batch. Result order follows the
    /// input ids.
    pub async fn get_many(&self, user_ids: &[String]) -> Result<Vec<User>> {
        let map = self.get_many_as_map(user_ids).await?;
        Ok(user_ids
            .iter()
            .filter_map(|id| map.get(id).cloned())
            .collect())
    }

    /// Cache-aware batch resolution keyed by id.
    ///
    /// Uncached ids are fetched with bounded fan-out (the store's 10-id
    /// "IN" limit), and resolved users backfill the cache. Unresolvable
    /// ids are dropped with a warning.
    pub async fn get_many_as_map(&self, user_ids: &[String]) -> Result<HashMap<String, User>> {
        let mut resolved = HashMap::new();
        let mut uncached: Vec<String> = Vec::new();

        for id in user_ids {
            if resolved.contains_key(id) || uncached.contains(id) {
                continue;
            }
            match self.cache.get(id) {
                Some(user) => {
                    resolved.insert(id.clone(), user);
                }
                None => uncached.push(id.clone()),
            }
        }

        let db = self.db.clone();
        let fetched: Vec<(String, Result<Option<User>>)> = stream::iter(uncached)
            .map(|id| {
                let db = db.clone();
                async move {
                    let result = db.get_doc::<User>(collections::USERS, &id).await;
                    (id, result)
                }
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect()
            .await;

        for (id, result) in fetched {
            match result {
                Ok(Some(user)) => {
                    self.cache.put(user.clone());
                    resolved.insert(id, user);
                }
                Ok(None) => {
                    tracing::warn!(user_id = %id, "Skipping unresolvable user in batch");
                }
                Err(e) => {
                    tracing::warn!(user_id = %id, error = %e, "Skipping user that failed to resolve");
                }
            }
        }

        Ok(resolved)
    }

    /// Create or update a user profile, writing through the cache.
    pub async fn update(&self, user: &User) -> Result<()> {
        self.db.upsert(collections::USERS, &user.id, user).await?;
        self.cache.put(user.clone());
        Ok(())
    }

    /// Linear scan of the user collection matching name or bio.
    ///
    /// Placeholder: this does not scale past small collections and
    /// should be swapped for an indexed search collaborator.
    pub async fn search_by_name_or_bio(&self, query: &str) -> Result<Vec<User>> {
        let docs = self
            .db
            .client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let needle = query.to_lowercase();
        let users: Vec<User> = self.db.decode_docs(collections::USERS, docs);
        Ok(users
            .into_iter()
            .filter(|u| {
                u.display_name().to_lowercase().contains(&needle)
                    || u.bio
                        .as_deref()
                        .is_some_and(|b| b.to_lowercase().contains(&needle))
            })
            .collect())
    }

    /// Adjust the denormalized post counter, clamped at 0.
    ///
    /// Read-modify-write without a transaction: two racing adjustments
    /// can lose one update. The counter is an advisory cache, so this
    /// is an accepted consistency bound, not a bug to fix here.
    pub async fn adjust_post_count(&self, user_id: &str, delta: i64) -> Result<()> {
        let mut user = self.get(user_id).await?;
        user.post_count = (user.post_count as i64 + delta).max(0) as u32;

        let _: () = self
            .db
            .client()?
            .fluent()
            .update()
            .fields(firestore::paths!(User::{post_count}))
            .in_col(collections::USERS)
            .document_id(user_id)
            .object(&user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.cache.put(user);
        Ok(())
    }

    /// Add logged climbing hours to a profile, clamped at 0.
    pub async fn add_logged_hours(&self, user_id: &str, hours: f64) -> Result<()> {
        let mut user = self.get(user_id).await?;
        user.logged_hours = (user.logged_hours + hours).max(0.0);

        let _: () = self
            .db
            .client()?
            .fluent()
            .update()
            .fields(firestore::paths!(User::{logged_hours}))
            .in_col(collections::USERS)
            .document_id(user_id)
            .object(&user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.cache.put(user);
        Ok(())
    }
}
