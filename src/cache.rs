// SPDX-License-Identifier: MIT

//! In-memory caches for user lookups and follow-sets.
//!
//! Both caches are best-effort: reads may be stale by design, and
//! entries are only ever removed by explicit invalidation on mutation,
//! never by time. Lifetime is tied to the repository bundle that owns
//! the cache, not to the process.

use crate::models::User;
use dashmap::DashMap;
use std::sync::Arc;

/// Cache of resolved user profiles, keyed by user id.
#[derive(Clone, Default)]
pub struct UserCache {
    users: Arc<DashMap<String, User>>,
}

impl UserCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user_id: &str) -> Option<User> {
        self.users.get(user_id).map(|entry| entry.clone())
    }

    pub fn put(&self, user: User) {
        self.users.insert(user.id.clone(), user);
    }

    /// Invalidate one user (after a profile or counter mutation).
    pub fn invalidate(&self, user_id: &str) {
        self.users.remove(user_id);
    }

    pub fn clear(&self) {
        self.users.clear();
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Cache of follow-sets (ids a user follows), keyed by follower id.
///
/// Invalidated only by follow/unfollow through the relationship
/// repository; edges mutated elsewhere will not be observed until then.
#[derive(Clone, Default)]
pub struct FollowCache {
    following: Arc<DashMap<String, Arc<Vec<String>>>>,
}

impl FollowCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, follower_id: &str) -> Option<Arc<Vec<String>>> {
        self.following.get(follower_id).map(|entry| entry.clone())
    }

    pub fn put(&self, follower_id: &str, following_ids: Vec<String>) {
        self.following
            .insert(follower_id.to_string(), Arc::new(following_ids));
    }

    /// Invalidate one follower's set (after follow/unfollow).
    pub fn invalidate(&self, follower_id: &str) {
        self.following.remove(follower_id);
    }

    pub fn clear(&self) {
        self.following.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::test_user;

    #[test]
    fn test_user_cache_round_trip_and_invalidate() {
        let cache = UserCache::new();
        assert!(cache.get("alice").is_none());

        cache.put(test_user("alice"));
        assert_eq!(cache.get("alice").unwrap().id, "alice");
        assert_eq!(cache.len(), 1);

        cache.invalidate("alice");
        assert!(cache.get("alice").is_none());
    }

    #[test]
    fn test_follow_cache_invalidate_only_named_entry() {
        let cache = FollowCache::new();
        cache.put("alice", vec!["bob".to_string()]);
        cache.put("carol", vec!["alice".to_string()]);

        cache.invalidate("alice");
        assert!(cache.get("alice").is_none());
        assert_eq!(cache.get("carol").unwrap().as_slice(), ["alice"]);
    }

    #[test]
    fn test_follow_cache_overwrite() {
        let cache = FollowCache::new();
        cache.put("alice", vec!["bob".to_string()]);
        cache.put("alice", vec!["bob".to_string(), "carol".to_string()]);
        assert_eq!(cache.get("alice").unwrap().len(), 2);
    }
}
