// SPDX-License-Identifier: MIT

//! Chalkline: activity feed and engagement core for a climbing-gym
//! social network, backed by Firestore.
//!
//! The crate exposes one repository per aggregate (activities, comments,
//! users, gyms, follow graph, visit rosters, permissions, conversations,
//! notifications) plus a [`feed::FeedComposer`] that builds the
//! following feed and the "friends visiting today" view on top of them.
//! Construct a [`Repositories`] bundle from a connected
//! [`db::FirestoreDb`] and a media-storage collaborator.

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod feed;
pub mod media;
pub mod models;
pub mod repos;
pub mod time_utils;

pub use config::Config;
pub use error::{AppError, Result};

use crate::cache::{FollowCache, UserCache};
use crate::db::FirestoreDb;
use crate::feed::FeedComposer;
use crate::media::MediaStorage;
use crate::repos::{
    ActivityRepository, CommentRepository, ConversationRepository, GymRepository,
    GymVisitRepository, NotificationRepository, PermissionRepository, RelationshipRepository,
    UserRepository,
};
use std::sync::Arc;

/// The wired repository bundle. Cheap to clone; all clones share the
/// same connection and caches.
#[derive(Clone)]
pub struct Repositories {
    pub users: UserRepository,
    pub gyms: GymRepository,
    pub activities: ActivityRepository,
    pub comments: CommentRepository,
    pub relationships: RelationshipRepository,
    pub visits: GymVisitRepository,
    pub permissions: PermissionRepository,
    pub conversations: ConversationRepository,
    pub notifications: NotificationRepository,
    pub feed: FeedComposer,
}

impl Repositories {
    /// Connect to the configured Firestore project and wire the bundle.
    pub async fn connect(config: &Config, media: Arc<dyn MediaStorage>) -> Result<Self> {
        let db = FirestoreDb::new(&config.gcp_project_id).await?;
        Ok(Self::new(db, media))
    }

    pub fn new(db: FirestoreDb, media: Arc<dyn MediaStorage>) -> Self {
        let user_cache = UserCache::new();
        let follow_cache = FollowCache::new();

        let users = UserRepository::new(db.clone(), user_cache);
        let gyms = GymRepository::new(db.clone());
        let notifications = NotificationRepository::new(db.clone());
        let activities = ActivityRepository::new(
            db.clone(),
            users.clone(),
            gyms.clone(),
            notifications.clone(),
            media,
        );
        let comments = CommentRepository::new(db.clone(), users.clone(), notifications.clone());
        let relationships = RelationshipRepository::new(
            db.clone(),
            users.clone(),
            notifications.clone(),
            follow_cache,
        );
        let visits = GymVisitRepository::new(db.clone(), users.clone(), gyms.clone());
        let permissions = PermissionRepository::new(db.clone());
        let conversations = ConversationRepository::new(db);
        let feed = FeedComposer::new(activities.clone(), relationships.clone(), visits.clone());

        Self {
            users,
            gyms,
            activities,
            comments,
            relationships,
            visits,
            permissions,
            conversations,
            notifications,
            feed,
        }
    }
}
