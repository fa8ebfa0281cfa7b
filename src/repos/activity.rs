// SPDX-License-Identifier: MIT

//! Activity repository: creation, feeds, engagement, and cascade
//! deletion for the four activity variants.
//!
//! Reconstruction is best-effort throughout: documents that fail to
//! decode, carry an unknown `type`, or reference an unresolvable author
//! or required gym are dropped from batch results with a warning. One
//! corrupt document never fails a fetch.

use crate::db::{collections, FirestoreDb};
use crate::error::{AppError, Result};
use crate::media::MediaStorage;
use crate::models::{
    ActivityDoc, ActivityItem, ActivityKind, BasicPost, BetaPost, EventPost, GroupVisit,
    Gym, NotificationKind, Page, PageCursor, User, VisitStatus,
};
use crate::repos::{GymRepository, NotificationRepository, UserRepository};
use chrono::{DateTime, Utc};
use firestore::{FirestoreQueryCursor, FirestoreQueryDirection, FirestoreTimestamp};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Per-user like marker, keyed `{item_id}_{user_id}`. Existence of the
/// marker is the source of truth; the item's `like_count` is a cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LikeMarker {
    id: String,
    item_id: String,
    user_id: String,
    #[serde(
        with = "firestore::serialize_as_timestamp",
        default = "chrono::Utc::now"
    )]
    created_at: DateTime<Utc>,
}

/// Event registration marker, keyed `{item_id}_{user_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RegistrationMarker {
    id: String,
    item_id: String,
    user_id: String,
    #[serde(
        with = "firestore::serialize_as_timestamp",
        default = "chrono::Utc::now"
    )]
    created_at: DateTime<Utc>,
}

fn marker_id(item_id: &str, user_id: &str) -> String {
    format!("{}_{}", item_id, user_id)
}

/// Parameters for creating an event post.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub max_attendees: u32,
    pub gym: Option<Gym>,
}

/// Parameters for creating a group visit.
#[derive(Debug, Clone)]
pub struct NewVisit {
    pub gym: Gym,
    pub visit_date: DateTime<Utc>,
    pub duration_minutes: u32,
    pub description: Option<String>,
}

/// Repository for the heterogeneous activities collection.
#[derive(Clone)]
pub struct ActivityRepository {
    db: FirestoreDb,
    users: UserRepository,
    gyms: GymRepository,
    notifications: NotificationRepository,
    media: Arc<dyn MediaStorage>,
}

impl ActivityRepository {
    pub fn new(
        db: FirestoreDb,
        users: UserRepository,
        gyms: GymRepository,
        notifications: NotificationRepository,
        media: Arc<dyn MediaStorage>,
    ) -> Self {
        Self {
            db,
            users,
            gyms,
            notifications,
            media,
        }
    }

    // ─── Creation ────────────────────────────────────────────────

    /// Create a plain post.
    pub async fn create_basic(
        &self,
        author: &User,
        content: &str,
        media_urls: Vec<String>,
    ) -> Result<ActivityItem> {
        let item = ActivityItem::Basic(BasicPost {
            id: uuid::Uuid::new_v4().to_string(),
            author: author.clone(),
            created_at: Utc::now(),
            like_count: 0,
            comment_count: 0,
            is_featured: false,
            content: content.to_string(),
            media_urls,
        });
        self.write_new_item(item).await
    }

    /// Create a route-beta post tied to a gym.
    pub async fn create_beta(&self, author: &User, gym: &Gym, content: &str) -> Result<ActivityItem> {
        let item = ActivityItem::Beta(BetaPost {
            id: uuid::Uuid::new_v4().to_string(),
            author: author.clone(),
            created_at: Utc::now(),
            like_count: 0,
            comment_count: 0,
            is_featured: false,
            content: content.to_string(),
            gym: gym.clone(),
            view_count: 0,
        });
        self.write_new_item(item).await
    }

    /// Create an event post.
    pub async fn create_event(&self, author: &User, event: NewEvent) -> Result<ActivityItem> {
        let item = ActivityItem::Event(EventPost {
            id: uuid::Uuid::new_v4().to_string(),
            author: author.clone(),
            created_at: Utc::now(),
            like_count: 0,
            comment_count: 0,
            is_featured: false,
            title: event.title,
            description: event.description,
            event_date: event.event_date,
            location: event.location,
            max_attendees: event.max_attendees,
            registered: 0,
            gym: event.gym,
        });
        self.write_new_item(item).await
    }

    /// Create a group visit. The author is the first attendee. Visits
    /// are not posts and never touch the author's post count.
    pub async fn create_visit(&self, author: &User, visit: NewVisit) -> Result<ActivityItem> {
        let item = ActivityItem::Visit(GroupVisit {
            id: uuid::Uuid::new_v4().to_string(),
            author: author.clone(),
            created_at: Utc::now(),
            like_count: 0,
            comment_count: 0,
            is_featured: false,
            gym: visit.gym,
            visit_date: visit.visit_date,
            duration_minutes: visit.duration_minutes,
            description: visit.description,
            attendees: vec![author.id.clone()],
            status: VisitStatus::Planned,
        });
        self.write_new_item(item).await
    }

    /// Write the document, then adjust the author's post counter for
    /// post-like variants. A failed counter write is logged, not rolled
    /// back: the item write is authoritative.
    async fn write_new_item(&self, item: ActivityItem) -> Result<ActivityItem> {
        let doc = ActivityDoc::from_item(&item);
        self.db.upsert(collections::ACTIVITIES, &doc.id, &doc).await?;

        if doc.kind.counts_as_post() {
            if let Err(e) = self.users.adjust_post_count(&doc.author_id, 1).await {
                tracing::warn!(
                    item_id = %doc.id,
                    author_id = %doc.author_id,
                    error = %e,
                    "Post count increment failed; count may drift"
                );
            }
        }

        tracing::info!(item_id = %doc.id, kind = ?doc.kind, "Activity item created");
        Ok(item)
    }

    // ─── Fetching ────────────────────────────────────────────────

    /// Get a single item by id, fully resolved.
    pub async fn get(&self, item_id: &str) -> Result<ActivityItem> {
        let doc = self.get_doc(item_id).await?;
        self.resolve_items(vec![doc])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                AppError::InvalidState(format!("activity item {} cannot be reconstructed", item_id))
            })
    }

    /// All items, newest first.
    pub async fn fetch_all(&self) -> Result<Vec<ActivityItem>> {
        let docs = self.query_docs(None, None, None).await?;
        self.resolve_items(docs).await
    }

    /// Items by a single author, newest first.
    pub async fn fetch_by_author(&self, author_id: &str) -> Result<Vec<ActivityItem>> {
        let docs = self
            .query_docs(Some(vec![author_id.to_string()]), None, None)
            .await?;
        self.resolve_items(docs).await
    }

    /// Items referencing a gym, newest first.
    pub async fn fetch_by_gym(&self, gym_id: &str) -> Result<Vec<ActivityItem>> {
        let gym = gym_id.to_string();
        let docs = self
            .db
            .client()?
            .fluent()
            .select()
            .from(collections::ACTIVITIES)
            .filter(move |q| q.for_all([q.field("gym_id").eq(gym.clone())]))
            .order_by([
                ("created_at", FirestoreQueryDirection::Descending),
                ("id", FirestoreQueryDirection::Descending),
            ])
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let docs: Vec<ActivityDoc> = self.db.decode_docs(collections::ACTIVITIES, docs);
        self.resolve_items(docs).await
    }

    /// One page of all items, `(page_size + 1)` lookahead.
    pub async fn fetch_page(
        &self,
        page_size: usize,
        cursor: Option<&str>,
    ) -> Result<Page<ActivityItem>> {
        let cursor = cursor.map(PageCursor::decode).transpose()?;
        let docs = self
            .query_docs(None, Some(page_size + 1), cursor.as_ref())
            .await?;
        self.page_from_docs(docs, page_size).await
    }

    /// Items authored by any of `author_ids`, newest first. Queries are
    /// chunked to the store's 10-id "IN" limit and merged in memory.
    pub async fn fetch_by_authors(&self, author_ids: &[String]) -> Result<Vec<ActivityItem>> {
        let mut docs = Vec::new();
        for chunk in author_ids.chunks(crate::db::firestore::MAX_CONCURRENT_DB_OPS) {
            docs.extend(self.query_docs(Some(chunk.to_vec()), None, None).await?);
        }
        sort_newest_first(&mut docs);
        self.resolve_items(docs).await
    }

    /// One page over an author set.
    ///
    /// Each ≤10-author chunk is queried with the same cursor and
    /// `page_size + 1` limit; the merged superset necessarily contains
    /// the true next page, so the lookahead contract is applied to the
    /// merged ordering.
    pub async fn fetch_page_by_authors(
        &self,
        author_ids: &[String],
        page_size: usize,
        cursor: Option<&str>,
    ) -> Result<Page<ActivityItem>> {
        let cursor = cursor.map(PageCursor::decode).transpose()?;
        let mut docs = Vec::new();
        for chunk in author_ids.chunks(crate::db::firestore::MAX_CONCURRENT_DB_OPS) {
            docs.extend(
                self.query_docs(Some(chunk.to_vec()), Some(page_size + 1), cursor.as_ref())
                    .await?,
            );
        }
        sort_newest_first(&mut docs);
        docs.truncate(page_size + 1);
        self.page_from_docs(docs, page_size).await
    }

    // ─── Engagement ──────────────────────────────────────────────

    /// Like an item. Idempotent: a second like from the same user is a
    /// no-op and leaves the count unchanged. Returns true when the like
    /// marker transitioned.
    pub async fn like(&self, item_id: &str, user_id: &str) -> Result<bool> {
        let item = self.get_doc(item_id).await?;

        let marker_id = marker_id(item_id, user_id);
        let existing: Option<LikeMarker> =
            self.db.get_doc(collections::LIKES, &marker_id).await?;
        if existing.is_some() {
            return Ok(false);
        }

        let marker = LikeMarker {
            id: marker_id.clone(),
            item_id: item_id.to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now(),
        };
        self.db.upsert(collections::LIKES, &marker_id, &marker).await?;

        if let Err(e) = self.adjust_like_count(item_id, 1).await {
            tracing::warn!(item_id, error = %e, "Like count increment failed; count may drift");
        }

        self.notifications
            .notify_best_effort(&item.author_id, user_id, NotificationKind::Like, Some(item_id))
            .await;

        Ok(true)
    }

    /// Remove a like. A never-liked item is a no-op.
    pub async fn unlike(&self, item_id: &str, user_id: &str) -> Result<bool> {
        let marker_id = marker_id(item_id, user_id);
        let existing: Option<LikeMarker> =
            self.db.get_doc(collections::LIKES, &marker_id).await?;
        if existing.is_none() {
            return Ok(false);
        }

        self.db.delete_doc(collections::LIKES, &marker_id).await?;

        if let Err(e) = self.adjust_like_count(item_id, -1).await {
            tracing::warn!(item_id, error = %e, "Like count decrement failed; count may drift");
        }

        Ok(true)
    }

    /// Whether a user has liked an item.
    pub async fn has_liked(&self, item_id: &str, user_id: &str) -> Result<bool> {
        let existing: Option<LikeMarker> = self
            .db
            .get_doc(collections::LIKES, &marker_id(item_id, user_id))
            .await?;
        Ok(existing.is_some())
    }

    /// Delete an item: cascade its likes, comments, and registrations
    /// in atomic batches, delete the document, then adjust the author's
    /// post counter and clean up media best-effort.
    pub async fn delete_item(&self, item_id: &str) -> Result<()> {
        let doc = self.get_doc(item_id).await?;

        let like_ids = self.marker_ids_for_item(collections::LIKES, item_id).await?;
        self.db.batch_delete_ids(collections::LIKES, &like_ids).await?;

        let comment_ids = self
            .marker_ids_for_item(collections::COMMENTS, item_id)
            .await?;
        self.db
            .batch_delete_ids(collections::COMMENTS, &comment_ids)
            .await?;

        if doc.kind == ActivityKind::Event {
            let registration_ids = self
                .marker_ids_for_item(collections::EVENT_REGISTRATIONS, item_id)
                .await?;
            self.db
                .batch_delete_ids(collections::EVENT_REGISTRATIONS, &registration_ids)
                .await?;
        }

        self.db.delete_doc(collections::ACTIVITIES, item_id).await?;

        if doc.kind.counts_as_post() {
            if let Err(e) = self.users.adjust_post_count(&doc.author_id, -1).await {
                tracing::warn!(
                    item_id,
                    author_id = %doc.author_id,
                    error = %e,
                    "Post count decrement failed; count may drift"
                );
            }
        }

        for url in &doc.media_urls {
            if let Err(e) = self.media.delete(url).await {
                tracing::warn!(item_id, media = %url, error = %e, "Media cleanup failed");
            }
        }

        tracing::info!(
            item_id,
            likes = like_ids.len(),
            comments = comment_ids.len(),
            "Activity item deleted with cascade"
        );
        Ok(())
    }

    /// Flip the featured flag. Returns the new value.
    pub async fn toggle_featured(&self, item_id: &str) -> Result<bool> {
        let mut doc = self.get_doc(item_id).await?;
        doc.is_featured = !doc.is_featured;
        self.write_fields(&doc, firestore::paths!(ActivityDoc::{is_featured}))
            .await?;
        Ok(doc.is_featured)
    }

    /// Record a view of a beta post.
    pub async fn record_beta_view(&self, item_id: &str) -> Result<()> {
        let mut doc = self.get_doc(item_id).await?;
        if doc.kind != ActivityKind::Beta {
            return Err(AppError::InvalidState(format!(
                "item {} is not a beta post",
                item_id
            )));
        }
        doc.view_count += 1;
        self.write_fields(&doc, firestore::paths!(ActivityDoc::{view_count}))
            .await
    }

    // ─── Group visits ────────────────────────────────────────────

    /// Join a group visit. Idempotent on attendee membership. Returns
    /// true when the user was added.
    pub async fn join_visit(&self, visit_id: &str, user_id: &str) -> Result<bool> {
        let mut doc = self.visit_doc(visit_id).await?;
        if doc.attendees.iter().any(|a| a == user_id) {
            return Ok(false);
        }
        doc.attendees.push(user_id.to_string());
        self.write_fields(&doc, firestore::paths!(ActivityDoc::{attendees}))
            .await?;
        Ok(true)
    }

    /// Leave a group visit. Not being an attendee is a no-op.
    pub async fn leave_visit(&self, visit_id: &str, user_id: &str) -> Result<bool> {
        let mut doc = self.visit_doc(visit_id).await?;
        let before = doc.attendees.len();
        doc.attendees.retain(|a| a != user_id);
        if doc.attendees.len() == before {
            return Ok(false);
        }
        self.write_fields(&doc, firestore::paths!(ActivityDoc::{attendees}))
            .await?;
        Ok(true)
    }

    /// Update a visit's lifecycle status, validating the transition
    /// table (planned → ongoing → completed; cancel before completion).
    pub async fn update_visit_status(&self, visit_id: &str, status: VisitStatus) -> Result<()> {
        let mut doc = self.visit_doc(visit_id).await?;
        let current = doc.status.unwrap_or(VisitStatus::Planned);
        if !current.can_transition_to(status) {
            return Err(AppError::InvalidState(format!(
                "visit {} cannot move from {:?} to {:?}",
                visit_id, current, status
            )));
        }
        if current == status {
            return Ok(());
        }
        doc.status = Some(status);
        self.write_fields(&doc, firestore::paths!(ActivityDoc::{status}))
            .await
    }

    // ─── Event registration ──────────────────────────────────────

    /// Register for an event, capacity-checked. Idempotent per user.
    /// Returns true when newly registered.
    pub async fn register_event(&self, item_id: &str, user_id: &str) -> Result<bool> {
        let doc = self.get_doc(item_id).await?;
        if doc.kind != ActivityKind::Event {
            return Err(AppError::InvalidState(format!(
                "item {} is not an event",
                item_id
            )));
        }

        let marker_id = marker_id(item_id, user_id);
        let existing: Option<RegistrationMarker> = self
            .db
            .get_doc(collections::EVENT_REGISTRATIONS, &marker_id)
            .await?;
        if existing.is_some() {
            return Ok(false);
        }

        let capacity = doc.max_attendees.unwrap_or(0);
        if capacity > 0 && doc.registered >= capacity as i64 {
            return Err(AppError::InvalidState(format!("event {} is full", item_id)));
        }

        let marker = RegistrationMarker {
            id: marker_id.clone(),
            item_id: item_id.to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now(),
        };
        self.db
            .upsert(collections::EVENT_REGISTRATIONS, &marker_id, &marker)
            .await?;

        if let Err(e) = self.adjust_registered(item_id, 1).await {
            tracing::warn!(item_id, error = %e, "Registered count increment failed");
        }

        self.notifications
            .notify_best_effort(
                &doc.author_id,
                user_id,
                NotificationKind::Event,
                Some(item_id),
            )
            .await;

        Ok(true)
    }

    /// Withdraw an event registration. Not registered is a no-op.
    pub async fn unregister_event(&self, item_id: &str, user_id: &str) -> Result<bool> {
        let marker_id = marker_id(item_id, user_id);
        let existing: Option<RegistrationMarker> = self
            .db
            .get_doc(collections::EVENT_REGISTRATIONS, &marker_id)
            .await?;
        if existing.is_none() {
            return Ok(false);
        }

        self.db
            .delete_doc(collections::EVENT_REGISTRATIONS, &marker_id)
            .await?;

        if let Err(e) = self.adjust_registered(item_id, -1).await {
            tracing::warn!(item_id, error = %e, "Registered count decrement failed");
        }
        Ok(true)
    }

    // ─── Search ──────────────────────────────────────────────────

    /// Case-insensitive substring search over content and titles.
    ///
    /// Placeholder: scans the full collection and filters in memory.
    /// Swap for an indexed search collaborator before the collection
    /// grows.
    pub async fn search_by_text(&self, query: &str) -> Result<Vec<ActivityItem>> {
        let needle = query.to_lowercase();
        let items = self.fetch_all().await?;
        Ok(items
            .into_iter()
            .filter(|item| match item {
                ActivityItem::Basic(p) => p.content.to_lowercase().contains(&needle),
                ActivityItem::Beta(p) => p.content.to_lowercase().contains(&needle),
                ActivityItem::Event(p) => {
                    p.title.to_lowercase().contains(&needle)
                        || p.description
                            .as_deref()
                            .is_some_and(|d| d.to_lowercase().contains(&needle))
                }
                ActivityItem::Visit(v) => v
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle)),
            })
            .collect())
    }

    /// Search for `#tag` tokens in post content. Same scan caveat as
    /// [`search_by_text`](Self::search_by_text).
    pub async fn search_by_tag(&self, tag: &str) -> Result<Vec<ActivityItem>> {
        let needle = format!("#{}", tag.trim_start_matches('#').to_lowercase());
        let items = self.fetch_all().await?;
        Ok(items
            .into_iter()
            .filter(|item| match item {
                ActivityItem::Basic(p) => p.content.to_lowercase().contains(&needle),
                ActivityItem::Beta(p) => p.content.to_lowercase().contains(&needle),
                _ => false,
            })
            .collect())
    }

    // ─── Internals ───────────────────────────────────────────────

    async fn get_doc(&self, item_id: &str) -> Result<ActivityDoc> {
        self.db
            .get_doc(collections::ACTIVITIES, item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("activity item {}", item_id)))
    }

    async fn visit_doc(&self, visit_id: &str) -> Result<ActivityDoc> {
        let doc = self.get_doc(visit_id).await?;
        if doc.kind != ActivityKind::Visit {
            return Err(AppError::InvalidState(format!(
                "item {} is not a visit",
                visit_id
            )));
        }
        Ok(doc)
    }

    /// Ordered query over the activities collection with optional
    /// author filter, limit, and continuation cursor.
    async fn query_docs(
        &self,
        authors: Option<Vec<String>>,
        limit: Option<usize>,
        cursor: Option<&PageCursor>,
    ) -> Result<Vec<ActivityDoc>> {
        let mut builder = self
            .db
            .client()?
            .fluent()
            .select()
            .from(collections::ACTIVITIES)
            .order_by([
                ("created_at", FirestoreQueryDirection::Descending),
                ("id", FirestoreQueryDirection::Descending),
            ]);

        if let Some(authors) = authors {
            builder = builder
                .filter(move |q| q.for_all([q.field("author_id").is_in(authors.clone())]));
        }
        if let Some(cursor) = cursor {
            builder = builder.start_at(FirestoreQueryCursor::AfterValue(vec![
                FirestoreTimestamp(cursor.created_at).into(),
                cursor.id.clone().into(),
            ]));
        }
        if let Some(limit) = limit {
            builder = builder.limit(limit as u32);
        }

        let docs = builder
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(self.db.decode_docs(collections::ACTIVITIES, docs))
    }

    /// Apply the lookahead contract to an ordered doc batch, then
    /// resolve. The continuation cursor is taken from the last kept
    /// *document*, so dropped documents cannot stall pagination.
    async fn page_from_docs(
        &self,
        docs: Vec<ActivityDoc>,
        page_size: usize,
    ) -> Result<Page<ActivityItem>> {
        let page = Page::from_lookahead(docs, page_size, |doc| PageCursor {
            created_at: doc.created_at,
            id: doc.id.clone(),
        });
        let items = self.resolve_items(page.items).await?;
        Ok(Page {
            items,
            next_cursor: page.next_cursor,
            has_more: page.has_more,
        })
    }

    /// Resolve authors and gyms for a doc batch, dropping documents
    /// that cannot be reconstructed.
    async fn resolve_items(&self, docs: Vec<ActivityDoc>) -> Result<Vec<ActivityItem>> {
        let author_ids: Vec<String> = docs.iter().map(|d| d.author_id.clone()).collect();
        let gym_ids: Vec<String> = docs.iter().filter_map(|d| d.gym_id.clone()).collect();

        let authors = self.users.get_many_as_map(&author_ids).await?;
        let gyms = self.gyms.get_many_as_map(&gym_ids).await?;

        Ok(docs
            .into_iter()
            .filter_map(|doc| {
                let author = match authors.get(&doc.author_id) {
                    Some(author) => author.clone(),
                    None => {
                        tracing::warn!(
                            item_id = %doc.id,
                            author_id = %doc.author_id,
                            "Dropping item with unresolvable author"
                        );
                        return None;
                    }
                };
                let gym = doc.gym_id.as_ref().and_then(|id| gyms.get(id).cloned());
                if doc.kind.requires_gym() && gym.is_none() {
                    tracing::warn!(
                        item_id = %doc.id,
                        gym_id = ?doc.gym_id,
                        "Dropping item with unresolvable required gym"
                    );
                    return None;
                }
                let id = doc.id.clone();
                match doc.into_item(author, gym) {
                    Some(item) => Some(item),
                    None => {
                        tracing::warn!(item_id = %id, "Dropping item missing required fields");
                        None
                    }
                }
            })
            .collect())
    }

    /// Clamped read-modify-write of the like counter. Not transactional
    /// (advisory cache, accepted lost-update bound).
    async fn adjust_like_count(&self, item_id: &str, delta: i64) -> Result<()> {
        let mut doc = self.get_doc(item_id).await?;
        doc.like_count = (doc.like_count + delta).max(0);
        self.write_fields(&doc, firestore::paths!(ActivityDoc::{like_count}))
            .await
    }

    async fn adjust_registered(&self, item_id: &str, delta: i64) -> Result<()> {
        let mut doc = self.get_doc(item_id).await?;
        doc.registered = (doc.registered + delta).max(0);
        self.write_fields(&doc, firestore::paths!(ActivityDoc::{registered}))
            .await
    }

    /// Update only the named fields of an item document.
    async fn write_fields(&self, doc: &ActivityDoc, fields: Vec<String>) -> Result<()> {
        let _: () = self
            .db
            .client()?
            .fluent()
            .update()
            .fields(fields)
            .in_col(collections::ACTIVITIES)
            .document_id(&doc.id)
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Ids of join-collection records (likes/comments/registrations)
    /// belonging to an item.
    async fn marker_ids_for_item(&self, collection: &str, item_id: &str) -> Result<Vec<String>> {
        #[derive(Deserialize)]
        struct IdOnly {
            id: String,
        }

        let item = item_id.to_string();
        let docs = self
            .db
            .client()?
            .fluent()
            .select()
            .from(collection)
            .filter(move |q| q.for_all([q.field("item_id").eq(item.clone())]))
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let ids: Vec<IdOnly> = self.db.decode_docs(collection, docs);
        Ok(ids.into_iter().map(|d| d.id).collect())
    }
}

/// Sort by (created_at desc, id desc), the feed ordering with the id
/// tiebreak for identical timestamps.
fn sort_newest_first(docs: &mut [ActivityDoc]) {
    docs.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
