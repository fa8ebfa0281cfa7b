// SPDX-License-Identifier: MIT

//! Polymorphic activity items and their document codec.
//!
//! Activity documents are heterogeneous: four variants share one
//! collection, discriminated by the persisted `type` field. The stored
//! shape is the flat [`ActivityDoc`]; the domain shape is the
//! [`ActivityItem`] sum type with the author (and gym, where required)
//! already resolved. The codec performs no I/O: the repository resolves
//! related entities first and hands them in (see `repos::activity`).
//!
//! Decoding fails softly. A document missing required variant fields
//! reconstructs to `None`, never to an error, so one corrupt document
//! shrinks a feed page instead of sinking it. Optional fields get
//! defaults: counts 0, booleans false, timestamps now.

use crate::models::{Gym, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted `type` discriminant. Reconstruction is impossible without it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Basic,
    Beta,
    Event,
    Visit,
}

impl ActivityKind {
    /// Whether the variant contributes to the author's `post_count`.
    /// Group visits are not posts.
    pub fn counts_as_post(self) -> bool {
        !matches!(self, ActivityKind::Visit)
    }

    /// Whether reconstruction requires a resolved gym. Events may
    /// legitimately carry no gym; basic posts never reference one.
    pub fn requires_gym(self) -> bool {
        matches!(self, ActivityKind::Beta | ActivityKind::Visit)
    }
}

/// Lifecycle of a group visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitStatus {
    Planned,
    Ongoing,
    Completed,
    Cancelled,
}

impl VisitStatus {
    /// Allowed transitions: planned → ongoing → completed, with
    /// cancellation possible until completion. Writing the current
    /// status again is a no-op, not a violation.
    pub fn can_transition_to(self, next: VisitStatus) -> bool {
        use VisitStatus::*;
        match (self, next) {
            (current, target) if current == target => true,
            (Planned, Ongoing) | (Ongoing, Completed) => true,
            (Planned, Cancelled) | (Ongoing, Cancelled) => true,
            _ => false,
        }
    }
}

/// Flat persisted form of an activity document.
///
/// Variant-specific fields are optional at the wire level; which of them
/// are required is decided by [`ActivityDoc::into_item`] per `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityDoc {
    /// Item id (also used as document ID, and as the pagination tiebreak)
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub author_id: String,
    #[serde(
        with = "firestore::serialize_as_timestamp",
        default = "chrono::Utc::now"
    )]
    pub created_at: DateTime<Utc>,
    /// Advisory cache of the likes sub-collection, clamped at 0.
    #[serde(default)]
    pub like_count: i64,
    /// Advisory cache of the comments sub-collection, clamped at 0.
    #[serde(default)]
    pub comment_count: i64,
    #[serde(default)]
    pub is_featured: bool,

    // ─── basic / beta ────────────────────────────────────────────
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub media_urls: Vec<String>,
    /// Referenced gym (required for beta/visit, optional for event).
    #[serde(default)]
    pub gym_id: Option<String>,
    #[serde(default)]
    pub view_count: i64,

    // ─── event ───────────────────────────────────────────────────
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    pub event_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub max_attendees: Option<u32>,
    #[serde(default)]
    pub registered: i64,

    // ─── visit ───────────────────────────────────────────────────
    #[serde(default, with = "firestore::serialize_as_optional_timestamp")]
    pub visit_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    /// Ordered attendee user ids with set membership semantics.
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default)]
    pub status: Option<VisitStatus>,
}

/// Plain free-text post with optional media.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicPost {
    pub id: String,
    pub author: User,
    pub created_at: DateTime<Utc>,
    pub like_count: u32,
    pub comment_count: u32,
    pub is_featured: bool,
    pub content: String,
    pub media_urls: Vec<String>,
}

/// Route-beta post tied to a gym.
#[derive(Debug, Clone, PartialEq)]
pub struct BetaPost {
    pub id: String,
    pub author: User,
    pub created_at: DateTime<Utc>,
    pub like_count: u32,
    pub comment_count: u32,
    pub is_featured: bool,
    pub content: String,
    pub gym: Gym,
    pub view_count: u32,
}

/// Scheduled event, optionally hosted at a gym.
#[derive(Debug, Clone, PartialEq)]
pub struct EventPost {
    pub id: String,
    pub author: User,
    pub created_at: DateTime<Utc>,
    pub like_count: u32,
    pub comment_count: u32,
    pub is_featured: bool,
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub max_attendees: u32,
    pub registered: u32,
    pub gym: Option<Gym>,
}

/// Group visit to a gym.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupVisit {
    pub id: String,
    pub author: User,
    pub created_at: DateTime<Utc>,
    pub like_count: u32,
    pub comment_count: u32,
    pub is_featured: bool,
    pub gym: Gym,
    pub visit_date: DateTime<Utc>,
    pub duration_minutes: u32,
    pub description: Option<String>,
    /// Ordered attendee user ids; membership semantics are a set.
    pub attendees: Vec<String>,
    pub status: VisitStatus,
}

/// Reconstructed activity item with resolved related entities.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityItem {
    Basic(BasicPost),
    Beta(BetaPost),
    Event(EventPost),
    Visit(GroupVisit),
}

impl ActivityItem {
    pub fn id(&self) -> &str {
        match self {
            ActivityItem::Basic(p) => &p.id,
            ActivityItem::Beta(p) => &p.id,
            ActivityItem::Event(p) => &p.id,
            ActivityItem::Visit(v) => &v.id,
        }
    }

    pub fn kind(&self) -> ActivityKind {
        match self {
            ActivityItem::Basic(_) => ActivityKind::Basic,
            ActivityItem::Beta(_) => ActivityKind::Beta,
            ActivityItem::Event(_) => ActivityKind::Event,
            ActivityItem::Visit(_) => ActivityKind::Visit,
        }
    }

    pub fn author(&self) -> &User {
        match self {
            ActivityItem::Basic(p) => &p.author,
            ActivityItem::Beta(p) => &p.author,
            ActivityItem::Event(p) => &p.author,
            ActivityItem::Visit(v) => &v.author,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            ActivityItem::Basic(p) => p.created_at,
            ActivityItem::Beta(p) => p.created_at,
            ActivityItem::Event(p) => p.created_at,
            ActivityItem::Visit(v) => v.created_at,
        }
    }

    pub fn like_count(&self) -> u32 {
        match self {
            ActivityItem::Basic(p) => p.like_count,
            ActivityItem::Beta(p) => p.like_count,
            ActivityItem::Event(p) => p.like_count,
            ActivityItem::Visit(v) => v.like_count,
        }
    }

    pub fn comment_count(&self) -> u32 {
        match self {
            ActivityItem::Basic(p) => p.comment_count,
            ActivityItem::Beta(p) => p.comment_count,
            ActivityItem::Event(p) => p.comment_count,
            ActivityItem::Visit(v) => v.comment_count,
        }
    }

    pub fn is_featured(&self) -> bool {
        match self {
            ActivityItem::Basic(p) => p.is_featured,
            ActivityItem::Beta(p) => p.is_featured,
            ActivityItem::Event(p) => p.is_featured,
            ActivityItem::Visit(v) => v.is_featured,
        }
    }

    pub fn gym(&self) -> Option<&Gym> {
        match self {
            ActivityItem::Basic(_) => None,
            ActivityItem::Beta(p) => Some(&p.gym),
            ActivityItem::Event(p) => p.gym.as_ref(),
            ActivityItem::Visit(v) => Some(&v.gym),
        }
    }
}

impl ActivityDoc {
    /// Soft-failing decode into the domain type.
    ///
    /// The caller supplies the already-resolved author, and the gym when
    /// `gym_id` resolved. Returns `None` when a variant's required fields
    /// are missing: the repository drops such documents from the batch.
    pub fn into_item(self, author: User, gym: Option<Gym>) -> Option<ActivityItem> {
        let like_count = self.like_count.max(0) as u32;
        let comment_count = self.comment_count.max(0) as u32;

        match self.kind {
            ActivityKind::Basic => Some(ActivityItem::Basic(BasicPost {
                id: self.id,
                author,
                created_at: self.created_at,
                like_count,
                comment_count,
                is_featured: self.is_featured,
                content: self.content?,
                media_urls: self.media_urls,
            })),
            ActivityKind::Beta => Some(ActivityItem::Beta(BetaPost {
                id: self.id,
                author,
                created_at: self.created_at,
                like_count,
                comment_count,
                is_featured: self.is_featured,
                content: self.content?,
                gym: gym?,
                view_count: self.view_count.max(0) as u32,
            })),
            ActivityKind::Event => Some(ActivityItem::Event(EventPost {
                id: self.id,
                author,
                created_at: self.created_at,
                like_count,
                comment_count,
                is_featured: self.is_featured,
                title: self.title?,
                description: self.description,
                event_date: self.event_date.unwrap_or_else(Utc::now),
                location: self.location?,
                max_attendees: self.max_attendees.unwrap_or(0),
                registered: self.registered.max(0) as u32,
                gym,
            })),
            ActivityKind::Visit => Some(ActivityItem::Visit(GroupVisit {
                id: self.id,
                author,
                created_at: self.created_at,
                like_count,
                comment_count,
                is_featured: self.is_featured,
                gym: gym?,
                visit_date: self.visit_date.unwrap_or_else(Utc::now),
                duration_minutes: self.duration_minutes.unwrap_or(0),
                description: self.description,
                attendees: self.attendees,
                status: self.status.unwrap_or(VisitStatus::Planned),
            })),
        }
    }

    /// Encode a domain item back into its persisted form.
    pub fn from_item(item: &ActivityItem) -> Self {
        let mut doc = Self::empty(
            item.id().to_string(),
            item.kind(),
            item.author().id.clone(),
            item.created_at(),
        );
        doc.like_count = item.like_count() as i64;
        doc.comment_count = item.comment_count() as i64;
        doc.is_featured = item.is_featured();
        doc.gym_id = item.gym().map(|g| g.id.clone());

        match item {
            ActivityItem::Basic(p) => {
                doc.content = Some(p.content.clone());
                doc.media_urls = p.media_urls.clone();
            }
            ActivityItem::Beta(p) => {
                doc.content = Some(p.content.clone());
                doc.view_count = p.view_count as i64;
            }
            ActivityItem::Event(p) => {
                doc.title = Some(p.title.clone());
                doc.description = p.description.clone();
                doc.event_date = Some(p.event_date);
                doc.location = Some(p.location.clone());
                doc.max_attendees = Some(p.max_attendees);
                doc.registered = p.registered as i64;
            }
            ActivityItem::Visit(v) => {
                doc.visit_date = Some(v.visit_date);
                doc.duration_minutes = Some(v.duration_minutes);
                doc.description = v.description.clone();
                doc.attendees = v.attendees.clone();
                doc.status = Some(v.status);
            }
        }

        doc
    }

    /// Document with only the common fields populated.
    pub(crate) fn empty(
        id: String,
        kind: ActivityKind,
        author_id: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            author_id,
            created_at,
            like_count: 0,
            comment_count: 0,
            is_featured: false,
            content: None,
            media_urls: vec![],
            gym_id: None,
            view_count: 0,
            title: None,
            description: None,
            event_date: None,
            location: None,
            max_attendees: None,
            registered: 0,
            visit_date: None,
            duration_minutes: None,
            attendees: vec![],
            status: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::test_user;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
    }

    fn basic(id: &str) -> ActivityItem {
        ActivityItem::Basic(BasicPost {
            id: id.to_string(),
            author: test_user("alice"),
            created_at: at(10),
            like_count: 3,
            comment_count: 1,
            is_featured: false,
            content: "First send of the season".to_string(),
            media_urls: vec!["https://cdn.example.com/send.jpg".to_string()],
        })
    }

    #[test]
    fn test_round_trip_basic() {
        let item = basic("p1");
        let doc = ActivityDoc::from_item(&item);
        assert_eq!(doc.kind, ActivityKind::Basic);
        let back = doc.into_item(test_user("alice"), None).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_round_trip_beta() {
        let item = ActivityItem::Beta(BetaPost {
            id: "b1".to_string(),
            author: test_user("bob"),
            created_at: at(11),
            like_count: 0,
            comment_count: 0,
            is_featured: true,
            content: "Heel hook before the dyno".to_string(),
            gym: Gym::test_gym("g1"),
            view_count: 17,
        });
        let doc = ActivityDoc::from_item(&item);
        assert_eq!(doc.gym_id.as_deref(), Some("g1"));
        let back = doc
            .into_item(test_user("bob"), Some(Gym::test_gym("g1")))
            .unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_round_trip_event_without_gym() {
        let item = ActivityItem::Event(EventPost {
            id: "e1".to_string(),
            author: test_user("carol"),
            created_at: at(9),
            like_count: 2,
            comment_count: 0,
            is_featured: false,
            title: "Summer comp".to_string(),
            description: Some("Open qualifiers".to_string()),
            event_date: at(18),
            location: "Main hall".to_string(),
            max_attendees: 40,
            registered: 12,
            gym: None,
        });
        let doc = ActivityDoc::from_item(&item);
        // Events may legitimately carry no gym and still reconstruct.
        let back = doc.into_item(test_user("carol"), None).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_round_trip_visit() {
        let item = ActivityItem::Visit(GroupVisit {
            id: "v1".to_string(),
            author: test_user("dave"),
            created_at: at(8),
            like_count: 0,
            comment_count: 0,
            is_featured: false,
            gym: Gym::test_gym("g2"),
            visit_date: at(17),
            duration_minutes: 90,
            description: None,
            attendees: vec!["dave".to_string(), "alice".to_string()],
            status: VisitStatus::Planned,
        });
        let doc = ActivityDoc::from_item(&item);
        let back = doc
            .into_item(test_user("dave"), Some(Gym::test_gym("g2")))
            .unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_beta_without_gym_drops() {
        let item = basic("p1");
        let mut doc = ActivityDoc::from_item(&item);
        doc.kind = ActivityKind::Beta;
        // No resolved gym supplied: beta cannot reconstruct.
        assert!(doc.into_item(test_user("alice"), None).is_none());
    }

    #[test]
    fn test_basic_without_content_drops() {
        let doc = ActivityDoc::empty("p2".to_string(), ActivityKind::Basic, "a".to_string(), at(1));
        assert!(doc.into_item(test_user("a"), None).is_none());
    }

    #[test]
    fn test_decode_defaults_for_missing_optionals() {
        // Minimal legacy document: only id/type/author/content.
        let json = serde_json::json!({
            "id": "p3",
            "type": "basic",
            "author_id": "alice",
            "content": "old post",
        });
        let doc: ActivityDoc = serde_json::from_value(json).unwrap();
        assert_eq!(doc.like_count, 0);
        assert_eq!(doc.comment_count, 0);
        assert!(!doc.is_featured);
        // Missing timestamp defaults to now instead of failing decode.
        assert!(doc.created_at <= Utc::now());

        let item = doc.into_item(test_user("alice"), None).unwrap();
        assert_eq!(item.like_count(), 0);
    }

    #[test]
    fn test_negative_counter_clamped_on_decode() {
        let mut doc = ActivityDoc::from_item(&basic("p4"));
        doc.like_count = -2;
        let item = doc.into_item(test_user("alice"), None).unwrap();
        assert_eq!(item.like_count(), 0);
    }

    #[test]
    fn test_unknown_type_fails_serde() {
        let json = serde_json::json!({
            "id": "p5",
            "type": "poll",
            "author_id": "alice",
        });
        assert!(serde_json::from_value::<ActivityDoc>(json).is_err());
    }

    #[test]
    fn test_kind_discriminant_strings() {
        for (kind, tag) in [
            (ActivityKind::Basic, "basic"),
            (ActivityKind::Beta, "beta"),
            (ActivityKind::Event, "event"),
            (ActivityKind::Visit, "visit"),
        ] {
            assert_eq!(serde_json::to_value(kind).unwrap(), tag);
        }
    }

    #[test]
    fn test_counts_as_post() {
        assert!(ActivityKind::Basic.counts_as_post());
        assert!(ActivityKind::Beta.counts_as_post());
        assert!(ActivityKind::Event.counts_as_post());
        assert!(!ActivityKind::Visit.counts_as_post());
    }

    #[test]
    fn test_visit_status_transitions() {
        use VisitStatus::*;
        assert!(Planned.can_transition_to(Ongoing));
        assert!(Ongoing.can_transition_to(Completed));
        assert!(Planned.can_transition_to(Cancelled));
        assert!(Ongoing.can_transition_to(Cancelled));
        assert!(Planned.can_transition_to(Planned)); // same-state no-op

        assert!(!Completed.can_transition_to(Planned));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Ongoing));
        assert!(!Planned.can_transition_to(Completed)); // must pass through ongoing
    }
}
