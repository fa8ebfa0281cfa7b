// SPDX-License-Identifier: MIT

//! Feed composition over the repositories.
//!
//! The following feed is the author-set query "everyone I follow, plus
//! myself". Self-inclusion means a user who follows nobody still sees
//! their own items.

use crate::error::Result;
use crate::models::{ActivityItem, GymVisitGroup, Page};
use crate::repos::{ActivityRepository, GymVisitRepository, RelationshipRepository};

/// Read-side composition of follow graph, activities, and visit
/// rosters.
#[derive(Clone)]
pub struct FeedComposer {
    activities: ActivityRepository,
    relationships: RelationshipRepository,
    visits: GymVisitRepository,
}

impl FeedComposer {
    pub fn new(
        activities: ActivityRepository,
        relationships: RelationshipRepository,
        visits: GymVisitRepository,
    ) -> Self {
        Self {
            activities,
            relationships,
            visits,
        }
    }

    /// Follow-set ∪ self, newest first.
    pub async fn following_feed(&self, user_id: &str) -> Result<Vec<ActivityItem>> {
        let authors = self.feed_authors(user_id).await?;
        self.activities.fetch_by_authors(&authors).await
    }

    /// Paginated following feed with the lookahead contract.
    pub async fn following_feed_page(
        &self,
        user_id: &str,
        page_size: usize,
        cursor: Option<&str>,
    ) -> Result<Page<ActivityItem>> {
        let authors = self.feed_authors(user_id).await?;
        self.activities
            .fetch_page_by_authors(&authors, page_size, cursor)
            .await
    }

    /// Gyms where friends checked in today, busiest first.
    pub async fn friends_visits_today(&self, user_id: &str) -> Result<Vec<GymVisitGroup>> {
        let following = self.relationships.get_following_ids(user_id).await?;
        let today = crate::time_utils::day_key(chrono::Utc::now());
        self.visits.friends_visiting(&today, &following).await
    }

    /// The caller's feed author set: everyone they follow plus
    /// themselves.
    async fn feed_authors(&self, user_id: &str) -> Result<Vec<String>> {
        let following = self.relationships.get_following_ids(user_id).await?;
        let mut authors: Vec<String> = following.iter().cloned().collect();
        if !authors.iter().any(|id| id == user_id) {
            authors.push(user_id.to_string());
        }
        Ok(authors)
    }
}
