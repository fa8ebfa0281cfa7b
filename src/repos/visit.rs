// SPDX-License-Identifier: MIT

//! Daily gym-visit rosters.
//!
//! Check-ins land in one document per `(gym, calendar day)`. Membership
//! dedup happens in [`GymVisitDay`], and removing the last visitor
//! deletes the roster document instead of leaving an empty shell.

use crate::db::{collections, FirestoreDb};
use crate::error::{AppError, Result};
use crate::models::{GymVisitDay, GymVisitGroup, VisitorInfo, VisitorRecord};
use crate::repos::{GymRepository, UserRepository};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Check-in/check-out and roster queries.
#[derive(Clone)]
pub struct GymVisitRepository {
    db: FirestoreDb,
    users: UserRepository,
    gyms: GymRepository,
}

impl GymVisitRepository {
    pub fn new(db: FirestoreDb, users: UserRepository, gyms: GymRepository) -> Self {
        Self { db, users, gyms }
    }

    /// Check a user into a gym for the day containing `visit_time`.
    /// Idempotent per (gym, day, user). Returns true when the roster
    /// gained an entry.
    pub async fn check_in(
        &self,
        gym_id: &str,
        user_id: &str,
        visit_time: DateTime<Utc>,
        visit_id: Option<&str>,
    ) -> Result<bool> {
        let day_key = crate::time_utils::day_key(visit_time);
        let doc_id = GymVisitDay::doc_id(gym_id, &day_key);

        let mut day = self
            .db
            .get_doc::<GymVisitDay>(collections::GYM_VISITS, &doc_id)
            .await?
            .unwrap_or_else(|| GymVisitDay::new(gym_id, &day_key));

        let added = day.add_visitor(VisitorRecord {
            user_id: user_id.to_string(),
            visit_time,
            visit_id: visit_id.map(str::to_string),
        });
        if !added {
            return Ok(false);
        }

        self.db.upsert(collections::GYM_VISITS, &doc_id, &day).await?;
        tracing::debug!(gym_id, user_id, %day_key, "Checked in");
        Ok(true)
    }

    /// Remove a user's entry from a day's roster. A missing roster or
    /// absent entry is a no-op. The roster document is deleted when it
    /// empties.
    pub async fn remove_visitor(
        &self,
        gym_id: &str,
        day_key: &str,
        user_id: &str,
    ) -> Result<bool> {
        let doc_id = GymVisitDay::doc_id(gym_id, day_key);
        let Some(mut day) = self
            .db
            .get_doc::<GymVisitDay>(collections::GYM_VISITS, &doc_id)
            .await?
        else {
            return Ok(false);
        };

        if !day.remove_visitor(user_id) {
            return Ok(false);
        }

        if day.is_empty() {
            self.db.delete_doc(collections::GYM_VISITS, &doc_id).await?;
        } else {
            self.db.upsert(collections::GYM_VISITS, &doc_id, &day).await?;
        }
        Ok(true)
    }

    /// Resolved visitor list for one gym and day, earliest check-in
    /// first. Unresolvable visitors are dropped.
    pub async fn visitors_for_day(&self, gym_id: &str, day_key: &str) -> Result<Vec<VisitorInfo>> {
        let doc_id = GymVisitDay::doc_id(gym_id, day_key);
        let Some(day) = self
            .db
            .get_doc::<GymVisitDay>(collections::GYM_VISITS, &doc_id)
            .await?
        else {
            return Ok(vec![]);
        };

        Ok(self.resolve_visitors(day.visitors).await?)
    }

    /// All roster documents for a calendar day.
    pub async fn rosters_for_day(&self, day_key: &str) -> Result<Vec<GymVisitDay>> {
        let day = day_key.to_string();
        let docs = self
            .db
            .client()?
            .fluent()
            .select()
            .from(collections::GYM_VISITS)
            .filter(move |q| q.for_all([q.field("date").eq(day.clone())]))
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(self.db.decode_docs(collections::GYM_VISITS, docs))
    }

    /// Rosters for a day filtered to a friend set, grouped per gym with
    /// gyms and visitors resolved. Gyms where no friend checked in are
    /// omitted; a gym that fails to resolve drops its group with a
    /// warning.
    pub async fn friends_visiting(
        &self,
        day_key: &str,
        friend_ids: &[String],
    ) -> Result<Vec<GymVisitGroup>> {
        let friends: HashSet<&str> = friend_ids.iter().map(String::as_str).collect();

        let mut rosters = self.rosters_for_day(day_key).await?;
        for roster in &mut rosters {
            roster
                .visitors
                .retain(|v| friends.contains(v.user_id.as_str()));
        }
        rosters.retain(|r| !r.is_empty());

        let gym_ids: Vec<String> = rosters.iter().map(|r| r.gym_id.clone()).collect();
        let gyms = self.gyms.get_many_as_map(&gym_ids).await?;

        let mut groups = Vec::with_capacity(rosters.len());
        for roster in rosters {
            let Some(gym) = gyms.get(&roster.gym_id).cloned() else {
                tracing::warn!(
                    gym_id = %roster.gym_id,
                    "Dropping visit group with unresolvable gym"
                );
                continue;
            };
            let visitors = self.resolve_visitors(roster.visitors).await?;
            if visitors.is_empty() {
                continue;
            }
            groups.push(GymVisitGroup { gym, visitors });
        }

        // Busiest gyms first.
        groups.sort_by(|a, b| b.visitors.len().cmp(&a.visitors.len()));
        Ok(groups)
    }

    /// Resolve visitor records into presentation entries, earliest
    /// check-in first.
    async fn resolve_visitors(&self, records: Vec<VisitorRecord>) -> Result<Vec<VisitorInfo>> {
        let ids: Vec<String> = records.iter().map(|r| r.user_id.clone()).collect();
        let users = self.users.get_many_as_map(&ids).await?;

        let mut visitors: Vec<VisitorInfo> = records
            .into_iter()
            .filter_map(|record| match users.get(&record.user_id) {
                Some(user) => Some(VisitorInfo {
                    user: user.clone(),
                    visit_time: record.visit_time,
                }),
                None => {
                    tracing::warn!(
                        user_id = %record.user_id,
                        "Dropping roster entry with unresolvable user"
                    );
                    None
                }
            })
            .collect();

        visitors.sort_by_key(|v| v.visit_time);
        Ok(visitors)
    }
}
