// SPDX-License-Identifier: MIT

//! Per-gym daily visit rosters.
//!
//! One document per `(gym, calendar day)`, holding the visitor list for
//! that day. At most one record per user; removing the last visitor
//! deletes the document entirely.

use crate::models::{Gym, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One visitor entry in a daily roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitorRecord {
    pub user_id: String,
    #[serde(
        with = "firestore::serialize_as_timestamp",
        default = "chrono::Utc::now"
    )]
    pub visit_time: DateTime<Utc>,
    /// Originating group-visit activity item, when the check-in came
    /// from joining one.
    #[serde(default)]
    pub visit_id: Option<String>,
}

/// Daily roster document, keyed `{gym_id}_{YYYY-MM-DD}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GymVisitDay {
    pub id: String,
    pub gym_id: String,
    /// Calendar-day key ("YYYY-MM-DD"), the query field for "today".
    pub date: String,
    #[serde(default)]
    pub visitors: Vec<VisitorRecord>,
}

impl GymVisitDay {
    /// Deterministic roster document id.
    pub fn doc_id(gym_id: &str, day_key: &str) -> String {
        format!("{}_{}", gym_id, day_key)
    }

    pub fn new(gym_id: &str, day_key: &str) -> Self {
        Self {
            id: Self::doc_id(gym_id, day_key),
            gym_id: gym_id.to_string(),
            date: day_key.to_string(),
            visitors: vec![],
        }
    }

    pub fn has_visitor(&self, user_id: &str) -> bool {
        self.visitors.iter().any(|v| v.user_id == user_id)
    }

    /// Add a visitor. Returns false (unchanged) when already present:
    /// a naive array-union cannot dedup the wrapped record shape, so
    /// membership is checked here.
    pub fn add_visitor(&mut self, record: VisitorRecord) -> bool {
        if self.has_visitor(&record.user_id) {
            return false;
        }
        self.visitors.push(record);
        true
    }

    /// Remove a visitor. Returns true when an entry was removed.
    pub fn remove_visitor(&mut self, user_id: &str) -> bool {
        let before = self.visitors.len();
        self.visitors.retain(|v| v.user_id != user_id);
        self.visitors.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty()
    }
}

/// One gym's worth of "friends visiting today", visitors resolved.
#[derive(Debug, Clone)]
pub struct GymVisitGroup {
    pub gym: Gym,
    pub visitors: Vec<VisitorInfo>,
}

/// Resolved visitor entry for presentation.
#[derive(Debug, Clone)]
pub struct VisitorInfo {
    pub user: User,
    pub visit_time: DateTime<Utc>,
}
