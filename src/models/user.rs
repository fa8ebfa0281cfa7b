// SPDX-License-Identifier: MIT

//! User profile model for storage and resolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User profile stored in Firestore.
///
/// `post_count` is a denormalized counter maintained by the activity
/// repository on post create/delete. It is never recomputed from a scan
/// and may drift under concurrent writes (advisory cache, clamped at 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User id (also used as document ID)
    pub id: String,
    /// Email address
    pub email: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Short profile bio
    #[serde(default)]
    pub bio: Option<String>,
    /// Denormalized count of authored posts (basic/beta/event)
    #[serde(default)]
    pub post_count: u32,
    /// Total hours logged at gyms
    #[serde(default)]
    pub logged_hours: f64,
    /// Profile picture URL
    #[serde(default)]
    pub image_url: Option<String>,
    /// When the account was created
    #[serde(
        with = "firestore::serialize_as_timestamp",
        default = "chrono::Utc::now"
    )]
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Display name: "First Last".
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Convenience constructor used widely in tests.
#[cfg(test)]
pub(crate) fn test_user(id: &str) -> User {
    use chrono::TimeZone;
    User {
        id: id.to_string(),
        email: format!("{}@example.com", id),
        first_name: "Test".to_string(),
        last_name: id.to_string(),
        bio: None,
        post_count: 0,
        logged_hours: 0.0,
        image_url: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}
