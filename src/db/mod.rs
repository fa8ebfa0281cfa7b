// SPDX-License-Identifier: MIT

//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const GYMS: &str = "gyms";
    pub const ACTIVITIES: &str = "activities";
    /// Per-user like markers, keyed `{item_id}_{user_id}`.
    pub const LIKES: &str = "likes";
    pub const COMMENTS: &str = "comments";
    /// Follow edges, keyed `{follower_id}_{following_id}`.
    pub const RELATIONSHIPS: &str = "relationships";
    /// Per-gym daily rosters, keyed `{gym_id}_{YYYY-MM-DD}`.
    pub const GYM_VISITS: &str = "gym_visits";
    /// Gym admin roles, keyed `{user_id}_{gym_id}`.
    pub const GYM_ADMINS: &str = "gym_admins";
    pub const CONVERSATIONS: &str = "conversations";
    pub const MESSAGES: &str = "messages";
    pub const NOTIFICATIONS: &str = "notifications";
    /// Event registration markers, keyed `{item_id}_{user_id}`.
    pub const EVENT_REGISTRATIONS: &str = "event_registrations";
}
