// SPDX-License-Identifier: MIT

//! Data models and the document codec.

pub mod activity;
pub mod comment;
pub mod conversation;
pub mod gym;
pub mod notification;
pub mod page;
pub mod relationship;
pub mod user;
pub mod visit;

pub use activity::{
    ActivityDoc, ActivityItem, ActivityKind, BasicPost, BetaPost, EventPost, GroupVisit,
    VisitStatus,
};
pub use comment::{Comment, CommentDoc};
pub use conversation::{Conversation, Message};
pub use gym::{ClimbingType, Gym};
pub use notification::{Notification, NotificationKind};
pub use page::{Page, PageCursor};
pub use relationship::UserRelationship;
pub use user::User;
pub use visit::{GymVisitDay, GymVisitGroup, VisitorInfo, VisitorRecord};
