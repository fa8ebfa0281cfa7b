// SPDX-License-Identifier: MIT

//! One repository per aggregate. Repositories are cheap to clone and
//! share the database handle and caches; cross-aggregate side effects
//! (counters, notifications) go through the owning repository.

pub mod activity;
pub mod comment;
pub mod conversation;
pub mod gym;
pub mod notification;
pub mod permission;
pub mod relationship;
pub mod user;
pub mod visit;

pub use activity::{ActivityRepository, NewEvent, NewVisit};
pub use comment::CommentRepository;
pub use conversation::ConversationRepository;
pub use gym::GymRepository;
pub use notification::NotificationRepository;
pub use permission::{GymAdminDoc, GymRole, PermissionRepository};
pub use relationship::RelationshipRepository;
pub use user::UserRepository;
pub use visit::GymVisitRepository;
