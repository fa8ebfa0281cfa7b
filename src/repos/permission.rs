// SPDX-License-Identifier: MIT

//! Gym-scoped content permissions.
//!
//! Authorship always wins. Beyond that, a viewer needs a role on the
//! item's gym: any role grants edit, but delete is held to owner/admin.
//! Items without a gym are author-only.

use crate::db::{collections, FirestoreDb};
use crate::error::{AppError, Result};
use crate::models::ActivityItem;
use serde::{Deserialize, Serialize};

/// Role a user holds on a gym, ordered by privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GymRole {
    Editor,
    Admin,
    Owner,
}

impl GymRole {
    /// Roles that may delete other users' content on the gym.
    pub fn can_moderate(self) -> bool {
        matches!(self, GymRole::Admin | GymRole::Owner)
    }
}

/// Role grant document, keyed `{user_id}_{gym_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GymAdminDoc {
    pub id: String,
    pub user_id: String,
    pub gym_id: String,
    pub role: GymRole,
}

impl GymAdminDoc {
    pub fn doc_id(user_id: &str, gym_id: &str) -> String {
        format!("{}_{}", user_id, gym_id)
    }

    pub fn new(user_id: &str, gym_id: &str, role: GymRole) -> Self {
        Self {
            id: Self::doc_id(user_id, gym_id),
            user_id: user_id.to_string(),
            gym_id: gym_id.to_string(),
            role,
        }
    }
}

/// Pure edit check, separated from the role lookup for testability.
fn edit_allowed(viewer_id: &str, author_id: &str, role: Option<GymRole>) -> bool {
    viewer_id == author_id || role.is_some()
}

/// Pure delete check. Editor-level roles cannot delete others' content.
fn delete_allowed(viewer_id: &str, author_id: &str, role: Option<GymRole>) -> bool {
    viewer_id == author_id || role.is_some_and(GymRole::can_moderate)
}

/// Role lookups and content-permission checks.
#[derive(Clone)]
pub struct PermissionRepository {
    db: FirestoreDb,
}

impl PermissionRepository {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// The viewer's role on a gym, if any.
    pub async fn role_for(&self, user_id: &str, gym_id: &str) -> Result<Option<GymRole>> {
        let doc: Option<GymAdminDoc> = self
            .db
            .get_doc(
                collections::GYM_ADMINS,
                &GymAdminDoc::doc_id(user_id, gym_id),
            )
            .await?;
        Ok(doc.map(|d| d.role))
    }

    /// Grant or change a user's role on a gym.
    pub async fn grant(&self, user_id: &str, gym_id: &str, role: GymRole) -> Result<()> {
        let doc = GymAdminDoc::new(user_id, gym_id, role);
        self.db
            .upsert(collections::GYM_ADMINS, &doc.id, &doc)
            .await?;
        tracing::info!(user_id, gym_id, ?role, "Gym role granted");
        Ok(())
    }

    /// Revoke a user's role on a gym. Absent grants are a no-op.
    pub async fn revoke(&self, user_id: &str, gym_id: &str) -> Result<()> {
        self.db
            .delete_doc(collections::GYM_ADMINS, &GymAdminDoc::doc_id(user_id, gym_id))
            .await
    }

    /// Whether the viewer may edit an item.
    pub async fn can_edit(&self, viewer_id: Option<&str>, item: &ActivityItem) -> Result<bool> {
        let viewer_id = viewer_id.ok_or(AppError::Unauthenticated)?;
        let role = self.gym_role_for_item(viewer_id, item).await?;
        Ok(edit_allowed(viewer_id, &item.author().id, role))
    }

    /// Whether the viewer may delete an item.
    pub async fn can_delete(&self, viewer_id: Option<&str>, item: &ActivityItem) -> Result<bool> {
        let viewer_id = viewer_id.ok_or(AppError::Unauthenticated)?;
        let role = self.gym_role_for_item(viewer_id, item).await?;
        Ok(delete_allowed(viewer_id, &item.author().id, role))
    }

    async fn gym_role_for_item(
        &self,
        viewer_id: &str,
        item: &ActivityItem,
    ) -> Result<Option<GymRole>> {
        match item.gym() {
            Some(gym) => self.role_for(viewer_id, &gym.id).await,
            None => Ok(None),
        }
    }
}
