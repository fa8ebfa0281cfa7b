// SPDX-License-Identifier: MIT

//! Gym repository.

use crate::db::firestore::MAX_CONCURRENT_DB_OPS;
use crate::db::{collections, FirestoreDb};
use crate::error::{AppError, Result};
use crate::models::Gym;
use futures_util::{stream, StreamExt};
use std::collections::HashMap;

/// CRUD and batch resolution for gyms. All decoded gyms pass through
/// [`Gym::normalized`] so the legacy location key never escapes this
/// layer.
#[derive(Clone)]
pub struct GymRepository {
    db: FirestoreDb,
}

impl GymRepository {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Get a gym by id. Fails with NotFound if absent.
    pub async fn get(&self, gym_id: &str) -> Result<Gym> {
        self.db
            .get_doc::<Gym>(collections::GYMS, gym_id)
            .await?
            .map(Gym::normalized)
            .ok_or_else(|| AppError::NotFound(format!("gym {}", gym_id)))
    }

    /// Best-effort batch resolution keyed by id, bounded fan-out.
    pub async fn get_many_as_map(&self, gym_ids: &[String]) -> Result<HashMap<String, Gym>> {
        let mut unique: Vec<String> = Vec::new();
        for id in gym_ids {
            if !unique.contains(id) {
                unique.push(id.clone());
            }
        }

        let db = self.db.clone();
        let fetched: Vec<(String, Result<Option<Gym>>)> = stream::iter(unique)
            .map(|id| {
                let db = db.clone();
                async move {
                    let result = db.get_doc::<Gym>(collections::GYMS, &id).await;
                    (id, result)
                }
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect()
            .await;

        let mut resolved = HashMap::new();
        for (id, result) in fetched {
            match result {
                Ok(Some(gym)) => {
                    resolved.insert(id, gym.normalized());
                }
                Ok(None) => {
                    tracing::warn!(gym_id = %id, "Skipping unresolvable gym in batch");
                }
                Err(e) => {
                    tracing::warn!(gym_id = %id, error = %e, "Skipping gym that failed to resolve");
                }
            }
        }

        Ok(resolved)
    }

    /// Create or update a gym. Always writes the canonical field names.
    pub async fn upsert(&self, gym: &Gym) -> Result<()> {
        self.db.upsert(collections::GYMS, &gym.id, gym).await
    }

    /// All gyms. Small collection; used by discovery screens.
    pub async fn fetch_all(&self) -> Result<Vec<Gym>> {
        let docs = self
            .db
            .client()?
            .fluent()
            .select()
            .from(collections::GYMS)
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let gyms: Vec<Gym> = self.db.decode_docs(collections::GYMS, docs);
        Ok(gyms.into_iter().map(Gym::normalized).collect())
    }
}
