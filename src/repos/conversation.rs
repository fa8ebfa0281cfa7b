// SPDX-License-Identifier: MIT

//! Direct-message conversations.
//!
//! Conversation ids derive from the sorted participant set, so creation
//! is idempotent by construction. Messages live in a flat collection
//! keyed by conversation id; the conversation document carries a
//! preview of the latest message and advisory per-user unread counts.

use crate::db::{collections, FirestoreDb};
use crate::error::{AppError, Result};
use crate::models::{Conversation, Message};
use chrono::Utc;
use firestore::FirestoreQueryDirection;
use std::collections::HashMap;

/// Conversation and message operations.
#[derive(Clone)]
pub struct ConversationRepository {
    db: FirestoreDb,
}

impl ConversationRepository {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Get or create the conversation for a participant set. Concurrent
    /// calls converge on the derived document id.
    pub async fn create_conversation(&self, participant_ids: Vec<String>) -> Result<Conversation> {
        if participant_ids.len() < 2 {
            return Err(AppError::InvalidState(
                "a conversation needs at least two participants".to_string(),
            ));
        }

        let id = Conversation::derive_id(&participant_ids);
        if let Some(existing) = self
            .db
            .get_doc::<Conversation>(collections::CONVERSATIONS, &id)
            .await?
        {
            return Ok(existing);
        }

        let conversation = Conversation::new(participant_ids);
        self.db
            .upsert(collections::CONVERSATIONS, &conversation.id, &conversation)
            .await?;
        tracing::debug!(conversation_id = %conversation.id, "Conversation created");
        Ok(conversation)
    }

    /// Get a conversation by id. Fails with NotFound if absent.
    pub async fn get_conversation(&self, conversation_id: &str) -> Result<Conversation> {
        self.db
            .get_doc(collections::CONVERSATIONS, conversation_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("conversation {}", conversation_id)))
    }

    /// All conversations a user participates in, most recently active
    /// first.
    pub async fn conversations_for_user(&self, user_id: &str) -> Result<Vec<Conversation>> {
        let user = user_id.to_string();
        let docs = self
            .db
            .client()?
            .fluent()
            .select()
            .from(collections::CONVERSATIONS)
            .filter(move |q| q.for_all([q.field("participant_ids").array_contains(user.clone())]))
            .order_by([("updated_at", FirestoreQueryDirection::Descending)])
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(self.db.decode_docs(collections::CONVERSATIONS, docs))
    }

    /// Send a message. The sender must be a participant. Updates the
    /// conversation preview and bumps every recipient's unread count.
    pub async fn send_message(
        &self,
        conversation_id: &str,
        sender_id: &str,
        content: &str,
    ) -> Result<Message> {
        let mut conversation = self.get_conversation(conversation_id).await?;
        if !conversation.has_participant(sender_id) {
            return Err(AppError::InvalidState(format!(
                "user {} is not a participant of conversation {}",
                sender_id, conversation_id
            )));
        }

        let read_status: HashMap<String, bool> = conversation
            .participant_ids
            .iter()
            .filter(|p| *p != sender_id)
            .map(|p| (p.clone(), false))
            .collect();

        let message = Message {
            id: uuid::Uuid::new_v4().to_string(),
            conversation_id: conversation_id.to_string(),
            sender_id: sender_id.to_string(),
            content: content.to_string(),
            sent_at: Utc::now(),
            read_status,
        };
        self.db
            .upsert(collections::MESSAGES, &message.id, &message)
            .await?;

        conversation.last_message = Some(content.to_string());
        conversation.updated_at = message.sent_at;
        for participant in &conversation.participant_ids {
            if participant != sender_id {
                *conversation
                    .unread_counts
                    .entry(participant.clone())
                    .or_insert(0) += 1;
            }
        }
        self.db
            .upsert(collections::CONVERSATIONS, conversation_id, &conversation)
            .await?;

        Ok(message)
    }

    /// Messages in a conversation, oldest first.
    pub async fn fetch_messages(&self, conversation_id: &str) -> Result<Vec<Message>> {
        let conversation = conversation_id.to_string();
        let docs = self
            .db
            .client()?
            .fluent()
            .select()
            .from(collections::MESSAGES)
            .filter(move |q| q.for_all([q.field("conversation_id").eq(conversation.clone())]))
            .order_by([("sent_at", FirestoreQueryDirection::Ascending)])
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(self.db.decode_docs(collections::MESSAGES, docs))
    }

    /// The caller's unread count for a conversation.
    pub async fn unread_count(&self, conversation_id: &str, user_id: &str) -> Result<u32> {
        let conversation = self.get_conversation(conversation_id).await?;
        Ok(conversation.unread_counts.get(user_id).copied().unwrap_or(0))
    }

    /// Mark every message in a conversation as read by `user_id`, in
    /// atomic batches, then zero the caller's unread count. Returns the
    /// number of messages flipped.
    pub async fn mark_all_read(&self, conversation_id: &str, user_id: &str) -> Result<usize> {
        let mut conversation = self.get_conversation(conversation_id).await?;
        if !conversation.has_participant(user_id) {
            return Err(AppError::InvalidState(format!(
                "user {} is not a participant of conversation {}",
                user_id, conversation_id
            )));
        }

        let messages = self.fetch_messages(conversation_id).await?;
        let mut unread: Vec<Message> = messages
            .into_iter()
            .filter(|m| !m.is_read_by(user_id))
            .collect();
        for message in &mut unread {
            message.read_status.insert(user_id.to_string(), true);
        }

        let client = self.db.client()?;
        for chunk in unread.chunks(crate::db::firestore::BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for message in chunk {
                client
                    .fluent()
                    .update()
                    .in_col(collections::MESSAGES)
                    .document_id(&message.id)
                    .object(message)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!("Failed to add update to transaction: {}", e))
                    })?;
            }

            transaction
                .commit()
                .await
                .map_err(|e| AppError::Database(format!("Failed to commit mark-all-read: {}", e)))?;
        }

        conversation.unread_counts.insert(user_id.to_string(), 0);
        self.db
            .upsert(collections::CONVERSATIONS, conversation_id, &conversation)
            .await?;

        tracing::debug!(
            conversation_id,
            user_id,
            count = unread.len(),
            "Marked conversation read"
        );
        Ok(unread.len())
    }
}
