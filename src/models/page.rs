// SPDX-License-Identifier: MIT

//! Opaque pagination cursors and the page lookahead contract.
//!
//! A page request fetches `page_size + 1` documents ordered by
//! `(created_at desc, id desc)`. The extra document only signals
//! `has_more`; it is discarded from the result. The cursor encodes the
//! sort key of the last returned document, with the document id as the
//! secondary tiebreak so coarse or colliding timestamps cannot skip or
//! duplicate items across pages.

use crate::error::{AppError, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sort-key position within a paginated fetch sequence.
///
/// Opaque to callers: the encoded form is base64 and carries no
/// stability guarantees beyond one fetch sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageCursor {
    /// Creation time of the last returned document.
    pub created_at: DateTime<Utc>,
    /// Document id tiebreak for identical timestamps.
    pub id: String,
}

impl PageCursor {
    /// Encode to the opaque caller-facing form.
    pub fn encode(&self) -> String {
        // Serializing a two-field struct cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decode a caller-supplied cursor.
    pub fn decode(encoded: &str) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| AppError::InvalidState("invalid pagination cursor".to_string()))?;
        serde_json::from_slice(&bytes)
            .map_err(|_| AppError::InvalidState("invalid pagination cursor".to_string()))
    }
}

/// One page of results plus continuation state.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor for the next page; `None` when `has_more` is false.
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Apply the `page_size + 1` lookahead contract to an ordered batch.
    ///
    /// `items` must already be sorted; `cursor_key` extracts the sort key
    /// of an item for the continuation cursor.
    pub fn from_lookahead<F>(mut items: Vec<T>, page_size: usize, cursor_key: F) -> Self
    where
        F: Fn(&T) -> PageCursor,
    {
        let has_more = items.len() > page_size;
        items.truncate(page_size);

        let next_cursor = if has_more {
            items.last().map(|item| cursor_key(item).encode())
        } else {
            None
        };

        Self {
            items,
            next_cursor,
            has_more,
        }
    }
}
