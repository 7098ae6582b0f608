// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation state store trait.

use async_trait::async_trait;

use crate::error::ZelaError;
use crate::types::{ConversationState, DraftKind, StatePatch};

/// Per-sender conversation state, keyed by normalized phone number.
///
/// Operations for different phones may run concurrently; operations for the
/// same phone must be atomic read-modify-write on that key (last write wins,
/// never partial corruption). The store does not assume the transport
/// serializes same-phone deliveries, even though it normally does.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Loads the record for a phone, if present and not expired.
    async fn get(&self, phone: &str) -> Result<Option<ConversationState>, ZelaError>;

    /// Merges a patch into the record for a phone, creating it when absent.
    ///
    /// Unset patch fields are preserved from the existing record;
    /// `last_interaction_at` is always refreshed and `message_count`
    /// incremented. Creating a fresh record requires `patch.identity`.
    async fn upsert(
        &self,
        phone: &str,
        patch: StatePatch,
    ) -> Result<ConversationState, ZelaError>;

    /// Removes the pending draft of the given kind, leaving identity fields
    /// untouched. A mismatched or absent draft is a no-op.
    async fn clear_pending(&self, phone: &str, kind: DraftKind) -> Result<(), ZelaError>;

    /// Drops the whole record for a phone.
    async fn remove(&self, phone: &str) -> Result<(), ZelaError>;
}
