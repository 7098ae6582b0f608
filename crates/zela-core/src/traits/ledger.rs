// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ledger trait: the only write path to durable storage.

use async_trait::async_trait;

use crate::error::ZelaError;
use crate::types::{AppointmentDraft, CommitId, LedgerSummary, TransactionDraft};

/// Persistence collaborator for confirmed drafts plus the read path used by
/// report requests.
///
/// Implementations must fail fast on backend trouble; the engine performs no
/// internal retries (redelivery belongs to the transport layer).
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Persists a confirmed transaction and returns its committed id.
    async fn commit_transaction(
        &self,
        household_id: &str,
        member_id: &str,
        draft: &TransactionDraft,
    ) -> Result<CommitId, ZelaError>;

    /// Persists a confirmed appointment and returns its committed id.
    async fn commit_appointment(
        &self,
        household_id: &str,
        member_id: &str,
        draft: &AppointmentDraft,
    ) -> Result<CommitId, ZelaError>;

    /// Resolves a free-text category label to a household category id.
    ///
    /// A miss is `Ok(None)`, never an error: unresolvable labels degrade to
    /// uncategorized at commit time.
    async fn resolve_category(
        &self,
        household_id: &str,
        label: &str,
    ) -> Result<Option<String>, ZelaError>;

    /// Produces the current-month summary used by report intents.
    async fn monthly_summary(
        &self,
        household_id: &str,
        member_id: &str,
    ) -> Result<LedgerSummary, ZelaError>;
}
