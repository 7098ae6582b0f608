// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ledger implementation over the backend internal API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use zela_core::types::{
    AppointmentDraft, CommitId, LedgerSummary, TransactionDraft, TransactionKind,
};
use zela_core::{Ledger, ZelaError};

use crate::client::BackendClient;

/// POST body for a confirmed transaction.
#[derive(Debug, Serialize)]
struct TransactionBody<'a> {
    member_id: &'a str,
    amount: f64,
    kind: TransactionKind,
    category_id: Option<&'a str>,
    description: Option<&'a str>,
    occurred_at: DateTime<Utc>,
    idempotency_key: &'a str,
}

/// POST body for a confirmed appointment.
#[derive(Debug, Serialize)]
struct AppointmentBody<'a> {
    member_id: &'a str,
    title: &'a str,
    starts_at: DateTime<Utc>,
    description: Option<&'a str>,
    location: Option<&'a str>,
    idempotency_key: &'a str,
}

/// Reply carrying the committed record id.
#[derive(Debug, Deserialize)]
struct CommittedBody {
    id: String,
}

/// Reply carrying a resolved category id.
#[derive(Debug, Deserialize)]
struct CategoryBody {
    id: String,
}

#[async_trait]
impl Ledger for BackendClient {
    async fn commit_transaction(
        &self,
        household_id: &str,
        member_id: &str,
        draft: &TransactionDraft,
    ) -> Result<CommitId, ZelaError> {
        let body = TransactionBody {
            member_id,
            amount: draft.amount,
            kind: draft.kind,
            category_id: draft.category.as_deref(),
            description: draft.description.as_deref(),
            occurred_at: draft.occurred_at,
            idempotency_key: &draft.idempotency_key,
        };

        let committed: CommittedBody = self
            .post_json(&format!("/households/{household_id}/transactions"), &body)
            .await
            .map_err(|e| ZelaError::Ledger {
                message: "transaction commit failed".into(),
                source: Some(Box::new(e)),
            })?;

        debug!(household_id, commit_id = committed.id.as_str(), "transaction persisted");
        Ok(CommitId(committed.id))
    }

    async fn commit_appointment(
        &self,
        household_id: &str,
        member_id: &str,
        draft: &AppointmentDraft,
    ) -> Result<CommitId, ZelaError> {
        let body = AppointmentBody {
            member_id,
            title: &draft.title,
            starts_at: draft.starts_at,
            description: draft.description.as_deref(),
            location: draft.location.as_deref(),
            idempotency_key: &draft.idempotency_key,
        };

        let committed: CommittedBody = self
            .post_json(&format!("/households/{household_id}/appointments"), &body)
            .await
            .map_err(|e| ZelaError::Ledger {
                message: "appointment commit failed".into(),
                source: Some(Box::new(e)),
            })?;

        debug!(household_id, commit_id = committed.id.as_str(), "appointment persisted");
        Ok(CommitId(committed.id))
    }

    async fn resolve_category(
        &self,
        household_id: &str,
        label: &str,
    ) -> Result<Option<String>, ZelaError> {
        let resolved: Option<CategoryBody> = self
            .get_json(&format!(
                "/households/{household_id}/categories/resolve?label={}",
                urlencode(label)
            ))
            .await
            .map_err(|e| ZelaError::Ledger {
                message: format!("category resolution failed for `{label}`"),
                source: Some(Box::new(e)),
            })?;

        Ok(resolved.map(|c| c.id))
    }

    async fn monthly_summary(
        &self,
        household_id: &str,
        member_id: &str,
    ) -> Result<LedgerSummary, ZelaError> {
        let summary: Option<LedgerSummary> = self
            .get_json(&format!(
                "/households/{household_id}/members/{member_id}/summary"
            ))
            .await
            .map_err(|e| ZelaError::Ledger {
                message: "summary fetch failed".into(),
                source: Some(Box::new(e)),
            })?;

        summary.ok_or_else(|| ZelaError::Ledger {
            message: "summary not available".into(),
            source: None,
        })
    }
}

/// Minimal percent-encoding for a query value.
fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
