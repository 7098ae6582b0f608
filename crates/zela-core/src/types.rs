// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Zela workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier returned by the ledger for a committed record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitId(pub String);

/// Health status reported by collaborator health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Collaborator is fully operational.
    Healthy,
    /// Collaborator is operational but experiencing issues.
    Degraded(String),
    /// Collaborator is not operational.
    Unhealthy(String),
}

/// Role of a member within a household.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Adult,
    Teen,
}

/// Resolved identity for a phone number.
///
/// Resolved fresh on every inbound message so that member removal or
/// household suspension takes effect immediately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub member_id: String,
    pub household_id: String,
    pub role: MemberRole,
    /// Whether the member account is active.
    pub active: bool,
    /// Whether the owning household subscription is active.
    pub household_active: bool,
}

/// Direction of a financial transaction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TransactionKind {
    Expense,
    Income,
}

impl TransactionKind {
    /// Portuguese label used in user-facing confirmation prompts.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Expense => "despesa",
            TransactionKind::Income => "receita",
        }
    }
}

/// An unpersisted financial transaction awaiting user confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    /// Positive amount in the household currency.
    pub amount: f64,
    pub kind: TransactionKind,
    /// Free-text category label; resolved to a household category id at commit time.
    pub category: Option<String>,
    pub description: Option<String>,
    pub occurred_at: DateTime<Utc>,
    /// Dedupe key minted at draft creation so a redelivered commit is detectable.
    pub idempotency_key: String,
}

/// An unpersisted appointment awaiting user confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentDraft {
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Dedupe key minted at draft creation so a redelivered commit is detectable.
    pub idempotency_key: String,
}

/// Kind discriminant for a pending draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum DraftKind {
    Transaction,
    Appointment,
}

/// The pending draft held in conversation state.
///
/// At most one draft is outstanding per sender; the awaiting-confirmation
/// marker is derived from which variant is present, never tracked separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Draft {
    Transaction(TransactionDraft),
    Appointment(AppointmentDraft),
}

impl Draft {
    /// Returns the kind discriminant for this draft.
    pub fn kind(&self) -> DraftKind {
        match self {
            Draft::Transaction(_) => DraftKind::Transaction,
            Draft::Appointment(_) => DraftKind::Appointment,
        }
    }
}

/// Per-sender conversation state, keyed by normalized phone number.
///
/// Ephemeral: expires after an absolute window, and the pending draft alone
/// is cleared after a shorter inactivity window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub phone: String,
    pub member_id: String,
    pub household_id: String,
    /// When this conversation record was first created (absolute TTL anchor).
    pub started_at: DateTime<Utc>,
    /// Refreshed on every write.
    pub last_interaction_at: DateTime<Utc>,
    /// Incremented on every write.
    pub message_count: u64,
    pub pending: Option<Draft>,
    /// Throttle anchor for the cosmetic joke line; not core to correctness.
    pub last_joke_at: Option<DateTime<Utc>>,
}

impl ConversationState {
    /// Which draft kind, if any, is awaiting confirmation.
    ///
    /// Derived from the pending draft so the marker can never disagree
    /// with the payload.
    pub fn awaiting(&self) -> Option<DraftKind> {
        self.pending.as_ref().map(Draft::kind)
    }
}

/// Partial update applied to a conversation record with merge-and-refresh
/// semantics: unset fields are preserved, `last_interaction_at` is always
/// refreshed and `message_count` incremented.
#[derive(Debug, Clone, Default)]
pub struct StatePatch {
    /// Seeds or re-pins the resolved identity fields.
    pub identity: Option<Identity>,
    /// Replaces the pending draft (a new draft always overwrites, never merges).
    pub pending: Option<Draft>,
    pub last_joke_at: Option<DateTime<Utc>>,
}

impl StatePatch {
    /// A patch that only refreshes `last_interaction_at` and the counter.
    pub fn touch() -> Self {
        Self::default()
    }

    /// A patch that seeds the resolved identity.
    pub fn seed(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            ..Self::default()
        }
    }

    /// A patch that stores a new pending draft.
    pub fn draft(draft: Draft) -> Self {
        Self {
            pending: Some(draft),
            ..Self::default()
        }
    }
}

/// Per-category expense total within a summary period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub name: String,
    pub total: f64,
}

/// A scheduled appointment included in a summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpcomingAppointment {
    pub title: String,
    pub starts_at: DateTime<Utc>,
}

/// Read-only monthly summary produced by the ledger for report requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Period label, e.g. `2026-08`.
    pub period: String,
    pub income_total: f64,
    pub expense_total: f64,
    /// Expense totals by category, largest first.
    pub by_category: Vec<CategoryTotal>,
    pub upcoming: Vec<UpcomingAppointment>,
}

/// What the engine did with an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineAction {
    /// Sender phone did not resolve to any active member or household.
    Unregistered,
    /// Sender resolved but the household subscription is suspended.
    Suspended,
    /// A new draft was stored and a confirmation prompt rendered.
    DraftCreated(DraftKind),
    /// The pending draft was committed through the ledger.
    Committed(DraftKind),
    /// The pending draft was discarded on user request.
    Cancelled(DraftKind),
    /// The pending draft was discarded and corrected input requested.
    EditRequested(DraftKind),
    /// An ambiguous reply left the pending draft untouched.
    Reprompted(DraftKind),
    /// Commit was refused or failed; pending state was cleared.
    CommitRefused(DraftKind),
    /// A read-only summary was generated.
    ReportSent,
    /// Capability-listing greeting for unclassifiable input.
    Greeted,
    /// Confirm/cancel/edit arrived with no draft pending.
    NothingPending,
    /// An appointment intent lacked a resolvable date; no state created.
    DateRequired,
    /// An expense/income intent lacked a usable amount; no state created.
    AmountRequired,
    /// An unexpected failure was converted into the generic retry reply.
    Errored,
}

/// Result of processing one inbound message.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedMessage {
    /// Response text to hand to the outbound transport.
    pub response: String,
    /// Whether the engine is now waiting on a confirm/edit/cancel reply.
    pub requires_confirmation: bool,
    pub action: EngineAction,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transaction_draft() -> TransactionDraft {
        TransactionDraft {
            amount: 50.0,
            kind: TransactionKind::Expense,
            category: Some("alimentação".into()),
            description: Some("restaurante".into()),
            occurred_at: Utc::now(),
            idempotency_key: "tx-key".into(),
        }
    }

    #[test]
    fn awaiting_is_derived_from_pending_variant() {
        let mut state = ConversationState {
            phone: "5511999990000".into(),
            member_id: "m1".into(),
            household_id: "h1".into(),
            started_at: Utc::now(),
            last_interaction_at: Utc::now(),
            message_count: 0,
            pending: None,
            last_joke_at: None,
        };
        assert_eq!(state.awaiting(), None);

        state.pending = Some(Draft::Transaction(transaction_draft()));
        assert_eq!(state.awaiting(), Some(DraftKind::Transaction));

        state.pending = Some(Draft::Appointment(AppointmentDraft {
            title: "reunião".into(),
            starts_at: Utc::now(),
            description: None,
            location: None,
            idempotency_key: "ap-key".into(),
        }));
        assert_eq!(state.awaiting(), Some(DraftKind::Appointment));
    }

    #[test]
    fn transaction_kind_labels() {
        assert_eq!(TransactionKind::Expense.label(), "despesa");
        assert_eq!(TransactionKind::Income.label(), "receita");
    }

    #[test]
    fn draft_kind_display() {
        assert_eq!(DraftKind::Transaction.to_string(), "transaction");
        assert_eq!(DraftKind::Appointment.to_string(), "appointment");
    }

    #[test]
    fn member_role_serde_round_trip() {
        let json = serde_json::to_string(&MemberRole::Owner).unwrap();
        assert_eq!(json, "\"owner\"");
        let parsed: MemberRole = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MemberRole::Owner);
    }

    #[test]
    fn state_patch_constructors() {
        let touch = StatePatch::touch();
        assert!(touch.identity.is_none());
        assert!(touch.pending.is_none());

        let draft = StatePatch::draft(Draft::Transaction(transaction_draft()));
        assert!(draft.pending.is_some());
        assert!(draft.identity.is_none());
    }
}
