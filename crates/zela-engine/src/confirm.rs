// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The confirmation flow state machine.
//!
//! States per sender: no draft, or awaiting confirmation of exactly one
//! draft. A draft reaches durable storage only through the confirm
//! transition; every other transition is side-effect-free with respect to
//! persisted data.
//!
//! Commit-time rules: category labels resolve to household category ids here
//! (a miss degrades silently to uncategorized), and appointments strictly in
//! the past are refused.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use tracing::{debug, info, warn};

use zela_core::types::{
    AppointmentDraft, ConversationState, Draft, DraftKind, EngineAction, StatePatch,
    TransactionDraft, TransactionKind,
};
use zela_core::{Ledger, StateStore, ZelaError};
use zela_intent::{parse_command, AppointmentFields, Command, TransactionFields};

use crate::reply;

/// Outcome of one confirmation-flow transition.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowReply {
    pub response: String,
    pub requires_confirmation: bool,
    pub action: EngineAction,
}

/// Drives draft creation, confirmation prompts, and commits.
pub struct ConfirmationFlow {
    store: Arc<dyn StateStore>,
    ledger: Arc<dyn Ledger>,
    local_offset: FixedOffset,
}

impl ConfirmationFlow {
    pub fn new(
        store: Arc<dyn StateStore>,
        ledger: Arc<dyn Ledger>,
        local_offset: FixedOffset,
    ) -> Self {
        Self {
            store,
            ledger,
            local_offset,
        }
    }

    /// `NoDraft -> AwaitingConfirmation(transaction)`.
    ///
    /// Without a usable amount no draft is created; the user is asked to
    /// resend with a value.
    pub async fn begin_transaction(
        &self,
        state: &ConversationState,
        kind: TransactionKind,
        fields: TransactionFields,
        occurred_at: DateTime<Utc>,
    ) -> Result<FlowReply, ZelaError> {
        let Some(amount) = fields.amount.filter(|a| *a > 0.0) else {
            return Ok(FlowReply {
                response: reply::MSG_ASK_AMOUNT.to_string(),
                requires_confirmation: false,
                action: EngineAction::AmountRequired,
            });
        };

        let draft = TransactionDraft {
            amount,
            kind,
            category: fields.category,
            description: fields.description,
            occurred_at,
            idempotency_key: uuid::Uuid::new_v4().to_string(),
        };

        // A fresh classified intent overwrites any same-kind leftover draft.
        self.store
            .upsert(&state.phone, StatePatch::draft(Draft::Transaction(draft.clone())))
            .await?;

        debug!(
            phone = state.phone.as_str(),
            amount = draft.amount,
            kind = %draft.kind,
            "transaction draft pending confirmation"
        );

        Ok(FlowReply {
            response: reply::transaction_prompt(&draft, self.local_offset),
            requires_confirmation: true,
            action: EngineAction::DraftCreated(DraftKind::Transaction),
        })
    }

    /// `NoDraft -> AwaitingConfirmation(appointment)`, or a date prompt when
    /// no resolvable date was stated (a half-formed draft is never stored).
    pub async fn begin_appointment(
        &self,
        state: &ConversationState,
        fields: AppointmentFields,
        starts_at: Option<DateTime<Utc>>,
    ) -> Result<FlowReply, ZelaError> {
        let Some(starts_at) = starts_at else {
            return Ok(FlowReply {
                response: reply::MSG_ASK_DATE.to_string(),
                requires_confirmation: false,
                action: EngineAction::DateRequired,
            });
        };

        let draft = AppointmentDraft {
            title: fields.title.unwrap_or_else(|| "Compromisso".to_string()),
            starts_at,
            description: None,
            location: None,
            idempotency_key: uuid::Uuid::new_v4().to_string(),
        };

        self.store
            .upsert(&state.phone, StatePatch::draft(Draft::Appointment(draft.clone())))
            .await?;

        debug!(
            phone = state.phone.as_str(),
            title = draft.title.as_str(),
            "appointment draft pending confirmation"
        );

        Ok(FlowReply {
            response: reply::appointment_prompt(&draft, self.local_offset),
            requires_confirmation: true,
            action: EngineAction::DraftCreated(DraftKind::Appointment),
        })
    }

    /// `AwaitingConfirmation(kind)` reply handler.
    ///
    /// Recognized commands transition to no-draft; anything else leaves the
    /// state untouched and re-prompts with the same three-way choice -- an
    /// ambiguous reply is never treated as a new intent.
    pub async fn handle_reply(
        &self,
        state: &ConversationState,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<FlowReply, ZelaError> {
        let Some(draft) = state.pending.clone() else {
            // Callers only route here with a pending draft; degrade gracefully.
            return Ok(FlowReply {
                response: reply::MSG_NOTHING_PENDING.to_string(),
                requires_confirmation: false,
                action: EngineAction::NothingPending,
            });
        };
        let kind = draft.kind();

        match parse_command(text) {
            Some(Command::Confirm) => self.commit(state, draft, now).await,
            Some(Command::Cancel) => {
                self.store.clear_pending(&state.phone, kind).await?;
                Ok(FlowReply {
                    response: reply::cancelled(kind),
                    requires_confirmation: false,
                    action: EngineAction::Cancelled(kind),
                })
            }
            Some(Command::Edit) => {
                // No partial-field editing: the draft is discarded wholesale.
                self.store.clear_pending(&state.phone, kind).await?;
                Ok(FlowReply {
                    response: reply::edit_requested(kind),
                    requires_confirmation: false,
                    action: EngineAction::EditRequested(kind),
                })
            }
            None => Ok(FlowReply {
                response: reply::reprompt(kind),
                requires_confirmation: true,
                action: EngineAction::Reprompted(kind),
            }),
        }
    }

    /// The only path from a draft to durable storage.
    async fn commit(
        &self,
        state: &ConversationState,
        draft: Draft,
        now: DateTime<Utc>,
    ) -> Result<FlowReply, ZelaError> {
        match draft {
            Draft::Transaction(tx) => self.commit_transaction(state, tx).await,
            Draft::Appointment(ap) => self.commit_appointment(state, ap, now).await,
        }
    }

    async fn commit_transaction(
        &self,
        state: &ConversationState,
        mut draft: TransactionDraft,
    ) -> Result<FlowReply, ZelaError> {
        // Resolve the free-text category label to a household category id at
        // commit time. A miss or a lookup failure degrades to uncategorized
        // rather than failing the commit.
        if let Some(label) = draft.category.take() {
            match self
                .ledger
                .resolve_category(&state.household_id, &label)
                .await
            {
                Ok(resolved) => draft.category = resolved,
                Err(e) => {
                    warn!(error = %e, label = label.as_str(), "category resolution failed, committing uncategorized");
                }
            }
        }

        let committed = self
            .ledger
            .commit_transaction(&state.household_id, &state.member_id, &draft)
            .await;

        // Pending state is cleared on either outcome: a redelivered
        // "confirmar" must land on "nothing pending" instead of
        // double-committing.
        self.store
            .clear_pending(&state.phone, DraftKind::Transaction)
            .await?;

        match committed {
            Ok(id) => {
                info!(
                    phone = state.phone.as_str(),
                    commit_id = id.0.as_str(),
                    amount = draft.amount,
                    kind = %draft.kind,
                    "transaction committed"
                );
                Ok(FlowReply {
                    response: reply::transaction_committed(&draft),
                    requires_confirmation: false,
                    action: EngineAction::Committed(DraftKind::Transaction),
                })
            }
            Err(e) => {
                warn!(error = %e, phone = state.phone.as_str(), "transaction commit failed");
                Ok(FlowReply {
                    response: reply::MSG_SAVE_FAILED.to_string(),
                    requires_confirmation: false,
                    action: EngineAction::CommitRefused(DraftKind::Transaction),
                })
            }
        }
    }

    async fn commit_appointment(
        &self,
        state: &ConversationState,
        draft: AppointmentDraft,
        now: DateTime<Utc>,
    ) -> Result<FlowReply, ZelaError> {
        // Appointments may not be backdated. Refuse before touching the
        // ledger; the pending state is still cleared.
        if draft.starts_at < now {
            self.store
                .clear_pending(&state.phone, DraftKind::Appointment)
                .await?;
            debug!(
                phone = state.phone.as_str(),
                starts_at = %draft.starts_at,
                "refused backdated appointment"
            );
            return Ok(FlowReply {
                response: reply::MSG_PAST_APPOINTMENT.to_string(),
                requires_confirmation: false,
                action: EngineAction::CommitRefused(DraftKind::Appointment),
            });
        }

        let committed = self
            .ledger
            .commit_appointment(&state.household_id, &state.member_id, &draft)
            .await;

        self.store
            .clear_pending(&state.phone, DraftKind::Appointment)
            .await?;

        match committed {
            Ok(id) => {
                info!(
                    phone = state.phone.as_str(),
                    commit_id = id.0.as_str(),
                    title = draft.title.as_str(),
                    "appointment committed"
                );
                Ok(FlowReply {
                    response: reply::appointment_committed(&draft, self.local_offset),
                    requires_confirmation: false,
                    action: EngineAction::Committed(DraftKind::Appointment),
                })
            }
            Err(e) => {
                warn!(error = %e, phone = state.phone.as_str(), "appointment commit failed");
                Ok(FlowReply {
                    response: reply::MSG_SAVE_FAILED.to_string(),
                    requires_confirmation: false,
                    action: EngineAction::CommitRefused(DraftKind::Appointment),
                })
            }
        }
    }
}
