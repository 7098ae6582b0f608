// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The message orchestrator: one call per inbound WhatsApp message.
//!
//! Sequencing is strict: identity gate, state load, stored-identity
//! re-validation, pending-confirmation routing, then intent dispatch. Any
//! failure escaping those steps is contained at this boundary and turned
//! into a generic retry reply -- the pipeline never crashes on one message.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Offset, TimeDelta, Utc};
use tracing::{debug, error, info, warn};

use zela_config::model::ZelaConfig;
use zela_core::types::{
    ConversationState, EngineAction, Identity, ProcessedMessage, StatePatch, TransactionKind,
};
use zela_core::{Directory, Ledger, StateStore, ZelaError};
use zela_identity::{IdentityResolver, Resolution};
use zela_intent::{extract_date, Intent, IntentClassifier};

use crate::confirm::{ConfirmationFlow, FlowReply};
use crate::report;
use crate::reply;

/// Engine settings derived from configuration.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Default country code for phone normalization.
    pub country_code: String,
    /// Offset of the household's local clock from UTC, in whole hours.
    pub utc_offset_hours: i32,
    /// Minimum hours between cosmetic joke lines per conversation.
    pub joke_cooldown_hours: u64,
}

impl EngineOptions {
    pub fn from_config(config: &ZelaConfig) -> Self {
        Self {
            country_code: config.locale.country_code.clone(),
            utc_offset_hours: config.locale.utc_offset_hours,
            joke_cooldown_hours: config.conversation.joke_cooldown_hours,
        }
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from_config(&ZelaConfig::default())
    }
}

/// Entry point invoked once per inbound message.
pub struct MessageOrchestrator {
    resolver: IdentityResolver,
    classifier: IntentClassifier,
    store: Arc<dyn StateStore>,
    ledger: Arc<dyn Ledger>,
    flow: ConfirmationFlow,
    local_offset: FixedOffset,
    joke_cooldown: TimeDelta,
}

impl MessageOrchestrator {
    pub fn new(
        directory: Arc<dyn Directory>,
        ledger: Arc<dyn Ledger>,
        store: Arc<dyn StateStore>,
        options: EngineOptions,
    ) -> Self {
        // Config validation bounds the offset; an out-of-range value from a
        // hand-built EngineOptions falls back to UTC.
        let local_offset =
            FixedOffset::east_opt(options.utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix());
        Self {
            resolver: IdentityResolver::new(directory, options.country_code.clone()),
            classifier: IntentClassifier::new(),
            store: store.clone(),
            ledger: ledger.clone(),
            flow: ConfirmationFlow::new(store, ledger, local_offset),
            local_offset,
            joke_cooldown: TimeDelta::hours(options.joke_cooldown_hours as i64),
        }
    }

    /// Process one inbound message and compute the response to send.
    ///
    /// Never returns an error: unexpected failures become the generic
    /// retry-later reply.
    pub async fn process(&self, phone: &str, text: &str) -> ProcessedMessage {
        match self.process_inner(phone, text).await {
            Ok(processed) => processed,
            Err(e) => {
                error!(error = %e, "message processing failed at orchestrator boundary");
                ProcessedMessage {
                    response: reply::MSG_RETRY_LATER.to_string(),
                    requires_confirmation: false,
                    action: EngineAction::Errored,
                }
            }
        }
    }

    async fn process_inner(
        &self,
        phone: &str,
        text: &str,
    ) -> Result<ProcessedMessage, ZelaError> {
        // 1-2. Identity gate. Unknown senders and suspended households get a
        // static reply and nothing else happens -- no state is touched.
        let identity = match self.resolver.resolve(phone).await? {
            Resolution::Member(identity) => identity,
            Resolution::Unknown => {
                debug!(phone, "unknown sender rejected");
                return Ok(ProcessedMessage {
                    response: reply::MSG_UNREGISTERED.to_string(),
                    requires_confirmation: false,
                    action: EngineAction::Unregistered,
                });
            }
            Resolution::SuspendedHousehold => {
                debug!(phone, "suspended household rejected");
                return Ok(ProcessedMessage {
                    response: reply::MSG_SUSPENDED.to_string(),
                    requires_confirmation: false,
                    action: EngineAction::Suspended,
                });
            }
        };

        let key = self
            .resolver
            .normalize(phone)
            .unwrap_or_else(|| phone.to_string());

        // 3-4. Load or initialize conversation state. Store trouble degrades
        // to stateless processing instead of failing the message.
        let state = match self.load_state(&key, &identity).await? {
            LoadedState::Ready(state) => state,
            LoadedState::IdentityMismatch => {
                // The account behind this phone changed since the last
                // message; stored state is not trusted.
                return Ok(ProcessedMessage {
                    response: reply::MSG_UNREGISTERED.to_string(),
                    requires_confirmation: false,
                    action: EngineAction::Unregistered,
                });
            }
        };

        // 5. While a confirmation is pending, the raw text goes to the flow's
        // reply handler; intent classification is skipped entirely.
        if state.awaiting().is_some() {
            let flow_reply = self.flow.handle_reply(&state, text, Utc::now()).await?;
            return Ok(self.finish(&state, flow_reply).await);
        }

        // 6. Classify and dispatch.
        let classified = self.classifier.classify(text);
        debug!(
            phone = key.as_str(),
            intent = ?classified.intent,
            confidence = classified.confidence,
            "intent classified"
        );

        let flow_reply = match classified.intent {
            Intent::Expense(fields) => {
                let occurred_at = self.stated_instant(text).unwrap_or_else(Utc::now);
                self.flow
                    .begin_transaction(&state, TransactionKind::Expense, fields, occurred_at)
                    .await?
            }
            Intent::Income(fields) => {
                let occurred_at = self.stated_instant(text).unwrap_or_else(Utc::now);
                self.flow
                    .begin_transaction(&state, TransactionKind::Income, fields, occurred_at)
                    .await?
            }
            Intent::Appointment(fields) => {
                let starts_at = self.stated_instant(text);
                self.flow.begin_appointment(&state, fields, starts_at).await?
            }
            Intent::Report => {
                let response = report::generate(self.ledger.as_ref(), &state, self.local_offset)
                    .await?;
                info!(phone = key.as_str(), "monthly summary generated");
                FlowReply {
                    response,
                    requires_confirmation: false,
                    action: EngineAction::ReportSent,
                }
            }
            // A bare confirm/cancel/edit with no pending draft is a defined
            // terminal branch, not the generic fallback.
            Intent::Confirm | Intent::Cancel | Intent::Edit => FlowReply {
                response: reply::MSG_NOTHING_PENDING.to_string(),
                requires_confirmation: false,
                action: EngineAction::NothingPending,
            },
            Intent::Other => FlowReply {
                response: reply::MSG_GREETING.to_string(),
                requires_confirmation: false,
                action: EngineAction::Greeted,
            },
        };

        Ok(self.finish(&state, flow_reply).await)
    }

    /// Load the record for `key`, seeding a fresh one when absent.
    ///
    /// Returns `IdentityMismatch` when the stored identity disagrees with the
    /// freshly resolved one. Read/write failures on the store are non-fatal:
    /// processing continues with an ephemeral record.
    async fn load_state(
        &self,
        key: &str,
        identity: &Identity,
    ) -> Result<LoadedState, ZelaError> {
        let existing = match self.store.get(key).await {
            Ok(existing) => existing,
            Err(e) => {
                warn!(error = %e, "state store read failed, degrading to stateless");
                return Ok(LoadedState::Ready(Self::ephemeral(key, identity)));
            }
        };

        match existing {
            Some(stored) => {
                if stored.member_id != identity.member_id
                    || stored.household_id != identity.household_id
                {
                    warn!(
                        phone = key,
                        stored_member = stored.member_id.as_str(),
                        resolved_member = identity.member_id.as_str(),
                        "stored identity mismatch, dropping record"
                    );
                    let _ = self.store.remove(key).await;
                    return Ok(LoadedState::IdentityMismatch);
                }
                // Refresh last-interaction on every message.
                match self.store.upsert(key, StatePatch::touch()).await {
                    Ok(refreshed) => Ok(LoadedState::Ready(refreshed)),
                    Err(e) => {
                        warn!(error = %e, "state refresh failed, continuing with stale record");
                        Ok(LoadedState::Ready(stored))
                    }
                }
            }
            None => match self.store.upsert(key, StatePatch::seed(identity.clone())).await {
                Ok(seeded) => Ok(LoadedState::Ready(seeded)),
                Err(e) => {
                    warn!(error = %e, "state seed failed, degrading to stateless");
                    Ok(LoadedState::Ready(Self::ephemeral(key, identity)))
                }
            },
        }
    }

    /// Record used when the state store is unavailable: no pending-draft
    /// continuity, but the message still gets a response.
    fn ephemeral(key: &str, identity: &Identity) -> ConversationState {
        let now = Utc::now();
        ConversationState {
            phone: key.to_string(),
            member_id: identity.member_id.clone(),
            household_id: identity.household_id.clone(),
            started_at: now,
            last_interaction_at: now,
            message_count: 1,
            pending: None,
            last_joke_at: None,
        }
    }

    /// Instant stated in the message text, if any, in the household clock.
    fn stated_instant(&self, text: &str) -> Option<DateTime<Utc>> {
        let reference = Utc::now().with_timezone(&self.local_offset);
        extract_date(text, reference).map(|extracted| extracted.instant(self.local_offset))
    }

    /// Append the throttled joke line to commit acknowledgments.
    async fn finish(&self, state: &ConversationState, flow_reply: FlowReply) -> ProcessedMessage {
        let mut response = flow_reply.response;

        if matches!(flow_reply.action, EngineAction::Committed(_)) && self.joke_due(state) {
            response.push_str("\n\n");
            response.push_str(reply::pick_joke(state.message_count));
            let patch = StatePatch {
                last_joke_at: Some(Utc::now()),
                ..StatePatch::default()
            };
            if let Err(e) = self.store.upsert(&state.phone, patch).await {
                debug!(error = %e, "joke throttle update failed");
            }
        }

        ProcessedMessage {
            response,
            requires_confirmation: flow_reply.requires_confirmation,
            action: flow_reply.action,
        }
    }

    fn joke_due(&self, state: &ConversationState) -> bool {
        match state.last_joke_at {
            None => true,
            Some(last) => Utc::now() - last >= self.joke_cooldown,
        }
    }
}

/// Outcome of loading conversation state for a resolved sender.
enum LoadedState {
    Ready(ConversationState),
    IdentityMismatch,
}
