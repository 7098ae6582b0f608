// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory implementation of the conversation state store.
//!
//! One record per normalized phone number in a [`DashMap`], so operations on
//! different phones run concurrently while operations on the same phone go
//! through that key's entry lock: read-modify-write under a full record
//! rewrite, last write wins, no partial corruption.
//!
//! Expiry is enforced twice: lazily on every `get`/`upsert`, and by the
//! periodic [`crate::sweeper`] pass.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use zela_config::model::ConversationConfig;
use zela_core::types::{ConversationState, DraftKind, StatePatch};
use zela_core::{StateStore, ZelaError};

/// DashMap-backed conversation state store.
pub struct MemoryStateStore {
    records: DashMap<String, ConversationState>,
    /// Absolute record lifetime, anchored at `started_at`.
    ttl: TimeDelta,
    /// Idle window after which only the pending confirmation is cleared.
    inactivity: TimeDelta,
}

impl MemoryStateStore {
    /// Creates a store with explicit lifetimes.
    pub fn new(ttl: Duration, inactivity: Duration) -> Self {
        Self {
            records: DashMap::new(),
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            inactivity: TimeDelta::from_std(inactivity).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Creates a store from the conversation config section.
    pub fn from_config(config: &ConversationConfig) -> Self {
        Self::new(
            Duration::from_secs(config.ttl_hours * 3600),
            Duration::from_secs(config.inactivity_minutes * 60),
        )
    }

    /// Number of live records (for status surfaces and tests).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn expired(&self, state: &ConversationState, now: DateTime<Utc>) -> bool {
        now - state.started_at >= self.ttl
    }

    fn idle(&self, state: &ConversationState, now: DateTime<Utc>) -> bool {
        now - state.last_interaction_at >= self.inactivity
    }

    /// One sweep pass: drop expired records, clear stale pending
    /// confirmations on idle ones. Returns `(dropped, cleared)`.
    pub fn sweep(&self, now: DateTime<Utc>) -> (usize, usize) {
        let before = self.records.len();
        self.records.retain(|_, state| !self.expired(state, now));
        let dropped = before - self.records.len();

        let mut cleared = 0;
        for mut entry in self.records.iter_mut() {
            if entry.pending.is_some() && self.idle(&entry, now) {
                entry.pending = None;
                cleared += 1;
            }
        }

        (dropped, cleared)
    }

    /// Drop the record if it is past its absolute TTL.
    fn evict_if_expired(&self, phone: &str, now: DateTime<Utc>) {
        if self
            .records
            .remove_if(phone, |_, state| self.expired(state, now))
            .is_some()
        {
            debug!(phone, "conversation record expired");
        }
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, phone: &str) -> Result<Option<ConversationState>, ZelaError> {
        let now = Utc::now();
        self.evict_if_expired(phone, now);

        let Some(mut entry) = self.records.get_mut(phone) else {
            return Ok(None);
        };

        // A stale "please confirm" prompt must not be answerable hours
        // later; identity stays for a fast resume.
        if entry.pending.is_some() && self.idle(&entry, now) {
            debug!(phone, "clearing stale pending confirmation");
            entry.pending = None;
        }

        Ok(Some(entry.clone()))
    }

    async fn upsert(
        &self,
        phone: &str,
        patch: StatePatch,
    ) -> Result<ConversationState, ZelaError> {
        let now = Utc::now();
        self.evict_if_expired(phone, now);

        match self.records.entry(phone.to_string()) {
            Entry::Occupied(mut occupied) => {
                let state = occupied.get_mut();
                if let Some(identity) = patch.identity {
                    state.member_id = identity.member_id;
                    state.household_id = identity.household_id;
                }
                if let Some(pending) = patch.pending {
                    // A new draft overwrites, never merges.
                    state.pending = Some(pending);
                }
                if let Some(at) = patch.last_joke_at {
                    state.last_joke_at = Some(at);
                }
                state.last_interaction_at = now;
                state.message_count += 1;
                Ok(state.clone())
            }
            Entry::Vacant(vacant) => {
                let Some(identity) = patch.identity else {
                    return Err(ZelaError::State {
                        source: format!("cannot seed record for {phone} without identity").into(),
                    });
                };
                let state = ConversationState {
                    phone: phone.to_string(),
                    member_id: identity.member_id,
                    household_id: identity.household_id,
                    started_at: now,
                    last_interaction_at: now,
                    message_count: 1,
                    pending: patch.pending,
                    last_joke_at: patch.last_joke_at,
                };
                vacant.insert(state.clone());
                Ok(state)
            }
        }
    }

    async fn clear_pending(&self, phone: &str, kind: DraftKind) -> Result<(), ZelaError> {
        if let Some(mut entry) = self.records.get_mut(phone) {
            if entry.awaiting() == Some(kind) {
                entry.pending = None;
            }
        }
        Ok(())
    }

    async fn remove(&self, phone: &str) -> Result<(), ZelaError> {
        self.records.remove(phone);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zela_core::types::{
        Draft, Identity, MemberRole, TransactionDraft, TransactionKind,
    };

    const PHONE: &str = "5511999990000";

    fn identity() -> Identity {
        Identity {
            member_id: "m1".into(),
            household_id: "h1".into(),
            role: MemberRole::Owner,
            active: true,
            household_active: true,
        }
    }

    fn draft() -> Draft {
        Draft::Transaction(TransactionDraft {
            amount: 50.0,
            kind: TransactionKind::Expense,
            category: None,
            description: Some("mercado".into()),
            occurred_at: Utc::now(),
            idempotency_key: "k1".into(),
        })
    }

    fn store() -> MemoryStateStore {
        MemoryStateStore::new(Duration::from_secs(3600), Duration::from_secs(1800))
    }

    #[tokio::test]
    async fn upsert_then_get_round_trips_all_fields() {
        let store = store();
        let created = store
            .upsert(PHONE, StatePatch::seed(identity()))
            .await
            .unwrap();
        assert_eq!(created.message_count, 1);

        let before = created.last_interaction_at;
        let updated = store.upsert(PHONE, StatePatch::draft(draft())).await.unwrap();
        assert_eq!(updated.message_count, 2);
        assert!(updated.last_interaction_at >= before);
        // Identity preserved from the seed.
        assert_eq!(updated.member_id, "m1");

        let loaded = store.get(PHONE).await.unwrap().unwrap();
        assert_eq!(loaded, updated);
        assert_eq!(loaded.awaiting(), Some(DraftKind::Transaction));
    }

    #[tokio::test]
    async fn seeding_without_identity_is_an_error() {
        let store = store();
        let result = store.upsert(PHONE, StatePatch::touch()).await;
        assert!(matches!(result, Err(ZelaError::State { .. })));
    }

    #[tokio::test]
    async fn get_unknown_phone_returns_none() {
        let store = store();
        assert!(store.get(PHONE).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clear_pending_removes_only_matching_kind() {
        let store = store();
        store.upsert(PHONE, StatePatch::seed(identity())).await.unwrap();
        store.upsert(PHONE, StatePatch::draft(draft())).await.unwrap();

        // Wrong kind: no-op.
        store
            .clear_pending(PHONE, DraftKind::Appointment)
            .await
            .unwrap();
        let state = store.get(PHONE).await.unwrap().unwrap();
        assert_eq!(state.awaiting(), Some(DraftKind::Transaction));

        // Matching kind: cleared, identity untouched.
        store
            .clear_pending(PHONE, DraftKind::Transaction)
            .await
            .unwrap();
        let state = store.get(PHONE).await.unwrap().unwrap();
        assert_eq!(state.awaiting(), None);
        assert_eq!(state.member_id, "m1");
    }

    #[tokio::test]
    async fn absolute_ttl_drops_the_whole_record() {
        let store = MemoryStateStore::new(Duration::from_millis(40), Duration::from_millis(20));
        store.upsert(PHONE, StatePatch::seed(identity())).await.unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(store.get(PHONE).await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn inactivity_clears_pending_but_keeps_identity() {
        let store = MemoryStateStore::new(Duration::from_secs(3600), Duration::from_millis(30));
        store.upsert(PHONE, StatePatch::seed(identity())).await.unwrap();
        store.upsert(PHONE, StatePatch::draft(draft())).await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        let state = store.get(PHONE).await.unwrap().unwrap();
        assert_eq!(state.awaiting(), None, "stale confirmation must be cleared");
        assert_eq!(state.member_id, "m1", "identity survives for fast resume");
    }

    #[tokio::test]
    async fn new_draft_overwrites_never_merges() {
        let store = store();
        store.upsert(PHONE, StatePatch::seed(identity())).await.unwrap();
        store.upsert(PHONE, StatePatch::draft(draft())).await.unwrap();

        let second = Draft::Transaction(TransactionDraft {
            amount: 99.0,
            kind: TransactionKind::Expense,
            category: None,
            description: None,
            occurred_at: Utc::now(),
            idempotency_key: "k2".into(),
        });
        store.upsert(PHONE, StatePatch::draft(second)).await.unwrap();

        let state = store.get(PHONE).await.unwrap().unwrap();
        match state.pending {
            Some(Draft::Transaction(t)) => assert_eq!(t.amount, 99.0),
            other => panic!("expected transaction draft, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn sweep_reports_dropped_and_cleared_counts() {
        let store = MemoryStateStore::new(Duration::from_millis(30), Duration::from_millis(10));
        store.upsert(PHONE, StatePatch::seed(identity())).await.unwrap();
        store
            .upsert("5511888880000", StatePatch::seed(identity()))
            .await
            .unwrap();
        store
            .upsert("5511888880000", StatePatch::draft(draft()))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(15)).await;
        // Past inactivity, before TTL: pending cleared, records kept.
        let (dropped, cleared) = store.sweep(Utc::now());
        assert_eq!((dropped, cleared), (0, 1));

        tokio::time::sleep(Duration::from_millis(30)).await;
        let (dropped, _) = store.sweep(Utc::now());
        assert_eq!(dropped, 2);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn concurrent_upserts_on_distinct_phones() {
        let store = std::sync::Arc::new(store());
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let phone = format!("55119999900{i:02}");
                store.upsert(&phone, StatePatch::seed(identity())).await.unwrap();
                store.upsert(&phone, StatePatch::draft(draft())).await.unwrap();
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(store.len(), 16);
    }
}
