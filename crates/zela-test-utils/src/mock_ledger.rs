// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capturing ledger fake with injectable failures.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use zela_core::types::{AppointmentDraft, CommitId, LedgerSummary, TransactionDraft};
use zela_core::{Ledger, ZelaError};

/// A committed transaction captured by the mock.
#[derive(Debug, Clone)]
pub struct CommittedTransaction {
    pub household_id: String,
    pub member_id: String,
    pub draft: TransactionDraft,
}

/// A committed appointment captured by the mock.
#[derive(Debug, Clone)]
pub struct CommittedAppointment {
    pub household_id: String,
    pub member_id: String,
    pub draft: AppointmentDraft,
}

/// In-memory [`Ledger`] that records every commit for assertions.
pub struct MockLedger {
    transactions: Mutex<Vec<CommittedTransaction>>,
    appointments: Mutex<Vec<CommittedAppointment>>,
    categories: Mutex<HashMap<String, String>>,
    summary: Mutex<LedgerSummary>,
    fail_commits: Mutex<bool>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            transactions: Mutex::new(Vec::new()),
            appointments: Mutex::new(Vec::new()),
            categories: Mutex::new(HashMap::new()),
            summary: Mutex::new(LedgerSummary {
                period: "2026-08".to_string(),
                income_total: 0.0,
                expense_total: 0.0,
                by_category: Vec::new(),
                upcoming: Vec::new(),
            }),
            fail_commits: Mutex::new(false),
        }
    }

    /// Map a category label to a household category id.
    pub async fn add_category(&self, label: &str, id: &str) {
        self.categories
            .lock()
            .await
            .insert(label.to_string(), id.to_string());
    }

    /// Replace the canned monthly summary.
    pub async fn set_summary(&self, summary: LedgerSummary) {
        *self.summary.lock().await = summary;
    }

    /// Make every commit fail, simulating backend write trouble.
    pub async fn set_fail_commits(&self, fail: bool) {
        *self.fail_commits.lock().await = fail;
    }

    pub async fn transactions(&self) -> Vec<CommittedTransaction> {
        self.transactions.lock().await.clone()
    }

    pub async fn appointments(&self) -> Vec<CommittedAppointment> {
        self.appointments.lock().await.clone()
    }

    pub async fn transaction_count(&self) -> usize {
        self.transactions.lock().await.len()
    }

    pub async fn appointment_count(&self) -> usize {
        self.appointments.lock().await.len()
    }

    async fn check_failure(&self) -> Result<(), ZelaError> {
        if *self.fail_commits.lock().await {
            Err(ZelaError::Ledger {
                message: "mock ledger commit failure".into(),
                source: None,
            })
        } else {
            Ok(())
        }
    }
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn commit_transaction(
        &self,
        household_id: &str,
        member_id: &str,
        draft: &TransactionDraft,
    ) -> Result<CommitId, ZelaError> {
        self.check_failure().await?;
        self.transactions.lock().await.push(CommittedTransaction {
            household_id: household_id.to_string(),
            member_id: member_id.to_string(),
            draft: draft.clone(),
        });
        Ok(CommitId(format!("tx-{}", uuid::Uuid::new_v4())))
    }

    async fn commit_appointment(
        &self,
        household_id: &str,
        member_id: &str,
        draft: &AppointmentDraft,
    ) -> Result<CommitId, ZelaError> {
        self.check_failure().await?;
        self.appointments.lock().await.push(CommittedAppointment {
            household_id: household_id.to_string(),
            member_id: member_id.to_string(),
            draft: draft.clone(),
        });
        Ok(CommitId(format!("ap-{}", uuid::Uuid::new_v4())))
    }

    async fn resolve_category(
        &self,
        _household_id: &str,
        label: &str,
    ) -> Result<Option<String>, ZelaError> {
        Ok(self.categories.lock().await.get(label).cloned())
    }

    async fn monthly_summary(
        &self,
        _household_id: &str,
        _member_id: &str,
    ) -> Result<LedgerSummary, ZelaError> {
        Ok(self.summary.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use zela_core::types::TransactionKind;

    fn draft() -> TransactionDraft {
        TransactionDraft {
            amount: 10.0,
            kind: TransactionKind::Expense,
            category: None,
            description: None,
            occurred_at: Utc::now(),
            idempotency_key: "k".into(),
        }
    }

    #[tokio::test]
    async fn commits_are_captured() {
        let ledger = MockLedger::new();
        ledger.commit_transaction("h1", "m1", &draft()).await.unwrap();
        assert_eq!(ledger.transaction_count().await, 1);
        assert_eq!(ledger.transactions().await[0].household_id, "h1");
    }

    #[tokio::test]
    async fn failure_injection_rejects_commits() {
        let ledger = MockLedger::new();
        ledger.set_fail_commits(true).await;
        assert!(ledger.commit_transaction("h1", "m1", &draft()).await.is_err());
        assert_eq!(ledger.transaction_count().await, 0);
    }

    #[tokio::test]
    async fn category_resolution_uses_the_table() {
        let ledger = MockLedger::new();
        ledger.add_category("alimentação", "cat-food").await;
        assert_eq!(
            ledger.resolve_category("h1", "alimentação").await.unwrap(),
            Some("cat-food".to_string())
        );
        assert_eq!(ledger.resolve_category("h1", "outros").await.unwrap(), None);
    }
}
