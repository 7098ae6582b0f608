// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Full-engine test harness: orchestrator + mocks + a real state store.

use std::sync::Arc;
use std::time::Duration;

use zela_core::types::ProcessedMessage;
use zela_engine::{EngineOptions, MessageOrchestrator};
use zela_state::MemoryStateStore;

use crate::mock_directory::{test_identity, MockDirectory};
use crate::mock_ledger::MockLedger;

/// Assembles a [`MessageOrchestrator`] over mock collaborators and a real
/// in-memory state store, keeping handles to everything for assertions.
pub struct EngineHarness {
    pub directory: Arc<MockDirectory>,
    pub ledger: Arc<MockLedger>,
    pub store: Arc<MemoryStateStore>,
    pub orchestrator: MessageOrchestrator,
}

impl EngineHarness {
    /// Harness with default options: country code 55, UTC-3, 24h TTL,
    /// 30min inactivity.
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStateStore::new(
            Duration::from_secs(24 * 3600),
            Duration::from_secs(30 * 60),
        )))
    }

    /// Harness over a caller-provided store (e.g. with short lifetimes).
    pub fn with_store(store: Arc<MemoryStateStore>) -> Self {
        let directory = Arc::new(MockDirectory::new());
        let ledger = Arc::new(MockLedger::new());
        let orchestrator = MessageOrchestrator::new(
            directory.clone(),
            ledger.clone(),
            store.clone(),
            EngineOptions::default(),
        );
        Self {
            directory,
            ledger,
            store,
            orchestrator,
        }
    }

    /// Register an active member under the canonical phone form.
    pub async fn register_member(&self, phone: &str, member_id: &str, household_id: &str) {
        self.directory
            .add_member(phone, test_identity(member_id, household_id))
            .await;
    }

    /// Process one inbound message.
    pub async fn process(&self, phone: &str, text: &str) -> ProcessedMessage {
        self.orchestrator.process(phone, text).await
    }
}

impl Default for EngineHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zela_core::types::EngineAction;

    #[tokio::test]
    async fn harness_wires_a_working_engine() {
        let harness = EngineHarness::new();
        harness
            .register_member("5511999990000", "m1", "h1")
            .await;

        let processed = harness.process("5511999990000", "bom dia").await;
        assert_eq!(processed.action, EngineAction::Greeted);
    }
}
