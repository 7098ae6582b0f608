// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Table-backed directory fake for deterministic tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use zela_core::types::{Identity, MemberRole};
use zela_core::{Directory, ZelaError};

/// A programmable phone -> identity table implementing [`Directory`].
pub struct MockDirectory {
    members: Mutex<HashMap<String, Identity>>,
    households: Mutex<HashMap<String, Identity>>,
    fail_lookups: Mutex<bool>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self {
            members: Mutex::new(HashMap::new()),
            households: Mutex::new(HashMap::new()),
            fail_lookups: Mutex::new(false),
        }
    }

    /// Register a member phone under the exact lookup form.
    pub async fn add_member(&self, phone: &str, identity: Identity) {
        self.members.lock().await.insert(phone.to_string(), identity);
    }

    /// Register a household contact phone resolving to its owner.
    pub async fn add_household(&self, phone: &str, identity: Identity) {
        self.households
            .lock()
            .await
            .insert(phone.to_string(), identity);
    }

    /// Make every lookup fail, simulating an unreachable backend.
    pub async fn set_fail_lookups(&self, fail: bool) {
        *self.fail_lookups.lock().await = fail;
    }

    async fn check_failure(&self) -> Result<(), ZelaError> {
        if *self.fail_lookups.lock().await {
            Err(ZelaError::Directory {
                message: "mock directory unavailable".into(),
                source: None,
            })
        } else {
            Ok(())
        }
    }
}

impl Default for MockDirectory {
    fn default() -> Self {
        Self::new()
    }
}

/// A valid active identity for tests.
pub fn test_identity(member_id: &str, household_id: &str) -> Identity {
    Identity {
        member_id: member_id.to_string(),
        household_id: household_id.to_string(),
        role: MemberRole::Adult,
        active: true,
        household_active: true,
    }
}

#[async_trait]
impl Directory for MockDirectory {
    async fn member_by_phone(&self, phone: &str) -> Result<Option<Identity>, ZelaError> {
        self.check_failure().await?;
        Ok(self.members.lock().await.get(phone).cloned())
    }

    async fn household_by_phone(&self, phone: &str) -> Result<Option<Identity>, ZelaError> {
        self.check_failure().await?;
        Ok(self.households.lock().await.get(phone).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lookup_returns_registered_identity() {
        let dir = MockDirectory::new();
        dir.add_member("5511999990000", test_identity("m1", "h1")).await;

        let found = dir.member_by_phone("5511999990000").await.unwrap();
        assert_eq!(found.unwrap().member_id, "m1");
        assert!(dir.member_by_phone("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failure_injection_turns_lookups_into_errors() {
        let dir = MockDirectory::new();
        dir.set_fail_lookups(true).await;
        assert!(dir.member_by_phone("any").await.is_err());
    }
}
