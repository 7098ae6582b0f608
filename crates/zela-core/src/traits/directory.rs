// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Directory trait for member/household phone lookups.

use async_trait::async_trait;

use crate::error::ZelaError;
use crate::types::Identity;

/// Read-only lookup of who owns a phone number.
///
/// Callers pass one already-normalized phone variant at a time; generating
/// the bounded variant set is the identity resolver's job, not the
/// directory's.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Finds an active member whose personal phone matches the variant.
    async fn member_by_phone(&self, phone: &str) -> Result<Option<Identity>, ZelaError>;

    /// Finds a household whose contact phone matches the variant and returns
    /// the identity of its owner member.
    async fn household_by_phone(&self, phone: &str) -> Result<Option<Identity>, ZelaError>;
}
