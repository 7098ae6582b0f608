// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait for network-facing collaborators.

use async_trait::async_trait;

use crate::error::ZelaError;
use crate::types::HealthStatus;

/// Identity and liveness surface shared by the HTTP-backed collaborators
/// (directory, ledger, transport). `zela serve` probes these at startup and
/// on demand.
#[async_trait]
pub trait ServiceAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this collaborator instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this collaborator implementation.
    fn version(&self) -> semver::Version;

    /// Performs a health check and returns the collaborator's current status.
    async fn health_check(&self) -> Result<HealthStatus, ZelaError>;
}
