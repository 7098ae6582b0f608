// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity resolution: raw phone string to known member, or a hard gate.

use std::sync::Arc;

use tracing::debug;
use zela_core::{Directory, Identity, ZelaError};

use crate::phone;

/// Outcome of resolving a sender phone.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// An active member of an active household.
    Member(Identity),
    /// The phone matched, but the household subscription is deactivated.
    SuspendedHousehold,
    /// No active member or household matched any variant.
    Unknown,
}

/// Resolves raw sender phones to identities through the [`Directory`].
///
/// Resolution is read-only and runs fresh on every message: a member removed
/// from the household stops resolving on their very next message.
pub struct IdentityResolver {
    directory: Arc<dyn Directory>,
    country_code: String,
}

impl IdentityResolver {
    /// Creates a resolver over a directory, with the default country code
    /// used for normalization.
    pub fn new(directory: Arc<dyn Directory>, country_code: impl Into<String>) -> Self {
        Self {
            directory,
            country_code: country_code.into(),
        }
    }

    /// Canonical form of a raw phone, used as the conversation state key.
    pub fn normalize(&self, raw_phone: &str) -> Option<String> {
        phone::normalize(raw_phone, &self.country_code)
    }

    /// Resolve a raw phone to an identity.
    ///
    /// Tries a direct member match on every variant first; only when none
    /// matches does it fall back to the household contact phone (which
    /// resolves to the household owner). Inactive members and deactivated
    /// households never resolve to [`Resolution::Member`].
    pub async fn resolve(&self, raw_phone: &str) -> Result<Resolution, ZelaError> {
        let Some(normalized) = self.normalize(raw_phone) else {
            debug!(raw = raw_phone, "phone did not normalize, treating as unknown");
            return Ok(Resolution::Unknown);
        };

        let candidates = phone::variants(&normalized, &self.country_code);

        for variant in &candidates {
            if let Some(identity) = self.directory.member_by_phone(variant).await? {
                debug!(variant = variant.as_str(), member_id = identity.member_id.as_str(), "direct member match");
                return Ok(Self::gate(identity));
            }
        }

        for variant in &candidates {
            if let Some(identity) = self.directory.household_by_phone(variant).await? {
                debug!(variant = variant.as_str(), household_id = identity.household_id.as_str(), "household contact match");
                return Ok(Self::gate(identity));
            }
        }

        Ok(Resolution::Unknown)
    }

    /// Apply the activity gate to a matched identity.
    fn gate(identity: Identity) -> Resolution {
        if !identity.household_active {
            Resolution::SuspendedHousehold
        } else if !identity.active {
            Resolution::Unknown
        } else {
            Resolution::Member(identity)
        }
    }
}
