// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Zela SaaS backend internal API.
//!
//! [`BackendClient`] implements the [`zela_core::Directory`] and
//! [`zela_core::Ledger`] collaborator traits over the backend's internal
//! REST surface, with bearer auth and bounded fail-fast requests.

pub mod client;
pub mod directory;
pub mod ledger;

pub use client::BackendClient;
