// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Zela integration tests.
//!
//! Mock collaborators with inject/capture surfaces, plus a harness that
//! assembles a full engine over them.

pub mod harness;
pub mod mock_directory;
pub mod mock_ledger;
pub mod mock_transport;

pub use harness::EngineHarness;
pub use mock_directory::{test_identity, MockDirectory};
pub use mock_ledger::{CommittedAppointment, CommittedTransaction, MockLedger};
pub use mock_transport::{MockTransport, SentMessage};
