// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent classification and date extraction for the Zela conversational
//! engine.
//!
//! Everything here is pure text processing: no I/O, no shared state, fully
//! deterministic. The orchestrator owns the wiring; this crate only answers
//! "what did the sender mean" and "which calendar instant did they name".

pub mod category;
pub mod classifier;
pub mod dates;
pub mod extract;

pub use classifier::{
    parse_command, AppointmentFields, Command, Intent, IntentClassifier, IntentResult,
    TransactionFields,
};
pub use dates::{extract as extract_date, ExtractedDate};
