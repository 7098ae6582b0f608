// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Periodic inactivity sweep over the conversation state store.
//!
//! Complements the lazy expiry on `get`/`upsert`: abandoned conversations
//! whose phones never message again still get reclaimed.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::store::MemoryStateStore;

/// Spawns the background sweep task.
///
/// Runs one [`MemoryStateStore::sweep`] pass per interval until the
/// cancellation token fires.
pub fn spawn_sweeper(
    store: Arc<MemoryStateStore>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "conversation sweeper running");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("conversation sweeper stopped");
                    break;
                }
                _ = tokio::time::sleep(interval) => {
                    let (dropped, cleared) = store.sweep(Utc::now());
                    if dropped > 0 || cleared > 0 {
                        info!(dropped, cleared, "sweep pass reclaimed state");
                    } else {
                        debug!("sweep pass found nothing stale");
                    }
                }
            }
        }
    })
}
