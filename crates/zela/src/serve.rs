// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `zela serve` command implementation.
//!
//! Wires the engine to its production collaborators: the SaaS backend API
//! client (directory + ledger), the WhatsApp HTTP transport, the in-memory
//! state store with its sweeper, and the webhook ingress server. Supports
//! graceful shutdown via ctrl-c.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use zela_api::BackendClient;
use zela_config::ZelaConfig;
use zela_core::{HealthStatus, ServiceAdapter, ZelaError};
use zela_engine::{EngineOptions, MessageOrchestrator};
use zela_state::{spawn_sweeper, MemoryStateStore};
use zela_whatsapp::{HttpTransport, IngressState};

/// Runs the `zela serve` command.
pub async fn run_serve(config: ZelaConfig) -> Result<(), ZelaError> {
    init_tracing(&config.agent.log_level);

    info!(agent = config.agent.name.as_str(), "starting zela serve");

    // Backend API client: directory + ledger collaborators.
    let backend = Arc::new(BackendClient::new(&config.backend)?);
    report_health(backend.as_ref()).await;

    // Outbound WhatsApp transport.
    let transport = Arc::new(HttpTransport::new(&config.whatsapp)?);
    report_health(transport.as_ref()).await;

    // Conversation state store + background sweeper.
    let store = Arc::new(MemoryStateStore::from_config(&config.conversation));
    let cancel = CancellationToken::new();
    let sweeper = spawn_sweeper(
        store.clone(),
        Duration::from_secs(config.conversation.sweep_interval_secs),
        cancel.clone(),
    );

    let orchestrator = Arc::new(MessageOrchestrator::new(
        backend.clone(),
        backend.clone(),
        store,
        EngineOptions::from_config(&config),
    ));

    let ingress = IngressState {
        orchestrator,
        transport,
        verify_token: config.whatsapp.verify_token.clone(),
    };

    // Ctrl-c triggers graceful shutdown of the ingress and the sweeper.
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            signal_cancel.cancel();
        }
    });

    let served = zela_whatsapp::serve(&config.whatsapp, ingress, cancel.clone()).await;

    // Stop the sweeper even when the server exited on its own.
    cancel.cancel();
    if let Err(e) = sweeper.await {
        warn!(error = %e, "sweeper task did not shut down cleanly");
    }

    info!("zela stopped");
    served
}

/// Log a collaborator's startup health status.
async fn report_health(adapter: &dyn ServiceAdapter) {
    match adapter.health_check().await {
        Ok(HealthStatus::Healthy) => {
            info!(adapter = adapter.name(), "collaborator healthy");
        }
        Ok(HealthStatus::Degraded(reason)) => {
            warn!(adapter = adapter.name(), reason = reason.as_str(), "collaborator degraded");
        }
        Ok(HealthStatus::Unhealthy(reason)) => {
            warn!(adapter = adapter.name(), reason = reason.as_str(), "collaborator unhealthy");
        }
        Err(e) => {
            warn!(adapter = adapter.name(), error = %e, "health check failed");
        }
    }
}

/// Initialize the tracing subscriber with env-filter support.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("zela={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
