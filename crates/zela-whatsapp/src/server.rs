// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook ingress server built on axum.
//!
//! The provider delivers one webhook POST per message batch; each text
//! message is run through the orchestrator and the computed response is
//! handed to the outbound transport. The provider always gets `200 OK` --
//! a failed send or a failed message never makes the webhook retry-loop.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use zela_config::model::WhatsAppConfig;
use zela_core::{MessageTransport, ZelaError};
use zela_engine::MessageOrchestrator;

use crate::payload::{extract_text_messages, WebhookPayload};

/// Shared state for the webhook handlers.
#[derive(Clone)]
pub struct IngressState {
    pub orchestrator: Arc<MessageOrchestrator>,
    pub transport: Arc<dyn MessageTransport>,
    /// Token echoed during subscription verification; `None` disables GET.
    pub verify_token: Option<String>,
}

/// Build the ingress router.
pub fn router(state: IngressState) -> Router {
    Router::new()
        .route("/webhook", get(verify_webhook).post(receive_webhook))
        .route("/health", get(get_health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the ingress server until the cancellation token fires.
pub async fn serve(
    config: &WhatsAppConfig,
    state: IngressState,
    cancel: CancellationToken,
) -> Result<(), ZelaError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ZelaError::Transport {
            message: format!("failed to bind webhook server to {addr}"),
            source: Some(Box::new(e)),
        })?;

    info!("webhook server listening on {addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .map_err(|e| ZelaError::Transport {
            message: format!("webhook server error: {e}"),
            source: Some(Box::new(e)),
        })
}

/// GET /webhook -- provider subscription verification.
///
/// Echoes `hub.challenge` when `hub.verify_token` matches the configured
/// token.
async fn verify_webhook(
    State(state): State<IngressState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let mode = params.get("hub.mode").map(String::as_str);
    let token = params.get("hub.verify_token").map(String::as_str);
    let challenge = params.get("hub.challenge").cloned().unwrap_or_default();

    match (&state.verify_token, mode, token) {
        (Some(expected), Some("subscribe"), Some(given)) if given == expected => {
            info!("webhook subscription verified");
            (StatusCode::OK, challenge)
        }
        _ => {
            warn!("webhook verification rejected");
            (StatusCode::FORBIDDEN, String::new())
        }
    }
}

/// POST /webhook -- inbound message delivery.
async fn receive_webhook(
    State(state): State<IngressState>,
    Json(payload): Json<WebhookPayload>,
) -> impl IntoResponse {
    let messages = extract_text_messages(&payload);
    metrics::counter!("zela_webhook_messages_total").increment(messages.len() as u64);

    // The provider serializes deliveries per sender, so processing the batch
    // in order preserves the per-phone ordering the engine assumes.
    for inbound in messages {
        debug!(
            from = inbound.from.as_str(),
            message_id = inbound.message_id.as_str(),
            "processing inbound message"
        );

        let processed = state.orchestrator.process(&inbound.from, &inbound.text).await;
        metrics::counter!("zela_messages_processed_total").increment(1);

        match state.transport.send_text(&inbound.from, &processed.response).await {
            Ok(true) => {}
            Ok(false) => {
                metrics::counter!("zela_sends_rejected_total").increment(1);
                warn!(from = inbound.from.as_str(), "provider rejected the response send");
            }
            Err(e) => {
                metrics::counter!("zela_sends_rejected_total").increment(1);
                warn!(error = %e, from = inbound.from.as_str(), "response send failed");
            }
        }
    }

    // Always 200: the engine settled its state already, and a webhook retry
    // would only re-run stale messages.
    (StatusCode::OK, "EVENT_RECEIVED")
}

/// GET /health -- unauthenticated liveness probe.
async fn get_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
