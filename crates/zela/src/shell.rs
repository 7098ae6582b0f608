// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `zela shell` command implementation.
//!
//! A local sandbox conversation against in-process demo collaborators: no
//! backend, no WhatsApp provider. Useful for trying the conversation flow
//! and for support reproductions. Commits land in an in-memory ledger that
//! the "resumo" report reads back.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::sync::Mutex;

use zela_config::ZelaConfig;
use zela_core::types::{
    AppointmentDraft, CategoryTotal, CommitId, Identity, LedgerSummary, MemberRole,
    TransactionDraft, TransactionKind, UpcomingAppointment,
};
use zela_core::{Directory, Ledger, ZelaError};
use zela_engine::{EngineOptions, MessageOrchestrator};
use zela_state::MemoryStateStore;

/// Phone of the sandbox member.
const DEMO_PHONE: &str = "5511900000000";

/// Directory that knows exactly one demo member.
struct DemoDirectory;

#[async_trait]
impl Directory for DemoDirectory {
    async fn member_by_phone(&self, phone: &str) -> Result<Option<Identity>, ZelaError> {
        if DEMO_PHONE.ends_with(phone) || phone == DEMO_PHONE {
            Ok(Some(Identity {
                member_id: "demo-member".into(),
                household_id: "demo-household".into(),
                role: MemberRole::Owner,
                active: true,
                household_active: true,
            }))
        } else {
            Ok(None)
        }
    }

    async fn household_by_phone(&self, _phone: &str) -> Result<Option<Identity>, ZelaError> {
        Ok(None)
    }
}

/// Ledger that accumulates commits in memory and reports them back.
struct DemoLedger {
    transactions: Mutex<Vec<TransactionDraft>>,
    appointments: Mutex<Vec<AppointmentDraft>>,
}

impl DemoLedger {
    fn new() -> Self {
        Self {
            transactions: Mutex::new(Vec::new()),
            appointments: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Ledger for DemoLedger {
    async fn commit_transaction(
        &self,
        _household_id: &str,
        _member_id: &str,
        draft: &TransactionDraft,
    ) -> Result<CommitId, ZelaError> {
        self.transactions.lock().await.push(draft.clone());
        Ok(CommitId(format!("demo-tx-{}", uuid::Uuid::new_v4())))
    }

    async fn commit_appointment(
        &self,
        _household_id: &str,
        _member_id: &str,
        draft: &AppointmentDraft,
    ) -> Result<CommitId, ZelaError> {
        self.appointments.lock().await.push(draft.clone());
        Ok(CommitId(format!("demo-ap-{}", uuid::Uuid::new_v4())))
    }

    async fn resolve_category(
        &self,
        _household_id: &str,
        label: &str,
    ) -> Result<Option<String>, ZelaError> {
        // The sandbox has no category table; echo the label as its own id.
        Ok(Some(label.to_string()))
    }

    async fn monthly_summary(
        &self,
        _household_id: &str,
        _member_id: &str,
    ) -> Result<LedgerSummary, ZelaError> {
        let transactions = self.transactions.lock().await;
        let appointments = self.appointments.lock().await;

        let income_total: f64 = transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Income)
            .map(|t| t.amount)
            .sum();
        let expense_total: f64 = transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Expense)
            .map(|t| t.amount)
            .sum();

        let mut by_category: Vec<CategoryTotal> = Vec::new();
        for t in transactions
            .iter()
            .filter(|t| t.kind == TransactionKind::Expense)
        {
            let name = t.category.clone().unwrap_or_else(|| "sem categoria".into());
            match by_category.iter_mut().find(|c| c.name == name) {
                Some(existing) => existing.total += t.amount,
                None => by_category.push(CategoryTotal {
                    name,
                    total: t.amount,
                }),
            }
        }
        by_category.sort_by(|a, b| b.total.total_cmp(&a.total));

        let now = Utc::now();
        Ok(LedgerSummary {
            period: format!("{:02}/{}", now.month(), now.year()),
            income_total,
            expense_total,
            by_category,
            upcoming: appointments
                .iter()
                .map(|a| UpcomingAppointment {
                    title: a.title.clone(),
                    starts_at: a.starts_at,
                })
                .collect(),
        })
    }
}

/// Runs the `zela shell` command.
pub async fn run_shell(config: ZelaConfig) -> Result<(), ZelaError> {
    let store = Arc::new(MemoryStateStore::new(
        Duration::from_secs(24 * 3600),
        Duration::from_secs(30 * 60),
    ));
    let orchestrator = MessageOrchestrator::new(
        Arc::new(DemoDirectory),
        Arc::new(DemoLedger::new()),
        store,
        EngineOptions::from_config(&config),
    );

    println!("{}", "zela shell — conversa de teste local".bold());
    println!(
        "{}",
        "Fale como no WhatsApp (ex.: \"Gastei R$ 50 no mercado\"). `sair` encerra.".dimmed()
    );

    let mut editor = DefaultEditor::new()
        .map_err(|e| ZelaError::Internal(format!("failed to start shell editor: {e}")))?;

    loop {
        match editor.readline(&"você> ".green().to_string()) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if matches!(line, "sair" | "exit" | "quit") {
                    break;
                }
                let _ = editor.add_history_entry(line);

                let processed = orchestrator.process(DEMO_PHONE, line).await;
                println!("{} {}", "zela>".cyan().bold(), processed.response);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                return Err(ZelaError::Internal(format!("shell input error: {e}")));
            }
        }
    }

    println!("{}", "até logo! 👋".dimmed());
    Ok(())
}
