// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only monthly summary rendering.

use chrono::FixedOffset;

use zela_core::types::{ConversationState, LedgerSummary};
use zela_core::{Ledger, ZelaError};

use crate::reply::{format_brl, format_local_datetime};

/// Fetch the current-month summary for the sender and render it.
pub async fn generate(
    ledger: &dyn Ledger,
    state: &ConversationState,
    offset: FixedOffset,
) -> Result<String, ZelaError> {
    let summary = ledger
        .monthly_summary(&state.household_id, &state.member_id)
        .await?;
    Ok(render(&summary, offset))
}

/// Render a summary as a WhatsApp-friendly text block.
pub fn render(summary: &LedgerSummary, offset: FixedOffset) -> String {
    let balance = summary.income_total - summary.expense_total;
    let mut out = format!(
        "📊 Resumo de {period}\n\
         💚 Receitas: {income}\n\
         💸 Despesas: {expense}\n\
         🧮 Saldo: {balance}",
        period = summary.period,
        income = format_brl(summary.income_total),
        expense = format_brl(summary.expense_total),
        balance = format_brl(balance),
    );

    if !summary.by_category.is_empty() {
        out.push_str("\n\n📂 Maiores gastos:");
        for category in summary.by_category.iter().take(5) {
            out.push_str(&format!(
                "\n• {}: {}",
                category.name,
                format_brl(category.total)
            ));
        }
    }

    if !summary.upcoming.is_empty() {
        out.push_str("\n\n📅 Próximos compromissos:");
        for appointment in summary.upcoming.iter().take(5) {
            out.push_str(&format!(
                "\n• {} — {}",
                appointment.title,
                format_local_datetime(appointment.starts_at, offset)
            ));
        }
    }

    out
}
