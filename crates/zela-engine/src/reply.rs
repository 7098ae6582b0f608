// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing reply templates (Brazilian Portuguese) and formatting helpers.

use chrono::{DateTime, FixedOffset, Utc};

use zela_core::types::{AppointmentDraft, DraftKind, TransactionDraft};

/// Static reply for senders that resolve to no account.
pub const MSG_UNREGISTERED: &str = "Olá! 👋 Este número não está cadastrado na Zela. \
Peça um convite ao responsável da sua família ou cadastre-se em zela.app.";

/// Static reply when the household subscription is deactivated.
pub const MSG_SUSPENDED: &str = "A assinatura da sua família está desativada no momento. \
Acesse o painel da Zela para reativar.";

/// Reply for confirm/cancel/edit with nothing pending.
pub const MSG_NOTHING_PENDING: &str =
    "Não há nada aguardando confirmação no momento. 🙂 Me conte um gasto, uma receita ou um compromisso!";

/// Reply when an appointment intent carries no resolvable date.
pub const MSG_ASK_DATE: &str = "Para agendar, preciso de uma data. 📅 \
Tente algo como \"Agendar dentista amanhã às 15h\".";

/// Reply when an expense/income intent carries no usable amount.
pub const MSG_ASK_AMOUNT: &str = "Não consegui identificar o valor. 💰 \
Tente algo como \"Gastei R$ 50 no mercado\".";

/// Reply when an appointment commit is refused for being in the past.
pub const MSG_PAST_APPOINTMENT: &str =
    "Esse compromisso ficaria no passado, então não registrei. ⏪ \
Me envie novamente com uma data futura.";

/// Reply when the ledger refuses or fails a commit.
pub const MSG_SAVE_FAILED: &str =
    "Não consegui salvar agora. 😕 Por favor, envie as informações novamente em instantes.";

/// Generic boundary reply for unexpected failures.
pub const MSG_RETRY_LATER: &str =
    "Tive um problema ao processar sua mensagem. Tente novamente em alguns minutos, por favor.";

/// Capability-listing greeting for unclassifiable input.
pub const MSG_GREETING: &str = "Oi! Eu sou a Zela, a assistente da sua família. 💛\n\
Você pode me mandar, por exemplo:\n\
• \"Gastei R$ 50 no mercado\" para registrar uma despesa\n\
• \"Recebi meu salário de 3.000\" para registrar uma receita\n\
• \"Agendar dentista amanhã às 15h\" para criar um compromisso\n\
• \"Resumo do mês\" para ver seu relatório";

/// Cosmetic money jokes appended to commit acknowledgments, throttled per
/// conversation.
pub const JOKES: &[&str] = &[
    "💡 Dinheiro não traz felicidade... mas organiza a casa! 😄",
    "💡 Economizar é a arte de gastar sem perceber que não gastou. 😄",
    "💡 Meu cofrinho está de dieta: só entra, não sai. 😄",
    "💡 Quem guarda, tem. Quem anota, sabe quanto tem! 😄",
];

/// Deterministically pick a joke for a conversation.
pub fn pick_joke(seed: u64) -> &'static str {
    JOKES[(seed as usize) % JOKES.len()]
}

/// Format an amount as Brazilian currency: `R$ 1.234,56`.
pub fn format_brl(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("R$ {sign}{grouped},{frac:02}")
}

/// Format an instant as a local date: `07/08/2026`.
pub fn format_local_date(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%d/%m/%Y").to_string()
}

/// Format an instant as a local date and time: `07/08/2026 às 15:00`.
pub fn format_local_datetime(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%d/%m/%Y às %H:%M").to_string()
}

/// The three-way choice footer on every confirmation prompt.
const CHOICES: &str = "✅ Confirmar | ✏️ Editar | ❌ Cancelar";

/// Confirmation prompt for a transaction draft.
pub fn transaction_prompt(draft: &TransactionDraft, offset: FixedOffset) -> String {
    format!(
        "📝 Nova {kind}:\n\
         💰 Valor: {amount}\n\
         📂 Categoria: {category}\n\
         📅 Data: {date}\n\
         🗒️ Descrição: {description}\n\n\
         {CHOICES}",
        kind = draft.kind.label(),
        amount = format_brl(draft.amount),
        category = draft.category.as_deref().unwrap_or("sem categoria"),
        date = format_local_date(draft.occurred_at, offset),
        description = draft.description.as_deref().unwrap_or("Sem descrição"),
    )
}

/// Confirmation prompt for an appointment draft.
pub fn appointment_prompt(draft: &AppointmentDraft, offset: FixedOffset) -> String {
    let mut prompt = format!(
        "📝 Novo compromisso:\n\
         📌 {title}\n\
         📅 {when}",
        title = draft.title,
        when = format_local_datetime(draft.starts_at, offset),
    );
    if let Some(location) = &draft.location {
        prompt.push_str(&format!("\n📍 {location}"));
    }
    if let Some(description) = &draft.description {
        prompt.push_str(&format!("\n🗒️ {description}"));
    }
    prompt.push_str(&format!("\n\n{CHOICES}"));
    prompt
}

/// Re-prompt when an ambiguous reply arrives while a confirmation is pending.
pub fn reprompt(kind: DraftKind) -> String {
    let what = match kind {
        DraftKind::Transaction => "o lançamento",
        DraftKind::Appointment => "o compromisso",
    };
    format!("Ainda estou aguardando sua resposta sobre {what}. 🙂\n\n{CHOICES}")
}

/// Acknowledgment after a committed transaction.
pub fn transaction_committed(draft: &TransactionDraft) -> String {
    format!(
        "✅ {kind} de {amount} registrada com sucesso!",
        kind = capitalize(draft.kind.label()),
        amount = format_brl(draft.amount),
    )
}

/// Acknowledgment after a committed appointment.
pub fn appointment_committed(draft: &AppointmentDraft, offset: FixedOffset) -> String {
    format!(
        "✅ Compromisso \"{title}\" agendado para {when}!",
        title = draft.title,
        when = format_local_datetime(draft.starts_at, offset),
    )
}

/// Acknowledgment after a cancel command.
pub fn cancelled(kind: DraftKind) -> String {
    match kind {
        DraftKind::Transaction => "❌ Lançamento cancelado. Nada foi registrado.".to_string(),
        DraftKind::Appointment => "❌ Compromisso cancelado. Nada foi agendado.".to_string(),
    }
}

/// Acknowledgment after an edit command (draft discarded wholesale).
pub fn edit_requested(kind: DraftKind) -> String {
    let what = match kind {
        DraftKind::Transaction => "do lançamento",
        DraftKind::Appointment => "do compromisso",
    };
    format!("✏️ Sem problemas! Me envie novamente as informações {what} corrigidas.")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use zela_core::types::TransactionKind;

    fn offset() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap()
    }

    fn tx_draft() -> TransactionDraft {
        TransactionDraft {
            amount: 50.0,
            kind: TransactionKind::Expense,
            category: Some("alimentação".into()),
            description: Some("restaurante".into()),
            occurred_at: Utc.with_ymd_and_hms(2026, 8, 7, 18, 0, 0).unwrap(),
            idempotency_key: "k".into(),
        }
    }

    #[test]
    fn format_brl_groups_thousands_with_comma_decimals() {
        assert_eq!(format_brl(50.0), "R$ 50,00");
        assert_eq!(format_brl(50.25), "R$ 50,25");
        assert_eq!(format_brl(1234.56), "R$ 1.234,56");
        assert_eq!(format_brl(1_234_567.89), "R$ 1.234.567,89");
        assert_eq!(format_brl(0.5), "R$ 0,50");
        assert_eq!(format_brl(-12.3), "R$ -12,30");
    }

    #[test]
    fn transaction_prompt_lists_fields_and_choices() {
        let prompt = transaction_prompt(&tx_draft(), offset());
        assert!(prompt.contains("despesa"));
        assert!(prompt.contains("R$ 50,00"));
        assert!(prompt.contains("alimentação"));
        assert!(prompt.contains("restaurante"));
        assert!(prompt.contains("07/08/2026"));
        assert!(prompt.contains("Confirmar"));
        assert!(prompt.contains("Cancelar"));
        assert!(prompt.contains("Editar"));
    }

    #[test]
    fn transaction_prompt_shows_placeholders_for_missing_fields() {
        let mut draft = tx_draft();
        draft.category = None;
        draft.description = None;
        let prompt = transaction_prompt(&draft, offset());
        assert!(prompt.contains("sem categoria"));
        assert!(prompt.contains("Sem descrição"));
    }

    #[test]
    fn appointment_prompt_renders_local_time() {
        let draft = AppointmentDraft {
            title: "reunião".into(),
            // 18:00 UTC == 15:00 local.
            starts_at: Utc.with_ymd_and_hms(2026, 8, 8, 18, 0, 0).unwrap(),
            description: None,
            location: Some("escritório".into()),
            idempotency_key: "k".into(),
        };
        let prompt = appointment_prompt(&draft, offset());
        assert!(prompt.contains("reunião"));
        assert!(prompt.contains("08/08/2026 às 15:00"));
        assert!(prompt.contains("escritório"));
        assert!(prompt.contains("Confirmar"));
    }

    #[test]
    fn committed_ack_mentions_the_amount() {
        let ack = transaction_committed(&tx_draft());
        assert!(ack.contains("R$ 50,00"));
        assert!(ack.contains("Despesa"));
    }

    #[test]
    fn joke_pick_is_deterministic_and_bounded() {
        assert_eq!(pick_joke(3), pick_joke(3));
        for seed in 0..10 {
            assert!(JOKES.contains(&pick_joke(seed)));
        }
    }
}
