// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic intent classification.
//!
//! A single prioritized regex pass over a small, closed command set: zero
//! cost, zero latency, no network. Confirmation and cancellation phrases are
//! checked before anything else so a bare "sim"/"não" can never be reread as
//! a new expense. The family rule table is data-driven so a statistical
//! classifier could replace it behind the same `classify` signature without
//! touching the state machine.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::{category, extract};

/// Confirmation vocabulary (case-insensitive, exact token after trimming).
const CONFIRM_TOKENS: &[&str] = &["confirmar", "sim", "ok"];
const CANCEL_TOKENS: &[&str] = &["cancelar", "não", "nao"];
const EDIT_TOKENS: &[&str] = &["editar", "alterar"];

/// A recognized confirmation-flow command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Confirm,
    Cancel,
    Edit,
}

/// Match the message against the confirmation vocabulary.
///
/// Exact-token match after trimming whitespace and trailing punctuation;
/// anything longer than a bare command does not count.
pub fn parse_command(text: &str) -> Option<Command> {
    let token = text.trim().trim_end_matches(['.', '!']).trim().to_lowercase();
    if CONFIRM_TOKENS.contains(&token.as_str()) {
        Some(Command::Confirm)
    } else if CANCEL_TOKENS.contains(&token.as_str()) {
        Some(Command::Cancel)
    } else if EDIT_TOKENS.contains(&token.as_str()) {
        Some(Command::Edit)
    } else {
        None
    }
}

/// Partial transaction fields extracted alongside an expense/income intent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFields {
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// Partial appointment fields extracted alongside an appointment intent.
///
/// Date/time extraction is deferred to the orchestrator, which calls the
/// date extractor once the intent type is known.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentFields {
    pub title: Option<String>,
}

/// Classified intent with extracted partial fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Confirm,
    Cancel,
    Edit,
    Expense(TransactionFields),
    Income(TransactionFields),
    Appointment(AppointmentFields),
    Report,
    Other,
}

/// Result of classifying one message.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentResult {
    pub intent: Intent,
    /// Confidence in the classification (0.0-1.0).
    pub confidence: f32,
}

/// Intent families evaluated after the command short-circuit, in declared
/// priority order (ties break toward the earlier family).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Expense,
    Income,
    Appointment,
    Report,
}

/// Trigger patterns per family. Each pattern carries a weight; stronger
/// phrasings outscore single verbs so "quanto gastei" lands on report even
/// though "gastei" alone is an expense trigger.
static FAMILY_RULES: LazyLock<Vec<(Family, Vec<(Regex, u32)>)>> = LazyLock::new(|| {
    let compile = |rules: &[(&str, u32)]| -> Vec<(Regex, u32)> {
        rules
            .iter()
            .map(|(p, w)| (Regex::new(p).unwrap(), *w))
            .collect()
    };

    vec![
        (
            Family::Expense,
            compile(&[
                (r"(?i)\bgastei\b", 1),
                (r"(?i)\bgastamos\b", 1),
                (r"(?i)\bpaguei\b", 1),
                (r"(?i)\bpagamos\b", 1),
                (r"(?i)\bcomprei\b", 1),
                (r"(?i)\bcompramos\b", 1),
                (r"(?i)\bdespesa\b", 1),
                (r"(?i)r\$\s*\d", 1),
            ]),
        ),
        (
            Family::Income,
            compile(&[
                (r"(?i)\brecebi\b", 1),
                (r"(?i)\brecebemos\b", 1),
                (r"(?i)\bganhei\b", 1),
                (r"(?i)\bsal[áa]rio\b", 1),
                (r"(?i)\brenda\b", 1),
                (r"(?i)\bentrou\s+na\s+conta\b", 2),
            ]),
        ),
        (
            Family::Appointment,
            compile(&[
                (r"(?i)\bagendar?\b", 1),
                (r"(?i)\bagende\b", 1),
                (r"(?i)\bmarcar\b", 1),
                (r"(?i)\bmarque\b", 1),
                (r"(?i)\breuni[ãa]o\b", 1),
                (r"(?i)\bconsulta\b", 1),
                (r"(?i)\bcompromisso\b", 1),
                (r"(?i)\blembrete\b", 1),
                (r"(?i)\blembrar\b", 1),
            ]),
        ),
        (
            Family::Report,
            compile(&[
                (r"(?i)\brelat[óo]rio\b", 2),
                (r"(?i)\bresumo\b", 2),
                (r"(?i)\bextrato\b", 2),
                (r"(?i)\bsaldo\b", 2),
                (r"(?i)\bbalan[çc]o\b", 2),
                (r"(?i)\bquanto\s+(gastei|gastamos|recebi)\b", 3),
            ]),
        ),
    ]
});

/// Confidence mapping from accumulated rule weight.
fn confidence_for_weight(weight: u32) -> f32 {
    (0.68 + 0.07 * weight as f32).min(0.9)
}

/// Heuristic intent classifier over the fixed rule table.
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a message.
    ///
    /// Priority order: confirmation/cancel (0.9) and edit (0.8) short-circuit
    /// regardless of other content; then the family with the highest score
    /// wins (ties toward expense > income > appointment > report); anything
    /// else degrades to `Other` at 0.5 -- never an error.
    pub fn classify(&self, text: &str) -> IntentResult {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return IntentResult {
                intent: Intent::Other,
                confidence: 0.5,
            };
        }

        if let Some(command) = parse_command(trimmed) {
            let (intent, confidence) = match command {
                Command::Confirm => (Intent::Confirm, 0.9),
                Command::Cancel => (Intent::Cancel, 0.9),
                Command::Edit => (Intent::Edit, 0.8),
            };
            return IntentResult { intent, confidence };
        }

        let mut best: Option<(Family, u32)> = None;
        for (family, rules) in FAMILY_RULES.iter() {
            let weight: u32 = rules
                .iter()
                .filter(|(re, _)| re.is_match(trimmed))
                .map(|(_, w)| *w)
                .sum();
            if weight > 0 && best.is_none_or(|(_, w)| weight > w) {
                best = Some((*family, weight));
            }
        }

        let Some((family, weight)) = best else {
            return IntentResult {
                intent: Intent::Other,
                confidence: 0.5,
            };
        };

        let confidence = confidence_for_weight(weight);
        debug!(family = ?family, weight, confidence, "intent family matched");

        let intent = match family {
            Family::Expense => Intent::Expense(transaction_fields(trimmed)),
            Family::Income => Intent::Income(transaction_fields(trimmed)),
            Family::Appointment => Intent::Appointment(AppointmentFields {
                title: extract::description(trimmed),
            }),
            Family::Report => Intent::Report,
        };

        IntentResult { intent, confidence }
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn transaction_fields(text: &str) -> TransactionFields {
    TransactionFields {
        amount: extract::amount(text),
        category: category::guess(text),
        description: extract::description(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> IntentResult {
        IntentClassifier::new().classify(text)
    }

    #[test]
    fn confirm_tokens_short_circuit() {
        for t in ["sim", "SIM", "ok", "  confirmar  ", "Sim!"] {
            let r = classify(t);
            assert_eq!(r.intent, Intent::Confirm, "token {t}");
            assert!((r.confidence - 0.9).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn cancel_tokens_short_circuit() {
        for t in ["não", "nao", "cancelar"] {
            assert_eq!(classify(t).intent, Intent::Cancel, "token {t}");
        }
    }

    #[test]
    fn edit_tokens_have_lower_confidence() {
        let r = classify("editar");
        assert_eq!(r.intent, Intent::Edit);
        assert!((r.confidence - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn bare_yes_is_never_an_expense_even_with_r_dollar_history() {
        // The short-circuit must win regardless of other rule families.
        assert_eq!(classify("sim").intent, Intent::Confirm);
        assert_eq!(classify("não").intent, Intent::Cancel);
    }

    #[test]
    fn longer_sentences_are_not_commands() {
        assert_ne!(classify("sim, gastei 50 no mercado").intent, Intent::Confirm);
    }

    #[test]
    fn classifies_expense_with_extracted_fields() {
        let r = classify("Gastei R$ 50 no restaurante");
        match r.intent {
            Intent::Expense(fields) => {
                assert_eq!(fields.amount, Some(50.0));
                assert_eq!(fields.category.as_deref(), Some("alimentação"));
                assert_eq!(fields.description.as_deref(), Some("restaurante"));
            }
            other => panic!("expected expense, got {other:?}"),
        }
        assert!(r.confidence >= 0.8);
    }

    #[test]
    fn classifies_income() {
        let r = classify("recebi meu salário de 3.500,00");
        match r.intent {
            Intent::Income(fields) => {
                assert_eq!(fields.amount, Some(3500.0));
                assert_eq!(fields.category.as_deref(), Some("salário"));
            }
            other => panic!("expected income, got {other:?}"),
        }
    }

    #[test]
    fn classifies_appointment_with_title() {
        let r = classify("Agendar reunião amanhã às 15h");
        match r.intent {
            Intent::Appointment(fields) => {
                assert_eq!(fields.title.as_deref(), Some("reunião"));
            }
            other => panic!("expected appointment, got {other:?}"),
        }
    }

    #[test]
    fn quanto_gastei_is_a_report_not_an_expense() {
        assert_eq!(classify("quanto gastei esse mês?").intent, Intent::Report);
        assert_eq!(classify("me manda o resumo").intent, Intent::Report);
    }

    #[test]
    fn unclassifiable_input_degrades_to_other() {
        let r = classify("bom dia!");
        assert_eq!(r.intent, Intent::Other);
        assert!((r.confidence - 0.5).abs() < f32::EPSILON);

        assert_eq!(classify("").intent, Intent::Other);
        assert_eq!(classify("   ").intent, Intent::Other);
    }

    #[test]
    fn tie_breaks_toward_expense_over_income() {
        // One trigger from each family; expense is declared first.
        let r = classify("paguei e recebi");
        assert!(matches!(r.intent, Intent::Expense(_)), "got {:?}", r.intent);
    }

    #[test]
    fn confidence_grows_with_stronger_matches() {
        let weak = classify("comprei pão");
        let strong = classify("gastei R$ 30, paguei no débito");
        assert!(strong.confidence > weak.confidence);
    }
}
