// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field extraction: monetary amounts and free-text descriptions.

use std::sync::LazyLock;

use regex::Regex;

use crate::dates;

/// Numeric figures, pt-BR style: `50`, `50,25`, `1.234,56`, `3.50`.
static RE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d{3})+(?:,\d{1,2})?|\d+(?:[.,]\d{1,2})?").unwrap());

/// Currency marker.
static RE_CURRENCY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)r\$\s*").unwrap());

/// Trigger verbs and command words stripped from descriptions.
static RE_COMMAND_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(gastei|gastamos|gasto|paguei|pagamos|comprei|compramos|recebi|recebemos|ganhei|entrou|agendar|agende|agenda|marcar|marque|anotar|anote|registrar|registre|lembrete|lembrar)\b",
    )
    .unwrap()
});

/// Connective words dropped from the *edges* of a description.
const FILLER_WORDS: &[&str] = &[
    "no", "na", "nos", "nas", "em", "de", "do", "da", "dos", "das", "com", "para", "pra",
    "o", "a", "os", "as", "às", "à", "ao", "um", "uma", "que", "e", "dia", "reais", "real",
];

/// Extract the principal monetary amount from a message.
///
/// All numeric substrings are scanned and the maximum is chosen -- in a short
/// money message the principal amount is usually the largest number. Figures
/// that are part of a time (`15h`, `15:30`) or a date (`15/08`) are skipped.
pub fn amount(text: &str) -> Option<f64> {
    let mut best: Option<f64> = None;

    for m in RE_NUMBER.find_iter(text) {
        if is_time_or_date_fragment(text, m.start(), m.end()) {
            continue;
        }

        let raw = m.as_str();
        let parsed = if raw.contains(',') {
            raw.replace('.', "").replace(',', ".").parse::<f64>()
        } else if raw.matches('.').count() > 1 || raw.ends_with('.') {
            raw.replace('.', "").parse::<f64>()
        } else {
            raw.parse::<f64>()
        };

        if let Ok(value) = parsed {
            if value > 0.0 && best.is_none_or(|b| value > b) {
                best = Some(value);
            }
        }
    }

    best
}

/// Whether the matched number is glued to a time or date marker.
fn is_time_or_date_fragment(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();

    matches!(after, Some('h') | Some('H') | Some(':') | Some('/'))
        || matches!(before, Some(':') | Some('/') | Some('h') | Some('H'))
}

/// Build a free-text description by stripping amounts, command tokens, and
/// date phrases from the original message.
///
/// Returns `None` when nothing meaningful remains; the caller substitutes a
/// placeholder at commit time.
pub fn description(text: &str) -> Option<String> {
    let mut cleaned = dates::scrub(text);
    cleaned = RE_CURRENCY.replace_all(&cleaned, " ").into_owned();
    cleaned = RE_NUMBER.replace_all(&cleaned, " ").into_owned();
    cleaned = RE_COMMAND_WORDS.replace_all(&cleaned, " ").into_owned();

    let tokens: Vec<&str> = cleaned
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | '.' | '!' | '?' | ';'))
        .filter(|t| !t.is_empty())
        .collect();

    let is_filler = |t: &str| FILLER_WORDS.contains(&t.to_lowercase().as_str());
    let first = tokens.iter().position(|t| !is_filler(t))?;
    let last = tokens.iter().rposition(|t| !is_filler(t))?;

    let result = tokens[first..=last].join(" ");
    if result.is_empty() {
        None
    } else {
        Some(result)
    }
}
