// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phone number normalization and variant generation.
//!
//! WhatsApp delivers sender ids in a handful of shapes: bare digits,
//! `+`-prefixed international numbers, and JIDs like
//! `5511999990000:12@s.whatsapp.net`. Stored contact numbers are just as
//! inconsistent. Normalization funnels all of them into one canonical
//! digits-with-country-code form, and [`variants`] produces the bounded
//! candidate set used for directory lookups.

/// Minimum digits for something to count as a phone number at all.
const MIN_DIGITS: usize = 8;

/// Digits of a national significant number (area code + subscriber).
const NATIONAL_DIGITS: usize = 10;

/// Normalize a raw phone string into canonical digits-with-country-code form.
///
/// Steps, in order:
/// 1. Drop any transport suffix (`@s.whatsapp.net`, `@c.us`) and device part
///    (`:12`).
/// 2. Keep digits only.
/// 3. Strip a single leading trunk zero.
/// 4. Prefix `country_code` unless the number already carries it.
///
/// Returns `None` when fewer than [`MIN_DIGITS`] digits remain.
pub fn normalize(raw: &str, country_code: &str) -> Option<String> {
    let bare = raw
        .split('@')
        .next()
        .unwrap_or(raw)
        .split(':')
        .next()
        .unwrap_or(raw);

    let mut digits: String = bare.chars().filter(|c| c.is_ascii_digit()).collect();

    if let Some(stripped) = digits.strip_prefix('0') {
        digits = stripped.to_string();
    }

    if digits.len() < MIN_DIGITS {
        return None;
    }

    if has_country_code(&digits, country_code) {
        Some(digits)
    } else {
        Some(format!("{country_code}{digits}"))
    }
}

/// Whether `digits` already starts with the country code *and* is long
/// enough to hold a national number after it. A bare national number that
/// happens to start with the country-code digits (e.g. area code 55) is
/// still treated as national.
fn has_country_code(digits: &str, country_code: &str) -> bool {
    digits.starts_with(country_code) && digits.len() >= country_code.len() + NATIONAL_DIGITS
}

/// Produce the bounded set of lookup variants for a normalized number.
///
/// The exact set is part of the resolver contract:
/// 1. the canonical form (with country code),
/// 2. the national form (country code stripped),
/// 3. the last ten digits.
///
/// Duplicates are removed, order preserved.
pub fn variants(normalized: &str, country_code: &str) -> Vec<String> {
    let mut out = vec![normalized.to_string()];

    if let Some(national) = normalized.strip_prefix(country_code) {
        if !national.is_empty() {
            out.push(national.to_string());
        }
    }

    if normalized.len() > NATIONAL_DIGITS {
        out.push(normalized[normalized.len() - NATIONAL_DIGITS..].to_string());
    }

    out.dedup();
    out
}
