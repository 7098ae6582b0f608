// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Natural-language date extraction for Brazilian-Portuguese messages.
//!
//! Two-pass contract: a full date+time parse against the reference instant
//! first; only when that finds a date without an explicit time does a second
//! pass scan for bare hour markers (`15h`, `15h30`). Returns nothing when no
//! date-bearing phrase is present -- a date is never guessed.
//!
//! Pure and deterministic for a given `(text, reference)` pair.

use std::sync::LazyLock;

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Utc, Weekday,
};
use regex::Regex;

/// A calendar date extracted from free text, with an optional explicit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractedDate {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
}

/// Local time assumed when a concrete instant is needed but the message
/// stated only a date.
const DEFAULT_TIME: (u32, u32) = (12, 0);

impl ExtractedDate {
    /// Resolve to a UTC instant, interpreting the extracted wall-clock in the
    /// household's local offset. Missing times default to 12:00 local.
    pub fn instant(&self, offset: FixedOffset) -> DateTime<Utc> {
        let time = self
            .time
            .or_else(|| NaiveTime::from_hms_opt(DEFAULT_TIME.0, DEFAULT_TIME.1, 0))
            .unwrap_or_default();
        let local = self.date.and_time(time);
        let utc_naive = local - Duration::seconds(i64::from(offset.local_minus_utc()));
        DateTime::from_naive_utc_and_offset(utc_naive, Utc)
    }
}

static RE_DAY_AFTER_TOMORROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdepois\s+de\s+amanh[ãa]\b").unwrap());
static RE_TOMORROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bamanh[ãa]\b").unwrap());
static RE_DAY_BEFORE_YESTERDAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\banteontem\b").unwrap());
static RE_YESTERDAY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bontem\b").unwrap());
static RE_TODAY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bhoje\b").unwrap());

/// Weekday names, checked as whole words with the optional `-feira` suffix.
static RE_WEEKDAYS: LazyLock<Vec<(Regex, Weekday)>> = LazyLock::new(|| {
    [
        (r"(?i)\bsegunda(?:-feira)?\b", Weekday::Mon),
        (r"(?i)\bter[çc]a(?:-feira)?\b", Weekday::Tue),
        (r"(?i)\bquarta(?:-feira)?\b", Weekday::Wed),
        (r"(?i)\bquinta(?:-feira)?\b", Weekday::Thu),
        (r"(?i)\bsexta(?:-feira)?\b", Weekday::Fri),
        (r"(?i)\bs[áa]bado\b", Weekday::Sat),
        (r"(?i)\bdomingo\b", Weekday::Sun),
    ]
    .iter()
    .map(|(p, w)| (Regex::new(p).unwrap(), *w))
    .collect()
});

/// `15/08`, `15/8/2026`, `15/08/26`.
static RE_SLASH_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})(?:/(\d{2,4}))?\b").unwrap());

/// `dia 15`.
static RE_DAY_OF_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdia\s+(\d{1,2})\b").unwrap());

/// Explicit clock time: `15:30`.
static RE_CLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{1,2}):(\d{2})\b").unwrap());

/// Preposition-led time: `às 15`, `às 15h`, `às 15h30`.
static RE_AT_HOUR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b[àa]s\s+(\d{1,2})(?:h(\d{2})?)?\b").unwrap());

/// Bare hour marker, the second-pass pattern: `15h`, `15h30`.
static RE_HOUR_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})h(\d{2})?\b").unwrap());

/// Extract a date (and optional time) from free text against a reference
/// instant in the household's local clock.
pub fn extract(text: &str, reference: DateTime<FixedOffset>) -> Option<ExtractedDate> {
    let today = reference.date_naive();

    let date = find_relative(text, today)
        .or_else(|| find_weekday(text, today))
        .or_else(|| find_explicit(text, today))?;

    // First pass: explicit clock or preposition-led time.
    // Second pass (date found, no explicit time): bare hour marker.
    let time = find_explicit_time(text).or_else(|| find_hour_marker(text));

    Some(ExtractedDate { date, time })
}

fn find_relative(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    // Longer phrases first: "anteontem" contains "ontem", "depois de amanhã"
    // contains "amanhã".
    if RE_DAY_AFTER_TOMORROW.is_match(text) {
        Some(today + Duration::days(2))
    } else if RE_TOMORROW.is_match(text) {
        Some(today + Duration::days(1))
    } else if RE_DAY_BEFORE_YESTERDAY.is_match(text) {
        Some(today - Duration::days(2))
    } else if RE_YESTERDAY.is_match(text) {
        Some(today - Duration::days(1))
    } else if RE_TODAY.is_match(text) {
        Some(today)
    } else {
        None
    }
}

fn find_weekday(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    for (re, weekday) in RE_WEEKDAYS.iter() {
        if re.is_match(text) {
            let ahead = (weekday.num_days_from_monday() as i64
                - today.weekday().num_days_from_monday() as i64)
                .rem_euclid(7);
            // Next occurrence; the same weekday resolves to today.
            return Some(today + Duration::days(ahead));
        }
    }
    None
}

fn find_explicit(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    if let Some(caps) = RE_SLASH_DATE.captures(text) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year: i32 = match caps.get(3) {
            Some(y) => {
                let y: i32 = y.as_str().parse().ok()?;
                if y < 100 { y + 2000 } else { y }
            }
            None => today.year(),
        };
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = RE_DAY_OF_MONTH.captures(text) {
        let day: u32 = caps[1].parse().ok()?;
        // "dia 15" means the 15th of this month, or of next month when that
        // day has already passed.
        let mut candidate = NaiveDate::from_ymd_opt(today.year(), today.month(), day)?;
        if candidate < today {
            let (year, month) = if today.month() == 12 {
                (today.year() + 1, 1)
            } else {
                (today.year(), today.month() + 1)
            };
            candidate = NaiveDate::from_ymd_opt(year, month, day)?;
        }
        return Some(candidate);
    }

    None
}

fn find_explicit_time(text: &str) -> Option<NaiveTime> {
    if let Some(caps) = RE_CLOCK.captures(text) {
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        if let Some(t) = NaiveTime::from_hms_opt(hour, minute, 0) {
            return Some(t);
        }
    }

    if let Some(caps) = RE_AT_HOUR.captures(text) {
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps
            .get(2)
            .map(|m| m.as_str().parse().unwrap_or(0))
            .unwrap_or(0);
        return NaiveTime::from_hms_opt(hour, minute, 0);
    }

    None
}

fn find_hour_marker(text: &str) -> Option<NaiveTime> {
    let caps = RE_HOUR_MARKER.captures(text)?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps
        .get(2)
        .map(|m| m.as_str().parse().unwrap_or(0))
        .unwrap_or(0);
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Remove every recognized date/time phrase from the text.
///
/// Used by the description stripper so "jantar amanhã às 20h" keeps only
/// "jantar".
pub(crate) fn scrub(text: &str) -> String {
    let mut out = text.to_string();
    let all: [&Regex; 12] = [
        &RE_DAY_AFTER_TOMORROW,
        &RE_TOMORROW,
        &RE_DAY_BEFORE_YESTERDAY,
        &RE_YESTERDAY,
        &RE_TODAY,
        &RE_SLASH_DATE,
        &RE_DAY_OF_MONTH,
        // Clock times go before the preposition pattern so "às 20:30" does
        // not leave a dangling ":30".
        &RE_CLOCK,
        &RE_AT_HOUR,
        &RE_HOUR_MARKER,
        &RE_WEEKDAYS[0].0,
        &RE_WEEKDAYS[1].0,
    ];
    for re in all {
        out = re.replace_all(&out, " ").into_owned();
    }
    // Remaining weekday names beyond the two covered above.
    for (re, _) in RE_WEEKDAYS.iter().skip(2) {
        out = re.replace_all(&out, " ").into_owned();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Friday 2026-08-07 10:00 -03:00.
    fn reference() -> DateTime<FixedOffset> {
        FixedOffset::west_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 8, 7, 10, 0, 0)
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn extracts_relative_words() {
        let r = reference();
        assert_eq!(extract("hoje", r).unwrap().date, date(2026, 8, 7));
        assert_eq!(extract("amanhã", r).unwrap().date, date(2026, 8, 8));
        assert_eq!(extract("amanha cedo", r).unwrap().date, date(2026, 8, 8));
        assert_eq!(
            extract("depois de amanhã", r).unwrap().date,
            date(2026, 8, 9)
        );
        assert_eq!(extract("ontem", r).unwrap().date, date(2026, 8, 6));
        assert_eq!(extract("anteontem", r).unwrap().date, date(2026, 8, 5));
    }

    #[test]
    fn anteontem_is_not_misread_as_ontem() {
        let e = extract("anteontem à noite", reference()).unwrap();
        assert_eq!(e.date, date(2026, 8, 5));
    }

    #[test]
    fn extracts_weekday_as_next_occurrence() {
        let r = reference(); // Friday
        assert_eq!(
            extract("segunda-feira", r).unwrap().date,
            date(2026, 8, 10)
        );
        assert_eq!(extract("na terça", r).unwrap().date, date(2026, 8, 11));
        assert_eq!(extract("sábado", r).unwrap().date, date(2026, 8, 8));
        // Same weekday resolves to today.
        assert_eq!(extract("sexta", r).unwrap().date, date(2026, 8, 7));
    }

    #[test]
    fn extracts_slash_dates() {
        let r = reference();
        assert_eq!(extract("15/08", r).unwrap().date, date(2026, 8, 15));
        assert_eq!(extract("no 15/8/2027", r).unwrap().date, date(2027, 8, 15));
        assert_eq!(extract("02/01/27", r).unwrap().date, date(2027, 1, 2));
    }

    #[test]
    fn invalid_slash_date_yields_nothing() {
        assert_eq!(extract("32/13", reference()), None);
    }

    #[test]
    fn extracts_day_of_month_rolling_forward() {
        let r = reference(); // the 7th
        assert_eq!(extract("dia 15", r).unwrap().date, date(2026, 8, 15));
        // "dia 3" already passed this month -> next month.
        assert_eq!(extract("dia 3", r).unwrap().date, date(2026, 9, 3));
        // Today's own day number stays in this month.
        assert_eq!(extract("dia 7", r).unwrap().date, date(2026, 8, 7));
    }

    #[test]
    fn extracts_combined_date_and_time() {
        let r = reference();
        let e = extract("amanhã às 15h30", r).unwrap();
        assert_eq!(e.date, date(2026, 8, 8));
        assert_eq!(e.time, Some(time(15, 30)));

        let e = extract("reunião segunda às 9", r).unwrap();
        assert_eq!(e.date, date(2026, 8, 10));
        assert_eq!(e.time, Some(time(9, 0)));

        let e = extract("15/08 14:45", r).unwrap();
        assert_eq!(e.time, Some(time(14, 45)));
    }

    #[test]
    fn second_pass_picks_up_bare_hour_marker() {
        let e = extract("consulta amanhã 15h", reference()).unwrap();
        assert_eq!(e.time, Some(time(15, 0)));

        let e = extract("consulta amanhã 15h45", reference()).unwrap();
        assert_eq!(e.time, Some(time(15, 45)));
    }

    #[test]
    fn date_without_time_has_no_time() {
        let e = extract("jantar amanhã", reference()).unwrap();
        assert_eq!(e.time, None);
    }

    #[test]
    fn never_guesses_a_date() {
        assert_eq!(extract("pagar o aluguel", reference()), None);
        // A time alone is not a date-bearing phrase.
        assert_eq!(extract("às 15h", reference()), None);
        assert_eq!(extract("", reference()), None);
    }

    #[test]
    fn deterministic_for_same_inputs() {
        let r = reference();
        assert_eq!(extract("amanhã às 8", r), extract("amanhã às 8", r));
    }

    #[test]
    fn instant_applies_offset_and_default_time() {
        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        let e = ExtractedDate {
            date: date(2026, 8, 8),
            time: Some(time(15, 0)),
        };
        // 15:00 -03:00 == 18:00 UTC.
        assert_eq!(
            e.instant(offset),
            Utc.with_ymd_and_hms(2026, 8, 8, 18, 0, 0).unwrap()
        );

        let e = ExtractedDate {
            date: date(2026, 8, 8),
            time: None,
        };
        // Defaults to 12:00 local == 15:00 UTC.
        assert_eq!(
            e.instant(offset),
            Utc.with_ymd_and_hms(2026, 8, 8, 15, 0, 0).unwrap()
        );
    }

    #[test]
    fn scrub_removes_date_and_time_phrases() {
        let cleaned = scrub("jantar amanhã às 20h");
        assert!(!cleaned.contains("amanhã"));
        assert!(!cleaned.contains("20h"));
        assert!(cleaned.contains("jantar"));
    }
}
