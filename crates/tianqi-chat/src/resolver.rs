//! Free-text date recognition.
//!
//! Relative keywords win over numeric month/day patterns. Numeric dates carry
//! no year: they land in the current year, or the next one when the day has
//! already passed.

use chrono::{Datelike, Days, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::keywords::PhraseTable;

// A phrase must come before any shorter phrase it contains: "大後天" before
// "後天", "day after tomorrow" before "tomorrow".
static RELATIVE_DAYS: Lazy<PhraseTable<u64>> = Lazy::new(|| {
    PhraseTable::new(&[
        ("今天", 0),
        ("今日", 0),
        ("today", 0),
        ("大後天", 3),
        ("大后天", 3),
        ("three days from now", 3),
        ("in three days", 3),
        ("明天", 1),
        ("明日", 1),
        ("後天", 2),
        ("后天", 2),
        ("day after tomorrow", 2),
        ("in two days", 2),
        ("tomorrow", 1),
    ])
});

#[allow(clippy::expect_used)]
static MONTH_DAY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"([0-9]{1,2})/([0-9]{1,2})",
        r"([0-9]{1,2})-([0-9]{1,2})",
        r"([0-9]{1,2})\.([0-9]{1,2})",
        r"([0-9]{1,2})月([0-9]{1,2})[號日]",
        r"([0-9]{1,2})月([0-9]{1,2})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid date regex"))
    .collect()
});

/// Resolve the date a user is asking about, relative to `today`.
pub fn resolve(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    if let Some(offset) = RELATIVE_DAYS.first(text) {
        return today.checked_add_days(Days::new(offset));
    }

    let (month, day) = month_day(text)?;
    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if this_year >= today {
        return Some(this_year);
    }
    NaiveDate::from_ymd_opt(today.year() + 1, month, day)
}

/// Full-width digits and separators as typed by CJK input methods, folded to ASCII.
fn fold_full_width(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(u32::from(c) - 0xFEE0).unwrap_or(c),
            '／' => '/',
            '－' => '-',
            '．' => '.',
            _ => c,
        })
        .collect()
}

/// Month and day from the first pattern that matches anywhere in the text.
fn month_day(text: &str) -> Option<(u32, u32)> {
    let text = fold_full_width(text);
    let caps = MONTH_DAY_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(&text))?;

    let month = caps.get(1)?.as_str().parse().ok()?;
    let day = caps.get(2)?.as_str().parse().ok()?;
    Some((month, day))
}

/// Example inputs built from today's date, e.g. `1/7、01/07、1.7、1月7日、明天、後天`.
pub fn date_examples(today: NaiveDate) -> String {
    let (m, d) = (today.month(), today.day());
    format!("{m}/{d}、{m:02}/{d:02}、{m}.{d}、{m}月{d}日、明天、後天")
}
