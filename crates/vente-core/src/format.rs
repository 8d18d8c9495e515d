//! # Formatter Library
//!
//! Pure functions turning domain values into display strings.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every formatter is TOTAL: it returns a string for any input.           │
//! │                                                                         │
//! │   garbage amount  ──► "0 FCFA"                                          │
//! │   garbage date    ──► ""                                                │
//! │   odd phone       ──► returned unchanged                                │
//! │                                                                         │
//! │  Inputs are borrowed or copied, never mutated.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vente_core::format::{format_currency, format_phone};
//!
//! assert_eq!(format_currency(3500, true), "3 500 FCFA");
//! assert_eq!(format_currency("12 000 FCFA", false), "12 000");
//! assert_eq!(format_phone("22890123456"), "+228 90 12 34 56");
//! ```

use chrono::{Datelike, NaiveDateTime, Timelike};
use std::fmt::Display;

use crate::config::CurrencyFormat;
use crate::money::{Amount, Money};
use crate::types::{DateFormat, DateValue};
use crate::DEFAULT_COUNTRY_PREFIX;

/// Default cut-off for [`truncate_text`].
pub const DEFAULT_TRUNCATE_LENGTH: usize = 50;

/// Default width for [`format_reference`].
pub const DEFAULT_REFERENCE_LENGTH: usize = 4;

const MONTHS: [&str; 12] = [
    "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
    "octobre", "novembre", "décembre",
];

const MONTHS_SHORT: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

const WEEKDAYS: [&str; 7] = [
    "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
];

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

// =============================================================================
// Currency
// =============================================================================

/// Formats an amount with the default currency settings (`3 500 FCFA`).
///
/// The amount is parsed with [`crate::money::parse_amount`] and rounded to
/// whole francs, so the output always parses back to the value it shows.
pub fn format_currency<A: Into<Amount>>(amount: A, show_currency: bool) -> String {
    format_currency_with(amount, show_currency, &CurrencyFormat::default())
}

/// Formats an amount with explicit currency settings.
pub fn format_currency_with<A: Into<Amount>>(
    amount: A,
    show_currency: bool,
    format: &CurrencyFormat,
) -> String {
    let money = Money::from_amount(&amount.into());
    let number = group_thousands(money.units(), &format.group_separator);

    if show_currency {
        format!("{} {}", number, format.suffix)
    } else {
        number
    }
}

fn group_thousands(units: i64, separator: &str) -> String {
    let digits = units.unsigned_abs().to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len() + 1);

    if units < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(c);
    }
    out
}

// =============================================================================
// Dates
// =============================================================================

/// Formats a date in one of the four presentations; unparseable input gives `""`.
///
/// ```rust
/// use vente_core::format::format_date;
/// use vente_core::types::DateFormat;
///
/// assert_eq!(format_date("2024-01-15T14:30:00", DateFormat::Short), "15/01/2024");
/// assert_eq!(format_date("2024-01-15T14:30:00", DateFormat::Medium), "15 janv. 2024");
/// assert_eq!(format_date("2024-01-15T14:30:00", DateFormat::Long), "lundi 15 janvier 2024");
/// assert_eq!(format_date("2024-01-15T14:30:00", DateFormat::Time), "14:30");
/// assert_eq!(format_date("not a date", DateFormat::Short), "");
/// ```
pub fn format_date<D: Into<DateValue>>(date: D, format: DateFormat) -> String {
    let Some(value) = date.into().to_datetime() else {
        return String::new();
    };

    let month = value.month0() as usize;
    match format {
        DateFormat::Short => value.format("%d/%m/%Y").to_string(),
        DateFormat::Medium => format!("{} {} {}", value.day(), MONTHS_SHORT[month], value.year()),
        DateFormat::Long => format!(
            "{} {} {} {}",
            WEEKDAYS[value.weekday().num_days_from_monday() as usize],
            value.day(),
            MONTHS[month],
            value.year()
        ),
        DateFormat::Time => format!("{:02}:{:02}", value.hour(), value.minute()),
    }
}

/// Describes how long ago `date` was, relative to `now`.
///
/// | Elapsed        | Output             |
/// |----------------|--------------------|
/// | < 1 min        | `À l'instant`      |
/// | < 60 min       | `Il y a 5 min`     |
/// | < 24 h         | `Il y a 3h`        |
/// | 1 day          | `Hier`             |
/// | < 7 days       | `Il y a 4 jours`   |
/// | < 30 days      | `Il y a 2 semaines`|
/// | < 365 days     | `Il y a 6 mois`    |
/// | otherwise      | `Il y a 2 ans`     |
///
/// Dates in the future read as `À l'instant`.
pub fn format_relative_time<D: Into<DateValue>>(date: D, now: NaiveDateTime) -> String {
    let Some(then) = date.into().to_datetime() else {
        return String::new();
    };

    let elapsed = now - then;
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        return "À l'instant".to_string();
    }
    if minutes < 60 {
        return format!("Il y a {} min", minutes);
    }

    let hours = elapsed.num_hours();
    if hours < 24 {
        return format!("Il y a {}h", hours);
    }

    let days = elapsed.num_days();
    match days {
        1 => "Hier".to_string(),
        2..=6 => format!("Il y a {} jours", days),
        7..=29 => {
            let weeks = days / 7;
            format!("Il y a {} semaine{}", weeks, plural(weeks))
        }
        30..=364 => format!("Il y a {} mois", days / 30),
        _ => {
            let years = days / 365;
            format!("Il y a {} an{}", years, plural(years))
        }
    }
}

fn plural(count: i64) -> &'static str {
    if count > 1 {
        "s"
    } else {
        ""
    }
}

// =============================================================================
// Phone
// =============================================================================

/// Groups a phone number by pairs, with the default country prefix.
///
/// Only two shapes are recognized; anything else is returned as given.
pub fn format_phone(phone: &str) -> String {
    format_phone_with(phone, DEFAULT_COUNTRY_PREFIX)
}

/// Groups a phone number by pairs for the given country prefix.
pub fn format_phone_with(phone: &str, country_prefix: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() == country_prefix.len() + 8 && digits.starts_with(country_prefix) {
        let local = &digits[country_prefix.len()..];
        return format!("+{} {}", country_prefix, group_pairs(local));
    }
    if digits.len() == 8 {
        return group_pairs(&digits);
    }

    phone.to_string()
}

fn group_pairs(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % 2 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

// =============================================================================
// Numbers
// =============================================================================

/// Renders a percentage value (`18` → `18%`); unparseable input counts as 0.
pub fn format_percentage<A: Into<Amount>>(value: A, decimals: usize) -> String {
    let value = value.into().to_f64().unwrap_or(0.0);
    format!("{:.*}%", decimals, value)
}

/// Renders a duration in minutes as `1h 30min`, omitting a zero part.
pub fn format_duration(minutes: i64) -> String {
    if minutes <= 0 {
        return "0min".to_string();
    }

    let (hours, rest) = (minutes / 60, minutes % 60);
    match (hours, rest) {
        (0, m) => format!("{}min", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}min", h, m),
    }
}

/// Renders a byte count with 1024-based units, at most two decimals.
///
/// ```rust
/// use vente_core::format::format_file_size;
///
/// assert_eq!(format_file_size(0), "0 B");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", text, SIZE_UNITS[unit])
}

// =============================================================================
// Text
// =============================================================================

/// Title-cases every space-separated word (`jean DUPONT` → `Jean Dupont`).
pub fn format_name(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cuts `text` to `max_length` characters followed by `...` when it is longer.
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    let mut out: String = text.chars().take(max_length).collect();
    out.push_str("...");
    out
}

/// Zero-pads a reference on the left (`12` → `0012`).
pub fn format_reference<R: Display>(reference: R, length: usize) -> String {
    format!("{:0>width$}", reference.to_string(), width = length)
}

/// Initials of the first and last words (`Kofi Mensah Agbeko` → `KA`).
pub fn get_initials(name: &str) -> String {
    fn initial(word: &str) -> String {
        word.chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }

    let words: Vec<&str> = name.split_whitespace().collect();
    match words.as_slice() {
        [] => String::new(),
        [only] => initial(only),
        [first, .., last] => initial(first) + &initial(last),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::parse_amount;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0, true), "0 FCFA");
        assert_eq!(format_currency(0, false), "0");
        assert_eq!(format_currency(1234.5, true), "1 235 FCFA");
        assert_eq!(format_currency(1_000_000, true), "1 000 000 FCFA");
        assert_eq!(format_currency(999, false), "999");
        assert_eq!(format_currency(-4500, false), "-4 500");
    }

    #[test]
    fn test_format_currency_suffix_appears_once() {
        let out = format_currency("12 000 FCFA", true);
        assert_eq!(out, "12 000 FCFA");
        assert_eq!(out.matches("FCFA").count(), 1);
    }

    #[test]
    fn test_format_currency_is_total() {
        assert_eq!(format_currency("", true), "0 FCFA");
        assert_eq!(format_currency(None::<f64>, true), "0 FCFA");
        assert_eq!(format_currency(f64::NAN, true), "0 FCFA");
        assert_eq!(format_currency("abc", false), "0");
    }

    #[test]
    fn test_format_currency_round_trip() {
        for n in [0_i64, 7, 999, 1000, 3500, 12_345, 1_000_000, 987_654_321] {
            let first = format_currency(n, true);
            let again = format_currency(parse_amount(&Amount::from(&first)), true);
            assert_eq!(first, again);
            assert_eq!(parse_amount(&Amount::from(&first)), n as f64);
        }

        for x in [0.4, 1234.5, 99.99, 1e9 + 0.7] {
            let first = format_currency(x, true);
            assert_eq!(format_currency(first.as_str(), true), first);
        }
    }

    #[test]
    fn test_format_currency_with_config() {
        let format = CurrencyFormat {
            suffix: "XOF".to_string(),
            group_separator: "'".to_string(),
        };
        assert_eq!(format_currency_with(1_250_000, true, &format), "1'250'000 XOF");
    }

    #[test]
    fn test_format_date_variants() {
        let date = at(2024, 3, 5, 9, 7);
        assert_eq!(format_date(date, DateFormat::Short), "05/03/2024");
        assert_eq!(format_date(date, DateFormat::Medium), "5 mars 2024");
        assert_eq!(format_date(date, DateFormat::Long), "mardi 5 mars 2024");
        assert_eq!(format_date(date, DateFormat::Time), "09:07");
        assert_eq!(format_date("15/08/2023", DateFormat::Long), "mardi 15 août 2023");
        assert_eq!(format_date("", DateFormat::Short), "");
    }

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("22890123456"), "+228 90 12 34 56");
        assert_eq!(format_phone("+228 90-12-34-56"), "+228 90 12 34 56");
        assert_eq!(format_phone("90123456"), "90 12 34 56");
        assert_eq!(format_phone("123"), "123");
        assert_eq!(format_phone("33612345678"), "33612345678");
        assert_eq!(format_phone(""), "");
        assert_eq!(format_phone_with("22990123456", "229"), "+229 90 12 34 56");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(18, 0), "18%");
        assert_eq!(format_percentage(12.346, 2), "12.35%");
        assert_eq!(format_percentage("n/a", 1), "0.0%");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(90), "1h 30min");
        assert_eq!(format_duration(120), "2h");
        assert_eq!(format_duration(45), "45min");
        assert_eq!(format_duration(0), "0min");
        assert_eq!(format_duration(-5), "0min");
    }

    #[test]
    fn test_format_name() {
        assert_eq!(format_name("jean DUPONT"), "Jean Dupont");
        assert_eq!(format_name("éloïse"), "Éloïse");
        assert_eq!(format_name(""), "");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(500), "500 B");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1_234_567), "1.18 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
        assert_eq!(format_file_size(5000 * 1024 * 1024 * 1024), "5000 GB");
    }

    #[test]
    fn test_format_relative_time_buckets() {
        let now = at(2024, 6, 30, 12, 0);
        let cases = [
            (at(2024, 6, 30, 11, 59), "Il y a 1 min"),
            (at(2024, 6, 30, 12, 0), "À l'instant"),
            (at(2024, 6, 30, 11, 15), "Il y a 45 min"),
            (at(2024, 6, 30, 7, 0), "Il y a 5h"),
            (at(2024, 6, 29, 12, 0), "Hier"),
            (at(2024, 6, 27, 12, 0), "Il y a 3 jours"),
            (at(2024, 6, 23, 12, 0), "Il y a 1 semaine"),
            (at(2024, 6, 9, 12, 0), "Il y a 3 semaines"),
            (at(2024, 3, 30, 12, 0), "Il y a 3 mois"),
            (at(2022, 6, 1, 12, 0), "Il y a 2 ans"),
            (at(2024, 7, 1, 12, 0), "À l'instant"),
        ];
        for (date, expected) in cases {
            assert_eq!(format_relative_time(date, now), expected, "{}", date);
        }
        assert_eq!(format_relative_time("garbage", now), "");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("court", DEFAULT_TRUNCATE_LENGTH), "court");
        assert_eq!(truncate_text("abcdef", 6), "abcdef");
        assert_eq!(truncate_text("abcdefg", 6), "abcdef...");
        assert_eq!(truncate_text("éééé", 2), "éé...");
    }

    #[test]
    fn test_format_reference() {
        assert_eq!(format_reference(12, DEFAULT_REFERENCE_LENGTH), "0012");
        assert_eq!(format_reference("7", 3), "007");
        assert_eq!(format_reference(123456, 4), "123456");
    }

    #[test]
    fn test_get_initials() {
        assert_eq!(get_initials("Kofi Mensah Agbeko"), "KA");
        assert_eq!(get_initials("ama"), "A");
        assert_eq!(get_initials("  "), "");
    }
}
