//! Date expression resolution
//!
//! Turns phrases like "tomorrow", "next friday", "15th june" or
//! "2025-06-01" into a calendar date. Anything unrecognised, including no
//! phrase at all, resolves to the day after the moment of resolution.
//! Resolution never fails.

use crate::models::DATE_FORMAT;
use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const NUMERIC_FORMATS: [&str; 4] = [DATE_FORMAT, "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// Resolves optional date expressions to `YYYY-MM-DD` dates
pub struct DateResolver;

impl DateResolver {
    /// Resolve against the local clock and format as `YYYY-MM-DD`
    #[must_use]
    pub fn resolve(expression: Option<&str>) -> String {
        Self::resolve_at(expression, Local::now().date_naive())
            .format(DATE_FORMAT)
            .to_string()
    }

    /// Resolve relative to a fixed `today`
    #[must_use]
    pub fn resolve_at(expression: Option<&str>, today: NaiveDate) -> NaiveDate {
        let Some(expression) = expression else {
            return Self::tomorrow(today);
        };

        let normalized = normalize(expression);
        let words: Vec<&str> = normalized.split_whitespace().collect();

        // Longest leading word sequence that parses wins, so trailing
        // context such as "friday in sleeper class" still resolves.
        for len in (1..=words.len()).rev() {
            let phrase = words[..len].join(" ");
            if let Some(date) = parse_phrase(&phrase, today) {
                debug!("Resolved date phrase '{}' to {}", phrase, date);
                return date;
            }
        }

        debug!("Unrecognised date phrase '{}', using tomorrow", expression);
        Self::tomorrow(today)
    }

    #[must_use]
    pub fn tomorrow(today: NaiveDate) -> NaiveDate {
        today + Duration::days(1)
    }
}

fn normalize(expression: &str) -> String {
    expression
        .to_lowercase()
        .replace(',', " ")
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string()
}

fn parse_phrase(phrase: &str, today: NaiveDate) -> Option<NaiveDate> {
    parse_relative(phrase, today)
        .or_else(|| parse_weekday(phrase, today))
        .or_else(|| parse_numeric(phrase))
        .or_else(|| parse_day_month(phrase, today))
        .or_else(|| parse_month_day(phrase, today))
}

fn parse_relative(phrase: &str, today: NaiveDate) -> Option<NaiveDate> {
    static IN_DAYS: OnceLock<Regex> = OnceLock::new();
    static DAYS_FROM_NOW: OnceLock<Regex> = OnceLock::new();

    let offset = match phrase {
        "today" | "tonight" => Some(0),
        "tomorrow" => Some(1),
        "day after tomorrow" | "the day after tomorrow" => Some(2),
        "yesterday" => Some(-1),
        "next week" => Some(7),
        _ => None,
    };
    if let Some(days) = offset {
        return Some(today + Duration::days(days));
    }

    let in_days = IN_DAYS
        .get_or_init(|| Regex::new(r"^in (\d{1,3}) days?$").expect("Invalid relative date regex"));
    let from_now = DAYS_FROM_NOW.get_or_init(|| {
        Regex::new(r"^(\d{1,3}) days? from (?:now|today)$").expect("Invalid relative date regex")
    });

    in_days
        .captures(phrase)
        .or_else(|| from_now.captures(phrase))
        .and_then(|caps| caps[1].parse::<i64>().ok())
        .map(|days| today + Duration::days(days))
}

/// Weekday names resolve to their next occurrence strictly after today
fn parse_weekday(phrase: &str, today: NaiveDate) -> Option<NaiveDate> {
    let name = ["this ", "next ", "coming "]
        .iter()
        .find_map(|prefix| phrase.strip_prefix(prefix))
        .unwrap_or(phrase);

    let weekday = match name {
        "monday" | "mon" => Weekday::Mon,
        "tuesday" | "tue" | "tues" => Weekday::Tue,
        "wednesday" | "wed" => Weekday::Wed,
        "thursday" | "thu" | "thurs" => Weekday::Thu,
        "friday" | "fri" => Weekday::Fri,
        "saturday" | "sat" => Weekday::Sat,
        "sunday" | "sun" => Weekday::Sun,
        _ => return None,
    };

    let current = today.weekday().num_days_from_monday() as i64;
    let target = weekday.num_days_from_monday() as i64;
    let mut ahead = (target - current).rem_euclid(7);
    if ahead == 0 {
        ahead = 7;
    }
    Some(today + Duration::days(ahead))
}

fn parse_numeric(phrase: &str) -> Option<NaiveDate> {
    NUMERIC_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(phrase, format).ok())
}

fn parse_day_month(phrase: &str, today: NaiveDate) -> Option<NaiveDate> {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = REGEX.get_or_init(|| {
        Regex::new(r"^(\d{1,2})(?:st|nd|rd|th)?(?: of)? ([a-z]+)(?: (\d{4}))?$")
            .expect("Invalid day-month regex")
    });
    let caps = regex.captures(phrase)?;
    let day = caps[1].parse().ok()?;
    let month = month_from_name(&caps[2])?;
    let year = caps.get(3).and_then(|m| m.as_str().parse().ok());
    build_date(year, month, day, today)
}

fn parse_month_day(phrase: &str, today: NaiveDate) -> Option<NaiveDate> {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = REGEX.get_or_init(|| {
        Regex::new(r"^([a-z]+) (\d{1,2})(?:st|nd|rd|th)?(?: (\d{4}))?$")
            .expect("Invalid month-day regex")
    });
    let caps = regex.captures(phrase)?;
    let month = month_from_name(&caps[1])?;
    let day = caps[2].parse().ok()?;
    let year = caps.get(3).and_then(|m| m.as_str().parse().ok());
    build_date(year, month, day, today)
}

/// Full month names or any prefix of at least three letters ("jun", "sept")
fn month_from_name(word: &str) -> Option<u32> {
    if word.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|month| month.starts_with(word))
        .map(|index| index as u32 + 1)
}

/// Dates without a year take the next occurrence on or after today
fn build_date(year: Option<i32>, month: u32, day: u32, today: NaiveDate) -> Option<NaiveDate> {
    if let Some(year) = year {
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day);
    match this_year {
        Some(date) if date >= today => Some(date),
        _ => NaiveDate::from_ymd_opt(today.year() + 1, month, day),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // A Wednesday
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 28).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    #[case(Some("sometime soon"))]
    #[case(Some("31 february"))]
    fn test_defaults_to_tomorrow(#[case] expression: Option<&str>) {
        assert_eq!(DateResolver::resolve_at(expression, today()), ymd(2025, 5, 29));
    }

    #[rstest]
    #[case("today", ymd(2025, 5, 28))]
    #[case("Tomorrow", ymd(2025, 5, 29))]
    #[case("day after tomorrow", ymd(2025, 5, 30))]
    #[case("in 3 days", ymd(2025, 5, 31))]
    #[case("10 days from now", ymd(2025, 6, 7))]
    #[case("next week", ymd(2025, 6, 4))]
    fn test_relative_phrases(#[case] expression: &str, #[case] expected: NaiveDate) {
        assert_eq!(DateResolver::resolve_at(Some(expression), today()), expected);
    }

    #[rstest]
    #[case("friday", ymd(2025, 5, 30))]
    #[case("next monday", ymd(2025, 6, 2))]
    #[case("this sat", ymd(2025, 5, 31))]
    #[case("wednesday", ymd(2025, 6, 4))]
    fn test_weekdays_resolve_forward(#[case] expression: &str, #[case] expected: NaiveDate) {
        assert_eq!(DateResolver::resolve_at(Some(expression), today()), expected);
    }

    #[rstest]
    #[case("2025-06-01", ymd(2025, 6, 1))]
    #[case("01/06/2025", ymd(2025, 6, 1))]
    #[case("15-08-2025", ymd(2025, 8, 15))]
    #[case("15th june", ymd(2025, 6, 15))]
    #[case("1 jan", ymd(2026, 1, 1))]
    #[case("june 15, 2026", ymd(2026, 6, 15))]
    #[case("3rd of sept 2025", ymd(2025, 9, 3))]
    #[case("may 28", ymd(2025, 5, 28))]
    fn test_absolute_and_partial_dates(#[case] expression: &str, #[case] expected: NaiveDate) {
        assert_eq!(DateResolver::resolve_at(Some(expression), today()), expected);
    }

    #[test]
    fn test_trailing_words_are_ignored() {
        assert_eq!(
            DateResolver::resolve_at(Some("friday in sleeper class"), today()),
            ymd(2025, 5, 30)
        );
        assert_eq!(
            DateResolver::resolve_at(Some("15 june for 2 people"), today()),
            ymd(2025, 6, 15)
        );
    }

    #[test]
    fn test_resolve_formats_tomorrow_from_clock() {
        let expected = (Local::now().date_naive() + Duration::days(1))
            .format("%Y-%m-%d")
            .to_string();
        assert_eq!(DateResolver::resolve(None), expected);
        assert_eq!(DateResolver::resolve(Some("")), expected);
    }
}
