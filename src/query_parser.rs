//! Free-text travel query parsing
//!
//! Extracts source, destination, date and fare class from requests such
//! as "trains from Delhi to Mumbai in sleeper class tomorrow". Nothing in
//! here fails: a field that cannot be extracted stays empty or takes its
//! default.

use crate::date_resolver::DateResolver;
use crate::models::TravelQuery;
use crate::vocabulary::{ClassVocabulary, detect_cabin_class, detect_mode};
use chrono::{Local, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, instrument};

/// Route extraction rules, tried top to bottom. The first rule that
/// yields anything wins and later rules are not consulted.
const ROUTE_RULES: [RouteRule; 2] = [RouteRule::Between, RouteRule::FromTo];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouteRule {
    /// "between A and B"
    Between,
    /// "from A to" then "to B", anchored on the source match when there is one
    FromTo,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Route {
    source: String,
    destination: String,
}

/// Parser turning free text into a [`TravelQuery`]
#[derive(Debug, Clone, Default)]
pub struct QueryParser {
    vocabulary: ClassVocabulary,
}

impl QueryParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `query`, resolving dates against the local clock
    #[must_use]
    pub fn parse(&self, query: &str) -> TravelQuery {
        self.parse_at(query, Local::now().date_naive())
    }

    /// Parse `query`, resolving dates relative to `today`
    #[instrument(level = "debug", skip(self))]
    #[must_use]
    pub fn parse_at(&self, query: &str, today: NaiveDate) -> TravelQuery {
        let route = ROUTE_RULES
            .iter()
            .find_map(|rule| {
                let route = apply_route_rule(*rule, query)?;
                debug!("Route rule {:?} matched: {:?}", rule, route);
                Some(route)
            })
            .unwrap_or_default();

        let fare_class = self.vocabulary.classify(query);
        let date_phrase = extract_date_phrase(query);
        let date = DateResolver::resolve_at(date_phrase.as_deref(), today);

        let mut travel_query = TravelQuery::new(route.source, route.destination, date, fare_class);
        travel_query.mode = detect_mode(query);
        travel_query.cabin_class = detect_cabin_class(query);

        debug!(
            "Parsed query: {} -> {} on {} ({})",
            travel_query.source,
            travel_query.destination,
            travel_query.date,
            travel_query.fare_class
        );
        travel_query
    }
}

fn apply_route_rule(rule: RouteRule, query: &str) -> Option<Route> {
    match rule {
        RouteRule::Between => {
            let caps = between_regex().captures(query)?;
            Some(Route {
                source: title_case(&caps[1]),
                destination: title_case(&caps[2]),
            })
        }
        RouteRule::FromTo => {
            let from = from_regex().captures(query);
            let source = from
                .as_ref()
                .map(|caps| title_case(&caps[1]))
                .unwrap_or_default();

            // The destination search is not independent of the source match:
            // it starts at the "to" closing "from A to", so a leading
            // "want to travel" is not taken as a city. Without a source
            // match it scans the whole query.
            let offset = from
                .as_ref()
                .and_then(|caps| caps.get(0))
                .map(|m| m.end() - 2)
                .unwrap_or(0);
            let destination = to_regex()
                .captures(&query[offset..])
                .map(|caps| title_case(&caps[1]))
                .unwrap_or_default();

            if source.is_empty() && destination.is_empty() {
                None
            } else {
                Some(Route {
                    source,
                    destination,
                })
            }
        }
    }
}

fn extract_date_phrase(query: &str) -> Option<String> {
    date_regex()
        .captures(query)
        .map(|caps| caps[1].trim().to_string())
}

/// Upper-case the first letter of each word, lower-case the rest
fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.trim().chars() {
        if c.is_alphabetic() {
            if at_word_start {
                result.extend(c.to_uppercase());
            } else {
                result.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            result.push(c);
            at_word_start = true;
        }
    }
    result
}

fn between_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(
            r"(?i)\bbetween\s+([a-z\s]+?)\s+and\s+([a-z\s]+?)(?:\s+(?:in|on|for)\b|\s*[^a-z\s]|\s*$)",
        )
        .expect("Invalid between regex")
    })
}

fn from_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?i)\bfrom\s+([a-z\s]+?)\s+to\b").expect("Invalid from regex")
    })
}

fn to_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?i)\bto\s+([a-z\s]+?)(?:\s+(?:in|on|for)\b|\s*[^a-z\s]|\s*$)")
            .expect("Invalid to regex")
    })
}

fn date_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?i)\bon\s+([a-z0-9,/.\-\s]+)").expect("Invalid date regex")
    })
}
