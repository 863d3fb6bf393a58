//! Fare-class vocabulary
//!
//! Maps natural-language class phrases ("first ac", "chair car") and bare
//! class codes ("2A", "SL") onto [`FareClass`]. Matching runs over an
//! ordered rule list: the first matching phrase rule wins, then any rule
//! flagged as an override is evaluated and, if it matches, supersedes the
//! phrase result.
//!
//! The override exception is load-bearing. A bare code anywhere in the
//! query beats a phrase, so "second ac, or 3A if full" resolves to `3A`
//! and "first ac sleeper" resolves to `SL`. Keep this ordering when
//! touching the rule list.

use crate::models::{CabinClass, FareClass, TransportMode};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Phrase table in enumeration order. Earlier phrases win.
const PHRASES: [(&str, FareClass); 6] = [
    ("first ac", FareClass::FirstAc),
    ("second ac", FareClass::SecondAc),
    ("third ac", FareClass::ThirdAc),
    ("sleeper", FareClass::Sleeper),
    ("chair car", FareClass::ChairCar),
    ("second sitting", FareClass::SecondSitting),
];

/// How a single class rule inspects the query
#[derive(Debug, Clone, Copy)]
enum ClassMatcher {
    /// Substring of the lowercased query
    Phrase(&'static str, FareClass),
    /// Bare code or the literal "sleeper" as a whole word, any case
    BareCode,
}

#[derive(Debug, Clone, Copy)]
struct ClassRule {
    matcher: ClassMatcher,
    /// Override rules are evaluated after the first-match pass and replace its result
    overrides: bool,
}

/// Static bidirectional mapping between class phrases and codes
#[derive(Debug, Clone)]
pub struct ClassVocabulary {
    rules: Vec<ClassRule>,
}

impl Default for ClassVocabulary {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassVocabulary {
    #[must_use]
    pub fn new() -> Self {
        let mut rules: Vec<ClassRule> = PHRASES
            .iter()
            .map(|&(phrase, class)| ClassRule {
                matcher: ClassMatcher::Phrase(phrase, class),
                overrides: false,
            })
            .collect();
        rules.push(ClassRule {
            matcher: ClassMatcher::BareCode,
            overrides: true,
        });
        Self { rules }
    }

    /// Resolve the fare class mentioned in `text`, defaulting to `3A`
    #[must_use]
    pub fn classify(&self, text: &str) -> FareClass {
        let lowered = text.to_lowercase();

        let first_match = self
            .rules
            .iter()
            .filter(|rule| !rule.overrides)
            .find_map(|rule| Self::apply(rule.matcher, text, &lowered));

        let overridden = self
            .rules
            .iter()
            .filter(|rule| rule.overrides)
            .find_map(|rule| Self::apply(rule.matcher, text, &lowered));

        match (first_match, overridden) {
            (_, Some(code)) => {
                if let Some(phrase) = first_match.filter(|p| *p != code) {
                    debug!("Bare class code {} overrides phrase match {}", code, phrase);
                }
                code
            }
            (Some(phrase), None) => phrase,
            (None, None) => FareClass::default(),
        }
    }

    /// Reverse lookup: the phrase users write for a class, if it has one
    #[must_use]
    pub fn phrase_for(&self, class: FareClass) -> Option<&'static str> {
        PHRASES
            .iter()
            .find(|(_, candidate)| *candidate == class)
            .map(|(phrase, _)| *phrase)
    }

    fn apply(matcher: ClassMatcher, text: &str, lowered: &str) -> Option<FareClass> {
        match matcher {
            ClassMatcher::Phrase(phrase, class) => lowered.contains(phrase).then_some(class),
            ClassMatcher::BareCode => bare_code_regex()
                .captures(text)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<FareClass>().ok()),
        }
    }
}

fn bare_code_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?i)\b(1A|2A|3A|SL|CC|2S|sleeper)\b").expect("Invalid class code regex")
    })
}

/// Detect whether the query asks about flights rather than trains
///
/// Trains win unless a flight keyword is present.
#[must_use]
pub fn detect_mode(text: &str) -> TransportMode {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = REGEX.get_or_init(|| {
        Regex::new(r"(?i)\b(flights?|fly|flying|plane|airlines?|airport)\b")
            .expect("Invalid transport mode regex")
    });
    if regex.is_match(text) {
        TransportMode::Flight
    } else {
        TransportMode::Train
    }
}

/// Detect the flight cabin tier, defaulting to economy
#[must_use]
pub fn detect_cabin_class(text: &str) -> CabinClass {
    let lowered = text.to_lowercase();
    if lowered.contains("business") {
        CabinClass::Business
    } else if lowered.contains("first class") && !lowered.contains("first ac") {
        CabinClass::First
    } else {
        CabinClass::Economy
    }
}
