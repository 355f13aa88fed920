//! Rule-based intent classifier.
//!
//! Checks run in a fixed order and the first match wins: creator identity,
//! creator contact, educational, then rejection. All matching is done on the
//! lower-cased text with plain substring search, so a phrase inside a longer
//! word still matches ("how" inside "show").

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::Intent;

const CREATOR_IDENTITY_PHRASES: &[&str] = &[
    "who created you",
    "who made you",
    "who developed you",
    "who is your creator",
    "your creator",
];

const CREATOR_CONTACT_PHRASES: &[&str] = &[
    "creator info",
    "owner info",
    "contact the creator",
    "contact info",
    "who is okafor",
    "how to contact okafor",
    "my info",
];

const INSTITUTION_MARKERS: &[&str] = &["unizik", "nnamdi azikiwe"];

const EDUCATIONAL_KEYWORDS: &[&str] = &[
    "define",
    "definition",
    "explain",
    "what",
    "why",
    "how",
    "solve",
    "calculate",
    "theorem",
    "proof",
    "example",
    "syllabus",
    "lecture",
    "course",
    "exam",
    "past question",
    "assignment",
    "lecture notes",
    "tutorial",
    "lab",
    "practical",
    "essay",
    "reading",
    "unizik",
    "nnamdi azikiwe",
    "nnamdi azikiwe university",
    "faculty",
    "department",
    "semester",
    "result",
    "timetable",
];

fn lead_word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(what|why|how|explain|define|show|compare|calculate)\b")
            .expect("valid regex")
    })
}

/// Assign exactly one intent to `text`. Never fails.
pub fn classify(text: &str) -> Intent {
    let t = text.to_lowercase();

    if is_creator_query(&t) {
        return Intent::CreatorIdentity;
    }
    if is_creator_info_query(&t) {
        return Intent::CreatorContact;
    }
    if is_educational(&t) {
        return Intent::Educational;
    }
    Intent::Rejected
}

fn contains_any(t: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| t.contains(p))
}

fn is_creator_query(t: &str) -> bool {
    contains_any(t, CREATOR_IDENTITY_PHRASES)
}

fn is_creator_info_query(t: &str) -> bool {
    contains_any(t, CREATOR_CONTACT_PHRASES)
}

fn is_educational(t: &str) -> bool {
    if contains_any(t, INSTITUTION_MARKERS) {
        return true;
    }
    if starts_with_lead_word(t) {
        return true;
    }
    contains_any(t, EDUCATIONAL_KEYWORDS)
}

fn starts_with_lead_word(t: &str) -> bool {
    lead_word_re().is_match(t)
}
