//! Parsing of the three booking slots: service, date/time and zip.
//!
//! Every parser returns a [`BookingError::ValidationError`] whose reason is
//! the hint shown before the slot is asked again.

use crate::domain::model::WHEN_FORMAT;
use crate::utils::error::{BookingError, Result};
use crate::utils::validation::is_valid_zip;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

pub const SERVICE_HINT: &str = "Sorry, I didn't catch that trade. Try 'plumber', 'electrician', or 'hvac'.";
pub const WHEN_HINT: &str = "Please use format YYYY-MM-DD HH:MM, for example 2025-10-21 14:30.";
pub const ZIP_HINT: &str = "Please enter a valid 5-digit zip code.";

const BUILTIN_SYNONYMS: &[(&str, &str)] = &[
    ("plumber", "plumbing"),
    ("plumbing", "plumbing"),
    ("electrician", "electrical"),
    ("electrical", "electrical"),
    ("hvac", "hvac"),
    ("air conditioning", "hvac"),
    ("aircon", "hvac"),
    ("ac", "hvac"),
];

const ACCEPTED_WHEN_FORMATS: &[&str] = &[WHEN_FORMAT, "%Y-%m-%dT%H:%M"];

/// Maps what people type ("plumber") to the service keyword technicians
/// are indexed by ("plumbing").
#[derive(Debug, Clone)]
pub struct SynonymTable {
    entries: BTreeMap<String, String>,
}

impl Default for SynonymTable {
    fn default() -> Self {
        let entries = BUILTIN_SYNONYMS
            .iter()
            .map(|(word, service)| (word.to_string(), service.to_string()))
            .collect();
        Self { entries }
    }
}

impl SynonymTable {
    /// Built-in synonyms plus `extra`; entries in `extra` win.
    pub fn with_extra(extra: &BTreeMap<String, String>) -> Self {
        let mut table = Self::default();
        for (word, service) in extra {
            table
                .entries
                .insert(word.trim().to_lowercase(), service.trim().to_lowercase());
        }
        table
    }

    pub fn normalize_service(&self, raw: &str) -> Result<String> {
        let text = raw.trim().to_lowercase();
        if text.is_empty() {
            return Err(BookingError::validation("service", raw, SERVICE_HINT));
        }
        self.entries
            .get(&text)
            .cloned()
            .ok_or_else(|| BookingError::validation("service", raw, SERVICE_HINT))
    }
}

pub fn parse_when(raw: &str) -> Result<NaiveDateTime> {
    let text = raw.trim();
    ACCEPTED_WHEN_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .ok_or_else(|| BookingError::validation("date/time", raw, WHEN_HINT))
}

/// Keeps the digits of the input, so "94 113" is accepted but "94113-1234"
/// is not.
pub fn parse_zip(raw: &str) -> Result<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if !is_valid_zip(&digits) {
        return Err(BookingError::validation("zip", raw, ZIP_HINT));
    }
    Ok(digits)
}
