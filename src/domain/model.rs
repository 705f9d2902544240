use chrono::{DateTime, Datelike, NaiveDateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Timestamp format used at the prompt, in confirmations and in the log.
pub const WHEN_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn format_when(when: &NaiveDateTime) -> String {
    when.format(WHEN_FORMAT).to_string()
}

/// A weekly window during which a technician takes jobs. `start` is
/// inclusive, `end` exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub days: Vec<Weekday>,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl AvailabilityWindow {
    pub fn contains(&self, when: &NaiveDateTime) -> bool {
        let time = when.time();
        self.days.contains(&when.weekday()) && self.start <= time && time < self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Technician {
    pub id: u32,
    pub name: String,
    pub services: BTreeSet<String>,
    pub business_units: BTreeSet<String>,
    pub zips: BTreeSet<String>,
    /// Empty means the technician can be booked at any time.
    pub availability: Vec<AvailabilityWindow>,
}

impl Technician {
    pub fn provides(&self, service: &str) -> bool {
        self.services.contains(service)
    }

    pub fn covers(&self, zip: &str) -> bool {
        self.zips.contains(zip)
    }

    pub fn works_at(&self, when: &NaiveDateTime) -> bool {
        self.availability.is_empty() || self.availability.iter().any(|w| w.contains(when))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub service: String,
    pub when: NaiveDateTime,
    pub zip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub confirmation_id: String,
    pub technician_id: u32,
    pub technician_name: String,
    pub service: String,
    #[serde(with = "when_format")]
    pub when: NaiveDateTime,
    pub zip: String,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    pub fn book(prefix: &str, technician: &Technician, request: &BookingRequest) -> Self {
        Self {
            confirmation_id: confirmation_id(prefix, technician.id, &request.when),
            technician_id: technician.id,
            technician_name: technician.name.clone(),
            service: request.service.clone(),
            when: request.when,
            zip: request.zip.clone(),
            created_at: Utc::now(),
        }
    }
}

/// `PREFIX-####-YYYYMMDDTHHMM`. A technician holds at most one appointment
/// per start time, so the id is unique across the log.
pub fn confirmation_id(prefix: &str, technician_id: u32, when: &NaiveDateTime) -> String {
    format!("{}-{:04}-{}", prefix, technician_id, when.format("%Y%m%dT%H%M"))
}

/// Start times already taken, keyed by technician.
#[derive(Debug, Clone, Default)]
pub struct BookedSlots {
    slots: HashSet<(u32, NaiveDateTime)>,
}

impl BookedSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, technician_id: u32, when: NaiveDateTime) {
        self.slots.insert((technician_id, when));
    }

    pub fn is_booked(&self, technician_id: u32, when: &NaiveDateTime) -> bool {
        self.slots.contains(&(technician_id, *when))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<'a> FromIterator<&'a Appointment> for BookedSlots {
    fn from_iter<I: IntoIterator<Item = &'a Appointment>>(iter: I) -> Self {
        let mut booked = BookedSlots::new();
        for appointment in iter {
            booked.insert(appointment.technician_id, appointment.when);
        }
        booked
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoursRule {
    Standard,
    Extended,
}

impl HoursRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            HoursRule::Standard => "Mon–Fri 09:00–17:00",
            HoursRule::Extended => "Mon–Sat 08:00–18:00",
        }
    }
}

impl fmt::Display for HoursRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

mod when_format {
    use super::WHEN_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(when: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&when.format(WHEN_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, WHEN_FORMAT).map_err(serde::de::Error::custom)
    }
}
