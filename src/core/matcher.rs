use crate::domain::model::{BookedSlots, BookingRequest, HoursRule, Technician};
use crate::domain::ports::TechnicianDirectory;
use std::collections::{BTreeMap, BTreeSet};

/// Zips covered by at least this many technicians get extended hours.
const EXTENDED_HOURS_MIN_TECHNICIANS: usize = 2;

/// Queries over an immutable roster. Every operation is a pure function of
/// the roster (and, for `find_match`, the booked slots).
#[derive(Debug, Clone, Copy)]
pub struct BookingMatcher<'a> {
    technicians: &'a [Technician],
}

impl<'a> BookingMatcher<'a> {
    pub fn new<D: TechnicianDirectory + ?Sized>(directory: &'a D) -> Self {
        Self {
            technicians: directory.technicians(),
        }
    }

    /// First technician in roster order that provides the service, covers
    /// the zip and is free at the requested time.
    pub fn find_match(&self, request: &BookingRequest, booked: &BookedSlots) -> Option<&'a Technician> {
        let found = self.technicians.iter().find(|tech| {
            tech.provides(&request.service)
                && tech.covers(&request.zip)
                && tech.works_at(&request.when)
                && !booked.is_booked(tech.id, &request.when)
        });

        match found {
            Some(tech) => tracing::debug!(
                "Matched technician {} ({}) for {} in {}",
                tech.id,
                tech.name,
                request.service,
                request.zip
            ),
            None => tracing::debug!(
                "No technician for {} in {} at {}",
                request.service,
                request.zip,
                request.when
            ),
        }
        found
    }

    pub fn list_covered_zips(&self) -> BTreeSet<String> {
        self.technicians
            .iter()
            .flat_map(|tech| tech.zips.iter().cloned())
            .collect()
    }

    /// Only meaningful for zips in [`Self::list_covered_zips`].
    pub fn derive_hours(&self, zip: &str) -> HoursRule {
        let covering = self.technicians.iter().filter(|tech| tech.covers(zip)).count();
        hours_for_count(covering)
    }

    pub fn hours_by_zip(&self) -> BTreeMap<String, HoursRule> {
        self.list_covered_zips()
            .into_iter()
            .map(|zip| {
                let rule = self.derive_hours(&zip);
                (zip, rule)
            })
            .collect()
    }

    pub fn list_services(&self) -> BTreeSet<String> {
        self.technicians
            .iter()
            .flat_map(|tech| tech.business_units.iter().cloned())
            .collect()
    }
}

fn hours_for_count(count: usize) -> HoursRule {
    if count >= EXTENDED_HOURS_MIN_TECHNICIANS {
        HoursRule::Extended
    } else {
        HoursRule::Standard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::AvailabilityWindow;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};

    fn tech(id: u32, name: &str, services: &[&str], zips: &[&str]) -> Technician {
        Technician {
            id,
            name: name.to_string(),
            services: services.iter().map(|s| s.to_string()).collect(),
            business_units: services.iter().map(|s| s.to_string()).collect(),
            zips: zips.iter().map(|z| z.to_string()).collect(),
            availability: vec![],
        }
    }

    fn tuesday_1430() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 21)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    fn request(service: &str, zip: &str) -> BookingRequest {
        BookingRequest {
            service: service.to_string(),
            when: tuesday_1430(),
            zip: zip.to_string(),
        }
    }

    fn roster() -> Vec<Technician> {
        vec![
            tech(1, "Ava Lee", &["plumbing"], &["94113", "94110"]),
            tech(2, "Ben Ortiz", &["electrical", "hvac"], &["94110"]),
            tech(3, "Cara Diaz", &["plumbing", "hvac"], &["94113", "94103"]),
        ]
    }

    #[test]
    fn test_first_match_in_roster_order() {
        let roster = roster();
        let matcher = BookingMatcher::new(&roster);
        let found = matcher.find_match(&request("plumbing", "94113"), &BookedSlots::new());
        assert_eq!(found.map(|t| t.id), Some(1));
    }

    #[test]
    fn test_all_three_predicates_required() {
        let roster = roster();
        let matcher = BookingMatcher::new(&roster);
        let booked = BookedSlots::new();
        // service offered, zip covered, but never by the same technician
        assert!(matcher.find_match(&request("electrical", "94113"), &booked).is_none());
        assert!(matcher.find_match(&request("plumbing", "99999"), &booked).is_none());
        assert!(matcher.find_match(&request("carpentry", "94110"), &booked).is_none());
        assert_eq!(
            matcher.find_match(&request("hvac", "94103"), &booked).map(|t| t.id),
            Some(3)
        );
    }

    #[test]
    fn test_availability_window_excludes_technician() {
        let mut roster = roster();
        roster[0].availability = vec![AvailabilityWindow {
            days: vec![Weekday::Sat],
            start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        }];
        let matcher = BookingMatcher::new(&roster);
        let found = matcher.find_match(&request("plumbing", "94113"), &BookedSlots::new());
        assert_eq!(found.map(|t| t.id), Some(3));
    }

    #[test]
    fn test_booked_slot_falls_through_to_next_technician() {
        let roster = roster();
        let matcher = BookingMatcher::new(&roster);
        let mut booked = BookedSlots::new();
        booked.insert(1, tuesday_1430());
        let found = matcher.find_match(&request("plumbing", "94113"), &booked);
        assert_eq!(found.map(|t| t.id), Some(3));

        booked.insert(3, tuesday_1430());
        assert!(matcher.find_match(&request("plumbing", "94113"), &booked).is_none());
    }

    #[test]
    fn test_find_match_is_deterministic() {
        let roster = roster();
        let matcher = BookingMatcher::new(&roster);
        let booked = BookedSlots::new();
        let req = request("hvac", "94110");
        let first = matcher.find_match(&req, &booked).map(|t| t.id);
        for _ in 0..10 {
            assert_eq!(matcher.find_match(&req, &booked).map(|t| t.id), first);
        }
        assert_eq!(first, Some(2));
    }

    #[test]
    fn test_covered_zips_deduplicated_and_sorted() {
        let roster = roster();
        let matcher = BookingMatcher::new(&roster);
        let zips: Vec<String> = matcher.list_covered_zips().into_iter().collect();
        assert_eq!(zips, vec!["94103", "94110", "94113"]);
    }

    #[test]
    fn test_derive_hours_boundary() {
        let roster = roster();
        let matcher = BookingMatcher::new(&roster);
        assert_eq!(matcher.derive_hours("94113"), HoursRule::Extended);
        assert_eq!(matcher.derive_hours("94110"), HoursRule::Extended);
        assert_eq!(matcher.derive_hours("94103"), HoursRule::Standard);
        assert_eq!(matcher.derive_hours("94103").as_str(), "Mon–Fri 09:00–17:00");
        assert_eq!(matcher.derive_hours("94113").as_str(), "Mon–Sat 08:00–18:00");
    }

    #[test]
    fn test_hours_by_zip_agrees_with_derive_hours() {
        let roster = roster();
        let matcher = BookingMatcher::new(&roster);
        let hours = matcher.hours_by_zip();
        assert_eq!(hours.len(), matcher.list_covered_zips().len());
        for (zip, rule) in &hours {
            assert_eq!(*rule, matcher.derive_hours(zip));
        }
    }

    #[test]
    fn test_list_services_deduplicated() {
        let roster = roster();
        let matcher = BookingMatcher::new(&roster);
        let services: Vec<String> = matcher.list_services().into_iter().collect();
        assert_eq!(services, vec!["electrical", "hvac", "plumbing"]);
    }

    #[test]
    fn test_empty_roster() {
        let roster: Vec<Technician> = vec![];
        let matcher = BookingMatcher::new(&roster);
        assert!(matcher.list_covered_zips().is_empty());
        assert!(matcher.list_services().is_empty());
        assert!(matcher
            .find_match(&request("plumbing", "94113"), &BookedSlots::new())
            .is_none());
    }
}
