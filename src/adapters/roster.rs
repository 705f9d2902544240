use crate::domain::model::{AvailabilityWindow, Technician};
use crate::domain::ports::TechnicianDirectory;
use crate::utils::error::{BookingError, Result};
use crate::utils::validation::validate_zip;
use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(rename = "Technician_Profiles", default)]
    technician_profiles: Vec<TechnicianProfile>,
}

#[derive(Debug, Deserialize)]
struct TechnicianProfile {
    id: u32,
    name: String,
    #[serde(default)]
    zones: Vec<String>,
    #[serde(default)]
    business_units: Vec<String>,
    #[serde(default)]
    services: Option<Vec<String>>,
    #[serde(default)]
    availability: Vec<AvailabilityWindow>,
}

impl TechnicianProfile {
    fn into_technician(self) -> Result<Technician> {
        if self.zones.is_empty() {
            return Err(BookingError::RosterError {
                message: format!("technician {} ({}) serves no zip codes", self.id, self.name),
            });
        }
        for zip in &self.zones {
            validate_zip(&format!("Technician_Profiles[{}].zones", self.id), zip)
                .map_err(|e| BookingError::RosterError { message: e.to_string() })?;
        }
        for window in &self.availability {
            if window.start >= window.end {
                return Err(BookingError::RosterError {
                    message: format!("technician {} has an availability window ending before it starts", self.id),
                });
            }
        }

        let business_units: BTreeSet<String> = self
            .business_units
            .iter()
            .map(|unit| unit.trim().to_lowercase())
            .collect();
        let services = match self.services {
            Some(services) => services.iter().map(|s| s.trim().to_lowercase()).collect(),
            None => business_units.clone(),
        };

        Ok(Technician {
            id: self.id,
            name: self.name,
            services,
            business_units,
            zips: self.zones.into_iter().collect(),
            availability: self.availability,
        })
    }
}

/// Technician roster read from the `Technician_Profiles` JSON document.
#[derive(Debug, Clone, Default)]
pub struct JsonRoster {
    technicians: Vec<Technician>,
}

impl JsonRoster {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| BookingError::RosterError {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        let roster = Self::from_json_str(&content)?;
        tracing::info!("Loaded {} technicians from {}", roster.technicians.len(), path.display());
        Ok(roster)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: RosterFile = serde_json::from_str(content)?;

        let mut seen = HashSet::new();
        let mut technicians = Vec::with_capacity(file.technician_profiles.len());
        for profile in file.technician_profiles {
            if !seen.insert(profile.id) {
                return Err(BookingError::RosterError {
                    message: format!("duplicate technician id {}", profile.id),
                });
            }
            technicians.push(profile.into_technician()?);
        }
        Ok(Self { technicians })
    }

    pub fn len(&self) -> usize {
        self.technicians.len()
    }

    pub fn is_empty(&self) -> bool {
        self.technicians.is_empty()
    }
}

impl TechnicianDirectory for JsonRoster {
    fn technicians(&self) -> &[Technician] {
        &self.technicians
    }
}
