#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::dialog::DEFAULT_CONFIRMATION_PREFIX;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_confirmation_prefix, validate_path, Validate};
use std::collections::BTreeMap;
use toml_config::TomlConfig;

pub const DEFAULT_DATA_FILE: &str = "data.json";
pub const DEFAULT_APPOINTMENTS_FILE: &str = "appointments.jsonl";

/// Effective settings after defaults, the optional TOML file and command
/// line flags have been applied, in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_file: String,
    pub appointments_file: String,
    pub confirmation_prefix: String,
    pub synonyms: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: DEFAULT_DATA_FILE.to_string(),
            appointments_file: DEFAULT_APPOINTMENTS_FILE.to_string(),
            confirmation_prefix: DEFAULT_CONFIRMATION_PREFIX.to_string(),
            synonyms: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn apply_toml(&mut self, config: &TomlConfig) {
        if let Some(path) = config.data_file() {
            self.data_file = path.to_string();
        }
        if let Some(path) = config.appointments_file() {
            self.appointments_file = path.to_string();
        }
        if let Some(prefix) = config.confirmation_prefix() {
            self.confirmation_prefix = prefix.to_string();
        }
        if let Some(synonyms) = &config.synonyms {
            self.synonyms
                .extend(synonyms.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
    }
}

impl ConfigProvider for Settings {
    fn data_file(&self) -> &str {
        &self.data_file
    }

    fn appointments_file(&self) -> &str {
        &self.appointments_file
    }

    fn confirmation_prefix(&self) -> &str {
        &self.confirmation_prefix
    }

    fn extra_synonyms(&self) -> &BTreeMap<String, String> {
        &self.synonyms
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_path("data_file", &self.data_file)?;
        validate_path("appointments_file", &self.appointments_file)?;
        validate_confirmation_prefix("confirmation_prefix", &self.confirmation_prefix)?;
        Ok(())
    }
}
