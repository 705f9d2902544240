use crate::utils::error::{BookingError, Result};
use crate::utils::validation::{validate_confirmation_prefix, validate_non_empty_string, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub paths: Option<PathsConfig>,
    pub booking: Option<BookingConfig>,
    pub synonyms: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    pub data_file: Option<String>,
    pub appointments_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingConfig {
    pub confirmation_prefix: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BookingError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BookingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the value of the environment variable. Unset
    /// variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BookingError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn data_file(&self) -> Option<&str> {
        self.paths.as_ref().and_then(|p| p.data_file.as_deref())
    }

    pub fn appointments_file(&self) -> Option<&str> {
        self.paths.as_ref().and_then(|p| p.appointments_file.as_deref())
    }

    pub fn confirmation_prefix(&self) -> Option<&str> {
        self.booking.as_ref().and_then(|b| b.confirmation_prefix.as_deref())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(path) = self.data_file() {
            validate_path("paths.data_file", path)?;
        }
        if let Some(path) = self.appointments_file() {
            validate_path("paths.appointments_file", path)?;
        }
        if let Some(prefix) = self.confirmation_prefix() {
            validate_confirmation_prefix("booking.confirmation_prefix", prefix)?;
        }
        if let Some(synonyms) = &self.synonyms {
            for (word, service) in synonyms {
                validate_non_empty_string("synonyms", word)?;
                validate_non_empty_string(&format!("synonyms.{}", word), service)?;
            }
        }
        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
