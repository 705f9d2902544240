use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Roster error: {message}")]
    RosterError { message: String },

    #[error("Invalid {field} '{value}': {reason}")]
    ValidationError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Could not save appointment: {message}")]
    PersistenceError { message: String },
}

impl BookingError {
    pub fn validation(field: &str, value: &str, reason: impl Into<String>) -> Self {
        BookingError::ValidationError {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Short message suitable for printing to the person at the prompt.
    pub fn user_friendly_message(&self) -> String {
        match self {
            BookingError::IoError(e) => format!("A file could not be read or written: {}", e),
            BookingError::SerializationError(e) => format!("A data file is not valid JSON: {}", e),
            BookingError::ConfigError { .. }
            | BookingError::ConfigValidationError { .. }
            | BookingError::InvalidConfigValueError { .. } => format!("The configuration is invalid. {}", self),
            BookingError::RosterError { message } => {
                format!("The technician roster could not be loaded: {}", message)
            }
            BookingError::ValidationError { reason, .. } => reason.clone(),
            BookingError::PersistenceError { message } => {
                format!("Your appointment could not be saved: {}", message)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BookingError::IoError(_) => "Check that the file exists and that you have permission to access it.",
            BookingError::SerializationError(_) | BookingError::RosterError { .. } => {
                "Check the roster file against the Technician_Profiles format."
            }
            BookingError::ConfigError { .. }
            | BookingError::ConfigValidationError { .. }
            | BookingError::InvalidConfigValueError { .. } => "Fix the config file or command line flags and try again.",
            BookingError::ValidationError { .. } => "Re-enter the value in the requested format.",
            BookingError::PersistenceError { .. } => {
                "Make sure the appointments file is writable, then book again."
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_the_reason() {
        let err = BookingError::validation("zip", "123", "Please enter a valid 5-digit zip code.");
        assert_eq!(err.user_friendly_message(), "Please enter a valid 5-digit zip code.");
        assert_eq!(err.to_string(), "Invalid zip '123': Please enter a valid 5-digit zip code.");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "data.json");
        let err: BookingError = io.into();
        assert!(matches!(err, BookingError::IoError(_)));
        assert!(err.recovery_suggestion().contains("file exists"));
    }
}
