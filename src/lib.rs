pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{JsonRoster, JsonlAppointmentLog, MemoryAppointmentStore};
pub use config::Settings;
pub use crate::core::{dialog::DialogController, matcher::BookingMatcher};
pub use utils::error::{BookingError, Result};
