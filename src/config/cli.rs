use crate::config::toml_config::TomlConfig;
use crate::config::Settings;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;

/// Every flag is optional; with none given the defaults in [`Settings`] apply.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "tech-booking")]
#[command(about = "Book a service technician or ask about coverage and services")]
pub struct CliConfig {
    /// Technician roster (JSON, `Technician_Profiles`)
    #[arg(long)]
    pub data_file: Option<String>,

    /// Appointment log (JSON Lines, appended to)
    #[arg(long)]
    pub appointments_file: Option<String>,

    /// Optional TOML config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Keep bookings in memory instead of writing the appointment log
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Defaults, then the TOML file, then flags.
    pub fn resolve(&self) -> Result<Settings> {
        let mut settings = Settings::default();

        if let Some(path) = &self.config {
            tracing::debug!("Loading config file {}", path);
            let file = TomlConfig::from_file(path)?;
            file.validate()?;
            settings.apply_toml(&file);
        }

        if let Some(path) = &self.data_file {
            settings.data_file = path.clone();
        }
        if let Some(path) = &self.appointments_file {
            settings.appointments_file = path.clone();
        }

        settings.validate()?;
        Ok(settings)
    }
}
