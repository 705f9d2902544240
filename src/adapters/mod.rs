// Adapters layer: concrete implementations of the domain ports.

pub mod appointment_log;
pub mod roster;

pub use appointment_log::JsonlAppointmentLog;
pub use roster::JsonRoster;

use crate::domain::model::Appointment;
use crate::domain::ports::AppointmentStore;
use crate::utils::error::Result;

/// Keeps appointments in memory only. Used for `--dry-run` and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryAppointmentStore {
    appointments: Vec<Appointment>,
}

impl MemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_appointments(appointments: Vec<Appointment>) -> Self {
        Self { appointments }
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }
}

impl AppointmentStore for MemoryAppointmentStore {
    fn load_all(&self) -> Result<Vec<Appointment>> {
        Ok(self.appointments.clone())
    }

    fn append(&mut self, appointment: &Appointment) -> Result<()> {
        self.appointments.push(appointment.clone());
        Ok(())
    }
}
