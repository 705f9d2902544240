use crate::domain::model::{Appointment, Technician};
use crate::utils::error::Result;
use std::collections::BTreeMap;

/// Read-only roster, loaded once at startup. Order is load order.
pub trait TechnicianDirectory {
    fn technicians(&self) -> &[Technician];
}

/// Append-only appointment log.
pub trait AppointmentStore {
    fn load_all(&self) -> Result<Vec<Appointment>>;
    fn append(&mut self, appointment: &Appointment) -> Result<()>;
}

pub trait ConfigProvider {
    fn data_file(&self) -> &str;
    fn appointments_file(&self) -> &str;
    fn confirmation_prefix(&self) -> &str;
    fn extra_synonyms(&self) -> &BTreeMap<String, String>;
}

impl TechnicianDirectory for Vec<Technician> {
    fn technicians(&self) -> &[Technician] {
        self
    }
}
