pub mod dialog;
pub mod faq;
pub mod matcher;
pub mod slots;

pub use crate::domain::model::{Appointment, BookedSlots, BookingRequest, HoursRule, Technician};
pub use crate::domain::ports::{AppointmentStore, ConfigProvider, TechnicianDirectory};
pub use crate::utils::error::Result;
