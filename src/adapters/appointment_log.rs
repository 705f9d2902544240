use crate::domain::model::Appointment;
use crate::domain::ports::AppointmentStore;
use crate::utils::error::{BookingError, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Appointment log stored as JSON Lines: one appointment per line, only
/// ever appended to.
#[derive(Debug, Clone)]
pub struct JsonlAppointmentLog {
    path: PathBuf,
}

impl JsonlAppointmentLog {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AppointmentStore for JsonlAppointmentLog {
    fn load_all(&self) -> Result<Vec<Appointment>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut appointments = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Appointment>(line) {
                Ok(appointment) => appointments.push(appointment),
                Err(e) => tracing::warn!(
                    "Skipping unreadable line {} in {}: {}",
                    index + 1,
                    self.path.display(),
                    e
                ),
            }
        }
        Ok(appointments)
    }

    fn append(&mut self, appointment: &Appointment) -> Result<()> {
        let mut line = serde_json::to_string(appointment)?;
        line.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| BookingError::PersistenceError {
                message: format!("cannot create {}: {}", parent.display(), e),
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| BookingError::PersistenceError {
                message: format!("cannot open {}: {}", self.path.display(), e),
            })?;

        // A torn last record must not swallow the new one.
        let unterminated = ends_without_newline(&mut file).map_err(|e| BookingError::PersistenceError {
            message: format!("cannot read {}: {}", self.path.display(), e),
        })?;
        if unterminated {
            tracing::warn!("{} does not end with a newline; starting a new line", self.path.display());
            line.insert(0, '\n');
        }

        // One write per record so a line is never interleaved with another.
        file.write_all(line.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| BookingError::PersistenceError {
                message: format!("cannot write {}: {}", self.path.display(), e),
            })?;

        tracing::debug!("Appended {} to {}", appointment.confirmation_id, self.path.display());
        Ok(())
    }
}

fn ends_without_newline(file: &mut fs::File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}
