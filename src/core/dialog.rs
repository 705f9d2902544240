use crate::core::faq::{FaqClassifier, FaqIntent};
use crate::core::matcher::BookingMatcher;
use crate::core::slots::{parse_when, parse_zip, SynonymTable};
use crate::domain::model::{format_when, Appointment, BookedSlots, BookingRequest};
use crate::domain::ports::{AppointmentStore, TechnicianDirectory};
use crate::utils::error::Result;
use std::io::{BufRead, Write};

pub const DEFAULT_CONFIRMATION_PREFIX: &str = "A";

const MENU_PROMPT: &str = "\nWhat would you like to do? (book/faq/quit): ";
const CANCEL_WORD: &str = "cancel";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DialogState {
    Menu,
    Booking,
    Faq,
    Quit,
}

enum Slot<T> {
    Filled(T),
    Cancelled,
    Closed,
}

/// Line-oriented prompt/response over any reader and writer.
struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// `None` once input is exhausted. Bytes that are not UTF-8 are replaced
    /// so they fail validation like any other bad answer.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&line).trim().to_string()))
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }
}

/// Drives the menu, booking and FAQ conversations.
pub struct DialogController<'a, S: AppointmentStore> {
    matcher: BookingMatcher<'a>,
    store: S,
    synonyms: SynonymTable,
    faq: FaqClassifier,
    confirmation_prefix: String,
}

impl<'a, S: AppointmentStore> DialogController<'a, S> {
    pub fn new<D: TechnicianDirectory + ?Sized>(directory: &'a D, store: S) -> Self {
        Self {
            matcher: BookingMatcher::new(directory),
            store,
            synonyms: SynonymTable::default(),
            faq: FaqClassifier::default(),
            confirmation_prefix: DEFAULT_CONFIRMATION_PREFIX.to_string(),
        }
    }

    pub fn with_synonyms(mut self, synonyms: SynonymTable) -> Self {
        self.synonyms = synonyms;
        self
    }

    pub fn with_faq(mut self, faq: FaqClassifier) -> Self {
        self.faq = faq;
        self
    }

    pub fn with_confirmation_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.confirmation_prefix = prefix.into();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Runs until the user quits or input ends. Only failures to write to
    /// `output` or read from `input` are returned as errors.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: W) -> Result<()> {
        let mut console = Console { input, output };

        console.say("Welcome to the Service Assistant CLI chatbot!")?;
        console.say("- Type 'book' to book an appointment")?;
        console.say("- Type 'faq' to ask about locations/hours or services offered")?;
        console.say("- Type 'quit' to exit")?;

        let mut state = DialogState::Menu;
        while state != DialogState::Quit {
            state = match state {
                DialogState::Menu => self.menu(&mut console)?,
                DialogState::Booking => self.booking(&mut console)?,
                DialogState::Faq => self.faq(&mut console)?,
                DialogState::Quit => DialogState::Quit,
            };
            tracing::debug!("Dialog state -> {:?}", state);
        }
        Ok(())
    }

    fn menu<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> Result<DialogState> {
        let Some(choice) = console.ask(MENU_PROMPT)? else {
            return Ok(DialogState::Quit);
        };

        match choice.to_lowercase().as_str() {
            "book" => Ok(DialogState::Booking),
            "faq" => Ok(DialogState::Faq),
            "quit" | "exit" | "q" => {
                console.say("Goodbye!")?;
                Ok(DialogState::Quit)
            }
            _ => {
                console.say("Please choose 'book', 'faq', or 'quit'.")?;
                Ok(DialogState::Menu)
            }
        }
    }

    fn fill_slot<R, W, T, F>(console: &mut Console<R, W>, prompt: &str, parse: F) -> Result<Slot<T>>
    where
        R: BufRead,
        W: Write,
        F: Fn(&str) -> Result<T>,
    {
        loop {
            let Some(answer) = console.ask(prompt)? else {
                return Ok(Slot::Closed);
            };
            if answer.eq_ignore_ascii_case(CANCEL_WORD) {
                return Ok(Slot::Cancelled);
            }
            match parse(&answer) {
                Ok(value) => return Ok(Slot::Filled(value)),
                Err(e) => {
                    tracing::debug!("Rejected slot input: {}", e);
                    console.say(&e.user_friendly_message())?;
                }
            }
        }
    }

    fn booking<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> Result<DialogState> {
        console.say("\nLet's book your appointment. You'll be asked a few quick questions.")?;
        console.say("(Type 'cancel' at any question to return to the menu.)")?;

        let synonyms = &self.synonyms;
        let service = match Self::fill_slot(
            console,
            "Service needed (e.g., plumber, electrician, hvac): ",
            |raw| synonyms.normalize_service(raw),
        )? {
            Slot::Filled(service) => service,
            Slot::Cancelled => return Self::cancelled(console),
            Slot::Closed => return Ok(DialogState::Quit),
        };

        let when = match Self::fill_slot(console, "Preferred date & time (YYYY-MM-DD HH:MM, 24h): ", parse_when)? {
            Slot::Filled(when) => when,
            Slot::Cancelled => return Self::cancelled(console),
            Slot::Closed => return Ok(DialogState::Quit),
        };

        let zip = match Self::fill_slot(console, "Service zip code (5 digits): ", parse_zip)? {
            Slot::Filled(zip) => zip,
            Slot::Cancelled => return Self::cancelled(console),
            Slot::Closed => return Ok(DialogState::Quit),
        };

        let request = BookingRequest { service, when, zip };
        self.complete_booking(console, &request)?;
        Ok(DialogState::Menu)
    }

    fn cancelled<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<DialogState> {
        console.say("Booking cancelled.")?;
        Ok(DialogState::Menu)
    }

    fn complete_booking<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
        request: &BookingRequest,
    ) -> Result<()> {
        let when = format_when(&request.when);

        let booked: BookedSlots = match self.store.load_all() {
            Ok(appointments) => appointments.iter().collect(),
            Err(e) => {
                tracing::error!("Failed to read appointment log: {}", e);
                console.say(&format!("\n{}", e.user_friendly_message()))?;
                return Ok(());
            }
        };

        let Some(technician) = self.matcher.find_match(request, &booked) else {
            console.say(&format!(
                "\nThanks! I checked our schedule and service area, but there is no availability matching \
                 {} in {} at {}. Please try a different time or service zip.",
                request.service, request.zip, when
            ))?;
            return Ok(());
        };

        let appointment = Appointment::book(&self.confirmation_prefix, technician, request);

        // Nothing is confirmed unless the log write succeeded.
        if let Err(e) = self.store.append(&appointment) {
            tracing::error!("Failed to save appointment {}: {}", appointment.confirmation_id, e);
            console.say(&format!("\n{}", e.user_friendly_message()))?;
            console.say(e.recovery_suggestion())?;
            return Ok(());
        }
        tracing::info!(
            "Booked {} with technician {} at {}",
            appointment.confirmation_id,
            appointment.technician_id,
            when
        );

        console.say(&format!(
            "\nYou're all set!\n\
             - Confirmation: {}\n\
             - Technician: {}\n\
             - Service: {}\n\
             - When: {}\n\
             - Where (zip): {}",
            appointment.confirmation_id, appointment.technician_name, appointment.service, when, appointment.zip
        ))?;
        Ok(())
    }

    fn faq<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> Result<DialogState> {
        console.say("\nAsk your question (e.g., 'What locations do you serve?', 'What services do you offer?').")?;
        let Some(question) = console.ask("> ")? else {
            return Ok(DialogState::Quit);
        };

        let intent = self.faq.classify(&question);
        tracing::debug!("FAQ question classified as {:?}", intent);

        match intent {
            FaqIntent::Locations => {
                let hours = self.matcher.hours_by_zip();
                if hours.is_empty() {
                    console.say("We are not currently serving any locations.")?;
                } else {
                    console.say("\nWe currently serve these zip codes with the following hours:")?;
                    for (zip, rule) in &hours {
                        console.say(&format!("- {}: {}", zip, rule))?;
                    }
                }
            }
            FaqIntent::Services => {
                let services = self.matcher.list_services();
                if services.is_empty() {
                    console.say("We don't have any services listed at the moment.")?;
                } else {
                    console.say("\nWe offer the following services:")?;
                    for service in &services {
                        console.say(&format!("- {}", service))?;
                    }
                }
            }
            FaqIntent::Unknown => {
                console.say("\nSorry, I can help with locations/hours or services offered. Try asking one of those.")?;
            }
        }
        Ok(DialogState::Menu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryAppointmentStore;
    use crate::domain::model::Technician;

    fn roster() -> Vec<Technician> {
        vec![Technician {
            id: 1,
            name: "Ava Lee".to_string(),
            services: ["plumbing".to_string()].into(),
            business_units: ["plumbing".to_string()].into(),
            zips: ["94113".to_string()].into(),
            availability: vec![],
        }]
    }

    fn run_script(roster: &[Technician], script: &str) -> (String, MemoryAppointmentStore) {
        let roster = roster.to_vec();
        let mut controller = DialogController::new(&roster, MemoryAppointmentStore::new());
        let mut output = Vec::new();
        controller.run(script.as_bytes(), &mut output).unwrap();
        (String::from_utf8(output).unwrap(), controller.into_store())
    }

    #[test]
    fn test_unknown_command_loops_back_to_menu() {
        let (out, _) = run_script(&roster(), "hello\nquit\n");
        assert!(out.contains("Please choose 'book', 'faq', or 'quit'."));
        assert!(out.contains("Goodbye!"));
        assert_eq!(out.matches("What would you like to do?").count(), 2);
    }

    #[test]
    fn test_end_of_input_ends_session() {
        let (out, store) = run_script(&roster(), "book\nplumber\n");
        assert!(!out.contains("Goodbye!"));
        assert!(store.appointments().is_empty());
    }

    #[test]
    fn test_invalid_slot_reprompts_same_slot() {
        let (out, store) = run_script(
            &roster(),
            "book\nplumber\nnext tuesday\n2025-10-21 14:30\n941\n94113\nquit\n",
        );
        assert_eq!(out.matches("Preferred date & time").count(), 2);
        assert_eq!(out.matches("Service zip code").count(), 2);
        assert_eq!(out.matches("Service needed").count(), 1);
        assert!(out.contains("You're all set!"));
        assert_eq!(store.appointments().len(), 1);
    }

    #[test]
    fn test_non_utf8_answer_reprompts_same_slot() {
        let roster = roster();
        let mut script = b"book\nplumber\n".to_vec();
        script.extend_from_slice(&[0xff, 0xfe, b'\n']);
        script.extend_from_slice(b"2025-10-21 14:30\n94113\nquit\n");

        let mut controller = DialogController::new(&roster, MemoryAppointmentStore::new());
        let mut output = Vec::new();
        controller.run(script.as_slice(), &mut output).unwrap();

        let out = String::from_utf8(output).unwrap();
        assert_eq!(out.matches("Preferred date & time").count(), 2);
        assert!(out.contains("Please use format YYYY-MM-DD HH:MM"));
        assert!(out.contains("You're all set!"));
        assert_eq!(controller.store().appointments().len(), 1);
    }

    #[test]
    fn test_cancel_returns_to_menu_without_booking() {
        let (out, store) = run_script(&roster(), "book\nplumber\ncancel\nquit\n");
        assert!(out.contains("Booking cancelled."));
        assert!(out.contains("Goodbye!"));
        assert!(store.appointments().is_empty());
    }

    #[test]
    fn test_custom_faq_rules_and_store_access() {
        use crate::core::faq::FaqRule;

        let roster = roster();
        let faq = FaqClassifier::new(vec![FaqRule::new(FaqIntent::Locations, &["where"])]);
        let mut controller = DialogController::new(&roster, MemoryAppointmentStore::new()).with_faq(faq);
        let mut output = Vec::new();
        controller.run("faq\nwhere are you?\nquit\n".as_bytes(), &mut output).unwrap();

        let out = String::from_utf8(output).unwrap();
        assert!(out.contains("- 94113: Mon–Fri 09:00–17:00"));
        assert!(controller.store().appointments().is_empty());
    }

    #[test]
    fn test_same_slot_twice_is_not_double_booked() {
        let script = "book\nplumber\n2025-10-21 14:30\n94113\nbook\nplumber\n2025-10-21 14:30\n94113\nquit\n";
        let (out, store) = run_script(&roster(), script);
        assert_eq!(out.matches("You're all set!").count(), 1);
        assert!(out.contains("there is no availability matching plumbing in 94113 at 2025-10-21 14:30"));
        assert_eq!(store.appointments().len(), 1);
    }
}
