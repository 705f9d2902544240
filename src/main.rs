use anyhow::Context;
use clap::Parser;
use tech_booking::core::slots::SynonymTable;
use tech_booking::domain::ports::{AppointmentStore, ConfigProvider};
use tech_booking::utils::logger;
use tech_booking::{BookingError, CliConfig, DialogController, JsonRoster, JsonlAppointmentLog, MemoryAppointmentStore, Settings};

fn exit_with(error: &BookingError) -> ! {
    tracing::error!("❌ Startup failed: {}", error);
    eprintln!("❌ {}", error.user_friendly_message());
    eprintln!("💡 {}", error.recovery_suggestion());
    std::process::exit(1);
}

fn run_session<S: AppointmentStore>(roster: &JsonRoster, store: S, settings: &Settings) -> anyhow::Result<()> {
    let mut controller = DialogController::new(roster, store)
        .with_synonyms(SynonymTable::with_extra(settings.extra_synonyms()))
        .with_confirmation_prefix(settings.confirmation_prefix());

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    controller
        .run(stdin.lock(), stdout.lock())
        .context("terminal input/output failed")
}

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::debug!("CLI config: {:?}", cli);

    let settings = cli.resolve().unwrap_or_else(|e| exit_with(&e));
    let roster = JsonRoster::from_file(settings.data_file()).unwrap_or_else(|e| exit_with(&e));
    if roster.is_empty() {
        tracing::warn!("Roster {} lists no technicians", settings.data_file());
    }

    let log = JsonlAppointmentLog::new(settings.appointments_file());
    if cli.dry_run {
        tracing::info!("Dry run: new appointments are kept in memory only");
        let existing = log.load_all().unwrap_or_else(|e| exit_with(&e));
        run_session(&roster, MemoryAppointmentStore::with_appointments(existing), &settings)
    } else {
        run_session(&roster, log, &settings)
    }
}
