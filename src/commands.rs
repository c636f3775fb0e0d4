/// Comma-separated command interpreter on top of the scheduler.
///
/// A line is split on commas with empty tokens dropped; the first token is
/// the verb. `execute` returns the text to print. Rejected requests are
/// turned into their one-line message here; anything else is fatal and
/// propagates.

use tracing::debug;

use crate::appointment::Appointment;
use crate::config::ClinicConfig;
use crate::database::ClinicDatabase;
use crate::date::Date;
use crate::error::{ClinicError, Result};
use crate::reports::{self, Listing};
use crate::roster;
use crate::scheduler::ClinicScheduler;

pub const INVALID_COMMAND: &str = "Invalid command!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Office,
    Imaging,
    Cancel,
    Reschedule,
    List(Listing),
    Credits,
    Statements,
}

impl Verb {
    fn from_token(token: &str) -> Option<Self> {
        let verb = match token {
            "D" => Verb::Office,
            "T" => Verb::Imaging,
            "C" => Verb::Cancel,
            "R" => Verb::Reschedule,
            "PA" => Verb::List(Listing::ByDateTimeProvider),
            "PP" => Verb::List(Listing::ByPatient),
            "PL" => Verb::List(Listing::ByLocation),
            "PI" => Verb::List(Listing::Imaging),
            "PO" => Verb::List(Listing::Office),
            "PC" => Verb::Credits,
            "PS" => Verb::Statements,
            _ => return None,
        };
        Some(verb)
    }
}

pub struct ClinicManager {
    pub scheduler: ClinicScheduler,
}

impl ClinicManager {
    /// Wrap an already built scheduler.
    pub fn new(scheduler: ClinicScheduler) -> Self {
        ClinicManager { scheduler }
    }

    /// Build the store from `config` and load its roster file.
    pub fn from_config(config: ClinicConfig) -> Result<Self> {
        let mut database = ClinicDatabase::from_config(&config);
        for provider in roster::load_roster(&config.roster_path)? {
            database.add_provider(provider)?;
        }
        Ok(ClinicManager::new(ClinicScheduler::new(database, config)))
    }

    /// Pin "today" for every date check.
    pub fn with_today(mut self, today: Date) -> Self {
        self.scheduler = self.scheduler.with_today(today);
        self
    }

    /// Startup listing of the roster and the technician rotation.
    pub fn banner(&self) -> String {
        let database = &self.scheduler.database;
        format!(
            "{}\n{}\n{}\n{}\n",
            reports::PROVIDERS_HEADER,
            reports::provider_roster(database.providers()),
            reports::ROTATION_HEADER,
            reports::rotation_listing(database)
        )
    }

    /// Run one input line and return what should be printed.
    pub fn execute(&mut self, line: &str) -> Result<String> {
        let tokens: Vec<&str> = line.split(',').filter(|token| !token.is_empty()).collect();
        let Some((&head, args)) = tokens.split_first() else {
            return Ok(String::new());
        };
        let Some(verb) = Verb::from_token(head) else {
            return Ok(format!("{}\n", INVALID_COMMAND));
        };

        let scheduler = &mut self.scheduler;
        let outcome = match verb {
            Verb::Office => scheduler.schedule_office(args).map(booked),
            Verb::Imaging => scheduler.schedule_imaging(args).map(booked),
            Verb::Cancel => scheduler.cancel(args).map(|appointment| {
                format!(
                    "{} {} {} - appointment has been canceled.\n",
                    appointment.date,
                    appointment.timeslot.to_12_hour(),
                    appointment.patient
                )
            }),
            Verb::Reschedule => scheduler
                .reschedule(args)
                .map(|appointment| format!("Rescheduled to {}\n", appointment)),
            Verb::List(listing) => Ok(reports::appointment_listing(&mut scheduler.database, listing)),
            Verb::Credits => Ok(reports::credit_statement(&scheduler.database)),
            Verb::Statements => Ok(reports::billing_statements(&mut scheduler.database)),
        };

        match outcome {
            Err(ClinicError::Rejected(rejection)) => {
                debug!("{:?} rejected ({:?}): {}", verb, rejection.kind(), rejection);
                Ok(format!("{}\n", rejection))
            }
            other => other,
        }
    }
}

fn booked(appointment: Appointment) -> String {
    format!("{} booked.\n", appointment)
}
