/// Booking flows: office visits, imaging, cancellation and rescheduling.
///
/// Every flow runs its checks against the store first and only mutates it
/// once all of them pass, so a rejected request leaves no trace.

use tracing::{debug, info};

use crate::appointment::Appointment;
use crate::config::ClinicConfig;
use crate::database::ClinicDatabase;
use crate::date::Date;
use crate::error::{ClinicError, Result};
use crate::models::{Practitioner, Provider};
use crate::validation::{InputValidation, MissingAppointment};

pub const OFFICE_USAGE: &str = "Usage: D,<MM/DD/YYYY>,<timeslot>,<patient first name>,\
<patient last name>,<patient date of birth>,<doctor NPI>";
pub const IMAGING_USAGE: &str = "Usage: T,<MM/DD/YYYY>,<timeslot>,<patient first name>,\
<patient last name>,<patient date of birth>,<imaging service>";
pub const CANCEL_USAGE: &str = "Usage: C,<MM/DD/YYYY>,<timeslot>,<patient first name>,\
<patient last name>,<patient date of birth>";
pub const RESCHEDULE_USAGE: &str = "Usage: R,<MM/DD/YYYY>,<timeslot>,<patient first name>,\
<patient last name>,<patient date of birth>,<new timeslot>";

// Token positions shared by every booking verb.
const DATE: usize = 0;
const TIMESLOT: usize = 1;
const FIRST_NAME: usize = 2;
const LAST_NAME: usize = 3;
const DOB: usize = 4;
const EXTRA: usize = 5;

const BOOKING_TOKENS: usize = 6;
const CANCEL_TOKENS: usize = 5;

/// Runs booking requests against a `ClinicDatabase`.
pub struct ClinicScheduler {
    pub database: ClinicDatabase,
    config: ClinicConfig,
    today: Option<Date>,
}

impl ClinicScheduler {
    /// Initialize the scheduler.
    pub fn new(database: ClinicDatabase, config: ClinicConfig) -> Self {
        ClinicScheduler {
            database,
            config,
            today: None,
        }
    }

    /// Judge dates against a fixed day instead of the clock.
    pub fn with_today(mut self, today: Date) -> Self {
        self.today = Some(today);
        self
    }

    /// Configuration the checks run with.
    pub fn config(&self) -> &ClinicConfig {
        &self.config
    }

    fn validation(&self) -> InputValidation<'_> {
        let checks = InputValidation::new(&self.database, &self.config);
        match self.today {
            Some(today) => checks.with_today(today),
            None => checks,
        }
    }

    /// Book an office visit with the doctor named by NPI.
    pub fn schedule_office(&mut self, tokens: &[&str]) -> Result<Appointment> {
        let (date, timeslot, patient, doctor) = {
            let checks = self.validation();
            checks.token_count(tokens, BOOKING_TOKENS, OFFICE_USAGE)?;
            let date = checks.scheduled_date(tokens[DATE])?;
            let timeslot = checks.timeslot(tokens[TIMESLOT])?;
            let patient =
                checks.patient_info(tokens[FIRST_NAME], tokens[LAST_NAME], tokens[DOB])?;
            checks.patient_availability(&patient, date, timeslot)?;
            let doctor = Provider::Doctor(checks.doctor_npi(tokens[EXTRA])?.clone());
            checks.provider_availability(&doctor, date, timeslot, tokens[TIMESLOT])?;
            (date, timeslot, patient, doctor)
        };

        self.database.get_or_create_patient(patient.clone());
        let appointment = Appointment::office(date, timeslot, patient, doctor);
        self.database.add_appointment(appointment.clone())?;
        info!(
            "Office visit {} booked with {}",
            appointment.appointment_id,
            appointment.provider.profile()
        );
        Ok(appointment)
    }

    /// Book an imaging service with the next free technician in rotation.
    ///
    /// The technician picked is the first one in the rotation lap whose room
    /// is free and who has no appointment at that slot. The rotation then
    /// moves one past the pick.
    pub fn schedule_imaging(&mut self, tokens: &[&str]) -> Result<Appointment> {
        let (date, timeslot, patient, room, pick) = {
            let checks = self.validation();
            checks.token_count(tokens, BOOKING_TOKENS, IMAGING_USAGE)?;
            let date = checks.scheduled_date(tokens[DATE])?;
            let timeslot = checks.timeslot(tokens[TIMESLOT])?;
            let patient =
                checks.patient_info(tokens[FIRST_NAME], tokens[LAST_NAME], tokens[DOB])?;
            checks.patient_availability(&patient, date, timeslot)?;
            let room = checks.imaging_service(tokens[EXTRA])?;
            let pick = checks.technician_availability(room, date, timeslot, tokens[TIMESLOT])?;
            (date, timeslot, patient, room, pick)
        };

        self.database.seek_technician(pick);
        let technician = self
            .database
            .technician()
            .cloned()
            .ok_or_else(|| ClinicError::InvalidArgument("technician roster is empty".to_string()))?;
        self.database.next_technician();

        self.database.get_or_create_patient(patient.clone());
        let appointment = Appointment::imaging(date, timeslot, patient, technician, room);
        self.database.add_appointment(appointment.clone())?;
        info!(
            "Imaging {} ({}) booked with {}",
            appointment.appointment_id,
            room,
            appointment.provider.profile()
        );
        Ok(appointment)
    }

    /// Cancel an existing appointment and return it.
    pub fn cancel(&mut self, tokens: &[&str]) -> Result<Appointment> {
        let (date, timeslot, patient) = {
            let checks = self.validation();
            checks.token_count(tokens, CANCEL_TOKENS, CANCEL_USAGE)?;
            let (date, timeslot, patient) = checks.schedule_and_patient_info(
                tokens[DATE],
                tokens[TIMESLOT],
                tokens[FIRST_NAME],
                tokens[LAST_NAME],
                tokens[DOB],
            )?;
            checks.appointment_exists(date, timeslot, &patient, MissingAppointment::Cancel)?;
            (date, timeslot, patient)
        };

        let removed = self
            .database
            .remove_appointment_at(date, timeslot, &patient)
            .ok_or_else(|| {
                ClinicError::InvalidArgument(format!("appointment for {} vanished", patient))
            })?;
        info!("Appointment {} canceled", removed.appointment_id);
        Ok(removed)
    }

    /// Move an appointment to another timeslot on the same date, keeping its
    /// provider. Returns the appointment as rebooked.
    pub fn reschedule(&mut self, tokens: &[&str]) -> Result<Appointment> {
        let (existing, new_timeslot) = {
            let checks = self.validation();
            checks.token_count(tokens, BOOKING_TOKENS, RESCHEDULE_USAGE)?;
            let (date, timeslot, patient) = checks.schedule_and_patient_info(
                tokens[DATE],
                tokens[TIMESLOT],
                tokens[FIRST_NAME],
                tokens[LAST_NAME],
                tokens[DOB],
            )?;
            let existing = checks.appointment_exists(
                date,
                timeslot,
                &patient,
                MissingAppointment::Reschedule,
            )?;
            let new_timeslot = checks.timeslot(tokens[EXTRA])?;
            checks.patient_availability(&existing.patient, date, new_timeslot)?;
            checks.provider_availability(&existing.provider, date, new_timeslot, tokens[EXTRA])?;
            checks.room_availability(existing, date, new_timeslot, tokens[EXTRA])?;
            (existing.clone(), new_timeslot)
        };

        self.database.remove_appointment(&existing);
        let mut moved = existing;
        debug!(
            "Moving appointment {} from {} to {}",
            moved.appointment_id, moved.timeslot, new_timeslot
        );
        moved.timeslot = new_timeslot;
        self.database.add_appointment(moved.clone())?;
        info!("Appointment {} rescheduled", moved.appointment_id);
        Ok(moved)
    }
}
