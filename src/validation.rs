/// Input checks run before any booking touches the store.
///
/// Each check reads the store, never writes it, and either hands back the
/// parsed value it vouched for or a `ValidationError` whose `Display` is the
/// one line shown to the user. Flows chain checks with `?`, so the first
/// failure wins and later checks never run.

use thiserror::Error;

use crate::appointment::Appointment;
use crate::config::ClinicConfig;
use crate::database::ClinicDatabase;
use crate::date::Date;
use crate::models::{Doctor, Practitioner, Profile, Provider, Radiology};
use crate::timeslot::Timeslot;

pub type CheckResult<T> = std::result::Result<T, ValidationError>;

/// Broad class of a rejected request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedInput,
    ReferentialAbsence,
    BusinessConflict,
    CalendarRule,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing data tokens.")]
    MissingTokens,

    #[error("{0}")]
    Usage(&'static str),

    #[error("Appointment date: {0} is not a valid calendar date")]
    InvalidAppointmentDate(String),

    #[error("Appointment date: {0} is today or a date before today.")]
    DateNotInFuture(String),

    #[error("Appointment date: {0} is Saturday or Sunday.")]
    WeekendDate(String),

    #[error("Appointment date: {date} is not within {window} months.")]
    DateOutOfRange { date: String, window: String },

    #[error("Patient dob: {0} is not a valid calendar date")]
    InvalidDob(String),

    #[error("Patient dob: {0} is today or a date after today.")]
    DobNotInPast(String),

    #[error("{0} is not a valid time slot.")]
    MalformedTimeslot(String),

    #[error("{0} is not a valid time slot.")]
    UnknownTimeslot(String),

    #[error("{0} - provider doesn't exist.")]
    UnknownProvider(String),

    #[error("{0} - imaging service not provided.")]
    UnknownService(String),

    #[error("{date} {time} {patient} - appointment does not exist.")]
    AppointmentNotFound {
        date: Date,
        time: String,
        patient: Profile,
    },

    #[error("{date} {time} {patient} does not exist.")]
    RescheduleTargetNotFound {
        date: Date,
        time: String,
        patient: Profile,
    },

    #[error("{provider} is not available at slot {slot}")]
    ProviderConflict { provider: String, slot: String },

    #[error("{patient} has an existing appointment at {date} {time}")]
    PatientConflict {
        patient: Profile,
        date: Date,
        time: String,
    },

    #[error("{room} room at {location} is in use at slot {slot}.")]
    RoomInUse {
        room: Radiology,
        location: String,
        slot: String,
    },

    #[error("Cannot find an available technician at all locations for {service} at slot {slot}.")]
    NoTechnicianAvailable { service: Radiology, slot: String },
}

impl ValidationError {
    /// Broad class of this rejection.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::MissingTokens
            | ValidationError::Usage(_)
            | ValidationError::MalformedTimeslot(_) => ErrorKind::MalformedInput,
            ValidationError::UnknownTimeslot(_)
            | ValidationError::UnknownProvider(_)
            | ValidationError::UnknownService(_)
            | ValidationError::AppointmentNotFound { .. }
            | ValidationError::RescheduleTargetNotFound { .. } => ErrorKind::ReferentialAbsence,
            ValidationError::ProviderConflict { .. }
            | ValidationError::PatientConflict { .. }
            | ValidationError::RoomInUse { .. }
            | ValidationError::NoTechnicianAvailable { .. } => ErrorKind::BusinessConflict,
            ValidationError::InvalidAppointmentDate(_)
            | ValidationError::DateNotInFuture(_)
            | ValidationError::WeekendDate(_)
            | ValidationError::DateOutOfRange { .. }
            | ValidationError::InvalidDob(_)
            | ValidationError::DobNotInPast(_) => ErrorKind::CalendarRule,
        }
    }
}

/// Which message a missing appointment should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingAppointment {
    Cancel,
    Reschedule,
}

pub struct InputValidation<'a> {
    database: &'a ClinicDatabase,
    today: Date,
    window_months: u32,
    window_words: String,
}

impl<'a> InputValidation<'a> {
    /// Checks against `database` with the window from `config`, judged from the real today.
    pub fn new(database: &'a ClinicDatabase, config: &ClinicConfig) -> Self {
        InputValidation {
            database,
            today: Date::today(),
            window_months: config.schedule_window_months,
            window_words: config.window_in_words(),
        }
    }

    /// Pin "today" instead of reading the clock.
    pub fn with_today(mut self, today: Date) -> Self {
        self.today = today;
        self
    }

    /// The day dates are judged against.
    pub fn today(&self) -> Date {
        self.today
    }

    /// Too few tokens is `MissingTokens`; any other count but `expected` is the usage line.
    pub fn token_count(
        &self,
        tokens: &[&str],
        expected: usize,
        usage: &'static str,
    ) -> CheckResult<()> {
        if tokens.len() < expected {
            return Err(ValidationError::MissingTokens);
        }
        if tokens.len() != expected {
            return Err(ValidationError::Usage(usage));
        }
        Ok(())
    }

    /// A real weekday strictly after today and no further out than the
    /// scheduling window.
    pub fn scheduled_date(&self, token: &str) -> CheckResult<Date> {
        let date = Date::parse(token)
            .filter(Date::is_valid)
            .ok_or_else(|| ValidationError::InvalidAppointmentDate(token.to_string()))?;
        if date <= self.today {
            return Err(ValidationError::DateNotInFuture(token.to_string()));
        }
        if date.is_weekend() {
            return Err(ValidationError::WeekendDate(token.to_string()));
        }
        if date > self.today.add_months(self.window_months) {
            return Err(ValidationError::DateOutOfRange {
                date: token.to_string(),
                window: self.window_words.clone(),
            });
        }
        Ok(date)
    }

    /// The token must be a numeric id of a slot in the grid.
    pub fn timeslot(&self, token: &str) -> CheckResult<Timeslot> {
        let id = token
            .trim()
            .parse::<usize>()
            .map_err(|_| ValidationError::MalformedTimeslot(token.to_string()))?;
        self.database
            .timeslots()
            .get(id)
            .ok_or_else(|| ValidationError::UnknownTimeslot(token.to_string()))
    }

    /// Date of birth must be a real date before today.
    pub fn patient_info(&self, first: &str, last: &str, dob_token: &str) -> CheckResult<Profile> {
        let dob = Date::parse(dob_token)
            .filter(Date::is_valid)
            .ok_or_else(|| ValidationError::InvalidDob(dob_token.to_string()))?;
        if dob >= self.today {
            return Err(ValidationError::DobNotInPast(dob_token.to_string()));
        }
        Ok(Profile::new(first, last, dob))
    }

    /// Date, timeslot and patient checks in that order.
    pub fn schedule_and_patient_info(
        &self,
        date_token: &str,
        timeslot_token: &str,
        first: &str,
        last: &str,
        dob_token: &str,
    ) -> CheckResult<(Date, Timeslot, Profile)> {
        let date = self.scheduled_date(date_token)?;
        let timeslot = self.timeslot(timeslot_token)?;
        let patient = self.patient_info(first, last, dob_token)?;
        Ok((date, timeslot, patient))
    }

    /// The patient must not already hold an appointment at this date and slot.
    pub fn patient_availability(
        &self,
        patient: &Profile,
        date: Date,
        timeslot: Timeslot,
    ) -> CheckResult<()> {
        let conflict = self
            .database
            .appointments_for_patient(patient)
            .into_iter()
            .find(|appointment| appointment.conflicts(date, timeslot));
        match conflict {
            Some(appointment) => Err(ValidationError::PatientConflict {
                patient: appointment.patient,
                date,
                time: timeslot.to_12_hour(),
            }),
            None => Ok(()),
        }
    }

    /// Doctor on the roster with this NPI.
    pub fn doctor_npi(&self, npi: &str) -> CheckResult<&'a Doctor> {
        self.database
            .doctor(npi)
            .ok_or_else(|| ValidationError::UnknownProvider(npi.to_string()))
    }

    /// The provider must not already hold an appointment at this date and slot.
    pub fn provider_availability(
        &self,
        provider: &Provider,
        date: Date,
        timeslot: Timeslot,
        timeslot_token: &str,
    ) -> CheckResult<()> {
        let busy = self
            .database
            .appointments_for_provider(provider)
            .iter()
            .any(|appointment| appointment.conflicts(date, timeslot));
        if busy {
            return Err(ValidationError::ProviderConflict {
                provider: provider.to_string(),
                slot: timeslot_token.to_string(),
            });
        }
        Ok(())
    }

    /// Imaging room named by the token, ignoring case.
    pub fn imaging_service(&self, token: &str) -> CheckResult<Radiology> {
        Radiology::from_string(token).map_err(|_| ValidationError::UnknownService(token.to_string()))
    }

    /// Walk one lap of the rotation from the current technician and return
    /// the roster index of the first one whose room is free and who has no
    /// appointment at this date and slot.
    ///
    /// The caller commits the pick by seeking the rotation to the returned
    /// index; technicians before it in the lap are the ones skipped.
    pub fn technician_availability(
        &self,
        room: Radiology,
        date: Date,
        timeslot: Timeslot,
        timeslot_token: &str,
    ) -> CheckResult<usize> {
        for (index, technician) in self.database.technician_cycle() {
            if self
                .database
                .room_in_use(technician.location(), date, timeslot, room)
            {
                continue;
            }
            let busy = self
                .database
                .appointments_for_provider(technician)
                .iter()
                .any(|appointment| appointment.conflicts(date, timeslot));
            if !busy {
                return Ok(index);
            }
        }
        Err(ValidationError::NoTechnicianAvailable {
            service: room,
            slot: timeslot_token.to_string(),
        })
    }

    /// The room an imaging appointment occupies must be free at `timeslot`.
    pub fn room_availability(
        &self,
        appointment: &Appointment,
        date: Date,
        timeslot: Timeslot,
        timeslot_token: &str,
    ) -> CheckResult<()> {
        let Some(room) = appointment.room() else {
            return Ok(());
        };
        let location = appointment.provider.location();
        if self.database.room_in_use(location, date, timeslot, room) {
            return Err(ValidationError::RoomInUse {
                room,
                location: location.name().to_string(),
                slot: timeslot_token.to_string(),
            });
        }
        Ok(())
    }

    /// The appointment at this date and slot for the patient, names ignoring case.
    pub fn appointment_exists(
        &self,
        date: Date,
        timeslot: Timeslot,
        patient: &Profile,
        missing: MissingAppointment,
    ) -> CheckResult<&'a Appointment> {
        self.database
            .get_appointment(date, timeslot, patient)
            .ok_or_else(|| {
                let time = timeslot.to_12_hour();
                let patient = patient.clone();
                match missing {
                    MissingAppointment::Cancel => ValidationError::AppointmentNotFound {
                        date,
                        time,
                        patient,
                    },
                    MissingAppointment::Reschedule => {
                        ValidationError::RescheduleTargetNotFound {
                            date,
                            time,
                            patient,
                        }
                    }
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, Specialty, Technician};
    use assert_matches::assert_matches;

    fn date(m: i32, d: i32, y: i32) -> Date {
        Date::new(y, m, d).unwrap()
    }

    fn today() -> Date {
        date(1, 15, 2024)
    }

    fn doctor(npi: &str) -> Provider {
        Doctor::new(
            Profile::new("Andrew", "Patel", date(1, 21, 1989)),
            Location::Bridgewater,
            Specialty::Family,
            npi,
        )
        .unwrap()
        .into()
    }

    fn technician(first: &str, location: Location) -> Provider {
        Technician::new(Profile::new(first, "Lin", date(12, 22, 1990)), location, 120).into()
    }

    fn john() -> Profile {
        Profile::new("John", "Doe", date(5, 1, 1990))
    }

    fn database() -> ClinicDatabase {
        let mut db = ClinicDatabase::from_config(&ClinicConfig::default());
        db.add_provider(doctor("01")).unwrap();
        db.add_provider(technician("Frank", Location::Piscataway)).unwrap();
        db.add_provider(technician("Ben", Location::Edison)).unwrap();
        db
    }

    fn checks(db: &ClinicDatabase) -> InputValidation<'_> {
        InputValidation::new(db, &ClinicConfig::default()).with_today(today())
    }

    #[test]
    fn token_count_distinguishes_missing_from_extra() {
        let db = database();
        let v = checks(&db);
        assert_eq!(v.token_count(&["a", "b"], 3, "usage"), Err(ValidationError::MissingTokens));
        assert_eq!(
            v.token_count(&["a", "b", "c", "d"], 3, "usage"),
            Err(ValidationError::Usage("usage"))
        );
        assert_eq!(v.token_count(&["a", "b", "c"], 3, "usage"), Ok(()));
    }

    #[test]
    fn scheduled_date_window_is_inclusive_at_horizon() {
        let db = database();
        let v = checks(&db);
        assert_eq!(v.scheduled_date("7/15/2024"), Ok(date(7, 15, 2024)));
        assert_matches!(
            v.scheduled_date("7/16/2024"),
            Err(ValidationError::DateOutOfRange { window, .. }) if window == "six"
        );
    }

    #[test]
    fn scheduled_date_rejects_past_today_and_weekends() {
        let db = database();
        let v = checks(&db);
        assert_matches!(v.scheduled_date("1/15/2024"), Err(ValidationError::DateNotInFuture(_)));
        assert_matches!(v.scheduled_date("1/10/2024"), Err(ValidationError::DateNotInFuture(_)));
        assert_matches!(v.scheduled_date("1/20/2024"), Err(ValidationError::WeekendDate(_)));
        assert_matches!(v.scheduled_date("2/30/2024"), Err(ValidationError::InvalidAppointmentDate(_)));
        assert_matches!(v.scheduled_date("soon"), Err(ValidationError::InvalidAppointmentDate(_)));
        assert_eq!(v.scheduled_date("1/16/2024"), Ok(date(1, 16, 2024)));
        assert_eq!(
            v.scheduled_date("1/20/2024").unwrap_err().to_string(),
            "Appointment date: 1/20/2024 is Saturday or Sunday."
        );
    }

    #[test]
    fn timeslot_token_must_name_a_grid_slot() {
        let db = database();
        let v = checks(&db);
        assert_eq!(v.timeslot("1"), Ok(Timeslot::new(9, 0).unwrap()));
        assert_matches!(v.timeslot("13"), Err(ValidationError::UnknownTimeslot(_)));
        assert_matches!(v.timeslot("x"), Err(ValidationError::MalformedTimeslot(_)));
        assert_eq!(v.timeslot("x").unwrap_err().kind(), ErrorKind::MalformedInput);
        assert_eq!(v.timeslot("0").unwrap_err().to_string(), "0 is not a valid time slot.");
    }

    #[test]
    fn dob_must_be_in_the_past() {
        let db = database();
        let v = checks(&db);
        assert_eq!(v.patient_info("John", "Doe", "5/1/1990"), Ok(john()));
        assert_matches!(v.patient_info("John", "Doe", "1/15/2024"), Err(ValidationError::DobNotInPast(_)));
        assert_matches!(v.patient_info("John", "Doe", "2/29/2023"), Err(ValidationError::InvalidDob(_)));
    }

    #[test]
    fn conflicts_name_the_patient_and_time() {
        let mut db = database();
        let doc = db.providers()[0].clone();
        db.add_appointment(Appointment::office(
            date(1, 16, 2024),
            Timeslot::new(9, 0).unwrap(),
            john(),
            doc.clone(),
        ))
        .unwrap();
        let v = checks(&db);
        let slot = Timeslot::new(9, 0).unwrap();

        let err = v.patient_availability(&john(), date(1, 16, 2024), slot).unwrap_err();
        assert_eq!(
            err.to_string(),
            "John Doe 5/1/1990 has an existing appointment at 1/16/2024 9:00 AM"
        );
        assert_eq!(err.kind(), ErrorKind::BusinessConflict);

        let err = v.provider_availability(&doc, date(1, 16, 2024), slot, "1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "[Andrew Patel 1/21/1989, BRIDGEWATER, Somerset 08807][FAMILY, #01] is not available at slot 1"
        );
        assert!(v.provider_availability(&doc, date(1, 17, 2024), slot, "1").is_ok());
    }

    #[test]
    fn unknown_npi_and_service_are_referential() {
        let db = database();
        let v = checks(&db);
        assert!(v.doctor_npi("01").is_ok());
        let err = v.doctor_npi("77").unwrap_err();
        assert_eq!(err.to_string(), "77 - provider doesn't exist.");
        assert_eq!(err.kind(), ErrorKind::ReferentialAbsence);
        assert_eq!(v.imaging_service("xray"), Ok(Radiology::Xray));
        assert_matches!(v.imaging_service("mri"), Err(ValidationError::UnknownService(_)));
    }

    #[test]
    fn technician_check_skips_busy_rooms_and_people() {
        let mut db = database();
        let slot = Timeslot::new(9, 0).unwrap();
        let day = date(1, 16, 2024);
        // cursor 0 aligns backward onto Ben (index 2), then Frank (index 1)
        let ben = db.providers()[2].clone();
        let v = checks(&db);
        assert_eq!(v.technician_availability(Radiology::Xray, day, slot, "1"), Ok(2));

        db.add_appointment(Appointment::imaging(day, slot, john(), ben, Radiology::Catscan))
            .unwrap();
        let v = checks(&db);
        assert_eq!(v.technician_availability(Radiology::Xray, day, slot, "1"), Ok(1));
    }

    #[test]
    fn technician_check_reports_exhaustion() {
        let mut db = database();
        let slot = Timeslot::new(9, 0).unwrap();
        let day = date(1, 16, 2024);
        let frank = db.providers()[1].clone();
        let ben = db.providers()[2].clone();
        db.add_appointment(Appointment::imaging(day, slot, john(), frank, Radiology::Xray))
            .unwrap();
        let other = Profile::new("Jane", "Roe", date(3, 3, 1985));
        db.add_appointment(Appointment::imaging(day, slot, other, ben, Radiology::Xray))
            .unwrap();

        let v = checks(&db);
        let err = v
            .technician_availability(Radiology::Xray, day, slot, "1")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot find an available technician at all locations for XRAY at slot 1."
        );
    }

    #[test]
    fn missing_appointment_messages_depend_on_flow() {
        let db = database();
        let v = checks(&db);
        let slot = Timeslot::new(9, 0).unwrap();
        let cancel = v
            .appointment_exists(date(1, 16, 2024), slot, &john(), MissingAppointment::Cancel)
            .unwrap_err();
        assert_eq!(
            cancel.to_string(),
            "1/16/2024 9:00 AM John Doe 5/1/1990 - appointment does not exist."
        );
        let reschedule = v
            .appointment_exists(date(1, 16, 2024), slot, &john(), MissingAppointment::Reschedule)
            .unwrap_err();
        assert_eq!(reschedule.to_string(), "1/16/2024 9:00 AM John Doe 5/1/1990 does not exist.");
    }
}
