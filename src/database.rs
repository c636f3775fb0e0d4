/// The clinic's appointment store.
///
/// `ClinicDatabase` owns every active appointment, the patient registry, the
/// provider roster and the technician rotation cursor. It never checks
/// business rules on insert; callers run the validation pipeline first.
/// Lookups return `Option`/empty snapshots instead of failing.

use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, info};

use crate::appointment::{Appointment, AppointmentKind};
use crate::config::{ClinicConfig, RoomConflictPolicy};
use crate::date::Date;
use crate::error::{ClinicError, Result};
use crate::models::{Doctor, Location, Patient, Practitioner, Profile, Provider, Radiology};
use crate::rotation::TechnicianRotation;
use crate::timeslot::{Timeslot, TimeslotGrid};

/// Visit count and credit earned by one provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderCredit {
    pub provider: Provider,
    pub visits: u32,
    pub credit: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ClinicDatabase {
    timeslots: TimeslotGrid,
    patients: Vec<Patient>,
    providers: Vec<Provider>,
    rotation: TechnicianRotation,
    appointments: Vec<Appointment>,
    room_policy: RoomConflictPolicy,
}

impl ClinicDatabase {
    /// Create an empty store over `timeslots`.
    pub fn new(timeslots: TimeslotGrid, room_policy: RoomConflictPolicy) -> Self {
        ClinicDatabase {
            timeslots,
            patients: Vec::new(),
            providers: Vec::new(),
            rotation: TechnicianRotation::new(),
            appointments: Vec::new(),
            room_policy,
        }
    }

    /// Create an empty store with the grid and room policy from `config`.
    pub fn from_config(config: &ClinicConfig) -> Self {
        ClinicDatabase::new(TimeslotGrid::from_layout(&config.grid), config.room_policy)
    }

    /// Start the technician rotation at a chosen roster index.
    pub fn with_rotation_cursor(mut self, cursor: usize) -> Self {
        self.rotation = TechnicianRotation::starting_at(cursor);
        self
    }

    /// Policy used by `room_in_use`.
    pub fn room_policy(&self) -> RoomConflictPolicy {
        self.room_policy
    }

    // ------------------------------------------------------------------
    // Timeslots
    // ------------------------------------------------------------------

    /// The bookable timeslot grid.
    pub fn timeslots(&self) -> &TimeslotGrid {
        &self.timeslots
    }

    /// Look up a timeslot by its id token.
    pub fn timeslot(&self, token: &str) -> Option<Timeslot> {
        self.timeslots.lookup(token)
    }

    // ------------------------------------------------------------------
    // Providers
    // ------------------------------------------------------------------

    /// Add a provider to the end of the roster, rejecting a duplicate doctor NPI.
    pub fn add_provider(&mut self, provider: Provider) -> Result<()> {
        if let Some(npi) = provider.npi() {
            if self.doctor(npi).is_some() {
                return Err(ClinicError::DuplicateNpi(npi.to_string()));
            }
        }
        debug!("Provider added: {}", provider.profile());
        self.providers.push(provider);
        Ok(())
    }

    /// Roster in load order.
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// Doctor with the given NPI, if on the roster.
    pub fn doctor(&self, npi: &str) -> Option<&Doctor> {
        self.providers
            .iter()
            .filter_map(Provider::as_doctor)
            .find(|doctor| doctor.npi == npi)
    }

    /// Whether a doctor with this NPI is on the roster.
    pub fn doctor_exists(&self, npi: &str) -> bool {
        self.doctor(npi).is_some()
    }

    // ------------------------------------------------------------------
    // Patients
    // ------------------------------------------------------------------

    /// Registry entry for `profile`, if the patient has been seen.
    pub fn patient(&self, profile: &Profile) -> Option<&Patient> {
        self.patients.iter().find(|patient| &patient.profile == profile)
    }

    /// Registry entry for `profile`, created on first sight.
    pub fn get_or_create_patient(&mut self, profile: Profile) -> &Patient {
        let index = self.patient_index(profile);
        &self.patients[index]
    }

    fn patient_index(&mut self, profile: Profile) -> usize {
        match self.patients.iter().position(|p| p.profile == profile) {
            Some(index) => index,
            None => {
                debug!("New patient registered: {}", profile);
                self.patients.push(Patient::new(profile));
                self.patients.len() - 1
            }
        }
    }

    /// Copy of the patient registry in registration order.
    pub fn patients(&self) -> Vec<Patient> {
        self.patients.clone()
    }

    // ------------------------------------------------------------------
    // Appointments
    // ------------------------------------------------------------------

    /// Append an appointment.
    ///
    /// Fails with `InvalidArgument` only when the appointment could not have
    /// come out of the validation pipeline: its provider is not on the
    /// roster, or the provider variant does not match the appointment kind.
    /// Conflicts are not checked here.
    pub fn add_appointment(&mut self, appointment: Appointment) -> Result<()> {
        if !self.providers.contains(&appointment.provider) {
            return Err(ClinicError::InvalidArgument(format!(
                "provider {} is not on the roster",
                appointment.provider.profile()
            )));
        }
        match (&appointment.kind, &appointment.provider) {
            (AppointmentKind::Office, Provider::Doctor(_))
            | (AppointmentKind::Imaging { .. }, Provider::Technician(_)) => {}
            _ => {
                return Err(ClinicError::InvalidArgument(format!(
                    "appointment kind does not match provider {}",
                    appointment.provider.profile()
                )));
            }
        }
        info!(
            "Appointment {} added for {} on {} at {}",
            appointment.appointment_id, appointment.patient, appointment.date, appointment.timeslot
        );
        self.appointments.push(appointment);
        Ok(())
    }

    /// Remove the first equal appointment. Missing appointments are ignored.
    pub fn remove_appointment(&mut self, appointment: &Appointment) -> bool {
        match self.appointments.iter().position(|a| a == appointment) {
            Some(index) => {
                let removed = self.appointments.remove(index);
                info!("Appointment {} removed", removed.appointment_id);
                true
            }
            None => false,
        }
    }

    /// Remove the appointment found by `get_appointment`, if any.
    pub fn remove_appointment_at(
        &mut self,
        date: Date,
        timeslot: Timeslot,
        patient: &Profile,
    ) -> Option<Appointment> {
        let index = self.position_of(date, timeslot, patient)?;
        let removed = self.appointments.remove(index);
        info!("Appointment {} removed", removed.appointment_id);
        Some(removed)
    }

    /// Names match ignoring case; date of birth must match exactly.
    pub fn get_appointment(
        &self,
        date: Date,
        timeslot: Timeslot,
        patient: &Profile,
    ) -> Option<&Appointment> {
        self.position_of(date, timeslot, patient)
            .map(|index| &self.appointments[index])
    }

    /// Whether `get_appointment` would find a match.
    pub fn appointment_exists(&self, date: Date, timeslot: Timeslot, patient: &Profile) -> bool {
        self.position_of(date, timeslot, patient).is_some()
    }

    fn position_of(&self, date: Date, timeslot: Timeslot, patient: &Profile) -> Option<usize> {
        self.appointments.iter().position(|appointment| {
            appointment.date == date
                && appointment.timeslot == timeslot
                && appointment.patient.matches_ignore_case(patient)
        })
    }

    /// Copy of every active appointment in store order.
    pub fn appointments(&self) -> Vec<Appointment> {
        self.appointments.clone()
    }

    /// Copy of the appointments booked with `provider`.
    pub fn appointments_for_provider(&self, provider: &Provider) -> Vec<Appointment> {
        self.appointments
            .iter()
            .filter(|appointment| &appointment.provider == provider)
            .cloned()
            .collect()
    }

    /// Copy of the appointments booked for exactly `patient`.
    pub fn appointments_for_patient(&self, patient: &Profile) -> Vec<Appointment> {
        self.appointments
            .iter()
            .filter(|appointment| &appointment.patient == patient)
            .cloned()
            .collect()
    }

    /// Stable in-place reorder; equal keys keep insertion order.
    pub fn sort_appointments<F>(&mut self, compare: F)
    where
        F: FnMut(&Appointment, &Appointment) -> Ordering,
    {
        self.appointments.sort_by(compare);
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    /// Whether an imaging room at `location` is taken at `timeslot`.
    ///
    /// Under `RoomConflictPolicy::AnyDate` the date is ignored and any active
    /// imaging appointment in that room and slot counts.
    pub fn room_in_use(
        &self,
        location: Location,
        date: Date,
        timeslot: Timeslot,
        room: Radiology,
    ) -> bool {
        self.appointments.iter().any(|appointment| {
            appointment.room() == Some(room)
                && appointment.provider.location() == location
                && appointment.timeslot == timeslot
                && match self.room_policy {
                    RoomConflictPolicy::AnyDate => true,
                    RoomConflictPolicy::SameDate => appointment.date == date,
                }
        })
    }

    // ------------------------------------------------------------------
    // Technician rotation
    // ------------------------------------------------------------------

    /// Roster index the rotation currently points at.
    pub fn rotation_cursor(&self) -> usize {
        self.rotation.cursor()
    }

    /// Technician under the cursor, aligning the cursor first.
    pub fn technician(&mut self) -> Option<&Provider> {
        let index = self.rotation.align(&self.providers)?;
        self.providers.get(index)
    }

    /// Move to the previous technician in roster order and return it.
    pub fn next_technician(&mut self) -> Option<&Provider> {
        let index = self.rotation.advance(&self.providers)?;
        debug!("Technician rotation advanced to roster index {}", index);
        self.providers.get(index)
    }

    /// Put the cursor on a roster index taken from `technician_cycle`.
    pub fn seek_technician(&mut self, index: usize) {
        self.rotation.seek(index);
    }

    /// One lap of `(roster index, technician)` starting at the current one.
    pub fn technician_cycle(&self) -> Vec<(usize, &Provider)> {
        self.rotation
            .cycle(&self.providers)
            .into_iter()
            .map(|index| (index, &self.providers[index]))
            .collect()
    }

    /// One lap of technicians starting at the current one.
    pub fn technicians(&self) -> Vec<Provider> {
        self.technician_cycle()
            .into_iter()
            .map(|(_, provider)| provider.clone())
            .collect()
    }

    // ------------------------------------------------------------------
    // Billing
    // ------------------------------------------------------------------

    /// Drop every active appointment.
    pub fn clear_active_appointments(&mut self) -> usize {
        let cleared = self.appointments.len();
        self.appointments.clear();
        info!("Cleared {} active appointments", cleared);
        cleared
    }

    /// Move every active appointment into its patient's visit history, then
    /// clear the active set. Returns patients sorted by profile.
    ///
    /// A patient not yet in the registry is registered on the spot, so no
    /// active appointment goes unbilled.
    pub fn finalize_statements(&mut self) -> Vec<Patient> {
        let appointments = std::mem::take(&mut self.appointments);
        let finalized = appointments.len();
        for appointment in appointments {
            let index = self.patient_index(appointment.patient.clone());
            self.patients[index].add_visit(appointment);
        }
        info!("Finalized {} visits into patient statements", finalized);
        self.clear_active_appointments();

        let mut patients = self.patients.clone();
        patients.sort_by(|a, b| a.profile.cmp(&b.profile));
        patients
    }

    /// Providers sorted by profile with the credit earned from active
    /// appointments.
    pub fn credit_by_provider(&self) -> Vec<ProviderCredit> {
        let mut providers = self.providers.clone();
        providers.sort_by(|a, b| a.profile().cmp(b.profile()));
        providers
            .into_iter()
            .map(|provider| {
                let visits = self
                    .appointments
                    .iter()
                    .filter(|appointment| appointment.provider == provider)
                    .count() as u32;
                let credit = visits * provider.rate();
                ProviderCredit {
                    provider,
                    visits,
                    credit,
                }
            })
            .collect()
    }
}

impl fmt::Display for ClinicDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ClinicDatabase(providers={}, patients={}, appointments={})",
            self.providers.len(),
            self.patients.len(),
            self.appointments.len()
        )
    }
}
