/// Booked appointments and the orderings reports sort them by.

use std::cmp::Ordering;
use std::fmt;

use uuid::Uuid;

use crate::date::Date;
use crate::models::{Practitioner, Profile, Provider, Radiology};
use crate::timeslot::Timeslot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentKind {
    Office,
    Imaging { room: Radiology },
}

#[derive(Debug, Clone)]
pub struct Appointment {
    /// Log correlation only; not part of equality.
    pub appointment_id: Uuid,
    pub date: Date,
    pub timeslot: Timeslot,
    pub patient: Profile,
    pub provider: Provider,
    pub kind: AppointmentKind,
}

impl Appointment {
    /// Create an office visit with a doctor.
    pub fn office(date: Date, timeslot: Timeslot, patient: Profile, provider: Provider) -> Self {
        Appointment {
            appointment_id: Uuid::new_v4(),
            date,
            timeslot,
            patient,
            provider,
            kind: AppointmentKind::Office,
        }
    }

    /// Create an imaging appointment in `room`.
    pub fn imaging(
        date: Date,
        timeslot: Timeslot,
        patient: Profile,
        provider: Provider,
        room: Radiology,
    ) -> Self {
        Appointment {
            appointment_id: Uuid::new_v4(),
            date,
            timeslot,
            patient,
            provider,
            kind: AppointmentKind::Imaging { room },
        }
    }

    /// Same date and same timeslot.
    pub fn conflicts(&self, date: Date, timeslot: Timeslot) -> bool {
        self.date == date && self.timeslot == timeslot
    }

    /// The imaging room, or `None` for an office visit.
    pub fn room(&self) -> Option<Radiology> {
        match self.kind {
            AppointmentKind::Imaging { room } => Some(room),
            AppointmentKind::Office => None,
        }
    }

    /// Whether this is an imaging appointment.
    pub fn is_imaging(&self) -> bool {
        self.room().is_some()
    }
}

impl PartialEq for Appointment {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
            && self.timeslot == other.timeslot
            && self.patient == other.patient
            && self.provider == other.provider
    }
}

impl fmt::Display for Appointment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date,
            self.timeslot.to_12_hour(),
            self.patient,
            self.provider
        )?;
        if let Some(room) = self.room() {
            write!(f, "[{}]", room)?;
        }
        Ok(())
    }
}

/// Date, then time, then provider profile.
pub fn by_date_time_provider(a: &Appointment, b: &Appointment) -> Ordering {
    a.date
        .cmp(&b.date)
        .then_with(|| a.timeslot.cmp(&b.timeslot))
        .then_with(|| a.provider.profile().cmp(b.provider.profile()))
}

/// Provider county, then date, then time.
pub fn by_county_date_time(a: &Appointment, b: &Appointment) -> Ordering {
    a.provider
        .location()
        .county()
        .cmp(b.provider.location().county())
        .then_with(|| a.date.cmp(&b.date))
        .then_with(|| a.timeslot.cmp(&b.timeslot))
}

/// Patient profile, then date, then time.
pub fn by_patient_date_time(a: &Appointment, b: &Appointment) -> Ordering {
    a.patient
        .cmp(&b.patient)
        .then_with(|| a.date.cmp(&b.date))
        .then_with(|| a.timeslot.cmp(&b.timeslot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Doctor, Location, Specialty, Technician};

    fn date(m: i32, d: i32, y: i32) -> Date {
        Date::new(y, m, d).unwrap()
    }

    fn slot(h: u32, m: u32) -> Timeslot {
        Timeslot::new(h, m).unwrap()
    }

    fn doctor() -> Provider {
        Doctor::new(
            Profile::new("Andrew", "Patel", date(1, 21, 1989)),
            Location::Bridgewater,
            Specialty::Family,
            "01",
        )
        .unwrap()
        .into()
    }

    fn technician() -> Provider {
        Technician::new(
            Profile::new("Frank", "Lin", date(12, 22, 1990)),
            Location::Piscataway,
            120,
        )
        .into()
    }

    fn patient() -> Profile {
        Profile::new("John", "Doe", date(5, 1, 1990))
    }

    #[test]
    fn conflict_needs_same_date_and_slot() {
        let appt = Appointment::office(date(10, 20, 2026), slot(9, 0), patient(), doctor());
        assert!(appt.conflicts(date(10, 20, 2026), slot(9, 0)));
        assert!(!appt.conflicts(date(10, 21, 2026), slot(9, 0)));
        assert!(!appt.conflicts(date(10, 20, 2026), slot(9, 30)));
    }

    #[test]
    fn equality_ignores_id() {
        let a = Appointment::office(date(10, 20, 2026), slot(9, 0), patient(), doctor());
        let b = Appointment::office(date(10, 20, 2026), slot(9, 0), patient(), doctor());
        assert_ne!(a.appointment_id, b.appointment_id);
        assert_eq!(a, b);
    }

    #[test]
    fn imaging_display_carries_room() {
        let appt = Appointment::imaging(
            date(10, 20, 2026),
            slot(14, 30),
            patient(),
            technician(),
            Radiology::Xray,
        );
        assert_eq!(
            appt.to_string(),
            "10/20/2026 2:30 PM John Doe 5/1/1990 \
             [Frank Lin 12/22/1990, PISCATAWAY, Middlesex 08854][rate: $120.00][XRAY]"
        );
        assert!(appt.is_imaging());
    }

    #[test]
    fn county_ordering_groups_before_dates() {
        let early_somerset =
            Appointment::office(date(10, 20, 2026), slot(9, 0), patient(), doctor());
        let late_middlesex = Appointment::imaging(
            date(11, 20, 2026),
            slot(9, 0),
            patient(),
            technician(),
            Radiology::Catscan,
        );
        assert_eq!(
            by_county_date_time(&late_middlesex, &early_somerset),
            Ordering::Less
        );
        assert_eq!(
            by_date_time_provider(&late_middlesex, &early_somerset),
            Ordering::Greater
        );
    }
}
