/// Data models for the clinic scheduler.
///
/// This module defines the people the clinic deals with:
/// - Profile: name and date of birth identifying a person
/// - Location, Specialty, Radiology: fixed clinic catalogs
/// - Doctor, Technician, Provider: who appointments are booked with
/// - Patient, Visit: who appointments are booked for, and their billed history

use std::cmp::Ordering;
use std::fmt;

use crate::appointment::Appointment;
use crate::date::Date;
use crate::error::{ClinicError, Result};

/// Identity of a patient or provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub dob: Date,
}

impl Profile {
    /// Create a profile from a name and date of birth.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, dob: Date) -> Self {
        Profile {
            first_name: first_name.into(),
            last_name: last_name.into(),
            dob,
        }
    }

    /// Same person ignoring the case of either name.
    pub fn matches_ignore_case(&self, other: &Profile) -> bool {
        self.first_name.eq_ignore_ascii_case(&other.first_name)
            && self.last_name.eq_ignore_ascii_case(&other.last_name)
            && self.dob == other.dob
    }
}

impl Ord for Profile {
    /// Last name, then first name, then date of birth.
    fn cmp(&self, other: &Self) -> Ordering {
        self.last_name
            .cmp(&other.last_name)
            .then_with(|| self.first_name.cmp(&other.first_name))
            .then_with(|| self.dob.cmp(&other.dob))
    }
}

impl PartialOrd for Profile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.first_name, self.last_name, self.dob)
    }
}

/// Clinic sites. The county is the grouping key for location reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Bridgewater,
    Edison,
    Piscataway,
    Princeton,
    Morristown,
    Clark,
}

impl Location {
    pub const ALL: [Location; 6] = [
        Location::Bridgewater,
        Location::Edison,
        Location::Piscataway,
        Location::Princeton,
        Location::Morristown,
        Location::Clark,
    ];

    /// Convert a location name to a Location, ignoring case.
    pub fn from_string(value: &str) -> std::result::Result<Self, String> {
        Location::ALL
            .into_iter()
            .find(|location| location.name().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("Invalid location: '{}'", value))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Location::Bridgewater => "BRIDGEWATER",
            Location::Edison => "EDISON",
            Location::Piscataway => "PISCATAWAY",
            Location::Princeton => "PRINCETON",
            Location::Morristown => "MORRISTOWN",
            Location::Clark => "CLARK",
        }
    }

    /// County the location belongs to.
    pub fn county(&self) -> &'static str {
        match self {
            Location::Bridgewater => "Somerset",
            Location::Edison | Location::Piscataway => "Middlesex",
            Location::Princeton => "Mercer",
            Location::Morristown => "Morris",
            Location::Clark => "Union",
        }
    }

    /// Zip code of the location.
    pub fn zip(&self) -> &'static str {
        match self {
            Location::Bridgewater => "08807",
            Location::Edison => "08817",
            Location::Piscataway => "08854",
            Location::Princeton => "08542",
            Location::Morristown => "07960",
            Location::Clark => "07066",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {} {}", self.name(), self.county(), self.zip())
    }
}

/// Doctor specialties and the flat charge per office visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Specialty {
    Family,
    Pediatrician,
    Allergist,
}

impl Specialty {
    /// Convert a string to a Specialty, ignoring case.
    pub fn from_string(value: &str) -> std::result::Result<Self, String> {
        match value.trim().to_lowercase().as_str() {
            "family" => Ok(Specialty::Family),
            "pediatrician" => Ok(Specialty::Pediatrician),
            "allergist" => Ok(Specialty::Allergist),
            _ => Err(format!(
                "Invalid specialty: '{}'. Must be one of: family, pediatrician, allergist",
                value
            )),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Specialty::Family => "FAMILY",
            Specialty::Pediatrician => "PEDIATRICIAN",
            Specialty::Allergist => "ALLERGIST",
        }
    }

    /// Flat charge for one office visit, in whole dollars.
    pub fn charge(&self) -> u32 {
        match self {
            Specialty::Family => 250,
            Specialty::Pediatrician => 300,
            Specialty::Allergist => 350,
        }
    }
}

/// Imaging rooms, one of each per location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Radiology {
    Catscan,
    Ultrasound,
    Xray,
}

impl Radiology {
    /// Convert a service name to a Radiology room, ignoring case.
    pub fn from_string(value: &str) -> std::result::Result<Self, String> {
        match value.trim().to_lowercase().as_str() {
            "catscan" => Ok(Radiology::Catscan),
            "ultrasound" => Ok(Radiology::Ultrasound),
            "xray" => Ok(Radiology::Xray),
            _ => Err(format!("Invalid imaging service: '{}'", value)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Radiology::Catscan => "CATSCAN",
            Radiology::Ultrasound => "ULTRASOUND",
            Radiology::Xray => "XRAY",
        }
    }
}

impl fmt::Display for Radiology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What every provider variant can answer.
pub trait Practitioner {
    fn profile(&self) -> &Profile;
    fn location(&self) -> Location;
    /// Charge for a single visit, in whole dollars.
    fn rate(&self) -> u32;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctor {
    pub profile: Profile,
    pub location: Location,
    pub specialty: Specialty,
    pub npi: String,
}

impl Doctor {
    /// Create a doctor. The NPI must not be blank.
    pub fn new(
        profile: Profile,
        location: Location,
        specialty: Specialty,
        npi: impl Into<String>,
    ) -> Result<Self> {
        let npi = npi.into();
        if npi.trim().is_empty() {
            return Err(ClinicError::InvalidArgument("Doctor NPI cannot be empty".to_string()));
        }
        Ok(Doctor {
            profile,
            location,
            specialty,
            npi,
        })
    }
}

impl Practitioner for Doctor {
    fn profile(&self) -> &Profile {
        &self.profile
    }

    fn location(&self) -> Location {
        self.location
    }

    fn rate(&self) -> u32 {
        self.specialty.charge()
    }
}

impl fmt::Display for Doctor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}][{}, #{}]",
            self.profile,
            self.location,
            self.specialty.name(),
            self.npi
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Technician {
    pub profile: Profile,
    pub location: Location,
    pub rate_per_visit: u32,
}

impl Technician {
    /// Create a technician charging `rate_per_visit` per imaging visit.
    pub fn new(profile: Profile, location: Location, rate_per_visit: u32) -> Self {
        Technician {
            profile,
            location,
            rate_per_visit,
        }
    }

    /// Short form used in the rotation listing.
    pub fn brief(&self) -> String {
        format!(
            "{} {} ({})",
            self.profile.first_name,
            self.profile.last_name,
            self.location.name()
        )
    }
}

impl Practitioner for Technician {
    fn profile(&self) -> &Profile {
        &self.profile
    }

    fn location(&self) -> Location {
        self.location
    }

    fn rate(&self) -> u32 {
        self.rate_per_visit
    }
}

impl fmt::Display for Technician {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}][rate: ${}.00]",
            self.profile, self.location, self.rate_per_visit
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provider {
    Doctor(Doctor),
    Technician(Technician),
}

impl Provider {
    /// The doctor, if this provider is one.
    pub fn as_doctor(&self) -> Option<&Doctor> {
        match self {
            Provider::Doctor(doctor) => Some(doctor),
            Provider::Technician(_) => None,
        }
    }

    /// The technician, if this provider is one.
    pub fn as_technician(&self) -> Option<&Technician> {
        match self {
            Provider::Technician(technician) => Some(technician),
            Provider::Doctor(_) => None,
        }
    }

    /// Whether this provider takes imaging appointments.
    pub fn is_technician(&self) -> bool {
        matches!(self, Provider::Technician(_))
    }

    /// NPI of a doctor; technicians have none.
    pub fn npi(&self) -> Option<&str> {
        self.as_doctor().map(|doctor| doctor.npi.as_str())
    }
}

impl Practitioner for Provider {
    fn profile(&self) -> &Profile {
        match self {
            Provider::Doctor(doctor) => doctor.profile(),
            Provider::Technician(technician) => technician.profile(),
        }
    }

    fn location(&self) -> Location {
        match self {
            Provider::Doctor(doctor) => doctor.location(),
            Provider::Technician(technician) => technician.location(),
        }
    }

    fn rate(&self) -> u32 {
        match self {
            Provider::Doctor(doctor) => doctor.rate(),
            Provider::Technician(technician) => technician.rate(),
        }
    }
}

impl From<Doctor> for Provider {
    fn from(doctor: Doctor) -> Self {
        Provider::Doctor(doctor)
    }
}

impl From<Technician> for Provider {
    fn from(technician: Technician) -> Self {
        Provider::Technician(technician)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Doctor(doctor) => doctor.fmt(f),
            Provider::Technician(technician) => technician.fmt(f),
        }
    }
}

/// A finalized, billed appointment.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    pub appointment: Appointment,
    /// Provider rate at the moment the visit was finalized.
    pub charge: u32,
}

impl fmt::Display for Visit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.appointment.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
    pub profile: Profile,
    visits: Vec<Visit>,
}

impl Patient {
    /// Create a patient with no visit history.
    pub fn new(profile: Profile) -> Self {
        Patient {
            profile,
            visits: Vec::new(),
        }
    }

    /// Bill a finalized appointment at its provider's current rate.
    pub fn add_visit(&mut self, appointment: Appointment) {
        let charge = appointment.provider.rate();
        self.visits.push(Visit {
            appointment,
            charge,
        });
    }

    /// Finalized visits in billing order.
    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    /// Total due across every finalized visit.
    pub fn charge(&self) -> u32 {
        self.visits.iter().map(|visit| visit.charge).sum()
    }
}

impl fmt::Display for Patient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.profile.fmt(f)
    }
}
