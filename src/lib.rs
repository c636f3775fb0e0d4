//! Clinic appointment scheduler.
//!
//! Books office visits with doctors and imaging services with technicians
//! across the clinic's locations, rejecting provider, patient and room
//! conflicts. Technicians are assigned round-robin.

pub mod appointment;
pub mod commands;
pub mod config;
pub mod database;
pub mod date;
pub mod error;
pub mod models;
pub mod reports;
pub mod roster;
pub mod rotation;
pub mod scheduler;
pub mod timeslot;
pub mod validation;

pub use appointment::{Appointment, AppointmentKind};
pub use commands::ClinicManager;
pub use config::{ClinicConfig, RoomConflictPolicy};
pub use database::ClinicDatabase;
pub use date::Date;
pub use error::{ClinicError, Result};
pub use models::{Doctor, Location, Patient, Practitioner, Profile, Provider, Radiology, Specialty, Technician};
pub use scheduler::ClinicScheduler;
pub use timeslot::Timeslot;
pub use validation::{ErrorKind, ValidationError};
