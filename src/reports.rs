/// Text reports over the appointment store.
///
/// Every report returns the full block to print, trailing newline included.

use crate::appointment::{
    by_county_date_time, by_date_time_provider, by_patient_date_time, Appointment,
};
use crate::database::ClinicDatabase;
use crate::models::{Practitioner, Provider};

pub const EMPTY_CALENDAR: &str = "Schedule calendar is empty.\n";
const LIST_FOOTER: &str = "** end of list **\n";
pub const PROVIDERS_HEADER: &str = "Providers loaded to the list.";
pub const ROTATION_HEADER: &str = "Rotation list for the technicians.";

/// The appointment listings, each with its own ordering and filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    /// PA
    ByDateTimeProvider,
    /// PP
    ByPatient,
    /// PL
    ByLocation,
    /// PI
    Imaging,
    /// PO
    Office,
}

impl Listing {
    fn header(&self) -> &'static str {
        match self {
            Listing::ByDateTimeProvider => "** List of appointments, ordered by date/time/provider.\n",
            Listing::ByPatient => "** Appointments ordered by patient/date/time.\n",
            Listing::ByLocation => "** List of appointments, ordered by county/date/time.\n",
            Listing::Imaging => "** List of radiology appointments ordered by county/date/time.\n",
            Listing::Office => "** List of office appointments ordered by county/date/time.\n",
        }
    }

    fn includes(&self, appointment: &Appointment) -> bool {
        match self {
            Listing::Imaging => appointment.is_imaging(),
            Listing::Office => !appointment.is_imaging(),
            _ => true,
        }
    }
}

/// Sort the store in place for `listing` and render it.
///
/// The reorder sticks: later listings start from this order.
pub fn appointment_listing(database: &mut ClinicDatabase, listing: Listing) -> String {
    if database.is_empty() {
        return EMPTY_CALENDAR.to_string();
    }
    match listing {
        Listing::ByDateTimeProvider => database.sort_appointments(by_date_time_provider),
        Listing::ByPatient => database.sort_appointments(by_patient_date_time),
        Listing::ByLocation | Listing::Imaging | Listing::Office => {
            database.sort_appointments(by_county_date_time)
        }
    }

    let mut out = String::from(listing.header());
    for appointment in database.appointments() {
        if listing.includes(&appointment) {
            out.push_str(&format!("{}\n", appointment));
        }
    }
    out.push_str(LIST_FOOTER);
    out
}

/// Credit earned by every provider from the active appointments.
pub fn credit_statement(database: &ClinicDatabase) -> String {
    if database.is_empty() {
        return EMPTY_CALENDAR.to_string();
    }
    let mut out = String::from("** Credit amount ordered by provider. **\n");
    for (index, row) in database.credit_by_provider().iter().enumerate() {
        out.push_str(&format!(
            "({}) {} [credit amount: {}]\n",
            index + 1,
            row.provider.profile(),
            format_currency(row.credit)
        ));
    }
    out.push_str(LIST_FOOTER);
    out
}

/// Finalize the active appointments into visits and print what each
/// patient owes. Clears the calendar.
pub fn billing_statements(database: &mut ClinicDatabase) -> String {
    if database.is_empty() {
        return EMPTY_CALENDAR.to_string();
    }
    let mut out = String::from("** Billing statement ordered by patient. **\n");
    for (index, patient) in database.finalize_statements().iter().enumerate() {
        out.push_str(&format!(
            "({}) {} [due: {}]\n",
            index + 1,
            patient,
            format_currency(patient.charge())
        ));
    }
    out.push_str(LIST_FOOTER);
    out
}

/// One provider per line, sorted by last name.
pub fn provider_roster(providers: &[Provider]) -> String {
    let mut sorted: Vec<&Provider> = providers.iter().collect();
    sorted.sort_by(|a, b| a.profile().last_name.cmp(&b.profile().last_name));
    sorted
        .iter()
        .map(|provider| format!("{}\n", provider))
        .collect()
}

/// The technicians in rotation order starting from the current one.
pub fn rotation_listing(database: &ClinicDatabase) -> String {
    database
        .technicians()
        .iter()
        .filter_map(Provider::as_technician)
        .map(|technician| technician.brief())
        .collect::<Vec<_>>()
        .join(" --> ")
}

/// Whole dollars as `$#,##0.00`.
pub fn format_currency(amount: u32) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("${}.00", grouped)
}
