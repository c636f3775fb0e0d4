/// Provider roster file loader.
///
/// One provider per line, fields separated by whitespace:
///
/// ```text
/// D <first> <last> <dob> <location> <specialty> <npi>
/// T <first> <last> <dob> <location> <rate>
/// ```

use std::fs;
use std::path::Path;

use tracing::info;

use crate::date::Date;
use crate::error::{ClinicError, Result};
use crate::models::{Doctor, Location, Profile, Provider, Specialty, Technician};

const DOCTOR_FIELDS: usize = 7;
const TECHNICIAN_FIELDS: usize = 6;

fn roster_error(line: usize, reason: impl Into<String>) -> ClinicError {
    ClinicError::Roster {
        line,
        reason: reason.into(),
    }
}

/// Parse a single roster record. `line` is only used in error messages.
pub fn parse_provider(record: &str, line: usize) -> Result<Provider> {
    let fields: Vec<&str> = record.split_whitespace().collect();
    let expected = match fields.first() {
        Some(&"D") => DOCTOR_FIELDS,
        Some(&"T") => TECHNICIAN_FIELDS,
        Some(other) => return Err(roster_error(line, format!("unknown provider type '{}'", other))),
        None => return Err(roster_error(line, "empty record")),
    };
    if fields.len() != expected {
        return Err(roster_error(
            line,
            format!("expected {} fields, found {}", expected, fields.len()),
        ));
    }

    let dob: Date = fields[3]
        .parse()
        .map_err(|_| roster_error(line, format!("invalid date of birth '{}'", fields[3])))?;
    let profile = Profile::new(fields[1], fields[2], dob);
    let location = Location::from_string(fields[4]).map_err(|e| roster_error(line, e))?;

    if expected == DOCTOR_FIELDS {
        let specialty = Specialty::from_string(fields[5]).map_err(|e| roster_error(line, e))?;
        let doctor = Doctor::new(profile, location, specialty, fields[6])?;
        Ok(doctor.into())
    } else {
        let rate = fields[5]
            .parse::<u32>()
            .map_err(|_| roster_error(line, format!("invalid rate '{}'", fields[5])))?;
        Ok(Technician::new(profile, location, rate).into())
    }
}

/// Parse every non-blank line, keeping file order.
pub fn parse_roster(text: &str) -> Result<Vec<Provider>> {
    text.lines()
        .enumerate()
        .filter(|(_, record)| !record.trim().is_empty())
        .map(|(index, record)| parse_provider(record, index + 1))
        .collect()
}

/// Read and parse the roster file at `path`.
pub fn load_roster(path: impl AsRef<Path>) -> Result<Vec<Provider>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let providers = parse_roster(&text)?;
    info!("Loaded {} providers from {}", providers.len(), path.display());
    Ok(providers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Practitioner;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_both_record_kinds() {
        let doctor = parse_provider("D ANDREW PATEL 1/21/1989 BRIDGEWATER FAMILY 01", 1).unwrap();
        assert_eq!(doctor.npi(), Some("01"));
        assert_eq!(doctor.location(), Location::Bridgewater);
        assert_eq!(doctor.rate(), 250);

        let tech = parse_provider("T  FRANK LIN 12/22/1990 piscataway 120", 2).unwrap();
        assert!(tech.is_technician());
        assert_eq!(tech.rate(), 120);
        assert_eq!(tech.profile().first_name, "FRANK");
    }

    #[test]
    fn reports_the_bad_line() {
        assert_matches!(
            parse_provider("X A B 1/1/1990 EDISON 100", 4),
            Err(ClinicError::Roster { line: 4, .. })
        );
        assert_matches!(
            parse_provider("T A B 1/1/1990 NEWARK 100", 5),
            Err(ClinicError::Roster { line: 5, .. })
        );
        assert_matches!(
            parse_provider("T A B 2/30/1990 EDISON 100", 6),
            Err(ClinicError::Roster { line: 6, .. })
        );
        assert_matches!(
            parse_provider("T A B 1/1/1990 EDISON -5", 7),
            Err(ClinicError::Roster { line: 7, .. })
        );
        assert_matches!(
            parse_provider("D A B 1/1/1990 EDISON FAMILY", 8),
            Err(ClinicError::Roster { line: 8, .. })
        );
    }

    #[test]
    fn skips_blank_lines_and_keeps_order() {
        let text = "D ANDREW PATEL 1/21/1989 BRIDGEWATER FAMILY 01\n\n   \nT FRANK LIN 12/22/1990 PISCATAWAY 120\n";
        let providers = parse_roster(text).unwrap();
        assert_eq!(providers.len(), 2);
        assert!(!providers[0].is_technician());
        assert!(providers[1].is_technician());
        assert_matches!(parse_roster("\nbogus"), Err(ClinicError::Roster { line: 2, .. }));
    }

    #[test]
    fn loads_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "D RACHAEL LIM 5/23/1973 EDISON ALLERGIST 02").unwrap();
        writeln!(file, "T BEN JERRY 1/1/1980 PRINCETON 100").unwrap();
        let providers = load_roster(file.path()).unwrap();
        assert_eq!(providers.len(), 2);

        assert_matches!(load_roster("/nonexistent/providers.txt"), Err(ClinicError::Io(_)));
    }
}
