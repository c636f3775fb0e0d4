/// Runtime configuration.
///
/// Every knob has a default matching the clinic's standing policy and can be
/// overridden through environment variables. Bad values are logged and
/// ignored.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

/// How the imaging-room check treats appointment dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoomConflictPolicy {
    /// A room is busy at a timeslot if any active imaging appointment uses
    /// it at that timeslot, whatever its date.
    #[default]
    AnyDate,
    /// A room is busy only for appointments on the same date.
    SameDate,
}

impl FromStr for RoomConflictPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "any-date" | "any_date" => Ok(RoomConflictPolicy::AnyDate),
            "same-date" | "same_date" => Ok(RoomConflictPolicy::SameDate),
            _ => Err(format!(
                "Invalid room policy: '{}'. Must be one of: any-date, same-date",
                value
            )),
        }
    }
}

/// Shape of the daily timeslot grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    pub block_starts: Vec<u32>,
    pub slots_per_block: u32,
    pub slot_minutes: u32,
}

impl Default for GridLayout {
    fn default() -> Self {
        GridLayout {
            block_starts: vec![9, 14],
            slots_per_block: 6,
            slot_minutes: 30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClinicConfig {
    /// How far ahead, in months, an appointment may be booked.
    pub schedule_window_months: u32,
    pub grid: GridLayout,
    pub roster_path: PathBuf,
    pub room_policy: RoomConflictPolicy,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        ClinicConfig {
            schedule_window_months: 6,
            grid: GridLayout::default(),
            roster_path: PathBuf::from("input/providers.txt"),
            room_policy: RoomConflictPolicy::AnyDate,
        }
    }
}

/// Longest booking window `window_in_words` can spell out.
pub const MAX_WINDOW_MONTHS: u32 = 12;
const MINUTES_PER_DAY: u32 = 24 * 60;

impl ClinicConfig {
    /// Defaults overridden by the `CLINIC_*` environment variables.
    pub fn from_env() -> Self {
        ClinicConfig::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `CLINIC_*`
    /// key. Out-of-range values are logged and the default is kept.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ClinicConfig::default();

        if let Some(months) = parsed::<u32>(&lookup, "CLINIC_SCHEDULE_WINDOW_MONTHS") {
            if (1..=MAX_WINDOW_MONTHS).contains(&months) {
                config.schedule_window_months = months;
            } else {
                warn!(
                    "CLINIC_SCHEDULE_WINDOW_MONTHS must be between 1 and {}, using default",
                    MAX_WINDOW_MONTHS
                );
            }
        }

        if let Some(raw) = lookup("CLINIC_GRID_BLOCK_STARTS") {
            let starts: Result<Vec<u32>, _> =
                raw.split(',').map(|part| part.trim().parse::<u32>()).collect();
            match starts {
                Ok(starts) if !starts.is_empty() && starts.iter().all(|h| *h < 24) => {
                    config.grid.block_starts = starts;
                }
                _ => warn!("CLINIC_GRID_BLOCK_STARTS '{}' is invalid, using default", raw),
            }
        }

        let slots = parsed::<u32>(&lookup, "CLINIC_GRID_SLOTS_PER_BLOCK");
        let minutes = parsed::<u32>(&lookup, "CLINIC_GRID_SLOT_MINUTES");
        if slots.is_some() || minutes.is_some() {
            let slots = slots.unwrap_or(config.grid.slots_per_block);
            let minutes = minutes.unwrap_or(config.grid.slot_minutes);
            if block_fits_in_a_day(slots, minutes) {
                config.grid.slots_per_block = slots;
                config.grid.slot_minutes = minutes;
            } else {
                warn!(
                    "{} slots of {} minutes do not fit in one day, using default grid",
                    slots, minutes
                );
            }
        }

        if let Some(path) = lookup("CLINIC_ROSTER_PATH") {
            config.roster_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup("CLINIC_ROOM_POLICY") {
            match raw.parse() {
                Ok(policy) => config.room_policy = policy,
                Err(e) => warn!("{}, using default", e),
            }
        }

        config
    }

    /// The scheduling window spelled out for user-facing messages.
    pub fn window_in_words(&self) -> String {
        const WORDS: [&str; 13] = [
            "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
            "ten", "eleven", "twelve",
        ];
        WORDS
            .get(self.schedule_window_months as usize)
            .map(|word| word.to_string())
            .unwrap_or_else(|| self.schedule_window_months.to_string())
    }
}

fn block_fits_in_a_day(slots: u32, minutes: u32) -> bool {
    slots > 0
        && minutes > 0
        && slots
            .checked_mul(minutes)
            .is_some_and(|span| span <= MINUTES_PER_DAY)
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("{} '{}' is not a valid number, using default", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_clinic_policy() {
        let config = ClinicConfig::default();
        assert_eq!(config.schedule_window_months, 6);
        assert_eq!(config.grid.block_starts, vec![9, 14]);
        assert_eq!(config.room_policy, RoomConflictPolicy::AnyDate);
        assert_eq!(config.window_in_words(), "six");
    }

    #[test]
    fn window_words_fall_back_to_digits() {
        let config = ClinicConfig {
            schedule_window_months: 18,
            ..ClinicConfig::default()
        };
        assert_eq!(config.window_in_words(), "18");
    }

    #[test]
    fn parses_room_policy_names() {
        assert_eq!("same-date".parse(), Ok(RoomConflictPolicy::SameDate));
        assert_eq!("ANY_DATE".parse(), Ok(RoomConflictPolicy::AnyDate));
        assert!("weekly".parse::<RoomConflictPolicy>().is_err());
    }

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn reads_overrides_from_lookup() {
        let config = ClinicConfig::from_lookup(lookup_from(&[
            ("CLINIC_SCHEDULE_WINDOW_MONTHS", "3"),
            ("CLINIC_GRID_BLOCK_STARTS", "8, 13"),
            ("CLINIC_GRID_SLOTS_PER_BLOCK", "4"),
            ("CLINIC_GRID_SLOT_MINUTES", "45"),
            ("CLINIC_ROSTER_PATH", "/tmp/roster.txt"),
            ("CLINIC_ROOM_POLICY", "same-date"),
        ]));
        assert_eq!(config.schedule_window_months, 3);
        assert_eq!(config.window_in_words(), "three");
        assert_eq!(config.grid.block_starts, vec![8, 13]);
        assert_eq!(config.grid.slots_per_block, 4);
        assert_eq!(config.grid.slot_minutes, 45);
        assert_eq!(config.roster_path, PathBuf::from("/tmp/roster.txt"));
        assert_eq!(config.room_policy, RoomConflictPolicy::SameDate);
    }

    #[test]
    fn rejects_out_of_range_windows() {
        for raw in ["0", "13", "3000000000", "-1", "six"] {
            let config =
                ClinicConfig::from_lookup(lookup_from(&[("CLINIC_SCHEDULE_WINDOW_MONTHS", raw)]));
            assert_eq!(config.schedule_window_months, 6, "window {}", raw);
        }
        let config =
            ClinicConfig::from_lookup(lookup_from(&[("CLINIC_SCHEDULE_WINDOW_MONTHS", "12")]));
        assert_eq!(config.schedule_window_months, 12);
    }

    #[test]
    fn rejects_grids_that_overflow_a_day() {
        let cases: [&[(&str, &str)]; 4] = [
            &[("CLINIC_GRID_SLOTS_PER_BLOCK", "0")],
            &[("CLINIC_GRID_SLOT_MINUTES", "0")],
            &[("CLINIC_GRID_SLOTS_PER_BLOCK", "4000000000")],
            &[
                ("CLINIC_GRID_SLOTS_PER_BLOCK", "100000"),
                ("CLINIC_GRID_SLOT_MINUTES", "100000"),
            ],
        ];
        for pairs in cases {
            let config = ClinicConfig::from_lookup(lookup_from(pairs));
            assert_eq!(config.grid, GridLayout::default(), "{:?}", pairs);
        }

        let config = ClinicConfig::from_lookup(lookup_from(&[
            ("CLINIC_GRID_SLOTS_PER_BLOCK", "48"),
            ("CLINIC_GRID_SLOT_MINUTES", "30"),
        ]));
        assert_eq!(config.grid.slots_per_block, 48);
    }

    #[test]
    fn bad_block_starts_and_policy_keep_defaults() {
        let config = ClinicConfig::from_lookup(lookup_from(&[
            ("CLINIC_GRID_BLOCK_STARTS", "9,24"),
            ("CLINIC_ROOM_POLICY", "weekly"),
        ]));
        assert_eq!(config.grid.block_starts, vec![9, 14]);
        assert_eq!(config.room_policy, RoomConflictPolicy::AnyDate);
    }
}
