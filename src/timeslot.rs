/// Time-of-day slots and the daily grid they are booked from.
///
/// Slots are addressed by a 1-based id equal to their position in the grid.
/// The grid keeps insertion order, so ids do not have to follow clock order.

use std::cmp::Ordering;
use std::fmt;

use crate::config::GridLayout;
use crate::error::{ClinicError, Result};

const MINUTES_PER_HOUR: u32 = 60;
const HOURS_PER_DAY: u32 = 24;

/// First id handed out by a grid.
pub const START_ID: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timeslot {
    hour: u32,
    minute: u32,
}

impl Timeslot {
    /// Create a slot, rejecting hours past 23 and minutes past 59.
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        if hour >= HOURS_PER_DAY || minute >= MINUTES_PER_HOUR {
            return Err(ClinicError::InvalidTimeslot { hour, minute });
        }
        Ok(Timeslot { hour, minute })
    }

    /// A slot `offset_minutes` after `hour:minute`, wrapping past midnight.
    pub fn with_offset(hour: u32, minute: u32, offset_minutes: u32) -> Self {
        let per_hour = u64::from(MINUTES_PER_HOUR);
        let total = (u64::from(hour) * per_hour + u64::from(minute) + u64::from(offset_minutes))
            % (u64::from(HOURS_PER_DAY) * per_hour);
        Timeslot {
            hour: (total / per_hour) as u32,
            minute: (total % per_hour) as u32,
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// Render as `H:MM AM` / `H:MM PM`.
    pub fn to_12_hour(&self) -> String {
        let period = if self.hour >= 12 { "PM" } else { "AM" };
        let hour = match self.hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{}:{:02} {}", hour, self.minute, period)
    }
}

impl Ord for Timeslot {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.hour, self.minute).cmp(&(other.hour, other.minute))
    }
}

impl PartialOrd for Timeslot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Timeslot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Ordered catalog of bookable slots.
#[derive(Debug, Clone, Default)]
pub struct TimeslotGrid {
    slots: Vec<Timeslot>,
}

impl TimeslotGrid {
    /// Empty grid.
    pub fn new() -> Self {
        TimeslotGrid { slots: Vec::new() }
    }

    /// Build the grid described by `layout`: one block per start hour, each
    /// holding `slots_per_block` slots spaced `slot_minutes` apart.
    pub fn from_layout(layout: &GridLayout) -> Self {
        let mut grid = TimeslotGrid::new();
        for &start_hour in &layout.block_starts {
            for slot in 0..layout.slots_per_block {
                grid.push(Timeslot::with_offset(
                    start_hour,
                    0,
                    layout.slot_minutes.saturating_mul(slot),
                ));
            }
        }
        grid
    }

    /// Append a slot and return its id.
    pub fn push(&mut self, timeslot: Timeslot) -> usize {
        self.slots.push(timeslot);
        self.slots.len()
    }

    /// Slot with the given 1-based id.
    pub fn get(&self, id: usize) -> Option<Timeslot> {
        id.checked_sub(START_ID)
            .and_then(|index| self.slots.get(index))
            .copied()
    }

    /// Look up a slot by its id token. Non-numeric tokens find nothing.
    pub fn lookup(&self, token: &str) -> Option<Timeslot> {
        token.trim().parse::<usize>().ok().and_then(|id| self.get(id))
    }

    /// Whether `id` names a slot in the grid.
    pub fn contains_id(&self, id: usize) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// `(id, slot)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Timeslot)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| (index + START_ID, *slot))
    }
}

impl fmt::Display for TimeslotGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, slot) in self.iter() {
            writeln!(f, "{} {}", id, slot)?;
        }
        Ok(())
    }
}
