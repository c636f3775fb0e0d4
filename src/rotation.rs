/// Round-robin technician rotation over the provider roster.
///
/// The cursor is an index into the roster. `align` pulls it back onto the
/// nearest technician at or before the cursor, wrapping. `advance` moves it
/// to the previous technician in roster order, wrapping. The roster is
/// therefore walked in reverse, and the position persists across bookings.

use crate::models::Provider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TechnicianRotation {
    cursor: usize,
}

impl TechnicianRotation {
    /// Rotation starting at roster index 0.
    pub fn new() -> Self {
        TechnicianRotation { cursor: 0 }
    }

    /// Rotation starting at an arbitrary roster index.
    pub fn starting_at(cursor: usize) -> Self {
        TechnicianRotation { cursor }
    }

    /// Current roster index.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Place the cursor on a roster index, typically one returned by
    /// `cycle` or `aligned`.
    pub fn seek(&mut self, index: usize) {
        self.cursor = index;
    }

    /// Index `align` would move to, without moving.
    pub fn aligned(&self, roster: &[Provider]) -> Option<usize> {
        let len = roster.len();
        if len == 0 {
            return None;
        }
        let start = self.cursor % len;
        (0..len)
            .map(|step| (start + len - step) % len)
            .find(|&index| roster[index].is_technician())
    }

    /// Move the cursor onto `aligned` and return it.
    pub fn align(&mut self, roster: &[Provider]) -> Option<usize> {
        let index = self.aligned(roster)?;
        self.cursor = index;
        Some(index)
    }

    /// Step back to the previous technician and return its index.
    ///
    /// With a single technician the cursor stays where it is.
    pub fn advance(&mut self, roster: &[Provider]) -> Option<usize> {
        let current = self.align(roster)?;
        let len = roster.len();
        let next = (1..=len)
            .map(|step| (current + len - step) % len)
            .find(|&index| roster[index].is_technician())
            .unwrap_or(current);
        self.cursor = next;
        Some(next)
    }

    /// One full lap of technician indices, starting at the aligned cursor.
    pub fn cycle(&self, roster: &[Provider]) -> Vec<usize> {
        let mut walker = *self;
        let Some(first) = walker.align(roster) else {
            return Vec::new();
        };
        let mut lap = vec![first];
        while let Some(index) = walker.advance(roster) {
            if index == first {
                break;
            }
            lap.push(index);
        }
        lap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::Date;
    use crate::models::{Doctor, Location, Profile, Specialty, Technician};

    fn doctor(name: &str) -> Provider {
        Doctor::new(
            Profile::new(name, "Doc", Date::new(1980, 1, 1).unwrap()),
            Location::Edison,
            Specialty::Family,
            name,
        )
        .unwrap()
        .into()
    }

    fn technician(name: &str) -> Provider {
        Technician::new(
            Profile::new(name, "Tech", Date::new(1980, 1, 1).unwrap()),
            Location::Edison,
            100,
        )
        .into()
    }

    // D0 T1 D2 T3 T4 D5
    fn mixed_roster() -> Vec<Provider> {
        vec![
            doctor("d0"),
            technician("t1"),
            doctor("d2"),
            technician("t3"),
            technician("t4"),
            doctor("d5"),
        ]
    }

    #[test]
    fn align_searches_backward_with_wraparound() {
        let roster = mixed_roster();
        assert_eq!(TechnicianRotation::starting_at(2).aligned(&roster), Some(1));
        assert_eq!(TechnicianRotation::starting_at(3).aligned(&roster), Some(3));
        // d0 wraps to the end and lands on t4, not forward to t1
        assert_eq!(TechnicianRotation::starting_at(0).aligned(&roster), Some(4));
        assert_eq!(TechnicianRotation::starting_at(5).aligned(&roster), Some(4));
    }

    #[test]
    fn advance_walks_roster_in_reverse() {
        let roster = mixed_roster();
        let mut rotation = TechnicianRotation::starting_at(4);
        assert_eq!(rotation.advance(&roster), Some(3));
        assert_eq!(rotation.advance(&roster), Some(1));
        assert_eq!(rotation.advance(&roster), Some(4));
    }

    #[test]
    fn full_lap_returns_to_start() {
        let roster = mixed_roster();
        let mut rotation = TechnicianRotation::starting_at(0);
        let start = rotation.align(&roster);
        let technicians = roster.iter().filter(|p| p.is_technician()).count();
        let mut seen = Vec::new();
        for _ in 0..technicians {
            seen.push(rotation.advance(&roster).unwrap());
        }
        assert_eq!(rotation.cursor(), start.unwrap());
        seen.sort_unstable();
        assert_eq!(seen, vec![1, 3, 4]);
    }

    #[test]
    fn cycle_is_a_snapshot() {
        let roster = mixed_roster();
        let rotation = TechnicianRotation::starting_at(3);
        assert_eq!(rotation.cycle(&roster), vec![3, 1, 4]);
        assert_eq!(rotation.cursor(), 3);
    }

    #[test]
    fn no_technicians_means_no_rotation() {
        let roster = vec![doctor("d0"), doctor("d1")];
        let mut rotation = TechnicianRotation::new();
        assert_eq!(rotation.align(&roster), None);
        assert_eq!(rotation.advance(&roster), None);
        assert!(rotation.cycle(&roster).is_empty());
        assert!(rotation.cycle(&[]).is_empty());
    }

    #[test]
    fn single_technician_cycles_to_itself() {
        let roster = vec![doctor("d0"), technician("t1")];
        let mut rotation = TechnicianRotation::new();
        assert_eq!(rotation.advance(&roster), Some(1));
        assert_eq!(rotation.cycle(&roster), vec![1]);
    }
}
