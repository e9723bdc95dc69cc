use crate::calendar::Timestamp;

use dateoffset_core::prelude::*;

use std::fmt;

/// A fixed-duration tick kind (spec §4.2). Not anchored to any calendar
/// feature — `onOffset` is always `true`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TickUnit {
    Nano,
    Micro,
    Milli,
    Second,
    Minute,
    Hour,
    Day,
}

impl TickUnit {
    /// The fixed `_inc` duration, in nanoseconds.
    pub fn inc_nanos(&self) -> i128 {
        match self {
            Self::Nano   => 1,
            Self::Micro  => 1_000,
            Self::Milli  => 1_000_000,
            Self::Second => 1_000_000_000,
            Self::Minute => 60_000_000_000,
            Self::Hour   => 3_600_000_000_000,
            Self::Day    => 86_400_000_000_000,
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Nano   => "N",
            Self::Micro  => "U",
            Self::Milli  => "L",
            Self::Second => "S",
            Self::Minute => "T",
            Self::Hour   => "H",
            Self::Day    => "D",
        }
    }

    /// The coarsest unit whose `inc_nanos` divides `ns` exactly, searched
    /// from `Day` down to `Nano`.
    fn coarsest_dividing(ns: i128) -> Self {
        for unit in [Self::Day, Self::Hour, Self::Minute, Self::Second, Self::Milli, Self::Micro] {
            if ns % unit.inc_nanos() == 0 {
                return unit;
            }
        }
        Self::Nano
    }
}

/// `Tick(n)`: `delta = n * unit.inc_nanos()`. Equality and ordering compare
/// `delta` across different tick kinds, so `Hour(1) == Minute(60)`
/// (spec §4.2).
#[derive(Clone, Copy, Debug)]
pub struct Tick {
    pub unit: TickUnit,
    pub n:    i64,
}

impl Tick {
    pub fn new(unit: TickUnit, n: i64) -> Self {
        Self { unit, n }
    }

    pub fn delta_nanos(&self) -> i128 {
        self.unit.inc_nanos() * (self.n as i128)
    }

    pub fn apply(&self, ts: &Timestamp) -> Outcome<Timestamp> {
        Ok(ts.add_duration_nanos(self.delta_nanos()))
    }

    pub fn on_offset(&self, _ts: &Timestamp) -> bool {
        true
    }

    pub fn is_anchored(&self) -> bool {
        false
    }

    pub fn rule_code(&self) -> String {
        self.unit.prefix().to_string()
    }

    pub fn freqstr(&self) -> String {
        if self.n != 1 {
            fmt!("{}{}", self.n, self.rule_code())
        } else {
            self.rule_code()
        }
    }

    pub fn with_n(&self, n: i64) -> Self {
        Self { unit: self.unit, n }
    }

    pub fn neg(&self) -> Self {
        Self { unit: self.unit, n: -self.n }
    }

    pub fn mul(&self, k: i64) -> Self {
        Self { unit: self.unit, n: k * self.n }
    }

    /// Addition of two (possibly different) tick kinds normalizes to the
    /// coarsest representation whose `_inc` divides the sum exactly; else
    /// the finest sufficient (spec §4.2).
    pub fn add(&self, other: &Self) -> Self {
        let total_ns = self.delta_nanos() + other.delta_nanos();
        let unit = TickUnit::coarsest_dividing(total_ns);
        Self { unit, n: (total_ns / unit.inc_nanos()) as i64 }
    }
}

impl PartialEq for Tick {
    fn eq(&self, other: &Self) -> bool {
        self.delta_nanos() == other.delta_nanos()
    }
}
impl Eq for Tick {}

impl std::hash::Hash for Tick {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.delta_nanos().hash(state);
    }
}

impl PartialOrd for Tick {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Tick {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.delta_nanos().cmp(&other.delta_nanos())
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.freqstr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Month;

    #[test]
    fn test_hour_equals_sixty_minutes() {
        assert_eq!(Tick::new(TickUnit::Hour, 1), Tick::new(TickUnit::Minute, 60));
    }

    #[test]
    fn test_apply_carries_into_next_day() {
        let ts = Timestamp::new(2024, Month::March, 15, 23, 0, 0, 0, 0).unwrap();
        let tick = Tick::new(TickUnit::Hour, 2);
        let next = tick.apply(&ts).unwrap();
        assert_eq!((next.year, next.month, next.day, next.hour), (2024, Month::March, 16, 1));
    }

    #[test]
    fn test_on_offset_always_true() {
        let ts = Timestamp::from_ymd(2024, Month::March, 15).unwrap();
        assert!(Tick::new(TickUnit::Day, 1).on_offset(&ts));
        assert!(!Tick::new(TickUnit::Day, 1).is_anchored());
    }

    #[test]
    fn test_add_normalizes_to_coarsest() {
        let sum = Tick::new(TickUnit::Minute, 90).add(&Tick::new(TickUnit::Minute, 30));
        // 120 minutes == 2 hours, divides evenly into Hour.
        assert_eq!(sum, Tick::new(TickUnit::Hour, 2));
        assert_eq!(sum.unit, TickUnit::Hour);
        assert_eq!(sum.n, 2);
    }

    #[test]
    fn test_freqstr() {
        assert_eq!(Tick::new(TickUnit::Hour, 1).freqstr(), "H");
        assert_eq!(Tick::new(TickUnit::Hour, 3).freqstr(), "3H");
    }
}
