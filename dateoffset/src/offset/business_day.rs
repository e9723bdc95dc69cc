use crate::calendar::Timestamp;

use dateoffset_core::prelude::*;

use std::fmt;

/// A business-day calendar: which weekdays count as workdays plus a sorted,
/// deduplicated set of holiday day-numbers (spec §3: "holidays are stored
/// sorted and deduplicated").
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct BusinessDayCalendar {
    weekmask: [bool; 7],
    holidays: Vec<i64>,
}

impl BusinessDayCalendar {
    /// `weekmask[Weekday::index()]` — `true` means that day of week is a
    /// workday. `holidays` need not be pre-sorted.
    pub fn new(weekmask: [bool; 7], holidays: &[Timestamp]) -> Self {
        let mut days: Vec<i64> = holidays.iter().map(|h| h.to_day_number()).collect();
        days.sort_unstable();
        days.dedup();
        Self { weekmask, holidays: days }
    }

    pub fn standard() -> Self {
        Self::new([true, true, true, true, true, false, false], &[])
    }

    fn is_holiday(&self, day_number: i64) -> bool {
        self.holidays.binary_search(&day_number).is_ok()
    }

    pub fn is_business_day(&self, ts: &Timestamp) -> bool {
        self.weekmask[ts.day_of_week().index() as usize] && !self.is_holiday(ts.to_day_number())
    }

    /// Step `n` business days (sign-directed) from `day_number`, per the
    /// platform `is_busday`/`busday_offset` contract referenced in §4.3.
    /// `1970-01-01` is day 0, a Thursday (`Weekday::Thursday.index() == 3`),
    /// so `(day_number + 3).rem_euclid(7)` gives the weekday index directly.
    fn step(&self, mut day_number: i64, n: i64) -> i64 {
        let mut remaining = n;
        let dir = if remaining >= 0 { 1 } else { -1 };
        while remaining != 0 {
            day_number += dir;
            let dow = (day_number + 3).rem_euclid(7) as usize;
            if self.weekmask[dow] && !self.is_holiday(day_number) {
                remaining -= dir;
            }
        }
        day_number
    }
}

fn floor_div(a: i64, b: i64) -> i64 {
    let d = a / b;
    let r = a % b;
    if (r != 0) && ((r < 0) != (b < 0)) { d - 1 } else { d }
}

/// Render a nanosecond sub-delta as the signed duration-encoded suffix the
/// spec's `freqstr` contract calls for (spec §4.1: "append a signed
/// duration-encoded suffix (`+2D3H…`)"), e.g. `+2D3H` or `-500L`.
fn duration_suffix(ns: i128) -> String {
    const UNITS: [(i128, &str); 7] = [
        (86_400_000_000_000, "D"),
        (3_600_000_000_000, "H"),
        (60_000_000_000, "T"),
        (1_000_000_000, "S"),
        (1_000_000, "L"),
        (1_000, "U"),
        (1, "N"),
    ];
    let sign = if ns < 0 { "-" } else { "+" };
    let mut rem = ns.abs();
    let mut body = String::new();
    for (inc, label) in UNITS {
        let q = rem / inc;
        if q > 0 {
            body.push_str(&fmt!("{}{}", q, label));
            rem %= inc;
        }
    }
    if body.is_empty() {
        body.push_str("0N");
    }
    fmt!("{}{}", sign, body)
}

/// `BusinessDay`: the Mon-Fri calendar, with the pandas fast-path-by-weeks
/// algorithm (spec §4.3 steps 1-4).
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct BusinessDay {
    pub n: i64,
    pub offset_ns: i128,
    pub normalize: bool,
}

impl BusinessDay {
    pub fn new(n: i64) -> Self {
        Self { n, offset_ns: 0, normalize: false }
    }

    pub fn with_n(&self, n: i64) -> Self {
        Self { n, ..self.clone() }
    }

    pub fn apply(&self, ts: &Timestamp) -> Outcome<Timestamp> {
        let mut n = self.n;
        if n == 0 && ts.day_of_week().index() > 4 {
            n = 1;
        }
        let mut day_number = ts.to_day_number();

        if n.abs() > 5 {
            let k = floor_div(n, 5);
            day_number += 7 * k;
            let landing_dow = (day_number + 3).rem_euclid(7);
            if n < 0 && landing_dow > 4 {
                n += 1;
            }
            n -= 5 * k;
            if n == 0 && landing_dow > 4 {
                n -= 1;
            }
        }
        while n != 0 {
            let k = n.signum();
            day_number += k;
            let landing_dow = (day_number + 3).rem_euclid(7);
            if landing_dow < 5 {
                n -= k;
            }
        }

        let mut result = Timestamp::from_day_number(day_number, ts);
        if self.normalize {
            result = result.normalize();
        }
        if self.offset_ns != 0 {
            result = result.add_duration_nanos(self.offset_ns);
        }
        Ok(result)
    }

    pub fn on_offset(&self, ts: &Timestamp) -> bool {
        ts.day_of_week().index() < 5
    }

    pub fn rule_code(&self) -> String {
        "B".to_string()
    }

    pub fn freqstr(&self) -> String {
        let base = if self.n != 1 { fmt!("{}{}", self.n, self.rule_code()) } else { self.rule_code() };
        if self.offset_ns != 0 { fmt!("{}{}", base, duration_suffix(self.offset_ns)) } else { base }
    }

    pub fn is_anchored(&self) -> bool {
        self.n == 1
    }

    /// Fold a pure duration into the stored sub-delta (spec §4.3: "Adding
    /// `BusinessDay` to a pure duration returns a new `BusinessDay` with
    /// that duration folded into `offset`").
    pub fn plus_duration(&self, delta_ns: i128) -> Self {
        Self { offset_ns: self.offset_ns + delta_ns, ..self.clone() }
    }
}

impl fmt::Display for BusinessDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.freqstr())
    }
}

/// `CustomBusinessDay`: like `BusinessDay` but rolls over an arbitrary
/// `BusinessDayCalendar` instead of the fixed Mon-Fri mask (spec §4.3).
///
/// The source's `datetime64` branch references an undefined `np_day_incr`
/// rather than `np_incr_dt` — a transcription error (§9 open question). The
/// corrected behaviour, applied here: step the date portion across the
/// calendar, then re-attach the original intra-day remainder.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct CustomBusinessDay {
    pub n: i64,
    pub calendar: BusinessDayCalendar,
    pub offset_ns: i128,
    pub normalize: bool,
}

impl CustomBusinessDay {
    pub fn new(n: i64, calendar: BusinessDayCalendar) -> Self {
        Self { n, calendar, offset_ns: 0, normalize: false }
    }

    pub fn with_n(&self, n: i64) -> Self {
        Self { n, ..self.clone() }
    }

    pub fn apply(&self, ts: &Timestamp) -> Outcome<Timestamp> {
        let mut n = self.n;
        if n == 0 && !self.calendar.is_business_day(ts) {
            n = 1;
        }
        let day_number = ts.to_day_number();
        let landed = self.calendar.step(day_number, n);

        // Re-attach the intra-day remainder the source drops via the
        // np_day_incr bug: the date steps across the calendar, the
        // time-of-day carries through unchanged.
        let mut result = Timestamp::from_day_number(landed, ts);
        if self.normalize {
            result = result.normalize();
        }
        if self.offset_ns != 0 {
            result = result.add_duration_nanos(self.offset_ns);
        }
        Ok(result)
    }

    pub fn on_offset(&self, ts: &Timestamp) -> bool {
        self.calendar.is_business_day(ts)
    }

    pub fn rule_code(&self) -> String {
        "C".to_string()
    }

    pub fn freqstr(&self) -> String {
        let base = if self.n != 1 { fmt!("{}{}", self.n, self.rule_code()) } else { self.rule_code() };
        if self.offset_ns != 0 { fmt!("{}{}", base, duration_suffix(self.offset_ns)) } else { base }
    }

    pub fn is_anchored(&self) -> bool {
        self.n == 1
    }
}

impl fmt::Display for CustomBusinessDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.freqstr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Month;

    #[test]
    fn test_friday_plus_one_rolls_to_monday() {
        let fri = Timestamp::from_ymd(2024, Month::March, 15).unwrap();
        let next = BusinessDay::new(1).apply(&fri).unwrap();
        assert_eq!((next.year, next.month, next.day), (2024, Month::March, 18));
    }

    #[test]
    fn test_weekend_n_zero_rolls_to_monday() {
        let sat = Timestamp::from_ymd(2024, Month::March, 16).unwrap();
        let next = BusinessDay::new(0).apply(&sat).unwrap();
        assert_eq!((next.year, next.month, next.day), (2024, Month::March, 18));
    }

    #[test]
    fn test_on_offset_matches_weekday() {
        let fri = Timestamp::from_ymd(2024, Month::March, 15).unwrap();
        let sat = Timestamp::from_ymd(2024, Month::March, 16).unwrap();
        assert!(BusinessDay::new(1).on_offset(&fri));
        assert!(!BusinessDay::new(1).on_offset(&sat));
    }

    #[test]
    fn test_fast_path_matches_stepwise_for_large_n() {
        let start = Timestamp::from_ymd(2024, Month::January, 1).unwrap();
        let fast = BusinessDay::new(23).apply(&start).unwrap();
        // Step one business day at a time and compare.
        let mut slow = start.clone();
        let mut remaining = 23;
        while remaining > 0 {
            slow = BusinessDay::new(1).apply(&slow).unwrap();
            remaining -= 1;
        }
        assert_eq!((fast.year, fast.month, fast.day), (slow.year, slow.month, slow.day));
    }

    #[test]
    fn test_negative_n_rolls_backward() {
        let mon = Timestamp::from_ymd(2024, Month::March, 18).unwrap();
        let prev = BusinessDay::new(-1).apply(&mon).unwrap();
        assert_eq!((prev.year, prev.month, prev.day), (2024, Month::March, 15));
    }

    #[test]
    fn test_custom_calendar_skips_holiday() {
        let holiday = Timestamp::from_ymd(2024, Month::March, 18).unwrap();
        let cal = BusinessDayCalendar::new([true, true, true, true, true, false, false], &[holiday]);
        let fri = Timestamp::from_ymd(2024, Month::March, 15).unwrap();
        let next = CustomBusinessDay::new(1, cal).apply(&fri).unwrap();
        assert_eq!((next.year, next.month, next.day), (2024, Month::March, 19));
    }

    #[test]
    fn test_custom_calendar_preserves_time_of_day() {
        let ts = Timestamp::new(2024, Month::March, 15, 14, 30, 0, 0, 0).unwrap();
        let cal = BusinessDayCalendar::standard();
        let next = CustomBusinessDay::new(1, cal).apply(&ts).unwrap();
        assert_eq!((next.hour, next.minute), (14, 30));
    }

    #[test]
    fn test_freqstr_encodes_sub_delta_as_duration_suffix() {
        // 2 days + 3 hours, in nanoseconds.
        let ns = 2 * 86_400_000_000_000i128 + 3 * 3_600_000_000_000i128;
        let bday = BusinessDay::new(1).plus_duration(ns);
        assert_eq!(bday.freqstr(), "B+2D3H");

        let negative = BusinessDay::new(1).plus_duration(-60_000_000_000);
        assert_eq!(negative.freqstr(), "B-1T");
    }

    #[test]
    fn test_custom_business_day_freqstr_includes_sub_delta() {
        let cal = BusinessDayCalendar::standard();
        let cbd = CustomBusinessDay { offset_ns: 3_600_000_000_000, ..CustomBusinessDay::new(2, cal) };
        assert_eq!(cbd.freqstr(), "2C+1H");
    }
}
