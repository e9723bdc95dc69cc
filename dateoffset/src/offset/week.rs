use crate::calendar::{Timestamp, Weekday};

use dateoffset_core::prelude::*;

use std::fmt;

/// `Week(weekday)`: steps in whole weeks (spec §4.5). `weekday = None` makes
/// this a pure 7-day tick; `Some(w)` snaps onto `w` before stepping the
/// remainder in whole weeks.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Week {
    pub n: i64,
    pub weekday: Option<Weekday>,
}

impl Week {
    pub fn try_new(n: i64, weekday: Option<Weekday>) -> Outcome<Self> {
        if n == 0 {
            return Err(err!(errmsg!("Week does not accept n=0"), Invalid, Input));
        }
        Ok(Self { n, weekday })
    }

    pub fn with_n(&self, n: i64) -> Self {
        Self { n, ..self.clone() }
    }

    pub fn apply(&self, ts: &Timestamp) -> Outcome<Timestamp> {
        let weekday = match self.weekday {
            None => return Ok(ts.add_days(7 * self.n)),
            Some(w) => w,
        };
        let other_day = ts.day_of_week();
        let mut k = self.n;
        let mut shifted = ts.clone();
        if k > 0 {
            if other_day != weekday {
                let do_offset = (weekday.index() as i64 - other_day.index() as i64).rem_euclid(7);
                shifted = shifted.add_days(do_offset);
                k -= 1;
            }
        } else if other_day != weekday {
            let do_offset = (weekday.index() as i64 - other_day.index() as i64).rem_euclid(7) - 7;
            shifted = shifted.add_days(do_offset);
            k += 1;
        }
        Ok(shifted.add_days(7 * k))
    }

    pub fn on_offset(&self, ts: &Timestamp) -> bool {
        match self.weekday {
            None => true,
            Some(w) => ts.day_of_week() == w,
        }
    }

    pub fn rule_code(&self) -> String {
        match self.weekday {
            Some(w) => fmt!("W-{}", w.abbrev()),
            None => "W".to_string(),
        }
    }

    pub fn freqstr(&self) -> String {
        if self.n != 1 { fmt!("{}{}", self.n, self.rule_code()) } else { self.rule_code() }
    }

    pub fn is_anchored(&self) -> bool {
        self.n == 1
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.freqstr())
    }
}

/// Shared "n-th occurrence inside a month" apply: pandas' `WeekOfMonth.apply`
/// and `LastWeekOfMonth.apply` are identical but for how the in-month target
/// day is located (spec §4.5).
fn apply_month_anchored<F>(n: i64, ts: &Timestamp, offset_day: F) -> Outcome<Timestamp>
where
    F: Fn(&Timestamp) -> Outcome<u8>,
{
    let compare_day = offset_day(ts)?;
    let mut months = n;
    if months > 0 {
        if compare_day > ts.day {
            months -= 1;
        }
    } else if compare_day < ts.day {
        months += 1;
    }
    let shifted = ts.with_day(1).add_months(months);
    let to_day = offset_day(&shifted)?;
    Ok(shifted.with_day(to_day))
}

fn week_of_month_day(ts: &Timestamp, week: u8, weekday: Weekday) -> Outcome<u8> {
    let month_start = ts.with_day(1);
    let wday = month_start.day_of_week().index() as i64;
    let shift_days = (weekday.index() as i64 - wday).rem_euclid(7);
    Ok((1 + shift_days + (week as i64) * 7) as u8)
}

/// "The `week+1`-th `weekday` of the month" (spec §4.5).
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct WeekOfMonth {
    pub n: i64,
    pub week: u8,
    pub weekday: Weekday,
}

impl WeekOfMonth {
    pub fn try_new(n: i64, week: u8, weekday: Weekday) -> Outcome<Self> {
        if n == 0 {
            return Err(err!(errmsg!("WeekOfMonth does not accept n=0"), Invalid, Input));
        }
        if week > 3 {
            return Err(err!(errmsg!("WeekOfMonth week {} out of range 0..=3", week), Invalid, Range));
        }
        Ok(Self { n, week, weekday })
    }

    pub fn with_n(&self, n: i64) -> Self {
        Self { n, ..self.clone() }
    }

    fn offset_day(&self, ts: &Timestamp) -> Outcome<u8> {
        week_of_month_day(ts, self.week, self.weekday)
    }

    pub fn apply(&self, ts: &Timestamp) -> Outcome<Timestamp> {
        apply_month_anchored(self.n, ts, |t| self.offset_day(t))
    }

    pub fn on_offset(&self, ts: &Timestamp) -> bool {
        match self.offset_day(ts) {
            Ok(d) => d == ts.day,
            Err(_) => false,
        }
    }

    pub fn rule_code(&self) -> String {
        fmt!("WOM-{}{}", self.week + 1, self.weekday.abbrev())
    }

    pub fn freqstr(&self) -> String {
        if self.n != 1 { fmt!("{}{}", self.n, self.rule_code()) } else { self.rule_code() }
    }

    pub fn is_anchored(&self) -> bool {
        self.n == 1
    }
}

impl fmt::Display for WeekOfMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.freqstr())
    }
}

fn last_week_of_month_day(ts: &Timestamp, weekday: Weekday) -> Outcome<u8> {
    let dim = ts.days_in_month();
    let month_end = ts.with_day(dim);
    let wday = month_end.day_of_week().index() as i64;
    let shift_days = (wday - weekday.index() as i64).rem_euclid(7);
    Ok(dim - shift_days as u8)
}

/// The last `weekday` of the month (spec §4.5).
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct LastWeekOfMonth {
    pub n: i64,
    pub weekday: Weekday,
}

impl LastWeekOfMonth {
    pub fn try_new(n: i64, weekday: Weekday) -> Outcome<Self> {
        if n == 0 {
            return Err(err!(errmsg!("LastWeekOfMonth does not accept n=0"), Invalid, Input));
        }
        Ok(Self { n, weekday })
    }

    pub fn with_n(&self, n: i64) -> Self {
        Self { n, ..self.clone() }
    }

    fn offset_day(&self, ts: &Timestamp) -> Outcome<u8> {
        last_week_of_month_day(ts, self.weekday)
    }

    pub fn apply(&self, ts: &Timestamp) -> Outcome<Timestamp> {
        apply_month_anchored(self.n, ts, |t| self.offset_day(t))
    }

    pub fn on_offset(&self, ts: &Timestamp) -> bool {
        match self.offset_day(ts) {
            Ok(d) => d == ts.day,
            Err(_) => false,
        }
    }

    pub fn rule_code(&self) -> String {
        fmt!("LWOM-{}", self.weekday.abbrev())
    }

    pub fn freqstr(&self) -> String {
        if self.n != 1 { fmt!("{}{}", self.n, self.rule_code()) } else { self.rule_code() }
    }

    pub fn is_anchored(&self) -> bool {
        self.n == 1
    }
}

impl fmt::Display for LastWeekOfMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.freqstr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Month;

    #[test]
    fn test_week_snaps_to_weekday() {
        // 2024-03-15 is a Friday.
        let ts = Timestamp::from_ymd(2024, Month::March, 15).unwrap();
        let next = Week::try_new(1, Some(Weekday::Monday)).unwrap().apply(&ts).unwrap();
        assert_eq!((next.year, next.month, next.day), (2024, Month::March, 18));
        assert_eq!(next.day_of_week(), Weekday::Monday);
    }

    #[test]
    fn test_week_none_is_pure_tick() {
        let ts = Timestamp::from_ymd(2024, Month::March, 15).unwrap();
        let next = Week::try_new(2, None).unwrap().apply(&ts).unwrap();
        assert_eq!((next.year, next.month, next.day), (2024, Month::March, 29));
    }

    #[test]
    fn test_week_rejects_n_zero() {
        assert!(Week::try_new(0, None).is_err());
    }

    #[test]
    fn test_week_of_month_third_friday() {
        // Third Friday of March 2024 is 2024-03-15.
        let ts = Timestamp::from_ymd(2024, Month::March, 1).unwrap();
        let next = WeekOfMonth::try_new(1, 2, Weekday::Friday).unwrap().apply(&ts).unwrap();
        assert_eq!((next.year, next.month, next.day), (2024, Month::March, 15));
    }

    #[test]
    fn test_week_of_month_rejects_bad_week() {
        assert!(WeekOfMonth::try_new(1, 4, Weekday::Friday).is_err());
    }

    #[test]
    fn test_last_week_of_month() {
        // Last Monday of March 2024 is 2024-03-25.
        let ts = Timestamp::from_ymd(2024, Month::March, 1).unwrap();
        let next = LastWeekOfMonth::try_new(1, Weekday::Monday).unwrap().apply(&ts).unwrap();
        assert_eq!((next.year, next.month, next.day), (2024, Month::March, 25));
    }

    #[test]
    fn test_last_week_of_month_on_offset() {
        let last_mon = Timestamp::from_ymd(2024, Month::March, 25).unwrap();
        assert!(LastWeekOfMonth::try_new(1, Weekday::Monday).unwrap().on_offset(&last_mon));
        let not_last = Timestamp::from_ymd(2024, Month::March, 18).unwrap();
        assert!(!LastWeekOfMonth::try_new(1, Weekday::Monday).unwrap().on_offset(&not_last));
    }
}
