use crate::calendar::Timestamp;
use crate::offset::business_day::BusinessDay;

use dateoffset_core::prelude::*;

use std::fmt;

/// Last business day of the month containing `year`/`month`'s first day,
/// per spec §4.4: `days_in_month - max(((first_weekday + days_in_month - 1)
/// mod 7) - 4, 0)`.
pub(crate) fn last_business_day_of_month(year: i32, month: crate::calendar::Month) -> Outcome<u8> {
    let first_dow = Timestamp::from_ymd(year, month, 1)?.day_of_week().index() as i64;
    let dim = month.days_in_month(year) as i64;
    let adj = ((first_dow + dim - 1).rem_euclid(7) - 4).max(0);
    Ok((dim - adj) as u8)
}

/// First business day of the month: `1` unless the 1st is a weekend, in
/// which case `3` (Sat) or `2` (Sun) — pandas' `_get_firstbday` (spec §4.4).
pub(crate) fn first_business_day_of_month(year: i32, month: crate::calendar::Month) -> Outcome<u8> {
    let wd = Timestamp::from_ymd(year, month, 1)?.day_of_week().index();
    Ok(match wd {
        5 => 3,
        6 => 2,
        _ => 1,
    })
}

macro_rules! month_offset {
    ($name:ident, $prefix:literal) => {
        #[derive(Clone, Debug, Eq, Hash, PartialEq)]
        pub struct $name {
            pub n: i64,
        }

        impl $name {
            pub fn new(n: i64) -> Self {
                Self { n }
            }

            pub fn with_n(&self, n: i64) -> Self {
                Self { n }
            }

            pub fn rule_code(&self) -> String {
                $prefix.to_string()
            }

            pub fn freqstr(&self) -> String {
                if self.n != 1 { fmt!("{}{}", self.n, self.rule_code()) } else { self.rule_code() }
            }

            /// Anchored iff `n==1` (spec §9: the source's
            /// `self.isAnchored` reads a truthy method object rather than
            /// calling it; the intended semantics are used here).
            pub fn is_anchored(&self) -> bool {
                self.n == 1
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.freqstr())
            }
        }
    };
}

month_offset!(MonthEnd, "M");
month_offset!(MonthBegin, "MS");
month_offset!(BusinessMonthEnd, "BM");
month_offset!(BusinessMonthBegin, "BMS");

impl MonthEnd {
    pub fn apply(&self, ts: &Timestamp) -> Outcome<Timestamp> {
        let mut n = self.n;
        let mut base = ts.clone();
        if !ts.is_month_end() {
            let prev = ts.with_day(1).add_months(-1);
            let prev_last = prev.days_in_month();
            base = prev.with_day(prev_last);
            if n <= 0 {
                n += 1;
            }
        }
        let shifted = base.with_day(1).add_months(n);
        let last_day = shifted.days_in_month();
        Ok(shifted.with_day(last_day))
    }

    pub fn on_offset(&self, ts: &Timestamp) -> bool {
        ts.is_month_end()
    }
}

impl MonthBegin {
    pub fn apply(&self, ts: &Timestamp) -> Outcome<Timestamp> {
        let mut n = self.n;
        if ts.day > 1 && n <= 0 {
            n += 1;
        }
        let shifted = ts.with_day(1).add_months(n);
        Ok(shifted)
    }

    pub fn on_offset(&self, ts: &Timestamp) -> bool {
        ts.is_month_begin()
    }
}

impl BusinessMonthEnd {
    pub fn apply(&self, ts: &Timestamp) -> Outcome<Timestamp> {
        let mut n = self.n;
        let last_bday = last_business_day_of_month(ts.year, ts.month)?;
        if n > 0 && ts.day < last_bday {
            n -= 1;
        } else if n <= 0 && ts.day > last_bday {
            n += 1;
        }
        let shifted = ts.with_day(1).add_months(n);
        let last_day = shifted.days_in_month();
        let mut result = shifted.with_day(last_day);
        if result.day_of_week().is_weekend() {
            result = BusinessDay::new(-1).apply(&result)?;
        }
        Ok(result)
    }

    pub fn on_offset(&self, ts: &Timestamp) -> bool {
        match last_business_day_of_month(ts.year, ts.month) {
            Ok(last) => ts.day == last,
            Err(_) => false,
        }
    }
}

impl BusinessMonthBegin {
    pub fn apply(&self, ts: &Timestamp) -> Outcome<Timestamp> {
        let mut n = self.n;
        let first = first_business_day_of_month(ts.year, ts.month)?;
        if ts.day > first && n <= 0 {
            n += 1;
        } else if ts.day < first && n > 0 {
            n -= 1;
        }
        let shifted = ts.with_day(1).add_months(n);
        let first2 = first_business_day_of_month(shifted.year, shifted.month)?;
        Ok(shifted.with_day(first2))
    }

    pub fn on_offset(&self, ts: &Timestamp) -> bool {
        match first_business_day_of_month(ts.year, ts.month) {
            Ok(first) => ts.day == first,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Month;

    #[test]
    fn test_month_end_mid_month() {
        let ts = Timestamp::new(2024, Month::February, 15, 10, 0, 0, 0, 0).unwrap();
        let next = MonthEnd::new(1).apply(&ts).unwrap();
        assert_eq!((next.year, next.month, next.day, next.hour), (2024, Month::February, 29, 10));
    }

    #[test]
    fn test_month_end_negative_from_mid_month() {
        let ts = Timestamp::from_ymd(2024, Month::February, 15).unwrap();
        let prev = MonthEnd::new(-1).apply(&ts).unwrap();
        assert_eq!((prev.year, prev.month, prev.day), (2024, Month::January, 31));
    }

    #[test]
    fn test_month_end_already_on_offset_rolls_full_step() {
        let ts = Timestamp::from_ymd(2024, Month::January, 31).unwrap();
        let next = MonthEnd::new(1).apply(&ts).unwrap();
        assert_eq!((next.year, next.month, next.day), (2024, Month::February, 29));
    }

    #[test]
    fn test_month_end_clamp_across_shorter_month() {
        let ts = Timestamp::from_ymd(2024, Month::March, 31).unwrap();
        let next = MonthEnd::new(1).apply(&ts).unwrap();
        assert_eq!((next.year, next.month, next.day), (2024, Month::April, 30));
    }

    #[test]
    fn test_month_begin_mid_month_negative() {
        let ts = Timestamp::from_ymd(2024, Month::March, 15).unwrap();
        let prev = MonthBegin::new(-1).apply(&ts).unwrap();
        assert_eq!((prev.year, prev.month, prev.day), (2024, Month::March, 1));
    }

    #[test]
    fn test_business_month_end_lands_on_friday() {
        // 2024-03-31 is a Sunday; BME should land on Friday 2024-03-29.
        let ts = Timestamp::from_ymd(2024, Month::March, 1).unwrap();
        let next = BusinessMonthEnd::new(1).apply(&ts).unwrap();
        assert_eq!((next.year, next.month, next.day), (2024, Month::March, 29));
        assert!(next.day_of_week().is_weekday());
    }

    #[test]
    fn test_business_month_begin_skips_weekend() {
        // 2024-06-01 is a Saturday, so the first business day is 2024-06-03.
        let ts = Timestamp::from_ymd(2024, Month::May, 15).unwrap();
        let next = BusinessMonthBegin::new(1).apply(&ts).unwrap();
        assert_eq!((next.year, next.month, next.day), (2024, Month::June, 3));
    }

    #[test]
    fn test_is_anchored() {
        assert!(MonthEnd::new(1).is_anchored());
        assert!(!MonthEnd::new(2).is_anchored());
        assert!(!MonthEnd::new(-1).is_anchored());
    }
}
