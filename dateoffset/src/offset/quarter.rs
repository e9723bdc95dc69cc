use crate::calendar::{Month, Timestamp};
use crate::offset::business_day::BusinessDay;
use crate::offset::month::{first_business_day_of_month, last_business_day_of_month};

use dateoffset_core::prelude::*;

use std::fmt;

fn is_quarter_month(month: Month, starting_month: Month) -> bool {
    (month.number() as i64 - starting_month.number() as i64).rem_euclid(3) == 0
}

fn months_to_go(month: Month, starting_month: Month) -> i64 {
    (3 - (month.number() as i64 - starting_month.number() as i64).rem_euclid(3)) % 3
}

macro_rules! quarter_offset {
    ($name:ident, $prefix:literal) => {
        #[derive(Clone, Debug, Eq, Hash, PartialEq)]
        pub struct $name {
            pub n: i64,
            pub starting_month: Month,
        }

        impl $name {
            pub fn new(n: i64, starting_month: Month) -> Self {
                Self { n, starting_month }
            }

            pub fn with_n(&self, n: i64) -> Self {
                Self { n, ..self.clone() }
            }

            pub fn rule_code(&self) -> String {
                fmt!("{}-{}", $prefix, self.starting_month.abbrev())
            }

            pub fn freqstr(&self) -> String {
                if self.n != 1 { fmt!("{}{}", self.n, self.rule_code()) } else { self.rule_code() }
            }

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

quarter_offset!(QuarterEnd, "Q");
quarter_offset!(QuarterBegin, "QS");
quarter_offset!(BQuarterEnd, "BQ");
quarter_offset!(BQuarterBegin, "BQS");

impl QuarterEnd {
    pub fn apply(&self, ts: &Timestamp) -> Outcome<Timestamp> {
        let to_go = months_to_go(ts.month, self.starting_month);
        let mut n = self.n;
        // Month-end has no "day past anchor" state, so only the forward
        // overshoot (n>0, not yet at this cycle's anchor) needs correcting.
        let before = to_go > 0 || (to_go == 0 && !ts.is_month_end());
        if n > 0 && before {
            n -= 1;
        }
        let shifted = ts.with_day(1).add_months(to_go + 3 * n);
        let last_day = shifted.days_in_month();
        Ok(shifted.with_day(last_day))
    }

    pub fn on_offset(&self, ts: &Timestamp) -> bool {
        ts.is_month_end() && is_quarter_month(ts.month, self.starting_month)
    }
}

impl QuarterBegin {
    pub fn apply(&self, ts: &Timestamp) -> Outcome<Timestamp> {
        let to_go = months_to_go(ts.month, self.starting_month);
        let mut n = self.n;
        // Month-begin has no "day before anchor" state (day 1 is the floor),
        // so only the backward overshoot (n<=0, already past this cycle's
        // anchor) needs correcting.
        let before = to_go > 0;
        let after = to_go == 0 && !ts.is_month_begin();
        if n > 0 && before {
            n -= 1;
        } else if n <= 0 && after {
            n += 1;
        }
        Ok(ts.with_day(1).add_months(to_go + 3 * n))
    }

    pub fn on_offset(&self, ts: &Timestamp) -> bool {
        ts.is_month_begin() && is_quarter_month(ts.month, self.starting_month)
    }
}

impl BQuarterEnd {
    pub fn apply(&self, ts: &Timestamp) -> Outcome<Timestamp> {
        let to_go = months_to_go(ts.month, self.starting_month);
        let mut n = self.n;
        let last_bday_this_month = last_business_day_of_month(ts.year, ts.month)?;
        let before = to_go > 0 || (to_go == 0 && ts.day < last_bday_this_month);
        let after = to_go == 0 && ts.day > last_bday_this_month;
        if n > 0 && before {
            n -= 1;
        } else if n <= 0 && after {
            n += 1;
        }
        let shifted = ts.with_day(1).add_months(to_go + 3 * n);
        let last_day = shifted.days_in_month();
        let mut result = shifted.with_day(last_day);
        if result.day_of_week().is_weekend() {
            result = BusinessDay::new(-1).apply(&result)?;
        }
        Ok(result)
    }

    pub fn on_offset(&self, ts: &Timestamp) -> bool {
        is_quarter_month(ts.month, self.starting_month)
            && match last_business_day_of_month(ts.year, ts.month) {
                Ok(last) => ts.day == last,
                Err(_) => false,
            }
    }
}

impl BQuarterBegin {
    pub fn apply(&self, ts: &Timestamp) -> Outcome<Timestamp> {
        let to_go = months_to_go(ts.month, self.starting_month);
        let mut n = self.n;
        let first_bday_this_month = first_business_day_of_month(ts.year, ts.month)?;
        let before = to_go > 0 || (to_go == 0 && ts.day < first_bday_this_month);
        let after = to_go == 0 && ts.day > first_bday_this_month;
        if n > 0 && before {
            n -= 1;
        } else if n <= 0 && after {
            n += 1;
        }
        let shifted = ts.with_day(1).add_months(to_go + 3 * n);
        let first_day = first_business_day_of_month(shifted.year, shifted.month)?;
        Ok(shifted.with_day(first_day))
    }

    pub fn on_offset(&self, ts: &Timestamp) -> bool {
        is_quarter_month(ts.month, self.starting_month)
            && match first_business_day_of_month(ts.year, ts.month) {
                Ok(first) => ts.day == first,
                Err(_) => false,
            }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_end_from_quarter_month_end() {
        // startingMonth=2 means quarter-months are Feb/May/Aug/Nov.
        let ts = Timestamp::from_ymd(2024, Month::February, 29).unwrap();
        let next = QuarterEnd::new(1, Month::February).apply(&ts).unwrap();
        assert_eq!((next.year, next.month, next.day), (2024, Month::May, 31));
    }

    #[test]
    fn test_quarter_end_from_non_quarter_month() {
        let ts = Timestamp::from_ymd(2024, Month::March, 15).unwrap();
        let next = QuarterEnd::new(1, Month::February).apply(&ts).unwrap();
        // March isn't a quarter-month under phase Feb; next quarter-end is May 31.
        assert_eq!((next.year, next.month, next.day), (2024, Month::May, 31));
    }

    #[test]
    fn test_quarter_begin() {
        let ts = Timestamp::from_ymd(2024, Month::March, 15).unwrap();
        let next = QuarterBegin::new(1, Month::February).apply(&ts).unwrap();
        assert_eq!((next.year, next.month, next.day), (2024, Month::May, 1));
    }

    #[test]
    fn test_on_offset_respects_phase() {
        let ts = Timestamp::from_ymd(2024, Month::March, 31).unwrap();
        // March-end is not a quarter-end under phase Feb (quarter months Feb/May/Aug/Nov).
        assert!(!QuarterEnd::new(1, Month::February).on_offset(&ts));
        assert!(QuarterEnd::new(1, Month::March).on_offset(&ts));
    }
}
