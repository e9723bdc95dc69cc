use crate::calendar::{Month, Timestamp};
use crate::offset::business_day::BusinessDay;
use crate::offset::month::{first_business_day_of_month, last_business_day_of_month};

use dateoffset_core::prelude::*;

use std::fmt;

fn months_to_go(month: Month, anchor: Month) -> i64 {
    (anchor.number() as i64 - month.number() as i64).rem_euclid(12)
}

macro_rules! year_offset {
    ($name:ident, $prefix:literal) => {
        #[derive(Clone, Debug, Eq, Hash, PartialEq)]
        pub struct $name {
            pub n: i64,
            pub month: Month,
        }

        impl $name {
            pub fn new(n: i64, month: Month) -> Self {
                Self { n, month }
            }

            pub fn with_n(&self, n: i64) -> Self {
                Self { n, ..self.clone() }
            }

            pub fn rule_code(&self) -> String {
                fmt!("{}-{}", $prefix, self.month.abbrev())
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

year_offset!(YearEnd, "A");
year_offset!(YearBegin, "AS");
year_offset!(BYearEnd, "BA");
year_offset!(BYearBegin, "BAS");

impl YearEnd {
    pub fn apply(&self, ts: &Timestamp) -> Outcome<Timestamp> {
        let to_go = months_to_go(ts.month, self.month);
        let mut n = self.n;
        // Month-end has no "day past anchor" state, so only the forward
        // overshoot (n>0, not yet at this cycle's anchor) needs correcting.
        let before = to_go > 0 || (to_go == 0 && !ts.is_month_end());
        if n > 0 && before {
            n -= 1;
        }
        let shifted = ts.with_day(1).add_months(to_go + 12 * n);
        let last_day = shifted.days_in_month();
        Ok(shifted.with_day(last_day))
    }

    pub fn on_offset(&self, ts: &Timestamp) -> bool {
        ts.is_month_end() && ts.month == self.month
    }
}

impl YearBegin {
    pub fn apply(&self, ts: &Timestamp) -> Outcome<Timestamp> {
        let to_go = months_to_go(ts.month, self.month);
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
        Ok(ts.with_day(1).add_months(to_go + 12 * n))
    }

    pub fn on_offset(&self, ts: &Timestamp) -> bool {
        ts.is_month_begin() && ts.month == self.month
    }
}

impl BYearEnd {
    pub fn apply(&self, ts: &Timestamp) -> Outcome<Timestamp> {
        let to_go = months_to_go(ts.month, self.month);
        let mut n = self.n;
        let last_bday_this_month = last_business_day_of_month(ts.year, ts.month)?;
        let before = to_go > 0 || (to_go == 0 && ts.day < last_bday_this_month);
        let after = to_go == 0 && ts.day > last_bday_this_month;
        if n > 0 && before {
            n -= 1;
        } else if n <= 0 && after {
            n += 1;
        }
        let shifted = ts.with_day(1).add_months(to_go + 12 * n);
        let last_day = shifted.days_in_month();
        let mut result = shifted.with_day(last_day);
        if result.day_of_week().is_weekend() {
            result = BusinessDay::new(-1).apply(&result)?;
        }
        Ok(result)
    }

    pub fn on_offset(&self, ts: &Timestamp) -> bool {
        ts.month == self.month
            && match last_business_day_of_month(ts.year, ts.month) {
                Ok(last) => ts.day == last,
                Err(_) => false,
            }
    }
}

impl BYearBegin {
    pub fn apply(&self, ts: &Timestamp) -> Outcome<Timestamp> {
        let to_go = months_to_go(ts.month, self.month);
        let mut n = self.n;
        let first_bday_this_month = first_business_day_of_month(ts.year, ts.month)?;
        let before = to_go > 0 || (to_go == 0 && ts.day < first_bday_this_month);
        let after = to_go == 0 && ts.day > first_bday_this_month;
        if n > 0 && before {
            n -= 1;
        } else if n <= 0 && after {
            n += 1;
        }
        let shifted = ts.with_day(1).add_months(to_go + 12 * n);
        let first_day = first_business_day_of_month(shifted.year, shifted.month)?;
        Ok(shifted.with_day(first_day))
    }

    pub fn on_offset(&self, ts: &Timestamp) -> bool {
        ts.month == self.month
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
    fn test_year_end_mid_year() {
        let ts = Timestamp::from_ymd(2024, Month::June, 15).unwrap();
        let next = YearEnd::new(1, Month::December).apply(&ts).unwrap();
        assert_eq!((next.year, next.month, next.day), (2024, Month::December, 31));
    }

    #[test]
    fn test_year_end_fiscal_month() {
        let ts = Timestamp::from_ymd(2024, Month::August, 15).unwrap();
        let next = YearEnd::new(1, Month::June).apply(&ts).unwrap();
        assert_eq!((next.year, next.month, next.day), (2025, Month::June, 30));
    }

    #[test]
    fn test_year_begin() {
        let ts = Timestamp::from_ymd(2024, Month::June, 15).unwrap();
        let prev = YearBegin::new(-1, Month::January).apply(&ts).unwrap();
        assert_eq!((prev.year, prev.month, prev.day), (2024, Month::January, 1));
    }

    #[test]
    fn test_byear_end_skips_weekend() {
        // 2023-12-31 is a Sunday.
        let ts = Timestamp::from_ymd(2023, Month::December, 1).unwrap();
        let next = BYearEnd::new(1, Month::December).apply(&ts).unwrap();
        assert_eq!((next.year, next.month, next.day), (2023, Month::December, 29));
    }
}
