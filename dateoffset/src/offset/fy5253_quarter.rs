use crate::calendar::Timestamp;
use crate::offset::fy5253::FY5253;

use dateoffset_core::prelude::*;

use std::cmp::Ordering;
use std::fmt;

/// 4-4-5 fiscal quarters wrapping an inner [`FY5253`] (spec §4.7).
/// `qtr_with_extra_week` names which quarter absorbs the 14th week in a
/// 53-week fiscal year.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct FY5253Quarter {
    pub n: i64,
    pub fy: FY5253,
    pub qtr_with_extra_week: u8,
}

impl FY5253Quarter {
    pub fn try_new(n: i64, fy: FY5253, qtr_with_extra_week: u8) -> Outcome<Self> {
        if n == 0 {
            return Err(err!(errmsg!("FY5253Quarter does not accept n=0"), Invalid, Input));
        }
        if !(1..=4).contains(&qtr_with_extra_week) {
            return Err(err!(errmsg!("qtr_with_extra_week {} out of range 1..=4", qtr_with_extra_week), Invalid, Range));
        }
        Ok(Self { n, fy, qtr_with_extra_week })
    }

    pub fn with_n(&self, n: i64) -> Self {
        Self { n, ..self.clone() }
    }

    fn fy_shift(&self, ts: &Timestamp, n: i64) -> Outcome<Timestamp> {
        FY5253 { n, ..self.fy.clone() }.apply(ts)
    }

    /// A fiscal year has an extra (53rd) week iff its span from the prior
    /// year-end is exactly 371 days (spec §4.7).
    pub fn year_has_extra_week(&self, ts: &Timestamp) -> Outcome<bool> {
        let next_ye = self.fy.rollforward(ts)?;
        let prev_ye = self.fy_shift(&next_ye, -1)?;
        Ok(next_ye.to_day_number() - prev_ye.to_day_number() == 371)
    }

    /// The four cumulative quarter-end boundaries of the fiscal year running
    /// from `start` (exclusive) to `next_ye` (inclusive, the 4th boundary).
    fn quarter_boundaries(&self, start: &Timestamp, next_ye: &Timestamp) -> [Timestamp; 4] {
        let span_days = next_ye.to_day_number() - start.to_day_number();
        let mut weeks = [13i64, 13, 13, 13];
        if span_days == 371 {
            weeks[(self.qtr_with_extra_week - 1) as usize] = 14;
        }
        let mut acc = 0i64;
        std::array::from_fn(|i| {
            acc += weeks[i] * 7;
            start.add_days(acc)
        })
    }

    pub fn apply(&self, ts: &Timestamp) -> Outcome<Timestamp> {
        match self.n.cmp(&0) {
            Ordering::Greater => self.apply_forward(ts, self.n),
            Ordering::Less => self.apply_backward(ts, -self.n),
            Ordering::Equal => unreachable!("FY5253Quarter rejects n=0 at construction"),
        }
    }

    fn apply_forward(&self, ts: &Timestamp, steps: i64) -> Outcome<Timestamp> {
        let mut cur = ts.clone();
        let mut remaining = steps;
        let mut start = self.fy.rollback(&cur)?;
        while remaining > 0 {
            let next_ye = self.fy_shift(&start, 1)?;
            let boundaries = self.quarter_boundaries(&start, &next_ye);
            let mut landed = false;
            for b in &boundaries {
                if b.date_cmp(&cur) == Ordering::Greater {
                    cur = b.clone();
                    remaining -= 1;
                    landed = true;
                    break;
                }
            }
            if !landed {
                start = next_ye;
            }
        }
        Ok(cur)
    }

    fn apply_backward(&self, ts: &Timestamp, steps: i64) -> Outcome<Timestamp> {
        let mut cur = ts.clone();
        let mut remaining = steps;
        let mut end = self.fy.rollforward(&cur)?;
        while remaining > 0 {
            let prev_ye = self.fy_shift(&end, -1)?;
            let boundaries = self.quarter_boundaries(&prev_ye, &end);
            let mut landed = false;
            for b in boundaries.iter().rev() {
                if b.date_cmp(&cur) == Ordering::Less {
                    cur = b.clone();
                    remaining -= 1;
                    landed = true;
                    break;
                }
            }
            if !landed {
                end = prev_ye;
            }
        }
        Ok(cur)
    }

    pub fn on_offset(&self, ts: &Timestamp) -> bool {
        if self.fy.on_offset(ts) {
            return true;
        }
        let start = match self.fy.rollback(ts) {
            Ok(s) => s,
            Err(_) => return false,
        };
        let next_ye = match self.fy_shift(&start, 1) {
            Ok(ye) => ye,
            Err(_) => return false,
        };
        self.quarter_boundaries(&start, &next_ye).iter().any(|b| ts.same_date(b))
    }

    pub fn rule_code(&self) -> String {
        fmt!(
            "REQ-{}-{}-{}-{}",
            self.fy.variation.code(),
            self.fy.starting_month.abbrev(),
            self.fy.weekday.abbrev(),
            self.qtr_with_extra_week,
        )
    }

    pub fn freqstr(&self) -> String {
        if self.n != 1 { fmt!("{}{}", self.n, self.rule_code()) } else { self.rule_code() }
    }

    pub fn is_anchored(&self) -> bool {
        self.n == 1
    }
}

impl fmt::Display for FY5253Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.freqstr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{Month, Weekday};
    use crate::offset::fy5253::Variation;

    fn sample_fy() -> FY5253 {
        FY5253::try_new(1, Month::August, Weekday::Saturday, Variation::Last).unwrap()
    }

    #[test]
    fn test_quarter_boundaries_sum_to_year_end() {
        let fy = sample_fy();
        let start = fy.year_end(2023).unwrap();
        let next_ye = fy.year_end(2024).unwrap();
        let fq = FY5253Quarter::try_new(1, fy, 4).unwrap();
        let boundaries = fq.quarter_boundaries(&start, &next_ye);
        assert_eq!(boundaries[3], next_ye);
    }

    #[test]
    fn test_apply_forward_one_quarter() {
        let fy = sample_fy();
        let fq = FY5253Quarter::try_new(1, fy, 4).unwrap();
        let start = Timestamp::from_ymd(2023, Month::August, 26).unwrap(); // a fiscal year-end
        let next = fq.apply(&start).unwrap();
        // First quarter boundary is exactly 13 weeks (91 days) later.
        assert_eq!(next.to_day_number() - start.to_day_number(), 91);
    }

    #[test]
    fn test_on_offset_year_end_is_quarter_boundary() {
        let fy = sample_fy();
        let ye = fy.year_end(2024).unwrap();
        let fq = FY5253Quarter::try_new(1, fy, 4).unwrap();
        assert!(fq.on_offset(&ye));
    }

    #[test]
    fn test_rejects_bad_qtr() {
        assert!(FY5253Quarter::try_new(1, sample_fy(), 5).is_err());
        assert!(FY5253Quarter::try_new(1, sample_fy(), 0).is_err());
    }

    #[test]
    fn test_week_lengths_sum_to_52_or_53() {
        // Invariant #10 from spec §8: the cumulative quarter-week-lengths
        // span either 52 or 53 weeks, and the 53-week case is exactly the
        // one `year_has_extra_week` reports for a timestamp inside it.
        let fy = sample_fy();
        let fq = FY5253Quarter::try_new(1, fy.clone(), 4).unwrap();
        let start = fy.year_end(2023).unwrap();
        let next_ye = fq.fy_shift(&start, 1).unwrap();
        let span_days = next_ye.to_day_number() - start.to_day_number();
        assert!(span_days == 364 || span_days == 371);

        let mid_year = start.add_days(10);
        let has_extra = fq.year_has_extra_week(&mid_year).unwrap();
        assert_eq!(has_extra, span_days == 371);
    }

    #[test]
    fn test_apply_backward_mirrors_forward() {
        let fy = sample_fy();
        let fq = FY5253Quarter::try_new(1, fy.clone(), 4).unwrap();
        let fq_back = FY5253Quarter::try_new(-1, fy, 4).unwrap();
        let start = Timestamp::from_ymd(2023, Month::August, 26).unwrap();
        let forward = fq.apply(&start).unwrap();
        let back = fq_back.apply(&forward).unwrap();
        assert_eq!(back.to_day_number(), start.to_day_number());
    }
}
