//! Prefix -> class dispatch and rule-code parsing (spec §4.8). The prefix
//! set is closed and known at compile time, so the registry is a `match`
//! rather than a runtime map populated at process start.

use crate::calendar::{Month, Weekday};
use crate::offset::business_day::{BusinessDay, BusinessDayCalendar, CustomBusinessDay};
use crate::offset::fy5253::{Variation, FY5253};
use crate::offset::fy5253_quarter::FY5253Quarter;
use crate::offset::month::{BusinessMonthBegin, BusinessMonthEnd, MonthBegin, MonthEnd};
use crate::offset::quarter::{BQuarterBegin, BQuarterEnd, QuarterBegin, QuarterEnd};
use crate::offset::tick::{Tick, TickUnit};
use crate::offset::week::{LastWeekOfMonth, Week, WeekOfMonth};
use crate::offset::year::{BYearBegin, BYearEnd, YearBegin, YearEnd};
use crate::offset::Offset;

use dateoffset_core::prelude::*;

/// Split a leading signed integer off `key`, defaulting to `1` when none is
/// present (`"BQ-FEB"` has no leading count; `"-3D"` does).
fn split_leading_n(key: &str) -> Outcome<(i64, &str)> {
    let bytes = key.as_bytes();
    let mut i = 0;
    if i < bytes.len() && (bytes[i] == b'-' || bytes[i] == b'+') {
        i += 1;
    }
    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == digits_start || &key[..i] == "-" || &key[..i] == "+" {
        return Ok((1, key));
    }
    let rest = &key[i..];
    if rest.is_empty() {
        return Err(err!(errmsg!("rule code '{}' has no prefix after the leading count", key), Invalid, Value));
    }
    let n: i64 = res!(key[..i].parse(), Conversion, Numeric);
    Ok((n, rest))
}

fn parse_week_index(s: &str) -> Outcome<u8> {
    let n: u8 = res!(s.parse(), Conversion, Numeric);
    if n == 0 {
        return Err(err!(errmsg!("week index '{}' must be >= 1", s), Invalid, Value));
    }
    Ok(n - 1)
}

/// Reconstruct an [`Offset`] from a rule code such as `"BQ-FEB"` or
/// `"REQ-N-JAN-TUE-2"` (spec §4.8). `'@'` is normalized to `'-'` before
/// splitting. Unknown prefix -> `ErrTag::NotFound`; malformed suffix ->
/// `ErrTag::Invalid`/`Value`.
pub fn parse(key: &str) -> Outcome<Offset> {
    let normalized = key.replace('@', "-");
    let (n, rest) = split_leading_n(&normalized)?;
    let mut parts = rest.split('-');
    let prefix = parts.next().unwrap_or("");
    let suffix: Vec<&str> = parts.collect();

    match prefix {
        "A" => Ok(Offset::YearEnd(YearEnd::new(n, month_suffix(&suffix, Month::December)?))),
        "AS" => Ok(Offset::YearBegin(YearBegin::new(n, month_suffix(&suffix, Month::January)?))),
        "BA" => Ok(Offset::BYearEnd(BYearEnd::new(n, month_suffix(&suffix, Month::December)?))),
        "BAS" => Ok(Offset::BYearBegin(BYearBegin::new(n, month_suffix(&suffix, Month::January)?))),
        "B" => Ok(Offset::BusinessDay(BusinessDay::new(n))),
        "BM" => Ok(Offset::BusinessMonthEnd(BusinessMonthEnd::new(n))),
        "BMS" => Ok(Offset::BusinessMonthBegin(BusinessMonthBegin::new(n))),
        "BQ" => Ok(Offset::BQuarterEnd(BQuarterEnd::new(n, month_suffix(&suffix, Month::December)?))),
        "BQS" => Ok(Offset::BQuarterBegin(BQuarterBegin::new(n, month_suffix(&suffix, Month::January)?))),
        "C" => Ok(Offset::CustomBusinessDay(CustomBusinessDay::new(n, BusinessDayCalendar::standard()))),
        "M" => Ok(Offset::MonthEnd(MonthEnd::new(n))),
        "MS" => Ok(Offset::MonthBegin(MonthBegin::new(n))),
        "W" => {
            let weekday = match suffix.as_slice() {
                [] => None,
                [w] => Some(res!(Weekday::from_abbrev(w), Conversion)),
                _ => return Err(bad_suffix(key)),
            };
            Ok(Offset::Week(res!(Week::try_new(n, weekday), Invalid)))
        }
        "S" => Ok(Offset::Tick(Tick::new(TickUnit::Second, n))),
        "T" => Ok(Offset::Tick(Tick::new(TickUnit::Minute, n))),
        "U" => Ok(Offset::Tick(Tick::new(TickUnit::Micro, n))),
        "Q" => Ok(Offset::QuarterEnd(QuarterEnd::new(n, month_suffix(&suffix, Month::December)?))),
        "QS" => Ok(Offset::QuarterBegin(QuarterBegin::new(n, month_suffix(&suffix, Month::January)?))),
        "L" => Ok(Offset::Tick(Tick::new(TickUnit::Milli, n))),
        "H" => Ok(Offset::Tick(Tick::new(TickUnit::Hour, n))),
        "D" => Ok(Offset::Tick(Tick::new(TickUnit::Day, n))),
        "N" => Ok(Offset::Tick(Tick::new(TickUnit::Nano, n))),
        "WOM" => {
            let [spec] = suffix.as_slice() else { return Err(bad_suffix(key)) };
            let split_at = spec.find(|c: char| c.is_ascii_alphabetic()).ok_or_else(|| bad_suffix(key))?;
            let week = parse_week_index(&spec[..split_at])?;
            let weekday = res!(Weekday::from_abbrev(&spec[split_at..]), Conversion);
            Ok(Offset::WeekOfMonth(res!(WeekOfMonth::try_new(n, week, weekday), Invalid)))
        }
        "LWOM" => {
            let [w] = suffix.as_slice() else { return Err(bad_suffix(key)) };
            let weekday = res!(Weekday::from_abbrev(w), Conversion);
            Ok(Offset::LastWeekOfMonth(res!(LastWeekOfMonth::try_new(n, weekday), Invalid)))
        }
        "RE" => {
            let [variation, month, weekday] = suffix.as_slice() else { return Err(bad_suffix(key)) };
            let fy = FY5253::try_new(
                n,
                res!(Month::from_abbrev(month), Conversion),
                res!(Weekday::from_abbrev(weekday), Conversion),
                res!(Variation::from_code(variation), Conversion),
            )?;
            Ok(Offset::FY5253(fy))
        }
        "REQ" => {
            let [variation, month, weekday, qtr] = suffix.as_slice() else { return Err(bad_suffix(key)) };
            let fy = FY5253::try_new(
                1,
                res!(Month::from_abbrev(month), Conversion),
                res!(Weekday::from_abbrev(weekday), Conversion),
                res!(Variation::from_code(variation), Conversion),
            )?;
            let qtr_with_extra_week: u8 = res!(qtr.parse(), Conversion, Numeric);
            Ok(Offset::FY5253Quarter(FY5253Quarter::try_new(n, fy, qtr_with_extra_week)?))
        }
        _ => Err(err!(errmsg!("unrecognised rule code prefix '{}'", prefix), NotFound, Key)),
    }
}

fn month_suffix(suffix: &[&str], default: Month) -> Outcome<Month> {
    match suffix {
        [] => Ok(default),
        [m] => Ok(res!(Month::from_abbrev(m), Conversion)),
        _ => Err(err!(errmsg!("expected a single month suffix, got {:?}", suffix), Invalid, Value)),
    }
}

fn bad_suffix(key: &str) -> Error<ErrTag> {
    err!(errmsg!("malformed rule code suffix in '{}'", key), Invalid, Value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_business_quarter_end_with_month() {
        let o = parse("BQ-FEB").unwrap();
        match o {
            Offset::BQuarterEnd(bq) => {
                assert_eq!(bq.n, 1);
                assert_eq!(bq.starting_month, Month::February);
            }
            _ => panic!("expected BQuarterEnd"),
        }
    }

    #[test]
    fn test_parse_fy5253_quarter() {
        let o = parse("REQ-N-JAN-TUE-2").unwrap();
        match o {
            Offset::FY5253Quarter(fq) => {
                assert_eq!(fq.fy.starting_month, Month::January);
                assert_eq!(fq.fy.weekday, Weekday::Tuesday);
                assert_eq!(fq.fy.variation, Variation::Nearest);
                assert_eq!(fq.qtr_with_extra_week, 2);
            }
            _ => panic!("expected FY5253Quarter"),
        }
    }

    #[test]
    fn test_parse_week_of_month() {
        let o = parse("WOM-2TUE").unwrap();
        match o {
            Offset::WeekOfMonth(wom) => {
                assert_eq!(wom.week, 1);
                assert_eq!(wom.weekday, Weekday::Tuesday);
            }
            _ => panic!("expected WeekOfMonth"),
        }
    }

    #[test]
    fn test_parse_leading_count() {
        let o = parse("-3D").unwrap();
        assert_eq!(o.n(), -3);
    }

    #[test]
    fn test_parse_at_separator_normalized() {
        let a = parse("BQ@FEB").unwrap();
        let b = parse("BQ-FEB").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_prefix_errs() {
        assert!(parse("ZZ").is_err());
    }

    #[test]
    fn test_rule_code_round_trips() {
        let o = parse("W-TUE").unwrap();
        assert_eq!(o.rule_code(), "W-TUE");
        let ts = crate::calendar::Timestamp::from_ymd(2024, Month::March, 15).unwrap();
        let reparsed = parse(&o.freqstr()).unwrap();
        assert_eq!(o.apply(&ts).unwrap(), reparsed.apply(&ts).unwrap());
    }
}
