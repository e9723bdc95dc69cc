use dateoffset_core::prelude::*;

use std::fmt;

/// Month of year, `January=1 .. December=12`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub fn number(&self) -> u8 {
        match self {
            Self::January   => 1,
            Self::February  => 2,
            Self::March     => 3,
            Self::April     => 4,
            Self::May       => 5,
            Self::June      => 6,
            Self::July      => 7,
            Self::August    => 8,
            Self::September => 9,
            Self::October   => 10,
            Self::November  => 11,
            Self::December  => 12,
        }
    }

    pub fn from_number(n: u8) -> Outcome<Self> {
        match n {
            1  => Ok(Self::January),
            2  => Ok(Self::February),
            3  => Ok(Self::March),
            4  => Ok(Self::April),
            5  => Ok(Self::May),
            6  => Ok(Self::June),
            7  => Ok(Self::July),
            8  => Ok(Self::August),
            9  => Ok(Self::September),
            10 => Ok(Self::October),
            11 => Ok(Self::November),
            12 => Ok(Self::December),
            _  => Err(err!(errmsg!("month number {} out of range 1..=12", n), Invalid, Range)),
        }
    }

    pub fn next(&self) -> Self {
        Self::from_number(self.number() % 12 + 1).unwrap()
    }

    pub fn previous(&self) -> Self {
        Self::from_number((self.number() + 10) % 12 + 1).unwrap()
    }

    /// Days in this month for the given (possibly negative, proleptic Gregorian) year.
    pub fn days_in_month(&self, year: i32) -> u8 {
        match self {
            Self::January | Self::March | Self::May | Self::July |
            Self::August | Self::October | Self::December => 31,
            Self::April | Self::June | Self::September | Self::November => 30,
            Self::February => if is_leap_year(year) { 29 } else { 28 },
        }
    }

    pub fn abbrev(&self) -> &'static str {
        match self {
            Self::January   => "JAN",
            Self::February  => "FEB",
            Self::March     => "MAR",
            Self::April     => "APR",
            Self::May       => "MAY",
            Self::June      => "JUN",
            Self::July      => "JUL",
            Self::August    => "AUG",
            Self::September => "SEP",
            Self::October   => "OCT",
            Self::November  => "NOV",
            Self::December  => "DEC",
        }
    }

    pub fn from_abbrev(s: &str) -> Outcome<Self> {
        match s.to_uppercase().as_str() {
            "JAN" => Ok(Self::January),
            "FEB" => Ok(Self::February),
            "MAR" => Ok(Self::March),
            "APR" => Ok(Self::April),
            "MAY" => Ok(Self::May),
            "JUN" => Ok(Self::June),
            "JUL" => Ok(Self::July),
            "AUG" => Ok(Self::August),
            "SEP" => Ok(Self::September),
            "OCT" => Ok(Self::October),
            "NOV" => Ok(Self::November),
            "DEC" => Ok(Self::December),
            _ => Err(err!(errmsg!("unrecognised month abbreviation '{}'", s), Invalid, Input)),
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbrev())
    }
}

/// Proleptic Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_in_leap_year() {
        assert_eq!(Month::February.days_in_month(2024), 29);
        assert_eq!(Month::February.days_in_month(2023), 28);
        assert_eq!(Month::February.days_in_month(2000), 29);
        assert_eq!(Month::February.days_in_month(1900), 28);
    }

    #[test]
    fn test_days_in_other_months() {
        assert_eq!(Month::April.days_in_month(2024), 30);
        assert_eq!(Month::January.days_in_month(2024), 31);
    }

    #[test]
    fn test_cycling() {
        assert_eq!(Month::December.next(), Month::January);
        assert_eq!(Month::January.previous(), Month::December);
    }

    #[test]
    fn test_abbrev_roundtrip() {
        for n in 1u8..=12 {
            let m = Month::from_number(n).unwrap();
            assert_eq!(Month::from_abbrev(m.abbrev()).unwrap(), m);
        }
    }
}
