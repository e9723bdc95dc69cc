//! The offset algebra: a tagged variant standing in for the inheritance
//! hierarchy of the source (spec §9, "polymorphism without inheritance").
//! Each concrete offset kind lives in its own module and is wrapped by a
//! single [`Offset`] enum carrying the base contract (`apply`/`on_offset`/
//! `rollback`/`rollforward`/`rule_code`/`freqstr`/`is_anchored`) and the
//! arithmetic laws of spec §4.1.

pub mod business_day;
pub mod fy5253;
pub mod fy5253_quarter;
pub mod month;
pub mod quarter;
pub mod registry;
pub mod tick;
pub mod week;
pub mod year;

pub use self::{
    business_day::{BusinessDay, BusinessDayCalendar, CustomBusinessDay},
    fy5253::{Variation, FY5253},
    fy5253_quarter::FY5253Quarter,
    month::{BusinessMonthBegin, BusinessMonthEnd, MonthBegin, MonthEnd},
    quarter::{BQuarterBegin, BQuarterEnd, QuarterBegin, QuarterEnd},
    tick::{Tick, TickUnit},
    week::{LastWeekOfMonth, Week, WeekOfMonth},
    year::{BYearBegin, BYearEnd, YearBegin, YearEnd},
};

use crate::calendar::Timestamp;

use dateoffset_core::prelude::*;

use std::fmt;

/// The polymorphic offset entity (spec §3). One variant per concrete offset
/// kind; no variant holds a trait object or virtual dispatch table — the
/// base contract below is a single `match` per method.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Offset {
    Tick(Tick),
    BusinessDay(BusinessDay),
    CustomBusinessDay(CustomBusinessDay),
    MonthEnd(MonthEnd),
    MonthBegin(MonthBegin),
    BusinessMonthEnd(BusinessMonthEnd),
    BusinessMonthBegin(BusinessMonthBegin),
    QuarterEnd(QuarterEnd),
    QuarterBegin(QuarterBegin),
    BQuarterEnd(BQuarterEnd),
    BQuarterBegin(BQuarterBegin),
    YearEnd(YearEnd),
    YearBegin(YearBegin),
    BYearEnd(BYearEnd),
    BYearBegin(BYearBegin),
    Week(Week),
    WeekOfMonth(WeekOfMonth),
    LastWeekOfMonth(LastWeekOfMonth),
    FY5253(FY5253),
    FY5253Quarter(FY5253Quarter),
}

macro_rules! dispatch {
    ($self:expr, $var:ident => $expr:expr) => {
        match $self {
            Offset::Tick($var) => $expr,
            Offset::BusinessDay($var) => $expr,
            Offset::CustomBusinessDay($var) => $expr,
            Offset::MonthEnd($var) => $expr,
            Offset::MonthBegin($var) => $expr,
            Offset::BusinessMonthEnd($var) => $expr,
            Offset::BusinessMonthBegin($var) => $expr,
            Offset::QuarterEnd($var) => $expr,
            Offset::QuarterBegin($var) => $expr,
            Offset::BQuarterEnd($var) => $expr,
            Offset::BQuarterBegin($var) => $expr,
            Offset::YearEnd($var) => $expr,
            Offset::YearBegin($var) => $expr,
            Offset::BYearEnd($var) => $expr,
            Offset::BYearBegin($var) => $expr,
            Offset::Week($var) => $expr,
            Offset::WeekOfMonth($var) => $expr,
            Offset::LastWeekOfMonth($var) => $expr,
            Offset::FY5253($var) => $expr,
            Offset::FY5253Quarter($var) => $expr,
        }
    };
}

impl Offset {
    /// Semantic step (spec §4.1). Fails with a tagged `ApplyType`-equivalent
    /// error only indirectly (via sub-computations such as
    /// `last_business_day_of_month`); a structurally valid `Offset` applied
    /// to a structurally valid `Timestamp` otherwise always succeeds.
    pub fn apply(&self, ts: &Timestamp) -> Outcome<Timestamp> {
        dispatch!(self, o => o.apply(ts))
    }

    pub fn on_offset(&self, ts: &Timestamp) -> bool {
        dispatch!(self, o => o.on_offset(ts))
    }

    pub fn rule_code(&self) -> String {
        dispatch!(self, o => o.rule_code())
    }

    pub fn freqstr(&self) -> String {
        dispatch!(self, o => o.freqstr())
    }

    pub fn is_anchored(&self) -> bool {
        dispatch!(self, o => o.is_anchored())
    }

    pub fn n(&self) -> i64 {
        dispatch!(self, o => o.n)
    }

    /// Reconstruct this offset with a different step count, same parameters
    /// (used by the generic `rollback`/`rollforward` default and by the
    /// arithmetic operators below).
    pub fn with_n(&self, n: i64) -> Offset {
        match self {
            Offset::Tick(o) => Offset::Tick(o.with_n(n)),
            Offset::BusinessDay(o) => Offset::BusinessDay(o.with_n(n)),
            Offset::CustomBusinessDay(o) => Offset::CustomBusinessDay(o.with_n(n)),
            Offset::MonthEnd(o) => Offset::MonthEnd(o.with_n(n)),
            Offset::MonthBegin(o) => Offset::MonthBegin(o.with_n(n)),
            Offset::BusinessMonthEnd(o) => Offset::BusinessMonthEnd(o.with_n(n)),
            Offset::BusinessMonthBegin(o) => Offset::BusinessMonthBegin(o.with_n(n)),
            Offset::QuarterEnd(o) => Offset::QuarterEnd(o.with_n(n)),
            Offset::QuarterBegin(o) => Offset::QuarterBegin(o.with_n(n)),
            Offset::BQuarterEnd(o) => Offset::BQuarterEnd(o.with_n(n)),
            Offset::BQuarterBegin(o) => Offset::BQuarterBegin(o.with_n(n)),
            Offset::YearEnd(o) => Offset::YearEnd(o.with_n(n)),
            Offset::YearBegin(o) => Offset::YearBegin(o.with_n(n)),
            Offset::BYearEnd(o) => Offset::BYearEnd(o.with_n(n)),
            Offset::BYearBegin(o) => Offset::BYearBegin(o.with_n(n)),
            Offset::Week(o) => Offset::Week(o.with_n(n)),
            Offset::WeekOfMonth(o) => Offset::WeekOfMonth(o.with_n(n)),
            Offset::LastWeekOfMonth(o) => Offset::LastWeekOfMonth(o.with_n(n)),
            Offset::FY5253(o) => Offset::FY5253(o.with_n(n)),
            Offset::FY5253Quarter(o) => Offset::FY5253Quarter(o.with_n(n)),
        }
    }

    /// Default `rollforward` (spec §4.1): no-op if already on-offset,
    /// otherwise apply a single unit step forward. Every variant's own
    /// `apply` already encodes the "roll onto the nearest conforming date"
    /// policy for `n=1`/`n=-1`, so one application suffices — no loop
    /// needed (mirrors the source's `dt + type(self)(1, **kwds)`).
    pub fn rollforward(&self, ts: &Timestamp) -> Outcome<Timestamp> {
        if self.on_offset(ts) {
            Ok(ts.clone())
        } else {
            self.with_n(1).apply(ts)
        }
    }

    /// Default `rollback` (spec §4.1): mirrors `rollforward`, stepping
    /// backward (`dt - type(self)(1, **kwds)`).
    pub fn rollback(&self, ts: &Timestamp) -> Outcome<Timestamp> {
        if self.on_offset(ts) {
            Ok(ts.clone())
        } else {
            self.with_n(-1).apply(ts)
        }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.freqstr())
    }
}

/// `ts + O == O.apply(ts)` (spec §4.1).
impl std::ops::Add<&Offset> for &Timestamp {
    type Output = Outcome<Timestamp>;
    fn add(self, rhs: &Offset) -> Outcome<Timestamp> {
        rhs.apply(self)
    }
}

/// `ts - O` steps backward by one application of `O` negated — used by the
/// default `rollback`/`rollforward` derivation and exposed for symmetry with
/// `ts + O`. `O - ts` has no meaning and is deliberately not implemented
/// (spec §4.1: "a type error").
impl std::ops::Sub<&Offset> for &Timestamp {
    type Output = Outcome<Timestamp>;
    fn sub(self, rhs: &Offset) -> Outcome<Timestamp> {
        (-rhs.clone()).apply(self)
    }
}

/// `-O == class(-n, params)` (spec §4.1).
impl std::ops::Neg for Offset {
    type Output = Offset;
    fn neg(self) -> Offset {
        let n = self.n();
        self.with_n(-n)
    }
}

/// `k*O == class(k*n, params)` (spec §4.1).
impl std::ops::Mul<i64> for Offset {
    type Output = Offset;
    fn mul(self, k: i64) -> Offset {
        let n = self.n();
        self.with_n(n * k)
    }
}

impl std::ops::Mul<Offset> for i64 {
    type Output = Offset;
    fn mul(self, rhs: Offset) -> Offset {
        rhs * self
    }
}

/// `O + O' (same class) == class(n1+n2, same params)` (spec §4.1).
/// Combining offsets of different classes, or of the same class with
/// different phase parameters, is the arithmetic "operand dispatch" case the
/// spec's error taxonomy (§7) calls `ApplyType` — surfaced here as
/// `ErrTag::NoImpl`.
impl std::ops::Add for Offset {
    type Output = Outcome<Offset>;
    fn add(self, rhs: Offset) -> Outcome<Offset> {
        use Offset::*;
        match (self, rhs) {
            (Tick(a), Tick(b)) => Ok(Tick(a.add(&b))),
            (BusinessDay(a), BusinessDay(b)) if a.offset_ns == b.offset_ns && a.normalize == b.normalize =>
                Ok(BusinessDay(a.with_n(a.n + b.n))),
            (CustomBusinessDay(a), CustomBusinessDay(b))
                if a.calendar == b.calendar && a.offset_ns == b.offset_ns && a.normalize == b.normalize =>
                Ok(CustomBusinessDay(a.with_n(a.n + b.n))),
            (MonthEnd(a), MonthEnd(b)) => Ok(MonthEnd(a.with_n(a.n + b.n))),
            (MonthBegin(a), MonthBegin(b)) => Ok(MonthBegin(a.with_n(a.n + b.n))),
            (BusinessMonthEnd(a), BusinessMonthEnd(b)) => Ok(BusinessMonthEnd(a.with_n(a.n + b.n))),
            (BusinessMonthBegin(a), BusinessMonthBegin(b)) => Ok(BusinessMonthBegin(a.with_n(a.n + b.n))),
            (QuarterEnd(a), QuarterEnd(b)) if a.starting_month == b.starting_month =>
                Ok(QuarterEnd(a.with_n(a.n + b.n))),
            (QuarterBegin(a), QuarterBegin(b)) if a.starting_month == b.starting_month =>
                Ok(QuarterBegin(a.with_n(a.n + b.n))),
            (BQuarterEnd(a), BQuarterEnd(b)) if a.starting_month == b.starting_month =>
                Ok(BQuarterEnd(a.with_n(a.n + b.n))),
            (BQuarterBegin(a), BQuarterBegin(b)) if a.starting_month == b.starting_month =>
                Ok(BQuarterBegin(a.with_n(a.n + b.n))),
            (YearEnd(a), YearEnd(b)) if a.month == b.month => Ok(YearEnd(a.with_n(a.n + b.n))),
            (YearBegin(a), YearBegin(b)) if a.month == b.month => Ok(YearBegin(a.with_n(a.n + b.n))),
            (BYearEnd(a), BYearEnd(b)) if a.month == b.month => Ok(BYearEnd(a.with_n(a.n + b.n))),
            (BYearBegin(a), BYearBegin(b)) if a.month == b.month => Ok(BYearBegin(a.with_n(a.n + b.n))),
            (Week(a), Week(b)) if a.weekday == b.weekday => Ok(Week(a.with_n(a.n + b.n))),
            (WeekOfMonth(a), WeekOfMonth(b)) if a.week == b.week && a.weekday == b.weekday =>
                Ok(WeekOfMonth(a.with_n(a.n + b.n))),
            (LastWeekOfMonth(a), LastWeekOfMonth(b)) if a.weekday == b.weekday =>
                Ok(LastWeekOfMonth(a.with_n(a.n + b.n))),
            (FY5253(a), FY5253(b))
                if a.starting_month == b.starting_month && a.weekday == b.weekday && a.variation == b.variation =>
                Ok(FY5253(a.with_n(a.n + b.n))),
            (FY5253Quarter(a), FY5253Quarter(b)) if a.fy == b.fy && a.qtr_with_extra_week == b.qtr_with_extra_week =>
                Ok(FY5253Quarter(a.with_n(a.n + b.n))),
            _ => Err(err!(errmsg!("cannot add offsets of mismatched class or parameters"), NoImpl)),
        }
    }
}
