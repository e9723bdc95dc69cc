//! Lazy range generation (spec §4.9). `generate_range` resolves the two
//! endpoints and hands back a [`RangeIter`] — a pull-based iterator with
//! explicit `(cur, end, offset, done)` state (spec §9: "model as a
//! pull-based iterator with explicit state"), since the host language has
//! no generator/coroutine construct.

use crate::calendar::Timestamp;
use crate::offset::Offset;

use dateoffset_core::prelude::*;

use std::cmp::Ordering;

/// One endpoint of a range: either is required, but not both (the missing
/// one is derived from `periods`).
pub enum Bound {
    Timestamp(Timestamp),
    Unbounded,
}

/// Build a [`RangeIter`] per the five-step algorithm of spec §4.9.
///
/// `periods` is consulted only to derive a missing endpoint; when both
/// `start` and `end` are given it is ignored.
pub fn generate_range(start: Bound, end: Bound, periods: Option<i64>, offset: &Offset) -> Outcome<RangeIter> {
    let (start, end) = match (start, end) {
        (Bound::Timestamp(s), Bound::Timestamp(e)) => {
            let s = if offset.on_offset(&s) { s } else { offset.rollforward(&s)? };
            let e = if offset.on_offset(&e) { e } else { offset.rollback(&e)? };
            (s, e)
        }
        (Bound::Timestamp(s), Bound::Unbounded) => {
            let s = if offset.on_offset(&s) { s } else { offset.rollforward(&s)? };
            let periods = periods
                .ok_or_else(|| err!(errmsg!("generate_range needs either an end bound or a periods count"), Invalid, Input))?;
            let e = if periods <= 0 {
                s.clone()
            } else {
                offset.with_n(offset.n() * (periods - 1)).apply(&s)?
            };
            (s, e)
        }
        (Bound::Unbounded, Bound::Timestamp(e)) => {
            let e = if offset.on_offset(&e) { e } else { offset.rollback(&e)? };
            let periods = periods
                .ok_or_else(|| err!(errmsg!("generate_range needs either a start bound or a periods count"), Invalid, Input))?;
            let s = if periods <= 0 {
                e.clone()
            } else {
                offset.with_n(-offset.n() * (periods - 1)).apply(&e)?
            };
            (s, e)
        }
        (Bound::Unbounded, Bound::Unbounded) => {
            return Err(err!(errmsg!("generate_range needs at least one of start/end"), Invalid, Input));
        }
    };

    if end.date_cmp(&start) == Ordering::Less {
        return Ok(RangeIter { cur: None, end, offset: offset.clone() });
    }
    Ok(RangeIter { cur: Some(start), end, offset: offset.clone() })
}

/// A lazy, finite, non-restartable sequence of on-offset timestamps
/// (spec §4.9). Yields one `Err` and then ends if `offset.apply` ever fails
/// to advance (the "offset did not increment date" liveness check).
pub struct RangeIter {
    cur: Option<Timestamp>,
    end: Timestamp,
    offset: Offset,
}

impl Iterator for RangeIter {
    type Item = Outcome<Timestamp>;

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.cur.take()?;
        if cur.date_cmp(&self.end) == Ordering::Greater {
            return None;
        }

        match self.offset.apply(&cur) {
            Ok(next) => {
                if next.date_cmp(&cur) != Ordering::Greater {
                    // Liveness violation: emit this item, then stop for good.
                    self.cur = None;
                    return Some(Ok(cur));
                }
                self.cur = Some(next);
                Some(Ok(cur))
            }
            Err(e) => {
                self.cur = None;
                Some(Err(e))
            }
        }
    }
}
