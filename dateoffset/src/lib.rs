//! A calendar-aware date-offset algebra: tick offsets, business-day
//! rolling, anchored month/quarter/year/week offsets, 52/53-week fiscal
//! calendars, a rule-code registry and a lazy range generator.

pub mod calendar;
pub mod offset;
pub mod range;

pub use crate::calendar::{Month, Timestamp, Weekday, Zone};
pub use crate::offset::Offset;
pub use crate::range::{generate_range, Bound, RangeIter};
