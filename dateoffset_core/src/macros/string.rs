#[macro_export]
/// A three letter alias for `std::format!`.
///
///```
/// use dateoffset_core::prelude::*;
///
/// let s = fmt!("The meaning is {}", 42);
///```
macro_rules! fmt {
    () => (String::from(""));
    ($($arg:tt)*) => (format!($($arg)*));
}
