#[macro_use]
pub mod error;
#[macro_use]
pub mod string;
