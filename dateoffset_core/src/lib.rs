//! Error handling and formatting primitives shared across the dateoffset workspace.
//!
//! - `Outcome<V>`: the result type used throughout, an alias for
//!   `std::result::Result<V, Error<error::ErrTag>>`.
//! - `err!`/`res!`/`ok!`/`catch!`: error construction and propagation macros.
//! - `fmt!`: a three letter alias for `format!`.
#![forbid(unsafe_code)]
#![allow(dead_code)]

#[macro_use]
pub mod macros;
pub mod error;
pub mod prelude;

/// A tag attached to an [`error::Error`] for multi-dimensional classification.
pub trait GenTag: Clone + std::fmt::Debug + Default + std::fmt::Display + Send + Sync + 'static {}

pub type Outcome<V> = std::result::Result<V, error::Error<error::ErrTag>>;
