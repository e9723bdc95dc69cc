//! Error types shared across the dateoffset workspace.
//!
//! `Outcome<V>` is the result type used throughout: an alias for
//! `std::result::Result<V, Error<ErrTag>>`. Errors carry one or more
//! `ErrTag`s so callers can classify failures (`Invalid`, `Range`, `Missing`, ...)
//! without matching on message text.

use crate::GenTag;

use std::{
    fmt,
    sync::Arc,
};

#[allow(non_camel_case_types)]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ErrTag {
    Bug,
    Conversion,
    Input,
    Invalid,
    Key,
    Missing,
    Name,
    NoImpl,
    NotFound,
    Numeric,
    Order,
    Overflow,
    Panic,
    Range,
    String,
    Test,
    Unexpected,
    Unknown,
    Value,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ErrMsg<T: GenTag> {
    pub msg:    String,
    pub tags:   &'static [T],
}

impl<T: GenTag> fmt::Display for ErrMsg<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Clone)]
pub enum Error<T: GenTag> {
    Local(ErrMsg<T>),
    Other(ErrMsg<T>),
    Upstream(Arc<dyn std::error::Error + Send + Sync>, ErrMsg<T>),
    Collection(Vec<Box<Self>>),
}

impl<T: GenTag> Error<T> where Error<T>: std::error::Error {

    pub fn tags(&self) -> Vec<T> {
        match self {
            Error::Local(ErrMsg { tags: t, .. }) |
            Error::Other(ErrMsg { tags: t, .. }) => t.to_vec(),
            Error::Upstream(_, ErrMsg { tags: t, .. }) => t.to_vec(),
            Error::Collection(boxerrs) => {
                let mut t = Vec::new();
                for e in boxerrs {
                    for tag in (*e).tags() {
                        t.push(tag.clone())
                    }
                }
                t
            },
        }
    }

    pub fn tags_display(tags: Vec<T>) -> String {
        let mut result = String::new();
        if tags.len() > 0 {
            result.push('[');
            let mut c = 0;
            for tag in tags {
                if c > 0 {
                    result.push(' ');
                }
                result.push_str(&tag.to_string());
                c += 1;
            }
            result.push(']');
        }
        result
    }

    fn fmt_local(f: &mut fmt::Formatter<'_>, label: &str, m: &str, t: &'static [T]) -> fmt::Result {
        write!(f, "{}{{{}{}}}",
            label,
            Self::tags_display(t.to_vec()),
            if m.len() > 0 {
                if t.len() > 0 { fmt!(" \"{}\"", m) } else { fmt!("\"{}\"", m) }
            } else {
                String::new()
            },
        )
    }

    fn fmt_upstream_specific(f: &mut fmt::Formatter<'_>, e: &Self, m: &str, t: &'static [T]) -> fmt::Result {
        write!(f, "UpstreamErr{{{}{}}}\n{:?}",
            Self::tags_display(t.to_vec()),
            if m.len() > 0 {
                if t.len() > 0 { fmt!(" \"{}\"", m) } else { fmt!("\"{}\"", m) }
            } else {
                String::new()
            },
            e,
        )
    }

    fn fmt_upstream_general(
        f: &mut fmt::Formatter<'_>,
        arc_e: &Arc<dyn std::error::Error + Send + Sync>,
        m: &str,
        t: &'static [T],
    ) -> fmt::Result {
        write!(f, "UpstreamErr{{{}{}}}",
            Self::tags_display(t.to_vec()),
            if m.len() > 0 {
                fmt!(" \"{}\" \"{}\"", m, arc_e)
            } else {
                fmt!("\"{}\"", arc_e)
            },
        )
    }
}

impl<T: GenTag> fmt::Debug for Error<T> where Error<T>: std::error::Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Local(ErrMsg { msg: m, tags: t }) => Self::fmt_local(f, "LocalErr", m, t),
            Error::Other(ErrMsg { msg: m, tags: t }) => Self::fmt_local(f, "OtherErr", m, t),
            Error::Upstream(arc_e, ErrMsg { msg: m, tags: t }) => match arc_e.downcast_ref::<Error<T>>() {
                Some(e) => Self::fmt_upstream_specific(f, e, m, t),
                None => Self::fmt_upstream_general(f, arc_e, m, t),
            },
            Error::Collection(boxerrs) => {
                writeln!(f, "Collection of {} errors:", boxerrs.len())?;
                for (i, boxerr) in boxerrs.iter().enumerate() {
                    writeln!(f, "{:04}: {:?}", i, *boxerr)?;
                }
                Ok(())
            },
        }
    }
}

impl<T: GenTag> fmt::Display for Error<T> where Error<T>: std::error::Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for Error<ErrTag> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Upstream(arc_e, _) => Some(arc_e.as_ref()),
            _ => None,
        }
    }
}

impl From<std::num::ParseIntError> for Error<ErrTag> {
    fn from(e: std::num::ParseIntError) -> Self {
        Error::Upstream(Arc::new(e), ErrMsg {
            tags: &[ErrTag::Conversion, ErrTag::Numeric],
            msg: String::new(),
        })
    }
}

impl From<std::fmt::Error> for Error<ErrTag> {
    fn from(e: std::fmt::Error) -> Self {
        Error::Upstream(Arc::new(e), ErrMsg {
            tags: &[ErrTag::Unexpected],
            msg: String::new(),
        })
    }
}

impl GenTag for ErrTag {}

impl fmt::Display for ErrTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Default for ErrTag {
    fn default() -> Self {
        Self::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errmsg, Outcome};

    #[test]
    fn test_errctx() -> Outcome<()> {
        let m = errmsg!("The meaning of life is {}", 42);
        assert!(m.len() > 0);
        let e = Error::Local(ErrMsg {
            tags: &[ErrTag::Invalid],
            msg: errmsg!("bad parameter"),
        });
        assert!(e.tags().contains(&ErrTag::Invalid));
        Ok(())
    }

    #[test]
    fn test_err_macro() -> Outcome<()> {
        let e = err!(errmsg!("a test"), Invalid, Input);
        assert_eq!(e.tags(), vec![ErrTag::Invalid, ErrTag::Input]);
        Ok(())
    }

    #[test]
    fn test_res_macro_ok() -> Outcome<()> {
        fn parse(s: &str) -> Outcome<i32> {
            Ok(res!(s.parse::<i32>()))
        }
        assert_eq!(res!(parse("42")), 42);
        Ok(())
    }

    #[test]
    fn test_res_macro_err() {
        fn parse(s: &str) -> Outcome<i32> {
            Ok(res!(s.parse::<i32>()))
        }
        assert!(parse("not a number").is_err());
    }
}
