#[macro_export]
/// Build the file:line context string used inside errors.
///
///```
/// use dateoffset_core::prelude::*;
///
/// let n = 41;
/// let result0: Outcome<()> = Err(Error::Local(ErrMsg {
///     tags: &[ErrTag::Invalid, ErrTag::Input],
///     msg: errmsg!("The meaning of life is not {}", n),
/// }));
///```
macro_rules! errmsg {
    () => (
        format!("{}:{}", file!(), line!())
    );
    ($($arg:tt)*) => (
        format!("{}:{}: {}", file!(), line!(), format!($($arg)*))
    )
}

#[macro_export]
/// Construct a local or upstream error with a fixed set of tags.
macro_rules! err {
    ($e:ident, $m:expr) => {
        Error::Upstream(std::sync::Arc::new($e), ErrMsg {
            tags: &[],
            msg: $m,
        })
    };
    ($e:ident, $m:expr, $($etvars:ident),* $(,)?) => {
        Error::Upstream(std::sync::Arc::new($e), ErrMsg {
            tags: &[ $(ErrTag::$etvars),* ],
            msg: $m,
        })
    };
    ($m:expr) => {
        Error::Local(ErrMsg {
            tags: &[],
            msg: $m,
        })
    };
    ($m:expr, $($etvars:ident),* $(,)?) => {
        Error::Local(ErrMsg {
            tags: &[ $(ErrTag::$etvars),* ],
            msg: $m,
        })
    };
}

#[macro_export]
/// A prefix alternative to the `?` operator for error propagation.
macro_rules! ok {
    ($expr:expr) => {
        ($expr)?
    };
}

#[macro_export]
/// Propagates errors and adds context and tags while wrapping the underlying error.
macro_rules! res {
    ($res:expr, $($etvars:ident),* $(,)?) => {
        match $res {
            Ok(v) => v,
            Err(e) => {
                return Err(Error::Upstream(std::sync::Arc::new(e), ErrMsg {
                    tags: &[ $(ErrTag::$etvars),* ],
                    msg: errmsg!(),
                }));
            },
        }
    };
    ($res:expr) => {
        match $res {
            Ok(v) => v,
            Err(e) => {
                return Err(Error::Upstream(std::sync::Arc::new(e), ErrMsg {
                    tags: &[],
                    msg: errmsg!(),
                }));
            },
        }
    }
}

#[macro_export]
/// Propagates errors while catching unwinding panics and adding context.
macro_rules! catch {
    ($res:expr, $($etvars:ident),* $(,)?) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            $res
        })) {
            Ok(Ok(v)) => v,
            Ok(Err(e)) => return Err(Error::Upstream(std::sync::Arc::new(e), ErrMsg {
                tags: &[ $(ErrTag::$etvars),* ],
                msg: errmsg!(),
            })),
            Err(cause) => {
                let msg = if let Some(s) = cause.downcast_ref::<&str>() {
                    s
                } else if let Some(s) = cause.downcast_ref::<String>() {
                    s.as_str()
                } else {
                    "A panic occurred, but the message could not be extracted."
                };
                return Err(Error::Local(ErrMsg {
                    tags: &[ ErrTag::Panic, $(ErrTag::$etvars),* ],
                    msg: errmsg!("A panic occurred: {}", msg),
                }));
            },
        }
    };
    ($res:expr) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            $res
        })) {
            Ok(Ok(v)) => v,
            Ok(Err(e)) => {
                return Err(Error::Upstream(std::sync::Arc::new(e), ErrMsg {
                    tags: &[],
                    msg: errmsg!(),
                }));
            },
            Err(cause) => {
                let msg = if let Some(s) = cause.downcast_ref::<&str>() {
                    s
                } else if let Some(s) = cause.downcast_ref::<String>() {
                    s.as_str()
                } else {
                    "A panic occurred, but the message could not be extracted."
                };
                return Err(Error::Local(ErrMsg {
                    tags: &[ ErrTag::Panic ],
                    msg: errmsg!("A panic occurred: {}", msg),
                }));
            },
        }
    }
}
