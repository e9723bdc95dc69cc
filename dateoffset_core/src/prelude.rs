pub use crate::{
    self as dateoffset_core,
    Outcome,
    GenTag,
    // Error handling macros.
    err,
    errmsg,
    ok,
    res,
    catch,
    // String output macros.
    fmt,
};
pub use crate::error::{
    Error,
    ErrMsg,
    ErrTag,
};
