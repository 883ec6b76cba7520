use std::borrow::Cow;

/// Errors raised while resolving or constructing group functions.
#[hearth_derive::hearth_error]
pub enum GroupError {
    /// No constructor is registered under the requested function name.
    #[error("Unknown group function{}: {message}", format_context(.context))]
    UnknownFunction { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The function exists but the supplied parameters do not fit it.
    #[error("Bad group function parameters{}: {message}", format_context(.context))]
    BadParams { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal logic errors.
    #[error("Internal group error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
