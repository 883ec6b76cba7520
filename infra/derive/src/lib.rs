#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the Hearth infrastructure.
//!
//! The only macro exported today is [`macro@hearth_error`], the attribute that
//! every crate in the workspace uses to define its error enum. Keeping the
//! error shape in one macro guarantees that all errors carry an optional
//! context string and interoperate with `?` the same way.

mod error;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for defining domain-specific error enums.
///
/// Transforms a plain enum into a fully wired error type:
///
/// * **Derives**: injects `#[derive(Debug, thiserror::Error)]` unless already present.
/// * **Context**: generates a companion `<Name>Ext` trait adding `.context(...)`
///   to `Result<T, Name>` and to `Result<T, Source>` for every wrapped source type.
/// * **Conversions**: implements `From<Source>` for variants carrying a
///   `source` field, so `?` works on upstream errors.
/// * **Internal fallback**: implements `From<&'static str>`/`From<String>` when
///   an `Internal` variant exists.
///
/// # Requirements
///
/// 1. The target must be an **enum** with named-field variants only.
/// 2. A variant that should accept context carries
///    `context: Option<Cow<'static, str>>`.
/// 3. A variant wrapping an upstream error names the field `source` (or marks
///    it `#[source]`/`#[from]`) and must also carry a context field.
///
/// # Example
///
/// ```rust,ignore
/// use hearth_derive::hearth_error;
/// use std::borrow::Cow;
///
/// #[hearth_error]
/// pub enum StoreError {
///     #[error("I/O failure{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read() -> Result<Vec<u8>, StoreError> {
///     std::fs::read("records.bin").context("Loading record file")
/// }
/// ```
#[proc_macro_attribute]
pub fn hearth_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error::expand(input).into()
}
