use std::borrow::Cow;

/// A specialized [`StoreError`] enum of this crate.
#[hearth_derive::hearth_error]
pub enum StoreError {
    /// Key or namespace failed the `[A-Za-z0-9_]+` grammar.
    #[error("Invalid record key{}: {message}", format_context(.context))]
    InvalidKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Hardware I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// Record bytes could not be encoded or decoded (postcard).
    #[error("Record codec failure{}: {source}", format_context(.context))]
    Codec { source: postcard::Error, context: Option<Cow<'static, str>> },

    #[error("Decompression failure{}: {source}", format_context(.context))]
    Decompress { source: lz4_flex::block::DecompressError, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal store error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
