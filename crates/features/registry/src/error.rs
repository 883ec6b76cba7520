use std::borrow::Cow;

/// Errors surfaced by registry operations.
#[hearth_derive::hearth_error]
pub enum RegistryError {
    /// The item's name does not satisfy the identifier grammar.
    #[error("Invalid item name{}: {source}", format_context(.context))]
    InvalidName { source: hearth_domain::NameError, context: Option<Cow<'static, str>> },

    /// An item with this name is already registered.
    #[error("Item already exists{}: {message}", format_context(.context))]
    AlreadyExists { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// No item with this name is registered.
    #[error("Item not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The persistent store rejected or failed the operation.
    #[error("Store error{}: {source}", format_context(.context))]
    Store { source: hearth_store::StoreError, context: Option<Cow<'static, str>> },

    /// Internal logic errors.
    #[error("Internal registry error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
