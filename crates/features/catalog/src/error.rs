use std::borrow::Cow;

/// A specialized [`CatalogError`] enum of this crate.
#[chub_derive::chub_error]
pub enum CatalogError {
    /// A course with the same id is already stored.
    #[error("Duplicate course{}: {message}", format_context(.context))]
    Duplicate { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Catalog fixture error{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal catalog error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
