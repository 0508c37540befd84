#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every crate of the workspace.
//!
//! * [`macro@chub_error`] turns a plain enum into a context-aware error type.
//! * [`macro@chub_slice`] turns a struct into a cheaply clonable feature slice handle.
//!
//! Examples are `ignore`d here; the consuming crates exercise them in their own tests.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemStruct, parse_macro_input};

/// Defines a domain error enum.
///
/// # Injected items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * A companion `<Name>Ext` trait adding `.context(..)` to `Result<T, Name>` and to
///   `Result<T, Source>` for every variant that wraps a `source` error.
/// * `From<Source>` for every variant with a `source` field.
/// * `From<&'static str>` and `From<String>` when an `Internal { message, context }` variant exists.
/// * A private `format_context` helper used by the `#[error(..)]` strings.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with **named** fields only.
/// 2. Context fields are spelled `context: Option<Cow<'static, str>>`.
/// 3. A variant with a `source` field must also have a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[chub_derive::chub_error]
/// pub enum LedgerError {
///     #[error("Duplicate record{}: {message}", format_context(.context))]
///     Duplicate { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///
///     #[error("Internal ledger error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn chub_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Defines a feature slice handle.
///
/// The annotated struct becomes `<Name>Inner`; `<Name>` is generated as an `Arc` wrapper that
/// `Deref`s to the inner state and implements `chub_kernel::domain::registry::FeatureSlice`.
///
/// # Example
///
/// ```rust,ignore
/// #[chub_derive::chub_slice]
/// pub struct Bookmarks {
///     ledger: Ledger,
/// }
///
/// let slice = Bookmarks::new(BookmarksInner { ledger });
/// ```
#[proc_macro_attribute]
pub fn chub_slice(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(input).into()
}
