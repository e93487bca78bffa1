//! Procedural macros for `restbind`.
//!
//! Refer to the documentation of `restbind::Describe` for usage details.
use proc_macro::TokenStream;

mod describe;

#[proc_macro_derive(Describe, attributes(rest))]
/// Derive `restbind::Describe` for a struct with named fields.
///
/// Every field is described by its own `Describe` implementation.
/// Use `#[rest = "..."]` to tweak how a field is looked up:
///
/// - `#[rest = "required"]` marks the field as required;
/// - `#[rest = "<name>"]` looks the field up under `<name>`, rather than its lowercased name;
/// - `#[rest = "required,<name>"]` does both.
pub fn derive_describe(input: TokenStream) -> TokenStream {
    describe::derive_describe(input)
}
