//! # restbind
//!
//! Bind the parameters of an incoming request (its URL query or its JSON body)
//! to a typed Rust value.
//!
//! The heavy lifting is done by a small decoding engine:
//!
//! - a [`TypeDescriptor`](descriptor::TypeDescriptor) describes the shape you want
//!   to obtain (numbers, booleans, text, sequences, mappings, records, ...);
//! - a [`PathReader`](reader::PathReader) exposes the raw request data as a tree
//!   of dotted paths (`a.b.c`);
//! - [`decode`](decode::decode) walks the descriptor and the reader side by side,
//!   producing a [`DecodedValue`](value::DecodedValue) or a path-qualified
//!   [`DecodeError`](decode::DecodeError).
//!
//! Most applications only interact with [`Describe`] and [`Binder`](request::Binder):
//!
//! ```rust
//! use restbind::{Describe, request::{Binder, RequestHead}};
//!
//! #[derive(Describe, serde::Deserialize, Debug)]
//! pub struct Search {
//!     #[rest = "required,q"]
//!     query: String,
//!     page: u32,
//! }
//!
//! # fn main() -> Result<(), restbind::request::errors::ExtractParamsError> {
//! let request = http::Request::get("/search?q=rust&page=2").body(()).unwrap();
//! let (parts, _) = request.into_parts();
//! let head = RequestHead::from(parts);
//!
//! let binder = Binder::<Search>::new();
//! let search = binder.bind(&head, &[])?;
//! assert_eq!(search.query, "rust");
//! assert_eq!(search.page, 2);
//! # Ok(())
//! # }
//! ```

// Let `#[derive(Describe)]` refer to `::restbind` from inside this crate too.
extern crate self as restbind;

pub use descriptor::Describe;
pub use value::DecodedValue;

pub mod decode;
pub mod descriptor;
pub mod reader;
pub mod request;
pub mod value;
