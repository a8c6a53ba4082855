//! Deep validation of nested values.
//!
//! Any type implementing [`Validate`] is invoked while [`Validator`] walks a value
//! depth-first through records, sequences, arrays, maps and optional references.
//! Every failure found anywhere in the tree is collected into one [`Errors`]
//! aggregate, and each [`Error`] carries the dotted path from the root value to
//! the field or element that produced it.
//!
//! ```ignore
//! use vet::{Errors, Validate, Walk};
//!
//! #[derive(Walk)]
//! pub struct Order {
//!     #[vet(json = "items")]
//!     pub items: Vec<Item>,
//! }
//!
//! #[derive(Walk)]
//! pub struct Item {
//!     #[vet(json = "book")]
//!     pub book: Option<Box<Book>>,
//! }
//!
//! #[derive(Walk)]
//! pub struct Book {
//!     pub title: String,
//!     #[vet(json = "Author")]
//!     pub author: String,
//! }
//!
//! impl Validate for Book {
//!     fn validate(&self) -> Result<(), Errors> {
//!         let errs = vet::append(Ok(()), vet::require_field("title", &self.title));
//!         vet::append(errs, vet::require_field("author", &self.author))
//!     }
//! }
//!
//! // items.1.book.Author: is required
//! for err in vet::errors(vet::validate(&order)) {
//!     println!("{err}");
//! }
//! ```
//!
//! Record field names are resolved through `json`, `yaml` and `form` tags
//! (see [`naming`]); paths are joined with `.` (see [`path`]). Both are
//! replaceable per [`Validator`], or through [`Config`].

extern crate self as vet;

mod checks;
mod config;
mod error;
pub mod naming;
pub mod path;
mod validator;
mod walk;

pub use checks::{
    in_range, match_regexp, max_length, min_length, not_nil, require_field, Length, Numeric,
    Required,
};
pub use config::{config_schema_json, load_config, Config, ConfigError, NamingConfig, PathConfig};
pub use error::{append, append_error, append_field_error, errors, Cause, Error, Errors};
pub use naming::{Convention, FieldInfo, FieldNameFn, Tags};
pub use path::FieldJoinFn;
pub use validator::{validate, Validator};
pub use walk::{Elements, Entries, Field, Record, Shape, Walk};

/// Derives [`Walk`] for structs and enums.
///
/// Field attributes:
///
/// - `#[vet(json = "..", yaml = "..", form = "..")]` sets the raw tag value for
///   each naming convention. Values may carry options after a comma, and `"-"`
///   excludes the field.
/// - `#[vet(opaque)]` keeps the field named but never descends into it; use it
///   for field types that do not implement [`Walk`].
/// - `#[serde(rename = "..")]` supplies the `json` tag when none is given, and
///   `#[serde(skip)]` behaves like `json = "-"`.
///
/// Private fields are listed (contracts may still report against them) but never
/// descended into.
///
/// A [`Validate`] impl on the type is picked up automatically when it holds for
/// every instantiation the derived impl covers. For a generic type whose impl
/// adds bounds of its own, put `#[vet(validate)]` on the type: the derived impl
/// then requires `Self: Validate` and always calls it.
pub use vet_macros::Walk;

/// The validation contract.
///
/// Return `Ok(())` when the value is valid, or one or more [`Error`]s otherwise.
/// When the implementing type is a record, an [`Error`] whose path names one of
/// the record's own fields (by its declared Rust name) is reported under that
/// field's external name.
pub trait Validate {
    fn validate(&self) -> Result<(), Errors>;
}

#[doc(hidden)]
pub mod __private {
    pub use crate::walk::probe::{Probe, ViaValidate, ViaWalk};
}
