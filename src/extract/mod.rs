//! Response field extraction by path.
//!
//! A [`FieldMapping`] names an output and a path into a response body.
//! Paths are dot-separated; a segment may carry bracketed indices
//! (`user.tags[0]`, `matrix[1][0]`), and a purely numeric segment indexes
//! into an array (`user.tags.0`).
//!
//! Missing values are lenient: a mapping whose path does not resolve is
//! simply absent from the output. Only malformed mappings are errors.

mod error;
mod fields;
mod path;


pub use error::ExtractError;
pub use fields::{FieldMapping, extract, extract_fields, validate_mappings};
pub use path::{FieldPath, PathStep};
