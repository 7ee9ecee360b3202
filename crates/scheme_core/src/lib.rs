//! Type inference for individual tokens and rows of delimited text.
//!
//! Tokens are classified with a [`typify::Typifier`], per-row classifications
//! are reduced per column with [`lattice::narrowest_common_type`], and the
//! header region of a sample is found with [`header::detect_header_extents`].
pub mod canonical;
pub mod datatype;
pub mod datetime;
pub mod header;
pub mod ident;
pub mod lattice;
pub mod parse;
pub mod similarity;
pub mod typify;

pub use datatype::{ColumnSchema, TypeTag, TypedValue};
pub use datetime::{DateTimeFormat, DateTimeFormats, Locale};
pub use header::HeaderExtents;
pub use typify::{Typifier, TypifyOptions};
