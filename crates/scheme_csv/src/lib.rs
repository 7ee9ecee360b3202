//! Schema inference for delimited text files.
//!
//! The first rows of a file are tokenized and classified, the header rows are
//! located, and each column is assigned the narrowest type fitting all of its
//! values.
pub mod builder;
pub mod dialect;
pub mod filesystem;
pub mod options;
pub mod tokenizer;

use std::path::Path;

pub use builder::{InferredSchema, NoSchemaReason, SchemaBuilder};
pub use dialect::DialectOptions;
pub use filesystem::{FileProvider, LocalFileSystem, MemoryFileSystem};
pub use options::InferOptions;
use scheme_error::Result;
pub use tokenizer::Tokenizer;

/// Infer the schema of a local file using default options and date/time
/// patterns.
pub fn schema(path: impl AsRef<Path>) -> Result<InferredSchema> {
    SchemaBuilder::local().schema(path)
}
