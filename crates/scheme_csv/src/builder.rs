use std::fmt;
use std::io;
use std::path::Path;

use scheme_core::datatype::{ColumnSchema, TypeTag};
use scheme_core::datetime::DateTimeFormats;
use scheme_core::header::{HeaderExtents, detect_header_extents};
use scheme_core::ident::make_valid_identifier;
use scheme_core::lattice::narrowest_common_type;
use scheme_core::typify::Typifier;
use scheme_error::Result;
use tracing::{debug, trace, warn};

use crate::filesystem::{FileProvider, LocalFileSystem, count_lines, read_line};
use crate::options::InferOptions;
use crate::tokenizer::Tokenizer;

/// Why a file produced no schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoSchemaReason {
    FileNotFound,
    Io(String),
    /// Zero-byte file.
    EmptyFile,
    /// None of the sampled lines had any fields.
    NoColumns,
    /// The header region covers every sampled row.
    NoDataRows,
}

impl fmt::Display for NoSchemaReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound => write!(f, "file not found"),
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::EmptyFile => write!(f, "no data in file"),
            Self::NoColumns => write!(f, "no columns found in file"),
            Self::NoDataRows => write!(f, "no data rows found after the header"),
        }
    }
}

impl From<io::Error> for NoSchemaReason {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => NoSchemaReason::FileNotFound,
            _ => NoSchemaReason::Io(e.to_string()),
        }
    }
}

/// Outcome of inferring the schema of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferredSchema {
    /// One entry per column, in column order.
    Found(Vec<ColumnSchema>),
    NoSchema(NoSchemaReason),
}

impl InferredSchema {
    pub fn columns(&self) -> Option<&[ColumnSchema]> {
        match self {
            Self::Found(cols) => Some(cols),
            Self::NoSchema(_) => None,
        }
    }

    pub fn into_columns(self) -> Option<Vec<ColumnSchema>> {
        match self {
            Self::Found(cols) => Some(cols),
            Self::NoSchema(_) => None,
        }
    }

    pub fn no_schema_reason(&self) -> Option<&NoSchemaReason> {
        match self {
            Self::Found(_) => None,
            Self::NoSchema(reason) => Some(reason),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Rows read from the start of a file.
#[derive(Debug, Default)]
struct Sample {
    tokens: Vec<Vec<String>>,
    types: Vec<Vec<TypeTag>>,
}

/// Infers column names and types of delimited text files.
#[derive(Debug)]
pub struct SchemaBuilder<P: FileProvider> {
    provider: P,
    formats: DateTimeFormats,
    /// Header rows found by the most recent call.
    header_extents: HeaderExtents,
}

impl SchemaBuilder<LocalFileSystem> {
    /// Builder reading from the local file system, using the default date/time
    /// patterns.
    pub fn local() -> Self {
        Self::new(LocalFileSystem, DateTimeFormats::new())
    }
}

impl<P: FileProvider> SchemaBuilder<P> {
    pub fn new(provider: P, formats: DateTimeFormats) -> Self {
        SchemaBuilder {
            provider,
            formats,
            header_extents: HeaderExtents::NONE,
        }
    }

    pub fn formats(&self) -> &DateTimeFormats {
        &self.formats
    }

    /// Registry used for date/time matching. Changes apply to later calls.
    pub fn formats_mut(&mut self) -> &mut DateTimeFormats {
        &mut self.formats
    }

    /// Header rows detected (or accepted from hints) by the most recent call.
    pub fn header_extents(&self) -> HeaderExtents {
        self.header_extents
    }

    /// Infer the schema of a file with the default options.
    pub fn schema(&mut self, path: impl AsRef<Path>) -> Result<InferredSchema> {
        self.schema_with_options(path, &InferOptions::default())
    }

    /// Infer the schema of a file.
    ///
    /// Problems with the file itself are reported as
    /// `InferredSchema::NoSchema`. Errors are only returned for broken
    /// invariants.
    pub fn schema_with_options(
        &mut self,
        path: impl AsRef<Path>,
        options: &InferOptions,
    ) -> Result<InferredSchema> {
        let path = path.as_ref();

        let (schema, extents) = match self.infer(path, options)? {
            Ok(found) => found,
            Err(reason) => {
                warn!(path = %path.display(), %reason, "no schema inferred");
                (InferredSchema::NoSchema(reason), HeaderExtents::NONE)
            }
        };

        self.header_extents = extents;

        Ok(schema)
    }

    /// Inner result is `Err` when the file doesn't produce a schema.
    fn infer(
        &self,
        path: &Path,
        options: &InferOptions,
    ) -> Result<Result<(InferredSchema, HeaderExtents), NoSchemaReason>> {
        let total_lines = match count_lines(&self.provider, path) {
            Ok(n) => n,
            Err(e) => return Ok(Err(e.into())),
        };
        if total_lines == 0 {
            return Ok(Err(NoSchemaReason::EmptyFile));
        }

        let sample = match self.read_sample(path, options) {
            Ok(sample) => sample,
            Err(e) => return Ok(Err(e.into())),
        };

        let num_cols = sample.types.iter().map(|row| row.len()).max().unwrap_or(0);
        if num_cols == 0 {
            return Ok(Err(NoSchemaReason::NoColumns));
        }

        let extents = Self::header_extents_for(&sample, total_lines, options);
        debug!(%extents, "header extents");

        let data_start = extents.last.map(|last| last + 1).unwrap_or(0);
        let data_rows = &sample.types[data_start..];
        if data_rows.is_empty() {
            return Ok(Err(NoSchemaReason::NoDataRows));
        }

        let data_cols = data_rows.iter().map(|row| row.len()).max().unwrap_or(0);
        if data_cols == 0 {
            return Ok(Err(NoSchemaReason::NoColumns));
        }

        let names = match (extents.first, extents.last) {
            (Some(first), Some(last)) => merge_header_rows(&sample.tokens[first..=last]),
            _ => Vec::new(),
        };

        let mut columns = Vec::with_capacity(data_cols);
        for col_idx in 0..data_cols {
            // Short rows don't contribute to columns they don't have.
            let tags = data_rows.iter().filter_map(|row| row.get(col_idx).copied());
            let datatype = narrowest_common_type(tags)?;

            let name = match names.get(col_idx) {
                Some(name) => name.clone(),
                None => format!("X{}", col_idx + 1),
            };

            debug!(column = col_idx, %name, %datatype, "inferred column");
            columns.push(ColumnSchema::new(name, datatype));
        }

        Ok(Ok((InferredSchema::Found(columns), extents)))
    }

    /// Read, tokenize and typify lines from the start of the file.
    fn read_sample(&self, path: &Path, options: &InferOptions) -> io::Result<Sample> {
        let sample_size = options.sample_size();
        debug!(path = %path.display(), sample_size, "reading sample");

        let mut reader = self.provider.open(path)?;
        let mut tokenizer = Tokenizer::new(options.dialect);
        let typifier = Typifier::new(options.typify, &self.formats);

        let mut sample = Sample::default();
        let mut buf = Vec::new();

        while sample.tokens.len() < sample_size {
            let line = match read_line(&mut reader, &mut buf)? {
                Some(line) => line,
                None => break,
            };

            let tokens = tokenizer.tokenize(&line);
            let types: Vec<_> = tokens.iter().map(|t| typifier.typify_tag(t)).collect();
            trace!(row = sample.tokens.len(), ?types, "typified row");

            sample.tokens.push(tokens);
            sample.types.push(types);
        }

        Ok(sample)
    }

    /// Use the header hints if they're usable, otherwise detect the header.
    fn header_extents_for(
        sample: &Sample,
        total_lines: usize,
        options: &InferOptions,
    ) -> HeaderExtents {
        if let Some((first, last)) = options.header_hints() {
            if first <= last && last < total_lines && last < sample.types.len() {
                return HeaderExtents::new(first, last);
            }
            warn!(
                first,
                last,
                total_lines,
                sampled = sample.types.len(),
                "ignoring invalid header row hints"
            );
        }

        detect_header_extents(&sample.types)
    }
}

/// Join header rows column by column with `_` and turn the results into
/// identifiers.
fn merge_header_rows(rows: &[Vec<String>]) -> Vec<String> {
    let mut merged = match rows.first() {
        Some(first) => first.clone(),
        None => return Vec::new(),
    };

    for row in &rows[1..] {
        for (idx, field) in row.iter().enumerate() {
            if merged.len() <= idx {
                merged.push(String::new());
            }
            merged[idx].push('_');
            merged[idx].push_str(field);
        }
    }

    merged.iter().map(|name| make_valid_identifier(name)).collect()
}
