use std::fmt;

use scheme_error::{Result, SchemeError};

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DialectOptions {
    /// Delimiter character.
    pub delimiter: u8,
    /// Quote character.
    pub quote: u8,
}

impl Default for DialectOptions {
    fn default() -> Self {
        DialectOptions {
            delimiter: b',',
            quote: b'"',
        }
    }
}

impl fmt::Debug for DialectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialectOptions")
            .field("delimiter", &(self.delimiter as char))
            .field("quote", &(self.quote as char))
            .finish()
    }
}

impl DialectOptions {
    /// Dialect with a custom delimiter and the default quote.
    pub fn with_delimiter(delimiter: u8) -> Self {
        DialectOptions {
            delimiter,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.delimiter == self.quote {
            return Err(SchemeError::new("Delimiter and quote cannot be the same character")
                .with_field("delimiter", self.delimiter as char));
        }
        if matches!(self.delimiter, b'\n' | b'\r') {
            return Err(SchemeError::new("Delimiter cannot be a line terminator"));
        }
        Ok(())
    }

    /// Reader for the contents of a single line.
    ///
    /// Line terminators are stripped before tokenizing, so only `\n` ends a
    /// record. A stray `\r` stays part of its field.
    pub(crate) fn csv_core_reader(&self) -> csv_core::Reader {
        csv_core::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .quote(self.quote)
            .terminator(csv_core::Terminator::Any(b'\n'))
            .build()
    }
}
