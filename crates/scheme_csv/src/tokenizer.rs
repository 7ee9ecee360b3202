use csv_core::{ReadFieldResult, Reader};

use crate::dialect::DialectOptions;

const FIELD_BUFFER_SIZE: usize = 1024;

/// Splits single lines into fields.
///
/// Quoted fields come back without their surrounding quotes, with doubled
/// quotes collapsed. Whitespace outside of quotes is kept, except for spaces
/// directly in front of an opening quote, which are dropped.
#[derive(Debug)]
pub struct Tokenizer {
    dialect: DialectOptions,
    reader: Reader,
    /// Buffer holding the field currently being decoded.
    buffer: Vec<u8>,
}

impl Tokenizer {
    pub fn new(dialect: DialectOptions) -> Self {
        Tokenizer {
            dialect,
            reader: dialect.csv_core_reader(),
            buffer: vec![0; FIELD_BUFFER_SIZE],
        }
    }

    /// Split a line (without its line terminator) into fields.
    ///
    /// An empty line has no fields.
    pub fn tokenize(&mut self, line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        if line.is_empty() {
            return fields;
        }

        // Each line is decoded as its own input.
        self.reader.reset();

        let mut input = line.as_bytes();
        let mut field_len = 0;
        let mut field_start = true;

        loop {
            if field_start {
                input = self.skip_padding_before_quote(input);
                field_start = false;
            }

            let (result, bytes_read, bytes_written) =
                self.reader.read_field(input, &mut self.buffer[field_len..]);
            input = &input[bytes_read..];
            field_len += bytes_written;

            match result {
                // Next call gets an empty input, which tells the reader to
                // finish off the last field.
                ReadFieldResult::InputEmpty => (),
                ReadFieldResult::OutputFull => {
                    let new_len = self.buffer.len() * 2;
                    self.buffer.resize(new_len, 0);
                }
                ReadFieldResult::Field { record_end } => {
                    fields.push(String::from_utf8_lossy(&self.buffer[..field_len]).into_owned());
                    field_len = 0;
                    field_start = true;
                    if record_end {
                        break;
                    }
                }
                ReadFieldResult::End => break,
            }
        }

        fields
    }

    /// Skip spaces at the start of a field if a quote follows them.
    ///
    /// The reader only opens a quoted field on the field's first byte.
    fn skip_padding_before_quote<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        if self.dialect.delimiter == b' ' || self.dialect.quote == b' ' {
            return input;
        }

        let spaces = input.iter().take_while(|b| **b == b' ').count();
        if spaces > 0 && input.get(spaces) == Some(&self.dialect.quote) {
            &input[spaces..]
        } else {
            input
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(DialectOptions::default())
    }
}
