use std::collections::HashMap;
use std::sync::LazyLock;

use scheme_core::typify::TypifyOptions;
use scheme_error::{Result, ResultExt, SchemeError};

use crate::dialect::DialectOptions;

pub const DEFAULT_N_TEST_ROWS: usize = 35;

/// Options for a single schema inference run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InferOptions {
    /// Number of rows to base the inference on. The actual sample is a bit
    /// larger to leave room for header rows.
    pub n_test_rows: usize,
    /// Flags passed to the typifier.
    pub typify: TypifyOptions,
    /// First header row, 0-based. Only used if `last_header_row` is also set
    /// and the pair is valid for the file.
    pub first_header_row: Option<usize>,
    /// Last header row, 0-based, inclusive.
    pub last_header_row: Option<usize>,
    pub dialect: DialectOptions,
}

impl Default for InferOptions {
    fn default() -> Self {
        InferOptions {
            n_test_rows: DEFAULT_N_TEST_ROWS,
            typify: TypifyOptions::default(),
            first_header_row: None,
            last_header_row: None,
            dialect: DialectOptions::default(),
        }
    }
}

impl InferOptions {
    /// Number of lines read from the start of the file.
    ///
    /// At least 7 rows are needed to make a reasonable guess, and 10 more are
    /// read to leave room for header rows.
    pub fn sample_size(&self) -> usize {
        usize::max(7, self.n_test_rows) + 10
    }

    pub fn with_header_rows(mut self, first: usize, last: usize) -> Self {
        self.first_header_row = Some(first);
        self.last_header_row = Some(last);
        self
    }

    /// Header row hints, if both ends were provided.
    pub fn header_hints(&self) -> Option<(usize, usize)> {
        Some((self.first_header_row?, self.last_header_row?))
    }

    /// Set an option by name from its text form.
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let func = setting_functions(name)?;
        (func.set)(value, self)
    }

    /// Get the text form of an option by name.
    pub fn get(&self, name: &str) -> Result<String> {
        let func = setting_functions(name)?;
        Ok((func.get)(self))
    }

    /// Restore an option to its default.
    pub fn reset(&mut self, name: &str) -> Result<()> {
        let func = setting_functions(name)?;
        let def = (func.get)(&Self::default());
        (func.set)(&def, self)
    }

    /// Names of all options, sorted.
    pub fn setting_names() -> Vec<&'static str> {
        let mut names: Vec<_> = GET_SET_FUNCTIONS.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn describe(name: &str) -> Result<&'static str> {
        Ok(setting_functions(name)?.description)
    }
}

fn setting_functions(name: &str) -> Result<&'static SettingFunctions> {
    GET_SET_FUNCTIONS
        .get(name)
        .ok_or_else(|| SchemeError::new(format!("Missing setting for '{name}'")))
}

struct SettingFunctions {
    description: &'static str,
    set: fn(value: &str, opts: &mut InferOptions) -> Result<()>,
    get: fn(opts: &InferOptions) -> String,
}

impl SettingFunctions {
    const fn new<S: InferSetting>() -> Self {
        SettingFunctions {
            description: S::DESCRIPTION,
            set: S::set_from_str as _,
            get: S::get_as_string as _,
        }
    }
}

fn insert_setting<S: InferSetting>(map: &mut HashMap<&'static str, SettingFunctions>) {
    if map.insert(S::NAME, SettingFunctions::new::<S>()).is_some() {
        panic!("Duplicate settings names: {}", S::NAME);
    }
}

static GET_SET_FUNCTIONS: LazyLock<HashMap<&'static str, SettingFunctions>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    insert_setting::<NTestRows>(&mut map);
    insert_setting::<Bool01>(&mut map);
    insert_setting::<CommonTypes>(&mut map);
    insert_setting::<PostfixFL>(&mut map);
    insert_setting::<ParseDates>(&mut map);
    insert_setting::<FirstHeaderRow>(&mut map);
    insert_setting::<LastHeaderRow>(&mut map);
    insert_setting::<Delimiter>(&mut map);

    map
});

pub trait InferSetting: Sync + Send + 'static {
    const NAME: &'static str;
    const DESCRIPTION: &'static str;

    fn set_from_str(value: &str, opts: &mut InferOptions) -> Result<()>;
    fn get_as_string(opts: &InferOptions) -> String;
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim() {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" => Ok(false),
        other => Err(SchemeError::new(format!(
            "Invalid boolean value '{other}' for setting '{name}'"
        ))),
    }
}

fn parse_usize(name: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse::<usize>()
        .context_fn(|| format!("Invalid integer value '{value}' for setting '{name}'"))
}

/// Optional row index, with "none" or an empty string clearing it.
fn parse_row_index(name: &str, value: &str) -> Result<Option<usize>> {
    match value.trim() {
        "" | "none" => Ok(None),
        v => parse_usize(name, v).map(Some),
    }
}

fn row_index_string(v: Option<usize>) -> String {
    match v {
        Some(v) => v.to_string(),
        None => "none".to_string(),
    }
}

pub struct NTestRows;

impl InferSetting for NTestRows {
    const NAME: &'static str = "n_test_rows";
    const DESCRIPTION: &'static str = "Number of rows used to infer column types";

    fn set_from_str(value: &str, opts: &mut InferOptions) -> Result<()> {
        let val = parse_usize(Self::NAME, value)?;
        if val == 0 {
            return Err(SchemeError::new("Number of test rows cannot be zero"));
        }
        opts.n_test_rows = val;
        Ok(())
    }

    fn get_as_string(opts: &InferOptions) -> String {
        opts.n_test_rows.to_string()
    }
}

pub struct Bool01;

impl InferSetting for Bool01 {
    const NAME: &'static str = "bool01";
    const DESCRIPTION: &'static str = "Interpret \"0\" and \"1\" as booleans";

    fn set_from_str(value: &str, opts: &mut InferOptions) -> Result<()> {
        opts.typify.bool01 = parse_bool(Self::NAME, value)?;
        Ok(())
    }

    fn get_as_string(opts: &InferOptions) -> String {
        opts.typify.bool01.to_string()
    }
}

pub struct CommonTypes;

impl InferSetting for CommonTypes {
    const NAME: &'static str = "common_types";
    const DESCRIPTION: &'static str =
        "Only infer booleans, 64-bit floats, date/times and strings";

    fn set_from_str(value: &str, opts: &mut InferOptions) -> Result<()> {
        opts.typify.common_types = parse_bool(Self::NAME, value)?;
        Ok(())
    }

    fn get_as_string(opts: &InferOptions) -> String {
        opts.typify.common_types.to_string()
    }
}

pub struct PostfixFL;

impl InferSetting for PostfixFL {
    const NAME: &'static str = "postfix_fl";
    const DESCRIPTION: &'static str = "Accept 'L' and 'F' suffixes on longs and floats";

    fn set_from_str(value: &str, opts: &mut InferOptions) -> Result<()> {
        opts.typify.postfix_fl = parse_bool(Self::NAME, value)?;
        Ok(())
    }

    fn get_as_string(opts: &InferOptions) -> String {
        opts.typify.postfix_fl.to_string()
    }
}

pub struct ParseDates;

impl InferSetting for ParseDates {
    const NAME: &'static str = "parse_dates";
    const DESCRIPTION: &'static str = "Match values against the registered date/time patterns";

    fn set_from_str(value: &str, opts: &mut InferOptions) -> Result<()> {
        opts.typify.parse_dates = parse_bool(Self::NAME, value)?;
        Ok(())
    }

    fn get_as_string(opts: &InferOptions) -> String {
        opts.typify.parse_dates.to_string()
    }
}

pub struct FirstHeaderRow;

impl InferSetting for FirstHeaderRow {
    const NAME: &'static str = "first_header_row";
    const DESCRIPTION: &'static str = "First header row (0-based), or 'none' to detect";

    fn set_from_str(value: &str, opts: &mut InferOptions) -> Result<()> {
        opts.first_header_row = parse_row_index(Self::NAME, value)?;
        Ok(())
    }

    fn get_as_string(opts: &InferOptions) -> String {
        row_index_string(opts.first_header_row)
    }
}

pub struct LastHeaderRow;

impl InferSetting for LastHeaderRow {
    const NAME: &'static str = "last_header_row";
    const DESCRIPTION: &'static str = "Last header row (0-based, inclusive), or 'none' to detect";

    fn set_from_str(value: &str, opts: &mut InferOptions) -> Result<()> {
        opts.last_header_row = parse_row_index(Self::NAME, value)?;
        Ok(())
    }

    fn get_as_string(opts: &InferOptions) -> String {
        row_index_string(opts.last_header_row)
    }
}

pub struct Delimiter;

impl InferSetting for Delimiter {
    const NAME: &'static str = "delimiter";
    const DESCRIPTION: &'static str = "Single ASCII character separating fields";

    fn set_from_str(value: &str, opts: &mut InferOptions) -> Result<()> {
        let delimiter = match value.as_bytes() {
            [b] if b.is_ascii() => *b,
            _ => {
                return Err(SchemeError::new("Delimiter must be a single ASCII character")
                    .with_field("value", value));
            }
        };

        let dialect = DialectOptions {
            delimiter,
            ..opts.dialect
        };
        dialect.validate()?;

        opts.dialect = dialect;
        Ok(())
    }

    fn get_as_string(opts: &InferOptions) -> String {
        (opts.dialect.delimiter as char).to_string()
    }
}
