//! Registry of date/time patterns consulted when classifying tokens.
//!
//! Patterns are tried in insertion order and the first one that matches the
//! whole token wins. A registry created with [`DateTimeFormats::new`] is
//! populated with the default patterns the first time it is read or
//! mutated.
//!
//! Reads only need `&self` and the registry is `Sync`, so one registry can
//! back concurrent inference. Mutation needs `&mut self`; callers that want
//! to mutate a registry shared across threads must wrap it in a lock of
//! their choosing.
mod locale;
mod pattern;

use std::fmt;
use std::io::BufRead;

use chrono::NaiveDateTime;
use once_cell::sync::OnceCell;
use scheme_error::{Result, ResultExt, SchemeError};
use tracing::warn;

pub use locale::Locale;
pub use pattern::translate_pattern;

/// Default patterns, one `LOCALE "pattern"` entry per line.
const DEFAULT_FORMATS: &str = r#"en_IE "dd.MM.yyyy HH:mm:ss"
en_IE "yyyy-MM-dd HH:mm:ss"
en_IE "yyyy-MM-dd'T'HH:mm:ss"
en_IE "yyyy/MM/dd HH:mm:ss"
en_IE "yyyy-MM-dd HH:mm"
en_IE "MM/dd/yyyy HH:mm:ss"
en_IE "MM/dd/yyyy HH:mm"
en_IE "MM/dd/yyyy hh:mm:ss a"
en_IE "dd-MMM-yyyy HH:mm:ss"
en_IE "dd/MM/yyyy HH:mm:ss"
en_IE "dd/MM/yyyy HH:mm"
"#;

/// A single registered pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeFormat {
    locale: Locale,
    /// Pattern as registered.
    pattern: String,
    /// Chrono format string the pattern translates to.
    chrono_format: String,
}

impl DateTimeFormat {
    pub fn try_new(locale: Locale, pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(SchemeError::new("Date/time pattern cannot be empty"));
        }
        if locale.language.is_empty() {
            return Err(SchemeError::new("Date/time locale cannot be empty")
                .with_field("pattern", pattern));
        }

        let chrono_format = translate_pattern(pattern)?;

        Ok(DateTimeFormat {
            locale,
            pattern: pattern.to_string(),
            chrono_format,
        })
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Parse a token with this format. The entire token must match.
    pub fn parse(&self, s: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(s, &self.chrono_format).ok()
    }
}

impl fmt::Display for DateTimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\"", self.locale, self.pattern)
    }
}

#[derive(Debug, Default)]
pub struct DateTimeFormats {
    formats: OnceCell<Vec<DateTimeFormat>>,
}

impl DateTimeFormats {
    /// Registry that fills itself with the defaults on first use.
    pub fn new() -> Self {
        DateTimeFormats {
            formats: OnceCell::new(),
        }
    }

    /// Registry without any patterns.
    pub fn empty() -> Self {
        DateTimeFormats {
            formats: OnceCell::with_value(Vec::new()),
        }
    }

    /// All registered patterns, in the order they're tried.
    pub fn get(&self) -> &[DateTimeFormat] {
        self.formats.get_or_init(default_formats)
    }

    /// The registered pattern strings.
    pub fn strings(&self) -> Vec<&str> {
        self.get().iter().map(|f| f.pattern()).collect()
    }

    pub fn len(&self) -> usize {
        self.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.get().is_empty()
    }

    /// Append a pattern to the end of the registry.
    pub fn add(&mut self, locale: Locale, pattern: &str) -> Result<()> {
        let format = DateTimeFormat::try_new(locale, pattern)?;
        self.formats_mut().push(format);
        Ok(())
    }

    /// Remove the pattern at `index`, returning it if it existed.
    pub fn remove(&mut self, index: usize) -> Option<DateTimeFormat> {
        let formats = self.formats_mut();
        if index >= formats.len() {
            return None;
        }
        Some(formats.remove(index))
    }

    /// Read `LOCALE "pattern"` lines and append each entry.
    ///
    /// Entries with an invalid locale are skipped. Returns the number of
    /// patterns added.
    pub fn load(&mut self, reader: impl BufRead) -> Result<usize> {
        let mut added = 0;
        for (idx, line) in reader.lines().enumerate() {
            let line = line.context("Failed to read date/time pattern line")?;
            if line.trim().is_empty() {
                continue;
            }

            let (locale, pattern) = split_entry(&line)
                .ok_or_else(|| {
                    SchemeError::new("Malformed date/time pattern entry")
                        .with_field("line", idx + 1)
                        .with_field("entry", &line)
                })?;

            let locale = match locale.parse::<Locale>() {
                Ok(locale) => locale,
                Err(e) => {
                    warn!(%locale, line = idx + 1, error = %e, "skipping date/time pattern with invalid locale");
                    continue;
                }
            };

            self.add(locale, pattern)?;
            added += 1;
        }

        Ok(added)
    }

    /// Parse a token with the first matching pattern.
    pub fn parse(&self, s: &str) -> Option<NaiveDateTime> {
        self.get().iter().find_map(|format| format.parse(s))
    }

    fn formats_mut(&mut self) -> &mut Vec<DateTimeFormat> {
        self.formats.get_or_init(default_formats);
        self.formats
            .get_mut()
            .expect("formats to be initialized")
    }
}

/// Split `LOCALE "pattern"` into its locale and pattern parts.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    let (locale, rest) = line.split_once(' ')?;
    let pattern = rest.trim().strip_prefix('"')?.strip_suffix('"')?;
    Some((locale, pattern))
}

fn default_formats() -> Vec<DateTimeFormat> {
    let mut registry = DateTimeFormats::empty();
    if let Err(e) = registry.load(DEFAULT_FORMATS.as_bytes()) {
        // Only reachable if the built-in list itself is malformed.
        warn!(error = %e, "failed to load default date/time patterns");
    }
    registry.formats.take().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: usize = 11;

    fn en_ie() -> Locale {
        Locale::new("en", Some("IE"), None)
    }

    #[test]
    fn defaults_populated_lazily() {
        let formats = DateTimeFormats::new();
        assert_eq!(N, formats.len());

        let strings = formats.strings();
        assert_eq!("dd.MM.yyyy HH:mm:ss", strings[0]);
        assert_eq!("dd/MM/yyyy HH:mm", strings[N - 1]);
        assert_eq!(&en_ie(), formats.get()[0].locale());
    }

    #[test]
    fn add_then_remove() {
        let mut formats = DateTimeFormats::new();

        formats.add(Locale::new("en", None, None), "dd-MM-yyyy HH.mm.ss").unwrap();
        formats.add(en_ie(), "dd-MM-yyyy HH.mm.ss").unwrap();
        formats
            .add(Locale::new("en", Some("IE"), Some("??")), "dd-MM-yyyy HH.mm.ss")
            .unwrap();
        assert_eq!(N + 3, formats.len());
        assert_eq!(Some("??"), formats.get()[N + 2].locale().variant.as_deref());

        for _ in 0..3 {
            assert!(formats.remove(N).is_some());
        }
        assert_eq!(N, formats.len());
        assert_eq!("dd/MM/yyyy HH:mm", formats.get()[N - 1].pattern());

        assert!(formats.remove(N).is_none());
    }

    #[test]
    fn add_rejects_bad_input() {
        let mut formats = DateTimeFormats::new();

        assert!(formats.add(en_ie(), "").is_err());
        assert!(formats.add(Locale::new("", None, None), "dd/MM/yyyy HH:mm").is_err());
        assert!(formats.add(en_ie(), "yyyy-MM-dd QQQ").is_err());
        assert_eq!(N, formats.len());
    }

    #[test]
    fn mutation_initializes_defaults_first() {
        let mut formats = DateTimeFormats::new();
        let removed = formats.remove(0).unwrap();
        assert_eq!("dd.MM.yyyy HH:mm:ss", removed.pattern());
        assert_eq!(N - 1, formats.len());
    }

    #[test]
    fn empty_registry_never_populates() {
        let mut formats = DateTimeFormats::empty();
        assert!(formats.is_empty());
        assert!(formats.parse("2020-01-01 10:00:00").is_none());

        formats.add(en_ie(), "yyyy-MM-dd HH:mm:ss").unwrap();
        assert_eq!(1, formats.len());
        assert!(formats.parse("2020-01-01 10:00:00").is_some());
    }

    #[test]
    fn parse_first_match() {
        let formats = DateTimeFormats::new();

        let dt = formats.parse("09/22/1994 16:45").unwrap();
        assert_eq!("1994-09-22 16:45:00", dt.to_string());

        assert!(formats.parse("22.09.1994 16:45:10").is_some());
        assert!(formats.parse("1994-09-22T16:45:10").is_some());
        assert!(formats.parse("22-Sep-1994 16:45:10").is_some());
        assert!(formats.parse("09/22/1994 04:45:10 PM").is_some());

        // Date without time doesn't count.
        assert!(formats.parse("1994-09-22").is_none());
        assert!(formats.parse("09b22b1994 16b45").is_none());
    }

    #[test]
    fn load_pattern_file() {
        let input = "en_US \"yyyy.MM.dd HH:mm\"\n\nxx1 \"HH:mm yyyy\"\nfr_FR \"dd MM yyyy HH:mm\"\n";

        let mut formats = DateTimeFormats::empty();
        let added = formats.load(input.as_bytes()).unwrap();

        assert_eq!(2, added);
        assert_eq!(vec!["yyyy.MM.dd HH:mm", "dd MM yyyy HH:mm"], formats.strings());
        assert_eq!("fr_FR \"dd MM yyyy HH:mm\"", formats.get()[1].to_string());
    }

    #[test]
    fn load_rejects_malformed_line() {
        let mut formats = DateTimeFormats::empty();
        assert!(formats.load("en_US yyyy".as_bytes()).is_err());
    }
}
