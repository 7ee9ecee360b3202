use std::fmt;
use std::str::FromStr;

use scheme_error::{Result, SchemeError};

/// Locale attached to a date/time pattern, written as `ll`, `ll_CC` or
/// `ll_CC_VARIANT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    pub language: String,
    pub country: Option<String>,
    pub variant: Option<String>,
}

impl Locale {
    /// Create a locale without validating its parts.
    pub fn new(
        language: impl Into<String>,
        country: Option<&str>,
        variant: Option<&str>,
    ) -> Self {
        Locale {
            language: language.into(),
            country: country.map(|s| s.to_string()),
            variant: variant.map(|s| s.to_string()),
        }
    }

    /// Check that the language is 2-3 ASCII letters and the country, if
    /// present, is 2 ASCII letters or 3 digits.
    pub fn validate(&self) -> Result<()> {
        let lang_ok = (2..=3).contains(&self.language.len())
            && self.language.bytes().all(|b| b.is_ascii_alphabetic());
        if !lang_ok {
            return Err(SchemeError::new("Invalid locale language").with_field("locale", self));
        }

        if let Some(country) = &self.country {
            let country_ok = (country.len() == 2
                && country.bytes().all(|b| b.is_ascii_alphabetic()))
                || (country.len() == 3 && country.bytes().all(|b| b.is_ascii_digit()));
            if !country_ok {
                return Err(SchemeError::new("Invalid locale country").with_field("locale", self));
            }
        }

        Ok(())
    }
}

impl FromStr for Locale {
    type Err = SchemeError;

    /// Parse and validate a locale string.
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, '_');
        let language = parts.next().unwrap_or_default();
        let country = parts.next();
        let variant = parts.next();

        let locale = Locale::new(language, country, variant);
        locale.validate()?;

        Ok(locale)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.language)?;
        if let Some(country) = &self.country {
            write!(f, "_{country}")?;
        }
        if let Some(variant) = &self.variant {
            write!(f, "_{variant}")?;
        }
        Ok(())
    }
}
