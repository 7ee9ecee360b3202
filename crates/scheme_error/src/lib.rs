//! Error type shared by all scheme crates.
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt;

pub type Result<T, E = SchemeError> = std::result::Result<T, E>;

/// Helper macro for returning an error for stuff that hasn't been
/// implemented yet.
#[macro_export]
macro_rules! not_implemented {
    ($($arg:tt)+) => {{
        let msg = format!($($arg)+);
        return Err($crate::SchemeError::new(format!("Not yet implemented: {msg}")));
    }};
}

#[derive(Debug)]
pub struct SchemeError {
    inner: Box<SchemeErrorInner>,
}

#[derive(Debug)]
struct SchemeErrorInner {
    /// Message for the error.
    msg: String,
    /// Source of the error.
    source: Option<Box<dyn Error + Send + Sync>>,
    /// Extra key/value pairs describing the error.
    fields: Vec<(String, String)>,
    /// Captured backtrace, only present when enabled through `RUST_BACKTRACE`.
    backtrace: Backtrace,
}

impl SchemeError {
    pub fn new(msg: impl Into<String>) -> Self {
        SchemeError {
            inner: Box::new(SchemeErrorInner {
                msg: msg.into(),
                source: None,
                fields: Vec::new(),
                backtrace: Backtrace::capture(),
            }),
        }
    }

    pub fn with_source(msg: impl Into<String>, source: Box<dyn Error + Send + Sync>) -> Self {
        let mut err = Self::new(msg);
        err.inner.source = Some(source);
        err
    }

    /// Attach an additional field to the error.
    pub fn with_field(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.inner.fields.push((key.into(), value.to_string()));
        self
    }

    pub fn get_msg(&self) -> &str {
        &self.inner.msg
    }

    /// Get the value for a field by its key.
    pub fn get_field(&self, key: &str) -> Option<&str> {
        self.inner
            .fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_backtrace(&self) -> Option<&Backtrace> {
        match self.inner.backtrace.status() {
            BacktraceStatus::Captured => Some(&self.inner.backtrace),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SchemeError {
    fn from(value: std::io::Error) -> Self {
        Self::with_source("IO error", Box::new(value))
    }
}

impl fmt::Display for SchemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner.msg)?;

        for (key, value) in &self.inner.fields {
            write!(f, "\n  {key}: {value}")?;
        }

        if let Some(source) = &self.inner.source {
            write!(f, "\nError source: {source}")?;
        }

        if let Some(backtrace) = self.get_backtrace() {
            write!(f, "\nBacktrace: {backtrace}")?;
        }

        Ok(())
    }
}

impl Error for SchemeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.inner.source.as_ref().map(|e| e.as_ref() as _)
    }
}

/// An extension trait for adding context to errors.
pub trait ResultExt<T, E> {
    /// Wrap an error with a static context string.
    fn context(self, msg: &'static str) -> Result<T, SchemeError>;

    /// Wrap an error with a context string generated from a function.
    fn context_fn<F>(self, f: F) -> Result<T, SchemeError>
    where
        F: Fn() -> String;
}

impl<T, E: Error + Send + Sync + 'static> ResultExt<T, E> for std::result::Result<T, E> {
    fn context(self, msg: &'static str) -> Result<T, SchemeError> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(SchemeError::with_source(msg, Box::new(e))),
        }
    }

    fn context_fn<F>(self, f: F) -> Result<T, SchemeError>
    where
        F: Fn() -> String,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(SchemeError::with_source(f(), Box::new(e))),
        }
    }
}
