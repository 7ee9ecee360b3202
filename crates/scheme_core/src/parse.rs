//! Fallible parsers used to probe a token for each candidate type.
//!
//! Every parser returns `None` when the input can't be represented by the
//! parser's type, letting callers chain attempts with `or_else` instead of
//! relying on errors for control flow.
use std::marker::PhantomData;
use std::str::FromStr;

/// Logic for parsing a string into some type.
pub trait Parser {
    /// The type we'll be producing.
    type Type;

    /// Parse a string into `Type`, returning None if the parse cannot be done.
    fn parse(&mut self, s: &str) -> Option<Self::Type>;
}

/// Case variants of "true" and "false".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoolAliasParser;

impl Parser for BoolAliasParser {
    type Type = bool;
    fn parse(&mut self, s: &str) -> Option<Self::Type> {
        match s {
            "true" | "True" | "TRUE" => Some(true),
            "false" | "False" | "FALSE" => Some(false),
            _ => None,
        }
    }
}

/// "0" and "1" as booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryBoolParser;

impl Parser for BinaryBoolParser {
    type Type = bool;
    fn parse(&mut self, s: &str) -> Option<Self::Type> {
        match s {
            "1" => Some(true),
            "0" => Some(false),
            _ => None,
        }
    }
}

/// Parser that uses the stdlib `FromStr` trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FromStrParser<T: FromStr> {
    _type: PhantomData<T>,
}

impl<T: FromStr> FromStrParser<T> {
    pub const fn new() -> Self {
        FromStrParser { _type: PhantomData }
    }
}

impl<T: FromStr> Parser for FromStrParser<T> {
    type Type = T;
    fn parse(&mut self, s: &str) -> Option<Self::Type> {
        T::from_str(s).ok()
    }
}

pub type Int8Parser = FromStrParser<i8>;
pub type Int16Parser = FromStrParser<i16>;
pub type Int32Parser = FromStrParser<i32>;
pub type Int64Parser = FromStrParser<i64>;

/// Float parser accepting decimal and exponent notation with an optional type
/// suffix.
///
/// A single trailing `f` or `F` suffix is accepted and ignored. Textual
/// specials (`inf`, `NaN`, ...) are rejected; the input must contain at least
/// one digit.
///
/// Values out of range for `T` parse to an infinity rather than failing, so
/// callers can distinguish "not a number" from "too large".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SuffixedFloatParser<T: FromStr> {
    _type: PhantomData<T>,
}

impl<T: FromStr> SuffixedFloatParser<T> {
    pub const fn new() -> Self {
        SuffixedFloatParser { _type: PhantomData }
    }
}

impl<T: FromStr> Parser for SuffixedFloatParser<T> {
    type Type = T;
    fn parse(&mut self, s: &str) -> Option<Self::Type> {
        let s = s
            .strip_suffix(['f', 'F'])
            .unwrap_or(s);

        if !s.bytes().any(|b| b.is_ascii_digit()) {
            return None;
        }

        T::from_str(s).ok()
    }
}

pub type Float32Parser = SuffixedFloatParser<f32>;
pub type Float64Parser = SuffixedFloatParser<f64>;
