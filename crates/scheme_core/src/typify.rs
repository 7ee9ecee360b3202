//! Classification of single tokens into the narrowest fitting type.
use std::borrow::Cow;

use crate::canonical::{float32_text, float64_text};
use crate::datatype::{TypeTag, TypedValue};
use crate::datetime::DateTimeFormats;
use crate::parse::{
    BinaryBoolParser,
    BoolAliasParser,
    Float32Parser,
    Float64Parser,
    Int8Parser,
    Int16Parser,
    Int32Parser,
    Int64Parser,
    Parser,
};

/// Characters that never show up in a number we'd accept. A token containing
/// any of these skips numeric parsing entirely.
const STRING_ONLY_CHARS: [char; 30] = [
    ' ', ':', 'n', 'a', 't', 'r', 'o', 'C', 'i', 'P', 'D', 's', 'c', 'S', 'u', 'A', 'm', '=', 'O',
    '\\', 'd', 'p', 'T', 'M', 'g', 'I', 'b', 'U', 'h', 'H',
];

/// Policy flags for [`Typifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypifyOptions {
    /// Treat "0" and "1" as booleans.
    pub bool01: bool,
    /// Only produce Boolean, Float64, DateTime and String (plus Empty).
    pub common_types: bool,
    /// Accept `l`/`L` and `f`/`F` suffixes on integers and floats.
    pub postfix_fl: bool,
    /// Try the date/time registry before falling back to String.
    pub parse_dates: bool,
}

impl Default for TypifyOptions {
    fn default() -> Self {
        TypifyOptions {
            bool01: false,
            common_types: false,
            postfix_fl: false,
            parse_dates: true,
        }
    }
}

/// Classifies raw tokens according to a set of policy flags.
///
/// Never fails. Anything that can't be narrowed comes back as `String` with
/// the input unchanged.
#[derive(Debug, Clone, Copy)]
pub struct Typifier<'a> {
    options: TypifyOptions,
    formats: &'a DateTimeFormats,
}

impl<'a> Typifier<'a> {
    pub fn new(options: TypifyOptions, formats: &'a DateTimeFormats) -> Self {
        Typifier { options, formats }
    }

    pub fn typify(&self, data: &str) -> TypedValue {
        if data.is_empty() {
            return TypedValue::empty();
        }

        let trimmed = trim_control(data);
        if trimmed.is_empty() {
            return TypedValue::new(TypeTag::String, data);
        }

        let s = strip_matching_quotes(trimmed);
        if s.is_empty() {
            return TypedValue::new(TypeTag::String, data);
        }

        if !self.options.common_types {
            if let Some(b) = BoolAliasParser.parse(s) {
                return bool_value(b);
            }
        }

        if !s.contains(STRING_ONLY_CHARS) {
            if let Some(value) = self.typify_numeric(s) {
                return value;
            }
        }

        if self.options.common_types {
            if let Some(b) = BoolAliasParser.parse(s) {
                return bool_value(b);
            }
        }

        if !self.options.common_types && s.chars().count() == 1 {
            return TypedValue::new(TypeTag::Character, s);
        }

        if self.options.parse_dates && self.formats.parse(s).is_some() {
            return TypedValue::new(TypeTag::DateTime, s);
        }

        TypedValue::new(TypeTag::String, data)
    }

    /// Tag only, for callers that don't need the canonical text.
    pub fn typify_tag(&self, data: &str) -> TypeTag {
        self.typify(data).tag
    }

    /// Numeric attempts on a trimmed, unquoted token.
    ///
    /// Returns `None` when the token should continue down the non-numeric
    /// checks.
    fn typify_numeric(&self, s: &str) -> Option<TypedValue> {
        if self.options.bool01 {
            if let Some(b) = BinaryBoolParser.parse(s) {
                return Some(bool_value(b));
            }
        }

        let float_suffix = s.ends_with(['f', 'F']);
        let float_allowed = self.options.postfix_fl || !float_suffix;
        let has_decimal_point = s.contains('.');

        let cleaned: String = s.chars().filter(|c| *c != '_' && *c != ',').collect();
        let cleaned = if has_decimal_point {
            Cow::Borrowed(cleaned.as_str())
        } else {
            // Unusable exponent, don't bother with any numeric type.
            expand_exponent(&cleaned)?
        };

        if !self.options.common_types {
            if !has_decimal_point {
                if let Some(v) = Int8Parser::new().parse(&cleaned) {
                    return Some(TypedValue::new(TypeTag::Byte, v.to_string()));
                }
                if let Some(v) = Int16Parser::new().parse(&cleaned) {
                    return Some(TypedValue::new(TypeTag::Short, v.to_string()));
                }
                if let Some(v) = Int32Parser::new().parse(&cleaned) {
                    return Some(TypedValue::new(TypeTag::Int32, v.to_string()));
                }

                let long_text: &str = if self.options.postfix_fl && cleaned.len() > 1 {
                    cleaned.strip_suffix(['l', 'L']).unwrap_or(&*cleaned)
                } else {
                    &cleaned
                };
                if let Some(v) = Int64Parser::new().parse(long_text) {
                    return Some(TypedValue::new(TypeTag::Int64, v.to_string()));
                }
            }

            if float_allowed {
                if let Some(v) = Float32Parser::new().parse(&cleaned) {
                    if v.is_finite() {
                        return Some(TypedValue::new(TypeTag::Float32, float32_text(v)));
                    }
                }
            }
        }

        if float_allowed {
            if let Some(v) = Float64Parser::new().parse(&cleaned) {
                if v.is_finite() {
                    return Some(TypedValue::new(TypeTag::Float64, float64_text(v)));
                }
                // Out of range for every numeric type.
                return Some(TypedValue::new(TypeTag::String, s));
            }
        }

        None
    }
}

fn bool_value(b: bool) -> TypedValue {
    TypedValue::new(TypeTag::Boolean, if b { "true" } else { "false" })
}

/// Trim spaces and ASCII control characters from both ends.
fn trim_control(s: &str) -> &str {
    s.trim_matches(|c: char| c <= ' ')
}

/// Remove one layer of matching single or double quotes, then trim again.
fn strip_matching_quotes(s: &str) -> &str {
    if s.len() < 2 {
        return s;
    }
    for quote in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(quote).and_then(|s| s.strip_suffix(quote)) {
            return trim_control(inner);
        }
    }
    s
}

/// Expand integral exponent notation (`2e3` -> `2000`).
///
/// Tokens containing both or neither of `e` and `E` are returned as is.
/// Returns `None` if the exponent isn't a non-negative 16-bit integer.
fn expand_exponent(s: &str) -> Option<Cow<'_, str>> {
    if s.contains('e') == s.contains('E') {
        return Some(Cow::Borrowed(s));
    }

    let idx = s.find(['e', 'E'])?;
    let exponent = Int16Parser::new().parse(&s[idx + 1..])?;
    let zeros = usize::try_from(exponent).ok()?;

    let mut expanded = String::with_capacity(idx + zeros);
    expanded.push_str(&s[..idx]);
    expanded.push_str(&"0".repeat(zeros));

    Some(Cow::Owned(expanded))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(bool01: bool, common_types: bool, postfix_fl: bool, parse_dates: bool) -> TypifyOptions {
        TypifyOptions {
            bool01,
            common_types,
            postfix_fl,
            parse_dates,
        }
    }

    /// All flags off.
    const PLAIN: TypifyOptions = TypifyOptions {
        bool01: false,
        common_types: false,
        postfix_fl: false,
        parse_dates: false,
    };

    #[track_caller]
    fn assert_typify(options: TypifyOptions, input: &str, tag: TypeTag, text: &str) {
        let formats = DateTimeFormats::new();
        let got = Typifier::new(options, &formats).typify(input);
        assert_eq!(TypedValue::new(tag, text), got, "input: {input:?}");
    }

    #[test]
    fn empty_input() {
        let formats = DateTimeFormats::new();
        let typifier = Typifier::new(opts(false, true, false, true), &formats);
        assert_eq!(TypedValue::empty(), typifier.typify(""));
    }

    #[test]
    fn whitespace_and_empty_quotes_kept_as_is() {
        let options = opts(false, true, false, true);

        let ws = " \t\r\n\x08";
        assert_typify(options, ws, TypeTag::String, ws);

        let quoted = format!("{ws}'{ws}'{ws}");
        assert_typify(options, &quoted, TypeTag::String, &quoted);

        let quoted = quoted.replace('\'', "\"");
        assert_typify(options, &quoted, TypeTag::String, &quoted);

        assert_typify(PLAIN, "' '", TypeTag::String, "' '");
    }

    #[test]
    fn lone_quotes() {
        assert_typify(PLAIN, "'", TypeTag::Character, "'");
        assert_typify(PLAIN, "\"", TypeTag::Character, "\"");
        assert_typify(PLAIN, " ' \x08", TypeTag::Character, "'");

        let common = opts(false, true, false, false);
        assert_typify(common, "'", TypeTag::String, "'");
        assert_typify(common, "\"", TypeTag::String, "\"");
    }

    #[test]
    fn boolean_aliases() {
        let options = opts(false, true, false, true);
        for alias in ["false", "False", "FALSE"] {
            assert_typify(options, alias, TypeTag::Boolean, "false");
            assert_typify(PLAIN, alias, TypeTag::Boolean, "false");
        }
        for alias in ["true", "True", "TRUE"] {
            assert_typify(options, alias, TypeTag::Boolean, "true");
            assert_typify(PLAIN, alias, TypeTag::Boolean, "true");
        }

        assert_typify(PLAIN, ".true 2", TypeTag::String, ".true 2");
        assert_typify(PLAIN, "  'False '\t", TypeTag::Boolean, "false");
        assert_typify(PLAIN, "\x08\"TRUE \t\"\r", TypeTag::Boolean, "true");
        assert_typify(PLAIN, "tRUE", TypeTag::String, "tRUE");
    }

    #[test]
    fn zero_and_one() {
        let bool01 = opts(true, false, false, false);
        assert_typify(bool01, "0", TypeTag::Boolean, "false");
        assert_typify(bool01, "1", TypeTag::Boolean, "true");
        assert_typify(bool01, "2", TypeTag::Byte, "2");

        assert_typify(PLAIN, "0", TypeTag::Byte, "0");
        assert_typify(PLAIN, "1", TypeTag::Byte, "1");

        let common = opts(false, true, false, false);
        assert_typify(common, "0", TypeTag::Float64, "0.0");
        assert_typify(common, "1", TypeTag::Float64, "1.0");
    }

    #[test]
    fn integer_boundaries() {
        let cases = [
            ("-128", TypeTag::Byte),
            ("127", TypeTag::Byte),
            ("-129", TypeTag::Short),
            ("128", TypeTag::Short),
            ("-32768", TypeTag::Short),
            ("32767", TypeTag::Short),
            ("-32769", TypeTag::Int32),
            ("32768", TypeTag::Int32),
            ("-2147483648", TypeTag::Int32),
            ("2147483647", TypeTag::Int32),
            ("-2147483649", TypeTag::Int64),
            ("2147483648", TypeTag::Int64),
            ("-9223372036854775808", TypeTag::Int64),
            ("9223372036854775807", TypeTag::Int64),
        ];

        for (input, tag) in cases {
            assert_typify(PLAIN, input, tag, input);
        }
    }

    #[test]
    fn canonical_integer_text() {
        assert_typify(PLAIN, "007", TypeTag::Byte, "7");
        assert_typify(PLAIN, "+5", TypeTag::Byte, "5");
        assert_typify(PLAIN, "-0", TypeTag::Byte, "0");
    }

    #[test]
    fn float_boundaries() {
        assert_typify(PLAIN, "-9223372036854775809", TypeTag::Float32, "-9.223372E18");
        assert_typify(PLAIN, "9223372036854775808", TypeTag::Float32, "9.223372E18");

        let f32_max = format!("{:.6}", f32::MAX as f64);
        assert_typify(PLAIN, &f32_max, TypeTag::Float32, "3.4028235E38");
        assert_typify(PLAIN, &format!("-{f32_max}"), TypeTag::Float32, "-3.4028235E38");

        let twice_f32_max = format!("{:.6}", f32::MAX as f64 * 2.0);
        assert_typify(
            PLAIN,
            &twice_f32_max,
            TypeTag::Float64,
            &float64_text(f32::MAX as f64 * 2.0),
        );

        let f64_max = format!("{:.6}", f64::MAX);
        assert_typify(PLAIN, &f64_max, TypeTag::Float64, "1.7976931348623157E308");
        assert_typify(PLAIN, &format!("-{f64_max}"), TypeTag::Float64, "-1.7976931348623157E308");
    }

    #[test]
    fn beyond_float64_is_string() {
        assert_typify(PLAIN, "-2e999", TypeTag::String, "-2e999");
        assert_typify(PLAIN, "2e999", TypeTag::String, "2e999");
        assert_typify(PLAIN, " 2e999 ", TypeTag::String, "2e999");
    }

    #[test]
    fn postfixes() {
        let postfix = opts(false, false, true, false);
        assert_typify(postfix, "42l", TypeTag::Int64, "42");
        assert_typify(postfix, "42L", TypeTag::Int64, "42");
        assert_typify(postfix, "0L", TypeTag::Int64, "0");
        assert_typify(postfix, "0.0L", TypeTag::String, "0.0L");
        assert_typify(postfix, "42f", TypeTag::Float32, "42.0");
        assert_typify(postfix, "42.0f", TypeTag::Float32, "42.0");
        assert_typify(postfix, "0F", TypeTag::Float32, "0.0");
        assert_typify(postfix, "L", TypeTag::Character, "L");

        assert_typify(PLAIN, "42L", TypeTag::String, "42L");
        assert_typify(PLAIN, "42F", TypeTag::String, "42F");
        assert_typify(PLAIN, " 42l ", TypeTag::String, " 42l ");
        assert_typify(PLAIN, " 0L ", TypeTag::String, " 0L ");

        let common_postfix = opts(false, true, true, false);
        assert_typify(common_postfix, " 42l ", TypeTag::String, " 42l ");
        assert_typify(common_postfix, " 0L ", TypeTag::String, " 0L ");
    }

    #[test]
    fn separators_removed() {
        assert_typify(PLAIN, "5,000,000,000", TypeTag::Int64, "5000000000");
        assert_typify(PLAIN, "5_000", TypeTag::Short, "5000");
        assert_typify(PLAIN, "2,000", TypeTag::Short, "2000");
        assert_typify(PLAIN, "60_000_000_000", TypeTag::Int64, "60000000000");
        assert_typify(PLAIN, "60_000.0", TypeTag::Float32, "60000.0");
    }

    #[test]
    fn decimal_points_and_exponents() {
        assert_typify(PLAIN, "0.", TypeTag::Float32, "0.0");
        assert_typify(PLAIN, "2.e99", TypeTag::Float64, "2.0E99");
        assert_typify(PLAIN, "2e3", TypeTag::Short, "2000");
        assert_typify(PLAIN, "2ee", TypeTag::String, "2ee");
        assert_typify(PLAIN, "64E7", TypeTag::Int32, "640000000");
        assert_typify(PLAIN, "2eE3", TypeTag::String, "2eE3");
        assert_typify(PLAIN, "2e9", TypeTag::Int32, "2000000000");
        assert_typify(PLAIN, "5e9", TypeTag::Int64, "5000000000");
        assert_typify(PLAIN, "5e25", TypeTag::Float32, "5.0E25");
        assert_typify(PLAIN, "5e99", TypeTag::Float64, "5.0E99");
        assert_typify(PLAIN, "1.5e3", TypeTag::Float32, "1500.0");
    }

    #[test]
    fn negative_exponent_is_string() {
        assert_typify(PLAIN, "5e-3", TypeTag::String, "5e-3");
    }

    #[test]
    fn string_only_chars_membership() {
        let set: String = STRING_ONLY_CHARS.iter().collect();
        assert_eq!(" :natroCiPDscSuAm=O\\dpTMgIbUhH", set);
        assert_eq!(30, STRING_ONLY_CHARS.len());

        for (idx, c) in STRING_ONLY_CHARS.iter().enumerate() {
            assert!(!STRING_ONLY_CHARS[idx + 1..].contains(c), "duplicate {c:?}");
        }
    }

    #[test]
    fn string_only_chars_skip_numeric() {
        let postfix = opts(false, false, true, false);
        for options in [PLAIN, postfix] {
            assert_typify(options, "12d", TypeTag::String, "12d");
            assert_typify(options, "2D", TypeTag::String, "2D");
            assert_typify(options, "1 2", TypeTag::String, "1 2");
            assert_typify(options, "12:30", TypeTag::String, "12:30");
        }

        // Letters outside the set still reach the numeric probes.
        assert_typify(postfix, "42f", TypeTag::Float32, "42.0");
        assert_typify(postfix, "7L", TypeTag::Int64, "7");
        assert_typify(PLAIN, "4E2", TypeTag::Short, "400");
    }

    #[test]
    fn single_characters() {
        assert_typify(PLAIN, "x", TypeTag::Character, "x");
        assert_typify(PLAIN, " . ", TypeTag::Character, ".");
        assert_typify(PLAIN, "-", TypeTag::Character, "-");
        assert_typify(opts(false, true, false, false), "x", TypeTag::String, "x");
    }

    #[test]
    fn date_times() {
        let options = opts(false, true, false, true);
        assert_typify(options, "09/22/1994 16:45", TypeTag::DateTime, "09/22/1994 16:45");
        assert_typify(options, " 1976-04-01 21:12:00 ", TypeTag::DateTime, "1976-04-01 21:12:00");
        assert_typify(options, "09b22b1994 16b45", TypeTag::String, "09b22b1994 16b45");

        assert_typify(PLAIN, "1976-04-01 21:12:00", TypeTag::String, "1976-04-01 21:12:00");
    }

    #[test]
    fn date_times_use_given_registry() {
        let formats = DateTimeFormats::empty();
        let typifier = Typifier::new(TypifyOptions::default(), &formats);
        assert_eq!(TypeTag::String, typifier.typify_tag("09/22/1994 16:45"));
    }

    #[test]
    fn canonical_text_round_trips() {
        let formats = DateTimeFormats::new();
        let inputs = [
            "0", "1", "-129", "70000", "5,000,000,000", "42.5", "2.e99", "5e25", "2e3", "TRUE",
            "x", "09/22/1994 16:45", "hello world", "2e999",
        ];

        for options in [
            TypifyOptions::default(),
            opts(true, false, true, true),
            opts(false, true, false, true),
        ] {
            let typifier = Typifier::new(options, &formats);
            for input in inputs {
                let first = typifier.typify(input);
                let text = first.text().unwrap();
                let second = typifier.typify(text);
                assert_eq!(first.tag, second.tag, "input: {input:?}, options: {options:?}");
            }
        }
    }
}
