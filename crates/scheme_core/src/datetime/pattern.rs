//! Translation of `DateTimeFormatter`-style patterns ("dd/MM/yyyy HH:mm") into
//! chrono strftime format strings.
use scheme_error::{Result, SchemeError, not_implemented};

/// Translate a pattern into a chrono format string.
///
/// Letter runs are mapped by letter and run length. Text inside single
/// quotes is literal, and `''` is a literal quote. Any other unquoted ASCII
/// letter is rejected.
pub fn translate_pattern(pattern: &str) -> Result<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut idx = 0;

    while idx < chars.len() {
        let c = chars[idx];

        if c == '\'' {
            // Escaped quote.
            if chars.get(idx + 1) == Some(&'\'') {
                out.push('\'');
                idx += 2;
                continue;
            }

            // Quoted literal, runs to the next unescaped quote.
            idx += 1;
            loop {
                match chars.get(idx) {
                    Some('\'') if chars.get(idx + 1) == Some(&'\'') => {
                        out.push('\'');
                        idx += 2;
                    }
                    Some('\'') => {
                        idx += 1;
                        break;
                    }
                    Some(lit) => {
                        push_literal(&mut out, *lit);
                        idx += 1;
                    }
                    None => {
                        return Err(SchemeError::new("Unterminated quoted literal in pattern")
                            .with_field("pattern", pattern));
                    }
                }
            }
            continue;
        }

        if c.is_ascii_alphabetic() {
            let run = chars[idx..].iter().take_while(|&&other| other == c).count();
            out.push_str(letter_run(pattern, c, run)?);
            idx += run;
            continue;
        }

        if c == '[' || c == ']' || c == '{' || c == '}' || c == '#' {
            not_implemented!("reserved pattern character '{c}' in '{pattern}'");
        }

        push_literal(&mut out, c);
        idx += 1;
    }

    Ok(out)
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

fn letter_run(pattern: &str, letter: char, run: usize) -> Result<&'static str> {
    let spec = match (letter, run) {
        ('y' | 'u', 2) => "%y",
        ('y' | 'u', _) => "%Y",
        ('M' | 'L', 1 | 2) => "%m",
        ('M' | 'L', 3) => "%b",
        ('M' | 'L', _) => "%B",
        ('d', 1 | 2) => "%d",
        ('D', 1..=3) => "%j",
        ('H', 1 | 2) => "%H",
        ('h', 1 | 2) => "%I",
        ('m', 1 | 2) => "%M",
        ('s', 1 | 2) => "%S",
        ('S', 3) => "%3f",
        ('S', 6) => "%6f",
        ('S', 9) => "%9f",
        ('S', _) => "%f",
        ('a', 1) => "%p",
        ('E', 1..=3) => "%a",
        ('E', 4) => "%A",
        _ => {
            return Err(SchemeError::new("Unsupported pattern letter")
                .with_field("letter", letter)
                .with_field("count", run)
                .with_field("pattern", pattern));
        }
    };

    Ok(spec)
}
