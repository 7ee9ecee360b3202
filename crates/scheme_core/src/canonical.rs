//! Canonical text for floating point values.
//!
//! Plain decimal notation with at least one fractional digit for magnitudes
//! in `[1e-3, 1e7)`, and `d.ddddE[-]n` otherwise. Digits are the shortest that
//! round trip to the same value.

pub fn float32_text(v: f32) -> String {
    if !v.is_finite() {
        return non_finite_text(v.is_nan(), v.is_sign_negative());
    }
    layout(&format!("{v:e}"))
}

pub fn float64_text(v: f64) -> String {
    if !v.is_finite() {
        return non_finite_text(v.is_nan(), v.is_sign_negative());
    }
    layout(&format!("{v:e}"))
}

fn non_finite_text(nan: bool, negative: bool) -> String {
    match (nan, negative) {
        (true, _) => "NaN".to_string(),
        (false, true) => "-Infinity".to_string(),
        (false, false) => "Infinity".to_string(),
    }
}

/// Re-layout rust's shortest scientific output (e.g. "-1.25e-4").
fn layout(sci: &str) -> String {
    let (negative, unsigned) = match sci.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, sci),
    };

    let (mantissa, exp) = match unsigned.split_once('e') {
        Some((m, e)) => match e.parse::<i32>() {
            Ok(e) => (m, e),
            Err(_) => return sci.to_string(),
        },
        None => return sci.to_string(),
    };

    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let mut out = String::with_capacity(digits.len() + 8);
    if negative {
        out.push('-');
    }

    if (-3..7).contains(&exp) {
        if exp >= 0 {
            // Decimal point goes after `exp + 1` digits.
            let point = exp as usize + 1;
            if digits.len() <= point {
                out.push_str(&digits);
                out.extend(std::iter::repeat_n('0', point - digits.len()));
                out.push_str(".0");
            } else {
                out.push_str(&digits[..point]);
                out.push('.');
                out.push_str(&digits[point..]);
            }
        } else {
            out.push_str("0.");
            out.extend(std::iter::repeat_n('0', (-exp - 1) as usize));
            out.push_str(&digits);
        }
    } else {
        out.push_str(&digits[..1]);
        out.push('.');
        if digits.len() > 1 {
            out.push_str(&digits[1..]);
        } else {
            out.push('0');
        }
        out.push('E');
        out.push_str(&exp.to_string());
    }

    out
}
