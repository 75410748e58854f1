//! Number rendering for the result file.
//!
//! Group keys print in the conventional shortest-double text (`1.0`, `0.001`, `1.0E7`,
//! `1.5E-4`). Sums are rounded half-up to six fractional digits and always print exactly six,
//! e.g. `24.000000`. Rounding works on the shortest round-trip decimal text of the double, so
//! a sum that prints as `0.0000005` rounds up to `0.000001` even though its binary value is a
//! hair below the half.

/// Fractional digits printed for sums.
pub const SUM_SCALE: usize = 6;

/// Render a group key.
#[must_use]
pub fn format_key(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let abs = v.abs();
    if (1e-3..1e7).contains(&abs) {
        let s = format!("{v}");
        if s.contains('.') { s } else { s + ".0" }
    } else {
        let s = format!("{v:e}");
        let (mantissa, exponent) = s.split_once('e').unwrap_or((s.as_str(), "0"));
        if mantissa.contains('.') {
            format!("{mantissa}E{exponent}")
        } else {
            format!("{mantissa}.0E{exponent}")
        }
    }
}

/// Render a sum, rounded half-up to [`SUM_SCALE`] fractional digits.
#[must_use]
pub fn format_sum(v: f64) -> String {
    if !v.is_finite() {
        return format_key(v);
    }
    round_half_up(&format!("{v}"), SUM_SCALE)
}

/// Round a plain decimal string (`-?digits(.digits)?`) half-up to `scale` fractional digits.
///
/// Half-up rounds ties away from zero. A result whose digits are all zero drops its sign.
#[must_use]
pub fn round_half_up(text: &str, scale: usize) -> String {
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let int_part = if int_part.is_empty() { "0" } else { int_part };

    // All kept digits, most significant first; the decimal point sits `scale` from the end.
    let mut digits: Vec<u8> = int_part.bytes().map(|b| b - b'0').collect();
    let frac: Vec<u8> = frac_part.bytes().map(|b| b - b'0').collect();
    digits.extend((0..scale).map(|i| frac.get(i).copied().unwrap_or(0)));

    if frac.get(scale).is_some_and(|&d| d >= 5) {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == 9 {
                *d = 0;
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, 1);
        }
    }

    let split = digits.len() - scale;
    let int_raw: String = digits[..split].iter().map(|d| char::from(b'0' + d)).collect();
    let int_digits = match int_raw.trim_start_matches('0') {
        "" => "0",
        t => t,
    };
    let frac_digits: String = digits[split..].iter().map(|d| char::from(b'0' + d)).collect();

    let is_zero = digits.iter().all(|&d| d == 0);
    let sign = if negative && !is_zero { "-" } else { "" };
    if scale == 0 {
        format!("{sign}{int_digits}")
    } else {
        format!("{sign}{int_digits}.{frac_digits}")
    }
}
