//! Numeric parsing and conversion rules.
//!
//! Strings are numified by parsing their longest numeric prefix. Whether the
//! whole string was consumed decides if the cached number is public or only
//! private.

/// 2^63 as a float; the first value that does not fit an i64.
const IV_MAX_P1: f64 = 9_223_372_036_854_775_808.0;
/// 2^64 as a float; the first value that does not fit a u64.
const UV_MAX_P1: f64 = 18_446_744_073_709_551_616.0;

/// The literal string that numifies to zero but is true.
const ZERO_BUT_TRUE: &[u8] = b"0 but true";

/// A parsed number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

/// Result of parsing a string as a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Grokked {
    pub(crate) value: Number,
    /// The entire string, apart from surrounding whitespace, was numeric
    pub(crate) complete: bool,
}

impl Grokked {
    fn not_numeric() -> Self {
        Grokked {
            value: Number::Int(0),
            complete: false,
        }
    }
}

/// Parses the numeric prefix of `bytes`.
pub(crate) fn grok_number(bytes: &[u8]) -> Grokked {
    let mut i = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    if &bytes[i..] == ZERO_BUT_TRUE {
        return Grokked {
            value: Number::Int(0),
            complete: true,
        };
    }

    let start = i;
    let negative = match bytes.get(i) {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    if let Some((value, len)) = grok_special(&bytes[i..]) {
        let value = if negative { -value } else { value };
        return Grokked {
            value: Number::Float(value),
            complete: only_whitespace(&bytes[i + len..]),
        };
    }

    let int_start = i;
    while bytes.get(i).map_or(false, u8::is_ascii_digit) {
        i += 1;
    }
    let int_digits = &bytes[int_start..i];

    let mut is_float = false;
    let mut frac_digits = 0;
    if bytes.get(i) == Some(&b'.') {
        let mut j = i + 1;
        while bytes.get(j).map_or(false, u8::is_ascii_digit) {
            j += 1;
        }
        frac_digits = j - i - 1;
        if !int_digits.is_empty() || frac_digits > 0 {
            is_float = true;
            i = j;
        }
    }
    if int_digits.is_empty() && frac_digits == 0 {
        return Grokked::not_numeric();
    }

    if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'-') | Some(b'+')) {
            j += 1;
        }
        if bytes.get(j).map_or(false, u8::is_ascii_digit) {
            while bytes.get(j).map_or(false, u8::is_ascii_digit) {
                j += 1;
            }
            is_float = true;
            i = j;
        }
    }

    let complete = only_whitespace(&bytes[i..]);
    let value = if is_float {
        Number::Float(parse_float(&bytes[start..i]))
    } else {
        integer_value(int_digits, negative).unwrap_or_else(|| Number::Float(parse_float(&bytes[start..i])))
    };
    Grokked { value, complete }
}

fn only_whitespace(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

/// Recognises `Inf`, `Infinity` and `NaN`, case-insensitively.
fn grok_special(bytes: &[u8]) -> Option<(f64, usize)> {
    let starts_with = |word: &[u8]| {
        bytes.len() >= word.len() && bytes[..word.len()].eq_ignore_ascii_case(word)
    };
    if starts_with(b"infinity") {
        Some((f64::INFINITY, 8))
    } else if starts_with(b"inf") {
        Some((f64::INFINITY, 3))
    } else if starts_with(b"nan") {
        Some((f64::NAN, 3))
    } else {
        None
    }
}

fn integer_value(digits: &[u8], negative: bool) -> Option<Number> {
    let magnitude = digits.iter().try_fold(0u64, |acc, d| {
        acc.checked_mul(10)?.checked_add(u64::from(d - b'0'))
    })?;
    if negative {
        let value = -i128::from(magnitude);
        i64::try_from(value).ok().map(Number::Int)
    } else if let Ok(value) = i64::try_from(magnitude) {
        Some(Number::Int(value))
    } else {
        Some(Number::UInt(magnitude))
    }
}

fn parse_float(text: &[u8]) -> f64 {
    std::str::from_utf8(text)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Integer cached from a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IntFromFloat {
    /// Bit pattern of the integer slot
    pub(crate) bits: i64,
    pub(crate) unsigned: bool,
    /// Converting back yields the original float
    pub(crate) exact: bool,
}

/// Converts a float the way the runtime caches it in the integer slot.
///
/// Values below 2^63 truncate toward zero into a signed slot, saturating at
/// `i64::MIN`. Larger values go to an unsigned slot, saturating at
/// `u64::MAX`. NaN caches as zero and is never exact.
pub(crate) fn float_to_int(nv: f64) -> IntFromFloat {
    if nv.is_nan() {
        IntFromFloat {
            bits: 0,
            unsigned: false,
            exact: false,
        }
    } else if nv < IV_MAX_P1 {
        let iv = nv as i64;
        IntFromFloat {
            bits: iv,
            unsigned: false,
            exact: iv as f64 == nv,
        }
    } else {
        let uv = nv as u64;
        IntFromFloat {
            bits: uv as i64,
            unsigned: true,
            exact: nv < UV_MAX_P1 && uv as f64 == nv,
        }
    }
}

/// Converts an integer slot to a float, reporting whether it is exact.
pub(crate) fn int_to_float(bits: i64, unsigned: bool) -> (f64, bool) {
    if unsigned {
        let uv = bits as u64;
        let nv = uv as f64;
        (nv, nv < UV_MAX_P1 && nv as u64 == uv)
    } else {
        let nv = bits as f64;
        (nv, nv < IV_MAX_P1 && nv as i64 == bits)
    }
}

/// Formats an integer slot.
pub(crate) fn format_int(bits: i64, unsigned: bool) -> String {
    if unsigned {
        (bits as u64).to_string()
    } else {
        bits.to_string()
    }
}

/// Formats a float with 15 significant digits, in the style of `%.15g`.
pub(crate) fn format_float(nv: f64) -> String {
    if nv.is_nan() {
        return "NaN".to_string();
    }
    if nv.is_infinite() {
        return if nv > 0.0 { "Inf" } else { "-Inf" }.to_string();
    }
    if nv == 0.0 {
        return if nv.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let scientific = format!("{:.14e}", nv);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= 15 {
        let mantissa = trim_fraction(mantissa);
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    } else {
        let precision = (14 - exponent) as usize;
        trim_fraction(&format!("{:.*}", precision, nv)).to_string()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
