//! Typed values and the permissive coercion policy
//!
//! Every raw token that becomes a typed value goes through [`coerce`].
//! Coercion never fails: malformed numbers become `NaN` and are handed to
//! the command as-is.

use std::fmt;

use serde::Deserialize;

/// Declared type of a parameter or option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Number,
    Boolean,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::String => write!(f, "STRING"),
            ValueType::Number => write!(f, "NUMBER"),
            ValueType::Boolean => write!(f, "BOOLEAN"),
        }
    }
}

/// A bound value as seen by a command.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Number(f64),
    String(String),
    /// Result of coercing into an untyped slot, or of an absent default.
    #[default]
    #[serde(skip)]
    Undefined,
}

impl Value {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Number(n) if n.is_nan() => write!(f, "NaN"),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Undefined => write!(f, "undefined"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

/// Coerce a raw token according to a declared type.
///
/// - `String`: passthrough
/// - `Number`: [`parse_number`], `NaN` when the token is not numeric
/// - `Boolean`: `"false"` (any case) is false; otherwise a numeric token
///   is cast (zero is false) and a non-numeric token is true
/// - untyped: always [`Value::Undefined`]
pub fn coerce(token: &str, value_type: Option<ValueType>) -> Value {
    match value_type {
        Some(ValueType::String) => Value::String(token.to_string()),
        Some(ValueType::Number) => Value::Number(parse_number(token)),
        Some(ValueType::Boolean) => Value::Boolean(parse_boolean(token)),
        None => Value::Undefined,
    }
}

fn parse_boolean(token: &str) -> bool {
    if token.eq_ignore_ascii_case("false") {
        return false;
    }
    let n = parse_number(token);
    n.is_nan() || n != 0.0
}

/// Parse a token as a number the way a shell user would expect.
///
/// Surrounding whitespace is ignored, an empty token is zero, `0x`/`0o`/`0b`
/// prefixes select a radix and `Infinity` is accepted. Radix literals of any
/// length stay finite and lose precision past 2^53. Anything else that is
/// not a plain decimal literal yields `NaN`.
pub fn parse_number(token: &str) -> f64 {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let lower = trimmed.to_ascii_lowercase();
    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        if let Some(digits) = lower.strip_prefix(prefix) {
            return parse_radix(digits, radix);
        }
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    // f64::from_str also accepts "inf" and "nan" spellings; only digits,
    // sign, decimal point and exponent are numeric here.
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Unsigned digits in `radix`, accumulated as `f64`. No digits is `NaN`.
fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
        })
        .unwrap_or(f64::NAN)
}
