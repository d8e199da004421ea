//! Element types for typed array output
//!
//! This module contains the fixed table of numeric element kinds a node can
//! emit, together with the per-value encoding rules used to pack a sequence
//! of numbers into a contiguous byte buffer.
//!
//! # Element Types
//!
//! | Code | Label   | Stride |
//! |------|---------|--------|
//! | 0    | Int8    | 1      |
//! | 1    | Uint8   | 1      |
//! | 2    | Int16   | 2      |
//! | 3    | Uint16  | 2      |
//! | 4    | Int32   | 4      |
//! | 5    | Uint32  | 4      |
//! | 6    | Float32 | 4      |
//!
//! # Conversion Rules
//!
//! Integer kinds map NaN and infinities to zero, truncate toward zero and
//! keep the low bits of the result (values wrap, they never saturate).
//! `Float32` narrows with round-to-nearest. All multi-byte values are written
//! little-endian.

use crate::error::NodeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Numeric element kind of a typed buffer.
///
/// Serialized as its numeric code so persisted node state stays compact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ElementType {
    /// 8-bit signed integer
    Int8,
    /// 8-bit unsigned integer
    Uint8,
    /// 16-bit signed integer
    Int16,
    /// 16-bit unsigned integer
    Uint16,
    /// 32-bit signed integer
    Int32,
    /// 32-bit unsigned integer
    Uint32,
    /// 32-bit floating point
    #[default]
    Float32,
}

impl ElementType {
    /// Get all element types, ordered by code.
    pub fn all() -> &'static [ElementType] {
        &[
            ElementType::Int8,
            ElementType::Uint8,
            ElementType::Int16,
            ElementType::Uint16,
            ElementType::Int32,
            ElementType::Uint32,
            ElementType::Float32,
        ]
    }

    /// Numeric code of this element type.
    pub fn code(&self) -> u8 {
        match self {
            ElementType::Int8 => 0,
            ElementType::Uint8 => 1,
            ElementType::Int16 => 2,
            ElementType::Uint16 => 3,
            ElementType::Int32 => 4,
            ElementType::Uint32 => 5,
            ElementType::Float32 => 6,
        }
    }

    /// Look up an element type by its numeric code.
    pub fn from_code(code: i64) -> Option<ElementType> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| Self::all().get(idx).copied())
    }

    /// Look up an element type by its display label (case-insensitive).
    pub fn from_label(label: &str) -> Option<ElementType> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.label().eq_ignore_ascii_case(label.trim()))
    }

    /// Byte width of one encoded element.
    pub fn stride(&self) -> usize {
        match self {
            ElementType::Int8 | ElementType::Uint8 => 1,
            ElementType::Int16 | ElementType::Uint16 => 2,
            ElementType::Int32 | ElementType::Uint32 | ElementType::Float32 => 4,
        }
    }

    /// Label shown by type selector controls.
    pub fn label(&self) -> &'static str {
        match self {
            ElementType::Int8 => "Int8",
            ElementType::Uint8 => "Uint8",
            ElementType::Int16 => "Int16",
            ElementType::Uint16 => "Uint16",
            ElementType::Int32 => "Int32",
            ElementType::Uint32 => "Uint32",
            ElementType::Float32 => "Float32",
        }
    }

    /// Append the encoding of `value` to `out`.
    ///
    /// Always writes exactly [`stride`](Self::stride) bytes.
    pub fn encode_into(&self, value: f64, out: &mut Vec<u8>) {
        match self {
            ElementType::Int8 => out.push(wrap_to_u32(value) as u8),
            ElementType::Uint8 => out.push(wrap_to_u32(value) as u8),
            ElementType::Int16 => out.extend_from_slice(&(wrap_to_u32(value) as i16).to_le_bytes()),
            ElementType::Uint16 => out.extend_from_slice(&(wrap_to_u32(value) as u16).to_le_bytes()),
            ElementType::Int32 => out.extend_from_slice(&(wrap_to_u32(value) as i32).to_le_bytes()),
            ElementType::Uint32 => out.extend_from_slice(&wrap_to_u32(value).to_le_bytes()),
            ElementType::Float32 => out.extend_from_slice(&(value as f32).to_le_bytes()),
        }
    }

    /// Parse one encoded element back into a f64 value
    pub fn decode(&self, bytes: &[u8]) -> Option<f64> {
        if bytes.len() < self.stride() {
            return None;
        }

        Some(match self {
            ElementType::Int8 => bytes[0] as i8 as f64,
            ElementType::Uint8 => bytes[0] as f64,
            ElementType::Int16 => i16::from_le_bytes([bytes[0], bytes[1]]) as f64,
            ElementType::Uint16 => u16::from_le_bytes([bytes[0], bytes[1]]) as f64,
            ElementType::Int32 => {
                i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64
            }
            ElementType::Uint32 => {
                u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64
            }
            ElementType::Float32 => {
                f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64
            }
        })
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<ElementType> for u8 {
    fn from(value: ElementType) -> Self {
        value.code()
    }
}

impl TryFrom<u8> for ElementType {
    type Error = NodeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        ElementType::from_code(code as i64).ok_or(NodeError::InvalidElementType(code as i64))
    }
}

/// Truncate toward zero and reduce modulo 2^32.
///
/// Non-finite input maps to zero. Narrower integer kinds take the low bits of
/// the result, which gives the same wrap-around as a direct modular reduction.
fn wrap_to_u32(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    value.trunc().rem_euclid(4_294_967_296.0) as u32
}

/// Coerce an array entry to a number before encoding.
///
/// Follows the usual script-engine rules: numbers pass through, `null` is
/// zero, booleans are 0/1 and text goes through [`parse_numeric_text`]. An
/// array counts as the text of its single element (an empty array is zero,
/// two or more elements never parse). Objects are NaN.
pub fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        other => coerce_text_form(other),
    }
}

/// Number for the text form of `value`, as produced when an array is joined.
fn coerce_text_form(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::Null => 0.0,
        // "true" / "false"
        Value::Bool(_) => f64::NAN,
        Value::String(s) => parse_numeric_text(s),
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [only] => coerce_text_form(only),
            _ => f64::NAN,
        },
        Value::Object(_) => f64::NAN,
    }
}

/// Parse numeric text.
///
/// Surrounding whitespace is ignored and blank text is zero. Accepts decimal
/// literals with an optional sign and exponent, `Infinity` with an optional
/// sign, and unsigned `0x`/`0o`/`0b` integer literals. Everything else is NaN.
pub fn parse_numeric_text(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }

    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match text.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_radix_digits(&text[2..], radix);
    }

    // `f64::from_str` also takes "inf" and "nan"; only digits, signs, dots
    // and exponents are numeric here.
    let decimal = text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !decimal {
        return f64::NAN;
    }
    text.parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_radix_digits(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits.chars().try_fold(0.0f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
    })
    .unwrap_or(f64::NAN)
}
