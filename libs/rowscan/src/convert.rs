use std::fmt::{self, Write as _};

use chrono::NaiveDateTime;

use crate::config::ScanOptions;
use crate::error::ScanError;
use crate::value::{Value, ValueKind};

/// Static kind of a destination field, as seen by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Signed integers of any width.
    Int,
    /// Unsigned integers of any width.
    Uint,
    Float,
    Text,
    Bytes,
    Timestamp,
    Bool,
    /// Holds any [`Value`] as-is.
    Dynamic,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Int => "signed integer",
            FieldKind::Uint => "unsigned integer",
            FieldKind::Float => "float",
            FieldKind::Text => "text",
            FieldKind::Bytes => "bytes",
            FieldKind::Timestamp => "timestamp",
            FieldKind::Bool => "bool",
            FieldKind::Dynamic => "dynamic",
        };
        f.write_str(name)
    }
}

/// A raw value already reconciled with a field kind, ready to be stored.
///
/// Integers travel at 64-bit width; each field type narrows on store.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Timestamp(NaiveDateTime),
    Dynamic(Value),
}

impl Coerced {
    /// Error for a field type handed a coerced value of the wrong family.
    fn mismatch(&self, to: FieldKind) -> ScanError {
        let from = match self {
            Coerced::Int(_) | Coerced::Uint(_) => ValueKind::Int64,
            Coerced::Float(_) => ValueKind::Float64,
            Coerced::Text(_) | Coerced::Bytes(_) => ValueKind::Bytes,
            Coerced::Timestamp(_) => ValueKind::Timestamp,
            Coerced::Dynamic(v) => v.kind(),
        };
        ScanError::ConversionFailed { from, to }
    }
}

/// A type a record field can have.
///
/// `KIND` selects the conversion rule; `store` writes the coerced value.
pub trait FieldValue {
    const KIND: FieldKind;

    fn store(&mut self, value: Coerced) -> Result<(), ScanError>;
}

/// Reconcile a raw value with a field kind.
///
/// Returns `Ok(None)` for `Null`, which leaves the field untouched.
pub fn coerce(
    raw: &Value,
    kind: FieldKind,
    time_layout: &str,
) -> Result<Option<Coerced>, ScanError> {
    let coerced = match (raw, kind) {
        (Value::Null, _) => return Ok(None),

        // Direct assignment.
        (raw, FieldKind::Dynamic) => Coerced::Dynamic(raw.clone()),
        (Value::Bytes(b), FieldKind::Bytes) => Coerced::Bytes(b.clone()),
        (Value::Timestamp(ts), FieldKind::Timestamp) => Coerced::Timestamp(*ts),

        (Value::Timestamp(ts), FieldKind::Text) => Coerced::Text(format_time(ts, time_layout)?),

        // Numeric widening within a family.
        (Value::Int64(v), FieldKind::Int) => Coerced::Int(*v),
        (Value::Int64(v), FieldKind::Uint) => Coerced::Uint(*v as u64),
        (Value::Float32(v), FieldKind::Float) => Coerced::Float(f64::from(*v)),
        (Value::Float64(v), FieldKind::Float) => Coerced::Float(*v),

        (Value::Bytes(b), kind) => parse_text(b, kind)?,

        (raw, kind) => {
            return Err(ScanError::ConversionFailed {
                from: raw.kind(),
                to: kind,
            });
        }
    };
    Ok(Some(coerced))
}

/// Convert `raw` into `field` using the rules for `F::KIND`.
pub fn assign<F: FieldValue>(
    field: &mut F,
    raw: &Value,
    options: &ScanOptions,
) -> Result<(), ScanError> {
    match coerce(raw, F::KIND, &options.time_layout)? {
        Some(value) => field.store(value),
        None => Ok(()),
    }
}

fn format_time(ts: &NaiveDateTime, layout: &str) -> Result<String, ScanError> {
    let mut out = String::new();
    // `DelayedFormat` reports an unknown specifier as fmt::Error.
    write!(out, "{}", ts.format(layout)).map_err(|_| ScanError::TimeLayout {
        layout: layout.to_string(),
    })?;
    Ok(out)
}

fn parse_text(bytes: &[u8], kind: FieldKind) -> Result<Coerced, ScanError> {
    if !matches!(
        kind,
        FieldKind::Text | FieldKind::Int | FieldKind::Uint | FieldKind::Float
    ) {
        return Err(ScanError::UnsupportedConversion {
            from: ValueKind::Bytes,
            to: kind,
        });
    }

    let text = std::str::from_utf8(bytes)?;
    let parse_failed = |reason: String| ScanError::ParseFailed {
        text: text.to_string(),
        to: kind,
        reason,
    };

    match kind {
        FieldKind::Text => Ok(Coerced::Text(text.to_string())),
        FieldKind::Int => text
            .parse::<i64>()
            .map(Coerced::Int)
            .map_err(|e| parse_failed(e.to_string())),
        FieldKind::Uint => text
            .parse::<u64>()
            .map(Coerced::Uint)
            .map_err(|e| parse_failed(e.to_string())),
        _ => {
            let v = text.parse::<f64>().map_err(|e| parse_failed(e.to_string()))?;
            // `parse` saturates out-of-range literals to infinity.
            if v.is_infinite() && !is_infinity_literal(text) {
                return Err(parse_failed("value out of range".to_string()));
            }
            Ok(Coerced::Float(v))
        }
    }
}

fn is_infinity_literal(text: &str) -> bool {
    let unsigned = text.trim().trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

// ---------------------------------------------------------------------------
// FieldValue impls
// ---------------------------------------------------------------------------

macro_rules! impl_signed {
    ($($ty:ty),*) => {$(
        impl FieldValue for $ty {
            const KIND: FieldKind = FieldKind::Int;

            fn store(&mut self, value: Coerced) -> Result<(), ScanError> {
                match value {
                    Coerced::Int(v) => {
                        *self = v as $ty;
                        Ok(())
                    }
                    other => Err(other.mismatch(Self::KIND)),
                }
            }
        }
    )*};
}

macro_rules! impl_unsigned {
    ($($ty:ty),*) => {$(
        impl FieldValue for $ty {
            const KIND: FieldKind = FieldKind::Uint;

            fn store(&mut self, value: Coerced) -> Result<(), ScanError> {
                match value {
                    Coerced::Uint(v) => {
                        *self = v as $ty;
                        Ok(())
                    }
                    other => Err(other.mismatch(Self::KIND)),
                }
            }
        }
    )*};
}

macro_rules! impl_float {
    ($($ty:ty),*) => {$(
        impl FieldValue for $ty {
            const KIND: FieldKind = FieldKind::Float;

            fn store(&mut self, value: Coerced) -> Result<(), ScanError> {
                match value {
                    Coerced::Float(v) => {
                        *self = v as $ty;
                        Ok(())
                    }
                    other => Err(other.mismatch(Self::KIND)),
                }
            }
        }
    )*};
}

impl_signed!(i8, i16, i32, i64, isize);
impl_unsigned!(u8, u16, u32, u64, usize);
impl_float!(f32, f64);

impl FieldValue for String {
    const KIND: FieldKind = FieldKind::Text;

    fn store(&mut self, value: Coerced) -> Result<(), ScanError> {
        match value {
            Coerced::Text(v) => {
                *self = v;
                Ok(())
            }
            other => Err(other.mismatch(Self::KIND)),
        }
    }
}

impl FieldValue for Vec<u8> {
    const KIND: FieldKind = FieldKind::Bytes;

    fn store(&mut self, value: Coerced) -> Result<(), ScanError> {
        match value {
            Coerced::Bytes(v) => {
                *self = v;
                Ok(())
            }
            other => Err(other.mismatch(Self::KIND)),
        }
    }
}

impl FieldValue for NaiveDateTime {
    const KIND: FieldKind = FieldKind::Timestamp;

    fn store(&mut self, value: Coerced) -> Result<(), ScanError> {
        match value {
            Coerced::Timestamp(v) => {
                *self = v;
                Ok(())
            }
            other => Err(other.mismatch(Self::KIND)),
        }
    }
}

/// No raw value converts into a bool; only `Null` is accepted.
impl FieldValue for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn store(&mut self, value: Coerced) -> Result<(), ScanError> {
        Err(value.mismatch(Self::KIND))
    }
}

impl FieldValue for Value {
    const KIND: FieldKind = FieldKind::Dynamic;

    fn store(&mut self, value: Coerced) -> Result<(), ScanError> {
        match value {
            Coerced::Dynamic(v) => {
                *self = v;
                Ok(())
            }
            other => Err(other.mismatch(Self::KIND)),
        }
    }
}

/// `Null` leaves the option as it is; any other value fills it in.
impl<T: FieldValue + Default> FieldValue for Option<T> {
    const KIND: FieldKind = T::KIND;

    fn store(&mut self, value: Coerced) -> Result<(), ScanError> {
        self.get_or_insert_with(T::default).store(value)
    }
}
