use chrono::{DateTime, Utc};
use error::Error;
use metric::Value;

/// A single field value of a `Measurement`.
///
/// Upstream collectors hand us fields of many shapes. This is the closed set
/// of shapes we know about. Only some of them have a numeric datapoint
/// representation, see `coerce`.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// 8 bit signed integer
    I8(i8),
    /// 16 bit signed integer
    I16(i16),
    /// 32 bit signed integer
    I32(i32),
    /// 64 bit signed integer
    I64(i64),
    /// single precision float
    F32(f32),
    /// double precision float
    F64(f64),
    /// boolean
    Bool(bool),
    /// an instant in time
    Timestamp(DateTime<Utc>),
    /// 64 bit unsigned integer
    UInt(u64),
    /// a string
    Str(String),
    /// no value at all
    Null,
}

/// Convert a field value into a datapoint value.
///
/// Signed integers and floats are widened, booleans become `1` or `0` and
/// timestamps become nanoseconds since the Unix epoch. Every other shape is
/// `Error::UnrepresentableType`. So are NaN and the infinities, which have
/// no JSON number form, and timestamps too far from the epoch to fit an
/// `i64` of nanoseconds.
pub fn coerce(value: &FieldValue) -> Result<Value, Error> {
    match *value {
        FieldValue::I8(i) => Ok(Value::Int(i64::from(i))),
        FieldValue::I16(i) => Ok(Value::Int(i64::from(i))),
        FieldValue::I32(i) => Ok(Value::Int(i64::from(i))),
        FieldValue::I64(i) => Ok(Value::Int(i)),
        FieldValue::F32(f) => finite(f64::from(f)),
        FieldValue::F64(f) => finite(f),
        FieldValue::Bool(b) => Ok(Value::Int(if b { 1 } else { 0 })),
        FieldValue::Timestamp(ref t) => t.timestamp_nanos_opt()
            .map(Value::Int)
            .ok_or(Error::UnrepresentableType),
        FieldValue::UInt(_) | FieldValue::Str(_) | FieldValue::Null => {
            Err(Error::UnrepresentableType)
        }
    }
}

fn finite(f: f64) -> Result<Value, Error> {
    if f.is_finite() {
        Ok(Value::Float(f))
    } else {
        Err(Error::UnrepresentableType)
    }
}

impl From<i8> for FieldValue {
    fn from(i: i8) -> FieldValue {
        FieldValue::I8(i)
    }
}

impl From<i16> for FieldValue {
    fn from(i: i16) -> FieldValue {
        FieldValue::I16(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> FieldValue {
        FieldValue::I32(i)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> FieldValue {
        FieldValue::I64(i)
    }
}

impl From<f32> for FieldValue {
    fn from(f: f32) -> FieldValue {
        FieldValue::F32(f)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> FieldValue {
        FieldValue::F64(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> FieldValue {
        FieldValue::Bool(b)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(t: DateTime<Utc>) -> FieldValue {
        FieldValue::Timestamp(t)
    }
}

impl From<u64> for FieldValue {
    fn from(u: u64) -> FieldValue {
        FieldValue::UInt(u)
    }
}

impl<'a> From<&'a str> for FieldValue {
    fn from(s: &'a str) -> FieldValue {
        FieldValue::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> FieldValue {
        FieldValue::Str(s)
    }
}
