//! The dynamic value tree moved between records.

use std::any::Any;
use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::record::Record;

/// A value lifted out of one record field, ready to store into another.
///
/// Every supported field type maps to exactly one variant. `Opt` models
/// nullable fields; an absent value is `Opt(None)`, never a missing
/// variant. Nested structs travel as boxed [`Record`] trait objects.
pub enum Value {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Str(String),
    Time(DateTime<Utc>),
    Duration(TimeDelta),
    Record(Box<dyn Record>),
    List(Vec<Value>),
    Opt(Option<Box<Value>>),
}

impl Value {
    /// Short name of the value's kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Str(_) => "string",
            Value::Time(_) => "time",
            Value::Duration(_) => "duration",
            Value::Record(r) => r.type_name(),
            Value::List(_) => "list",
            Value::Opt(_) => "optional",
        }
    }

    /// Whether this is the kind's zero value.
    ///
    /// Zero means: false, 0, empty string, Unix epoch, zero duration,
    /// all-zero record, empty list, absent optional.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Bool(v) => !v,
            Value::I8(v) => *v == 0,
            Value::I16(v) => *v == 0,
            Value::I32(v) => *v == 0,
            Value::I64(v) => *v == 0,
            Value::U8(v) => *v == 0,
            Value::U16(v) => *v == 0,
            Value::U32(v) => *v == 0,
            Value::U64(v) => *v == 0,
            Value::F32(v) => *v == 0.0,
            Value::F64(v) => *v == 0.0,
            Value::Str(v) => v.is_empty(),
            Value::Time(v) => *v == DateTime::UNIX_EPOCH,
            Value::Duration(v) => v.is_zero(),
            Value::Record(r) => r
                .fields()
                .iter()
                .all(|def| r.get(def.name).map_or(true, |v| v.is_zero())),
            Value::List(items) => items.is_empty(),
            Value::Opt(inner) => inner.is_none(),
        }
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        match self {
            Value::Bool(v) => Value::Bool(*v),
            Value::I8(v) => Value::I8(*v),
            Value::I16(v) => Value::I16(*v),
            Value::I32(v) => Value::I32(*v),
            Value::I64(v) => Value::I64(*v),
            Value::U8(v) => Value::U8(*v),
            Value::U16(v) => Value::U16(*v),
            Value::U32(v) => Value::U32(*v),
            Value::U64(v) => Value::U64(*v),
            Value::F32(v) => Value::F32(*v),
            Value::F64(v) => Value::F64(*v),
            Value::Str(v) => Value::Str(v.clone()),
            Value::Time(v) => Value::Time(*v),
            Value::Duration(v) => Value::Duration(*v),
            Value::Record(r) => Value::Record(r.clone_record()),
            Value::List(items) => Value::List(items.clone()),
            Value::Opt(inner) => Value::Opt(inner.clone()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Value::I8(v) => f.debug_tuple("I8").field(v).finish(),
            Value::I16(v) => f.debug_tuple("I16").field(v).finish(),
            Value::I32(v) => f.debug_tuple("I32").field(v).finish(),
            Value::I64(v) => f.debug_tuple("I64").field(v).finish(),
            Value::U8(v) => f.debug_tuple("U8").field(v).finish(),
            Value::U16(v) => f.debug_tuple("U16").field(v).finish(),
            Value::U32(v) => f.debug_tuple("U32").field(v).finish(),
            Value::U64(v) => f.debug_tuple("U64").field(v).finish(),
            Value::F32(v) => f.debug_tuple("F32").field(v).finish(),
            Value::F64(v) => f.debug_tuple("F64").field(v).finish(),
            Value::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Value::Time(v) => f.debug_tuple("Time").field(v).finish(),
            Value::Duration(v) => f.debug_tuple("Duration").field(v).finish(),
            Value::Record(r) => f.debug_tuple("Record").field(&r.type_name()).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Opt(None) => f.write_str("None"),
            Value::Opt(Some(inner)) => f.debug_tuple("Some").field(inner).finish(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I8(a), Value::I8(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U8(a), Value::U8(b)) => a == b,
            (Value::U16(a), Value::U16(b)) => a == b,
            (Value::U32(a), Value::U32(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Duration(a), Value::Duration(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => records_eq(a.as_ref(), b.as_ref()),
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Opt(a), Value::Opt(b)) => a == b,
            _ => false,
        }
    }
}

/// Structural equality: same concrete type and equal field values.
fn records_eq(a: &dyn Record, b: &dyn Record) -> bool {
    if a.as_any().type_id() != b.as_any().type_id() {
        return false;
    }
    a.fields()
        .iter()
        .all(|def| a.get(def.name) == b.get(def.name))
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::I8(v) => serializer.serialize_i8(*v),
            Value::I16(v) => serializer.serialize_i16(*v),
            Value::I32(v) => serializer.serialize_i32(*v),
            Value::I64(v) => serializer.serialize_i64(*v),
            Value::U8(v) => serializer.serialize_u8(*v),
            Value::U16(v) => serializer.serialize_u16(*v),
            Value::U32(v) => serializer.serialize_u32(*v),
            Value::U64(v) => serializer.serialize_u64(*v),
            Value::F32(v) => serializer.serialize_f32(*v),
            Value::F64(v) => serializer.serialize_f64(*v),
            Value::Str(v) => serializer.serialize_str(v),
            Value::Time(v) => v.serialize(serializer),
            Value::Duration(v) => serializer.serialize_i64(saturating_nanos(v)),
            Value::Record(r) => {
                let mut map = serializer.serialize_map(None)?;
                for def in r.fields().iter().filter(|def| def.public) {
                    if let Some(value) = r.get(def.name) {
                        map.serialize_entry(def.name, &value)?;
                    }
                }
                map.end()
            }
            Value::List(items) => serializer.collect_seq(items),
            Value::Opt(None) => serializer.serialize_none(),
            Value::Opt(Some(inner)) => serializer.serialize_some(inner.as_ref()),
        }
    }
}

/// Total nanoseconds, clamped at the i64 boundary for extreme durations.
fn saturating_nanos(delta: &TimeDelta) -> i64 {
    delta.num_nanoseconds().unwrap_or_else(|| {
        if delta.num_seconds() < 0 {
            i64::MIN
        } else {
            i64::MAX
        }
    })
}
