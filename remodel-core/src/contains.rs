//! Conversion-aware membership tests.

use crate::coerce::direct;
use crate::shape::Shape;
use crate::value::Value;

/// Whether `list` contains `probe`, converting the probe to each
/// element's kind before comparing.
///
/// An `I64(3)` probe is found in a list of `I32`s. Elements with no
/// scalar kind (records, lists, optionals) compare by plain structural
/// equality.
pub fn contains(list: &[Value], probe: &Value) -> bool {
    list.iter().any(|item| {
        if item == probe {
            return true;
        }
        match scalar_shape(item) {
            Some(shape) => direct(probe, &shape).is_some_and(|converted| converted == *item),
            None => false,
        }
    })
}

fn scalar_shape(value: &Value) -> Option<Shape> {
    Some(match value {
        Value::Bool(_) => Shape::Bool,
        Value::I8(_) => Shape::I8,
        Value::I16(_) => Shape::I16,
        Value::I32(_) => Shape::I32,
        Value::I64(_) => Shape::I64,
        Value::U8(_) => Shape::U8,
        Value::U16(_) => Shape::U16,
        Value::U32(_) => Shape::U32,
        Value::U64(_) => Shape::U64,
        Value::F32(_) => Shape::F32,
        Value::F64(_) => Shape::F64,
        Value::Str(_) => Shape::Str,
        Value::Time(_) => Shape::Time,
        Value::Duration(_) => Shape::Duration,
        _ => return None,
    })
}
