//! The closed conversion table between value kinds.

use std::any::Any;

use chrono::TimeDelta;

use crate::shape::Shape;
use crate::value::Value;

/// Outcome of the conversion rules for one field.
pub(crate) enum Coercion {
    /// Converted; store this.
    Direct(Value),
    /// Absent optional source; write nothing.
    NilSource,
    /// No rule applies; later pipeline stages decide.
    Declined,
}

/// Numbers widen into one of two carriers before narrowing to the target.
///
/// `i128` holds every supported integer losslessly, so narrowing with `as`
/// is plain two's-complement truncation: the same bits land in the target
/// that a chain of machine casts would produce.
enum Wide {
    Int(i128),
    Float(f64),
}

fn widen(value: &Value) -> Option<Wide> {
    match value {
        Value::I8(v) => Some(Wide::Int(i128::from(*v))),
        Value::I16(v) => Some(Wide::Int(i128::from(*v))),
        Value::I32(v) => Some(Wide::Int(i128::from(*v))),
        Value::I64(v) => Some(Wide::Int(i128::from(*v))),
        Value::U8(v) => Some(Wide::Int(i128::from(*v))),
        Value::U16(v) => Some(Wide::Int(i128::from(*v))),
        Value::U32(v) => Some(Wide::Int(i128::from(*v))),
        Value::U64(v) => Some(Wide::Int(i128::from(*v))),
        Value::F32(v) => Some(Wide::Float(f64::from(*v))),
        Value::F64(v) => Some(Wide::Float(*v)),
        // A duration is a nanosecond count wearing a name.
        Value::Duration(v) => Some(Wide::Int(total_nanos(v))),
        _ => None,
    }
}

fn total_nanos(delta: &TimeDelta) -> i128 {
    i128::from(delta.num_seconds()) * 1_000_000_000 + i128::from(delta.subsec_nanos())
}

fn narrow(wide: Wide, shape: &Shape) -> Option<Value> {
    Some(match (wide, shape) {
        (Wide::Int(v), Shape::I8) => Value::I8(v as i8),
        (Wide::Int(v), Shape::I16) => Value::I16(v as i16),
        (Wide::Int(v), Shape::I32) => Value::I32(v as i32),
        (Wide::Int(v), Shape::I64) => Value::I64(v as i64),
        (Wide::Int(v), Shape::U8) => Value::U8(v as u8),
        (Wide::Int(v), Shape::U16) => Value::U16(v as u16),
        (Wide::Int(v), Shape::U32) => Value::U32(v as u32),
        (Wide::Int(v), Shape::U64) => Value::U64(v as u64),
        (Wide::Int(v), Shape::F32) => Value::F32(v as f32),
        (Wide::Int(v), Shape::F64) => Value::F64(v as f64),
        (Wide::Int(v), Shape::Duration) => Value::Duration(TimeDelta::nanoseconds(v as i64)),
        (Wide::Float(v), Shape::I8) => Value::I8(v as i8),
        (Wide::Float(v), Shape::I16) => Value::I16(v as i16),
        (Wide::Float(v), Shape::I32) => Value::I32(v as i32),
        (Wide::Float(v), Shape::I64) => Value::I64(v as i64),
        (Wide::Float(v), Shape::U8) => Value::U8(v as u8),
        (Wide::Float(v), Shape::U16) => Value::U16(v as u16),
        (Wide::Float(v), Shape::U32) => Value::U32(v as u32),
        (Wide::Float(v), Shape::U64) => Value::U64(v as u64),
        (Wide::Float(v), Shape::F32) => Value::F32(v as f32),
        (Wide::Float(v), Shape::F64) => Value::F64(v),
        (Wide::Float(v), Shape::Duration) => Value::Duration(TimeDelta::nanoseconds(v as i64)),
        _ => return None,
    })
}

/// Same kind, the numeric matrix, or a same-type record clone.
///
/// Lists convert when every element converts directly. Optionals are not
/// handled here; [`coerce`] unwraps and rewraps them around this.
pub(crate) fn direct(value: &Value, shape: &Shape) -> Option<Value> {
    match (value, shape) {
        (Value::Bool(v), Shape::Bool) => Some(Value::Bool(*v)),
        (Value::Str(v), Shape::Str) => Some(Value::Str(v.clone())),
        (Value::Time(v), Shape::Time) => Some(Value::Time(*v)),
        (Value::Duration(v), Shape::Duration) => Some(Value::Duration(*v)),
        (Value::Record(r), Shape::Record(rs)) if rs.type_id() == r.as_any().type_id() => {
            Some(Value::Record(r.clone_record()))
        }
        (Value::List(items), Shape::List(elem)) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(direct(item, elem)?);
            }
            Some(Value::List(out))
        }
        _ => narrow(widen(value)?, shape),
    }
}

/// Apply the conversion rules in order: direct, optional-source unwrap,
/// optional-destination wrap.
pub(crate) fn coerce(value: &Value, shape: &Shape) -> Coercion {
    if let Some(converted) = direct(value, shape) {
        return Coercion::Direct(converted);
    }

    match value {
        Value::Opt(None) => return Coercion::NilSource,
        Value::Opt(Some(inner)) => {
            if let Some(converted) = direct(inner, shape) {
                return Coercion::Direct(converted);
            }
            if let Shape::Opt(inner_shape) = shape {
                if let Some(converted) = direct(inner, inner_shape) {
                    return Coercion::Direct(Value::Opt(Some(Box::new(converted))));
                }
            }
        }
        _ => {}
    }

    if let Shape::Opt(inner_shape) = shape {
        if let Some(converted) = direct(value, inner_shape) {
            return Coercion::Direct(Value::Opt(Some(Box::new(converted))));
        }
    }

    Coercion::Declined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i64_to_i32_truncates_two_complement() {
        let out = direct(&Value::I64(2_200_000_000), &Shape::I32);
        assert_eq!(out, Some(Value::I32(-2_094_967_296)));
    }

    #[test]
    fn i64_to_i32_in_range_is_exact() {
        let out = direct(&Value::I64(2_100_000_000), &Shape::I32);
        assert_eq!(out, Some(Value::I32(2_100_000_000)));
    }

    #[test]
    fn i32_widens_to_i64() {
        let out = direct(&Value::I32(-5), &Shape::I64);
        assert_eq!(out, Some(Value::I64(-5)));
    }

    #[test]
    fn u64_max_wraps_to_negative_one() {
        let out = direct(&Value::U64(u64::MAX), &Shape::I64);
        assert_eq!(out, Some(Value::I64(-1)));
    }

    #[test]
    fn duration_and_i64_share_representation() {
        let out = direct(&Value::Duration(TimeDelta::seconds(300)), &Shape::I64);
        assert_eq!(out, Some(Value::I64(300_000_000_000)));

        let back = direct(&Value::I64(300_000_000_000), &Shape::Duration);
        assert_eq!(back, Some(Value::Duration(TimeDelta::seconds(300))));
    }

    #[test]
    fn negative_duration_keeps_sign_through_nanos() {
        let neg = TimeDelta::seconds(-2) + TimeDelta::nanoseconds(-500);
        let out = direct(&Value::Duration(neg), &Shape::I64);
        assert_eq!(out, Some(Value::I64(-2_000_000_500)));
    }

    #[test]
    fn bool_converts_to_bool_only() {
        assert!(direct(&Value::Bool(true), &Shape::I64).is_none());
        assert!(direct(&Value::I64(1), &Shape::Bool).is_none());
    }

    #[test]
    fn string_never_crosses_into_numbers() {
        assert!(direct(&Value::Str("3".to_string()), &Shape::I64).is_none());
    }

    #[test]
    fn list_converts_elementwise() {
        let list = Value::List(vec![Value::I64(1), Value::I64(2_200_000_000)]);
        let out = direct(&list, &Shape::List(Box::new(Shape::I32)));
        assert_eq!(
            out,
            Some(Value::List(vec![
                Value::I32(1),
                Value::I32(-2_094_967_296)
            ]))
        );
    }

    #[test]
    fn list_declines_when_an_element_cannot_convert() {
        let list = Value::List(vec![Value::I64(1), Value::Str("x".to_string())]);
        assert!(direct(&list, &Shape::List(Box::new(Shape::I32))).is_none());
    }

    #[test]
    fn absent_optional_source_writes_nothing() {
        assert!(matches!(
            coerce(&Value::Opt(None), &Shape::I64),
            Coercion::NilSource
        ));
        assert!(matches!(
            coerce(&Value::Opt(None), &Shape::Opt(Box::new(Shape::I64))),
            Coercion::NilSource
        ));
    }

    #[test]
    fn optional_source_unwraps_to_plain_destination() {
        let src = Value::Opt(Some(Box::new(Value::I64(9))));
        match coerce(&src, &Shape::I32) {
            Coercion::Direct(v) => assert_eq!(v, Value::I32(9)),
            _ => panic!("expected direct conversion"),
        }
    }

    #[test]
    fn optional_source_rewraps_for_optional_destination() {
        let src = Value::Opt(Some(Box::new(Value::I64(9))));
        match coerce(&src, &Shape::Opt(Box::new(Shape::I32))) {
            Coercion::Direct(v) => {
                assert_eq!(v, Value::Opt(Some(Box::new(Value::I32(9)))));
            }
            _ => panic!("expected direct conversion"),
        }
    }

    #[test]
    fn plain_source_wraps_for_optional_destination() {
        match coerce(&Value::Str("a".to_string()), &Shape::Opt(Box::new(Shape::Str))) {
            Coercion::Direct(v) => {
                assert_eq!(v, Value::Opt(Some(Box::new(Value::Str("a".to_string())))));
            }
            _ => panic!("expected direct conversion"),
        }
    }

    #[test]
    fn unrelated_kinds_decline() {
        assert!(matches!(
            coerce(&Value::Time(chrono::DateTime::UNIX_EPOCH), &Shape::I64),
            Coercion::Declined
        ));
    }
}
