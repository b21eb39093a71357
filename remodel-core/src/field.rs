//! Conversion between concrete field types and dynamic values.

use chrono::{DateTime, TimeDelta, Utc};

use crate::shape::Shape;
use crate::value::Value;

/// Implemented by every type that can live in a record field.
///
/// `store` hands back the rejected value on a kind mismatch so callers can
/// report what they were given. Derived records get an implementation of
/// this trait too, which is what lets them nest and sit inside `Option`
/// and `Vec` fields.
pub trait Field: Sized + 'static {
    /// Shape of this field type.
    fn shape() -> Shape;

    /// Lift the field into a dynamic value.
    fn load(&self) -> Value;

    /// Rebuild the field from a dynamic value.
    fn store(value: Value) -> Result<Self, Value>;
}

macro_rules! scalar_field {
    ($ty:ty, $variant:ident, $shape:ident) => {
        impl Field for $ty {
            fn shape() -> Shape {
                Shape::$shape
            }

            fn load(&self) -> Value {
                Value::$variant(*self)
            }

            fn store(value: Value) -> Result<Self, Value> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(other),
                }
            }
        }
    };
}

scalar_field!(bool, Bool, Bool);
scalar_field!(i8, I8, I8);
scalar_field!(i16, I16, I16);
scalar_field!(i32, I32, I32);
scalar_field!(i64, I64, I64);
scalar_field!(u8, U8, U8);
scalar_field!(u16, U16, U16);
scalar_field!(u32, U32, U32);
scalar_field!(u64, U64, U64);
scalar_field!(f32, F32, F32);
scalar_field!(f64, F64, F64);
scalar_field!(DateTime<Utc>, Time, Time);
scalar_field!(TimeDelta, Duration, Duration);

impl Field for String {
    fn shape() -> Shape {
        Shape::Str
    }

    fn load(&self) -> Value {
        Value::Str(self.clone())
    }

    fn store(value: Value) -> Result<Self, Value> {
        match value {
            Value::Str(v) => Ok(v),
            other => Err(other),
        }
    }
}

impl<T: Field> Field for Option<T> {
    fn shape() -> Shape {
        Shape::Opt(Box::new(T::shape()))
    }

    fn load(&self) -> Value {
        Value::Opt(self.as_ref().map(|v| Box::new(v.load())))
    }

    fn store(value: Value) -> Result<Self, Value> {
        match value {
            Value::Opt(None) => Ok(None),
            Value::Opt(Some(inner)) => match T::store(*inner) {
                Ok(v) => Ok(Some(v)),
                Err(rejected) => Err(Value::Opt(Some(Box::new(rejected)))),
            },
            other => Err(other),
        }
    }
}

impl<T: Field> Field for Vec<T> {
    fn shape() -> Shape {
        Shape::List(Box::new(T::shape()))
    }

    fn load(&self) -> Value {
        Value::List(self.iter().map(Field::load).collect())
    }

    fn store(value: Value) -> Result<Self, Value> {
        match value {
            Value::List(items) => items.into_iter().map(T::store).collect(),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_round_trip() {
        assert_eq!(i64::store(12i64.load()), Ok(12));
        assert_eq!(String::store("abc".to_string().load()), Ok("abc".to_string()));
        assert_eq!(bool::store(true.load()), Ok(true));
    }

    #[test]
    fn store_rejects_wrong_kind() {
        assert_eq!(i64::store(Value::I32(1)), Err(Value::I32(1)));
        assert_eq!(
            String::store(Value::Bool(false)),
            Err(Value::Bool(false))
        );
    }

    #[test]
    fn option_maps_absence() {
        let absent: Option<i64> = None;
        assert_eq!(absent.load(), Value::Opt(None));
        assert_eq!(Option::<i64>::store(Value::Opt(None)), Ok(None));
        assert_eq!(
            Option::<i64>::store(Value::Opt(Some(Box::new(Value::I64(7))))),
            Ok(Some(7))
        );
    }

    #[test]
    fn vec_rejects_on_first_bad_element() {
        let mixed = Value::List(vec![Value::I64(1), Value::Str("x".to_string())]);
        assert_eq!(
            Vec::<i64>::store(mixed),
            Err(Value::Str("x".to_string()))
        );
    }

    #[test]
    fn nested_shapes_compose() {
        assert_eq!(
            Option::<Vec<i32>>::shape().to_string(),
            "optional<list<i32>>"
        );
    }
}
