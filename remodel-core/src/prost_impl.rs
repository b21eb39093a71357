//! Record and field plumbing for the protobuf well-known types.
//!
//! `prost_types::Timestamp` and `prost_types::Duration` become ordinary
//! records with `seconds` and `nanos` fields, so they participate in
//! copies like any derived struct. The conversions between them and
//! chrono's types live in the `remodel-prost` crate's setter.

use std::any::Any;

use crate::errors::{CopyError, CopyResult};
use crate::field::Field;
use crate::record::{FieldDef, Record};
use crate::shape::{RecordShape, Shape};
use crate::value::Value;

fn i64_shape() -> Shape {
    Shape::I64
}

fn i32_shape() -> Shape {
    Shape::I32
}

macro_rules! wire_record {
    ($ty:ty, $name:literal) => {
        impl Record for $ty {
            fn type_name(&self) -> &'static str {
                $name
            }

            fn fields(&self) -> &'static [FieldDef] {
                const FIELDS: &[FieldDef] = &[
                    FieldDef {
                        name: "seconds",
                        rename: None,
                        public: true,
                        shape: i64_shape,
                    },
                    FieldDef {
                        name: "nanos",
                        rename: None,
                        public: true,
                        shape: i32_shape,
                    },
                ];
                FIELDS
            }

            fn get(&self, field: &str) -> Option<Value> {
                match field {
                    "seconds" => Some(Value::I64(self.seconds)),
                    "nanos" => Some(Value::I32(self.nanos)),
                    _ => None,
                }
            }

            fn set(&mut self, field: &str, value: Value) -> CopyResult<()> {
                match (field, value) {
                    ("seconds", Value::I64(v)) => {
                        self.seconds = v;
                        Ok(())
                    }
                    ("nanos", Value::I32(v)) => {
                        self.nanos = v;
                        Ok(())
                    }
                    ("seconds", other) => Err(CopyError::ShapeMismatch {
                        slot: concat!($name, ".seconds").to_string(),
                        expected: "i64".to_string(),
                        found: other.kind_name().to_string(),
                    }),
                    ("nanos", other) => Err(CopyError::ShapeMismatch {
                        slot: concat!($name, ".nanos").to_string(),
                        expected: "i32".to_string(),
                        found: other.kind_name().to_string(),
                    }),
                    (_, _) => Err(CopyError::UnknownField {
                        record: $name,
                        field: field.to_string(),
                    }),
                }
            }

            fn clone_record(&self) -> Box<dyn Record> {
                Box::new(self.clone())
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        impl Field for $ty {
            fn shape() -> Shape {
                Shape::Record(RecordShape::of::<$ty>($name))
            }

            fn load(&self) -> Value {
                Value::Record(Box::new(self.clone()))
            }

            fn store(value: Value) -> Result<Self, Value> {
                match value {
                    Value::Record(record) => match record.as_any().downcast_ref::<$ty>() {
                        Some(concrete) => Ok(concrete.clone()),
                        None => Err(Value::Record(record)),
                    },
                    other => Err(other),
                }
            }
        }
    };
}

wire_record!(prost_types::Timestamp, "Timestamp");
wire_record!(prost_types::Duration, "Duration");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_exposes_seconds_and_nanos() {
        let ts = prost_types::Timestamp {
            seconds: 1_590_969_600,
            nanos: 42,
        };
        assert_eq!(ts.get("seconds"), Some(Value::I64(1_590_969_600)));
        assert_eq!(ts.get("nanos"), Some(Value::I32(42)));
        assert_eq!(ts.get("missing"), None);
    }

    #[test]
    fn set_is_exact_about_kinds() {
        let mut ts = prost_types::Timestamp::default();
        ts.set("seconds", Value::I64(5)).unwrap();
        assert_eq!(ts.seconds, 5);

        let err = ts.set("seconds", Value::I32(5)).unwrap_err();
        assert!(err.to_string().contains("Timestamp.seconds"));
    }

    #[test]
    fn field_store_recovers_the_concrete_type() {
        let d = prost_types::Duration {
            seconds: 300,
            nanos: 0,
        };
        let stored = prost_types::Duration::store(d.load());
        assert_eq!(stored, Ok(d));
    }

    #[test]
    fn field_store_rejects_the_wrong_record() {
        let ts = prost_types::Timestamp::default();
        assert!(prost_types::Duration::store(ts.load()).is_err());
    }
}
