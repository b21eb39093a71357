//! Shapes describe what a record field can hold.

use std::any::TypeId;
use std::fmt;

use chrono::{DateTime, TimeDelta};

use crate::record::Record;
use crate::value::Value;

/// The kind of a record field, known statically per descriptor.
#[derive(Clone, Debug)]
pub enum Shape {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Str,
    Time,
    Duration,
    Record(RecordShape),
    List(Box<Shape>),
    Opt(Box<Shape>),
}

impl Shape {
    /// The zero value a fresh field of this shape holds.
    pub fn zero_value(&self) -> Value {
        match self {
            Shape::Bool => Value::Bool(false),
            Shape::I8 => Value::I8(0),
            Shape::I16 => Value::I16(0),
            Shape::I32 => Value::I32(0),
            Shape::I64 => Value::I64(0),
            Shape::U8 => Value::U8(0),
            Shape::U16 => Value::U16(0),
            Shape::U32 => Value::U32(0),
            Shape::U64 => Value::U64(0),
            Shape::F32 => Value::F32(0.0),
            Shape::F64 => Value::F64(0.0),
            Shape::Str => Value::Str(String::new()),
            Shape::Time => Value::Time(DateTime::UNIX_EPOCH),
            Shape::Duration => Value::Duration(TimeDelta::zero()),
            Shape::Record(rs) => Value::Record(rs.instantiate()),
            Shape::List(_) => Value::List(Vec::new()),
            Shape::Opt(_) => Value::Opt(None),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Bool => f.write_str("bool"),
            Shape::I8 => f.write_str("i8"),
            Shape::I16 => f.write_str("i16"),
            Shape::I32 => f.write_str("i32"),
            Shape::I64 => f.write_str("i64"),
            Shape::U8 => f.write_str("u8"),
            Shape::U16 => f.write_str("u16"),
            Shape::U32 => f.write_str("u32"),
            Shape::U64 => f.write_str("u64"),
            Shape::F32 => f.write_str("f32"),
            Shape::F64 => f.write_str("f64"),
            Shape::Str => f.write_str("string"),
            Shape::Time => f.write_str("time"),
            Shape::Duration => f.write_str("duration"),
            Shape::Record(rs) => f.write_str(rs.type_name()),
            Shape::List(inner) => write!(f, "list<{inner}>"),
            Shape::Opt(inner) => write!(f, "optional<{inner}>"),
        }
    }
}

/// Runtime descriptor for a record type: identity plus an allocator.
///
/// The allocator is the type's `Default`, so recursion can build fresh
/// destination records without knowing their concrete type.
#[derive(Clone)]
pub struct RecordShape {
    type_name: &'static str,
    type_id: fn() -> TypeId,
    make: fn() -> Box<dyn Record>,
}

impl RecordShape {
    /// Describe record type `R`.
    pub fn of<R: Record + Default>(type_name: &'static str) -> Self {
        RecordShape {
            type_name,
            type_id: TypeId::of::<R>,
            make: make_boxed::<R>,
        }
    }

    /// Name of the described type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// `TypeId` of the described type.
    pub fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Whether the described type is `R`.
    pub fn is<R: 'static>(&self) -> bool {
        self.type_id() == TypeId::of::<R>()
    }

    /// Allocate a zero-valued instance of the described type.
    pub fn instantiate(&self) -> Box<dyn Record> {
        (self.make)()
    }
}

impl fmt::Debug for RecordShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordShape")
            .field("type_name", &self.type_name)
            .finish()
    }
}

fn make_boxed<R: Record + Default>() -> Box<dyn Record> {
    Box::new(R::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_spells_out_nesting() {
        let shape = Shape::Opt(Box::new(Shape::List(Box::new(Shape::I32))));
        assert_eq!(shape.to_string(), "optional<list<i32>>");
    }

    #[test]
    fn zero_values_match_kind() {
        assert_eq!(Shape::I64.zero_value(), Value::I64(0));
        assert_eq!(Shape::Str.zero_value(), Value::Str(String::new()));
        assert_eq!(
            Shape::Opt(Box::new(Shape::Time)).zero_value(),
            Value::Opt(None)
        );
        assert_eq!(Shape::List(Box::new(Shape::Bool)).zero_value(), Value::List(vec![]));
    }
}
