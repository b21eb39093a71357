//! Record descriptors: field metadata and dynamic access.

use std::any::Any;

use crate::errors::CopyResult;
use crate::shape::Shape;
use crate::value::Value;

/// Static metadata for one record field.
#[derive(Clone, Copy, Debug)]
pub struct FieldDef {
    /// Field name as declared on the type.
    pub name: &'static str,
    /// Declared name override, if any.
    pub rename: Option<&'static str>,
    /// Whether the field is public. Non-public fields never copy.
    pub public: bool,
    /// Shape constructor for the field type.
    pub shape: fn() -> Shape,
}

/// A struct the copy driver can read from and write into dynamically.
///
/// Usually derived. `get` lifts a field into a [`Value`]; `set` stores one
/// back and rejects values whose kind does not match the field exactly.
/// All conversion happens in the driver, never in the record.
pub trait Record: Any {
    /// Type name for diagnostics.
    fn type_name(&self) -> &'static str;

    /// Field metadata, in declaration order.
    fn fields(&self) -> &'static [FieldDef];

    /// Read a field by name.
    fn get(&self, field: &str) -> Option<Value>;

    /// Write a field by name. Exact-shape only.
    fn set(&mut self, field: &str, value: Value) -> CopyResult<()>;

    /// Clone behind the trait object.
    fn clone_record(&self) -> Box<dyn Record>;

    /// Upcast for concrete-type recovery.
    fn as_any(&self) -> &dyn Any;
}

/// One destination field, handed to a custom setter.
///
/// A setter sees exactly the field being copied into: its name, its shape,
/// its current value, and a `set` that stores with the record's own
/// exactness rules. It cannot reach any other field.
pub struct Slot<'a> {
    record: &'a mut dyn Record,
    def: &'static FieldDef,
}

impl<'a> Slot<'a> {
    pub(crate) fn new(record: &'a mut dyn Record, def: &'static FieldDef) -> Self {
        Slot { record, def }
    }

    /// Destination field name.
    pub fn name(&self) -> &'static str {
        self.def.name
    }

    /// Destination field shape.
    pub fn shape(&self) -> Shape {
        (self.def.shape)()
    }

    /// Current destination value.
    pub fn get(&self) -> Option<Value> {
        self.record.get(self.def.name)
    }

    /// Store into the destination field. Exact-shape only.
    pub fn set(&mut self, value: Value) -> CopyResult<()> {
        self.record.set(self.def.name, value)
    }
}
