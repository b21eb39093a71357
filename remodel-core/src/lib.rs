//! # remodel-core
//!
//! Runtime deep copy between differently-shaped structs. A source record's
//! fields resolve to destination fields by name or declared rename, values
//! convert through a closed coercion table (numeric cross-conversion,
//! optional wrapping and unwrapping, time bridging), and nested records
//! and lists recurse. A custom setter hook slots in between the coercion
//! table and the built-in time conversions, which is how wire formats such
//! as the protobuf well-known types plug in.

pub mod chunk;
pub mod contains;
pub mod convert;
pub mod copier;
pub mod errors;
pub mod field;
pub mod map;
pub mod record;
pub mod retry;
pub mod shape;
pub mod value;

mod coerce;
mod resolve;
mod temporal;

#[cfg(feature = "prost")]
mod prost_impl;

// Re-export the most commonly used items at the crate root.
pub use chunk::{split_chunks, Chunk, Chunks};
pub use contains::contains;
pub use convert::to_map;
pub use copier::{
    deep_copy, deep_copy_slice, deep_copy_slice_with_setter, deep_copy_with_setter, Setter,
};
pub use errors::{CopyError, CopyResult};
pub use field::Field;
pub use map::try_map;
pub use record::{FieldDef, Record, Slot};
pub use retry::ExponentialBackoff;
pub use shape::{RecordShape, Shape};
pub use value::Value;

pub use remodel_derive::Record;
