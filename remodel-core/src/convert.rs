//! Record to map conversion.

use std::collections::HashMap;

use crate::record::Record;
use crate::value::Value;

/// Flatten a record's public fields into a name-to-value map, skipping
/// zero values.
///
/// Keys are field names as declared, not renames. The values serialize
/// with serde, so the map is one `serde_json::to_value` away from a JSON
/// object.
pub fn to_map(record: &dyn Record) -> HashMap<String, Value> {
    let mut out = HashMap::new();
    for def in record.fields() {
        if !def.public {
            continue;
        }
        let Some(value) = record.get(def.name) else {
            continue;
        };
        if value.is_zero() {
            continue;
        }
        out.insert(def.name.to_string(), value);
    }
    out
}
