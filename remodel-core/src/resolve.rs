//! Field-name resolution between source and destination descriptors.

use crate::record::FieldDef;

/// Pick the destination field a source field copies into.
///
/// A rename declared on the destination (keyed by the source field's name)
/// wins over one declared on the source; otherwise the source's rename,
/// then the plain name. No match means the field is skipped.
pub(crate) fn resolve_target(
    src: &FieldDef,
    dst_fields: &'static [FieldDef],
) -> Option<&'static FieldDef> {
    if let Some(def) = dst_fields.iter().find(|def| def.rename == Some(src.name)) {
        return Some(def);
    }
    let wanted = src.rename.unwrap_or(src.name);
    dst_fields.iter().find(|def| def.name == wanted)
}
