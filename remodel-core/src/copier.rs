//! The recursive copy driver.

use crate::coerce::{self, Coercion};
use crate::errors::{CopyError, CopyResult};
use crate::record::{FieldDef, Record, Slot};
use crate::resolve::resolve_target;
use crate::shape::Shape;
use crate::temporal::time_fallback;
use crate::value::Value;

/// Custom conversion hook, consulted per destination field once the
/// coercion table declines.
///
/// Return `Ok(true)` when the hook stored the field or deliberately
/// skipped it, `Ok(false)` to fall through to the built-in time
/// conversions and recursion.
pub type Setter<'a> = dyn FnMut(&Value, &mut Slot<'_>) -> CopyResult<bool> + 'a;

/// Deep-copy `src` into `dst` with the built-in rules only.
///
/// Fields pair up by name or declared rename, values convert through the
/// coercion table, nested records and lists recurse, and times bridge to
/// epoch seconds and RFC 3339 text. Unmatched and non-public fields are
/// skipped. On error, fields already copied keep their new values.
///
/// # Examples
///
/// ```
/// use remodel_core::{deep_copy, Record};
///
/// #[derive(Clone, Default, Record)]
/// struct FromModel {
///     #[record(rename = "id")]
///     pub external_id: String,
///     pub name: String,
///     pub order: i64,
/// }
///
/// #[derive(Clone, Default, Record)]
/// struct ToModel {
///     pub id: String,
///     pub name: String,
///     pub order: i32,
/// }
///
/// let from = FromModel {
///     external_id: "xxxx".to_string(),
///     name: "R2D2".to_string(),
///     order: 1,
/// };
/// let mut to = ToModel::default();
/// deep_copy(&from, &mut to)?;
///
/// assert_eq!(to.id, "xxxx");
/// assert_eq!(to.name, "R2D2");
/// assert_eq!(to.order, 1);
/// # Ok::<(), remodel_core::CopyError>(())
/// ```
pub fn deep_copy<S, D>(src: &S, dst: &mut D) -> CopyResult<()>
where
    S: Record,
    D: Record,
{
    deep_copy_with_setter(src, dst, |_, _| Ok(false))
}

/// Deep-copy `src` into `dst`, consulting `setter` before the built-in
/// time conversions on every field the coercion table declines.
pub fn deep_copy_with_setter<S, D, F>(src: &S, dst: &mut D, mut setter: F) -> CopyResult<()>
where
    S: Record,
    D: Record,
    F: FnMut(&Value, &mut Slot<'_>) -> CopyResult<bool>,
{
    copy_record(src, dst, &mut setter)
}

/// Deep-copy each element of `src` into a fresh `D`, replacing `dst`'s
/// contents. Errors carry the element index.
pub fn deep_copy_slice<S, D>(src: &[S], dst: &mut Vec<D>) -> CopyResult<()>
where
    S: Record,
    D: Record + Default,
{
    deep_copy_slice_with_setter(src, dst, |_, _| Ok(false))
}

/// [`deep_copy_slice`] with a custom setter.
pub fn deep_copy_slice_with_setter<S, D, F>(
    src: &[S],
    dst: &mut Vec<D>,
    mut setter: F,
) -> CopyResult<()>
where
    S: Record,
    D: Record + Default,
    F: FnMut(&Value, &mut Slot<'_>) -> CopyResult<bool>,
{
    dst.clear();
    dst.reserve(src.len());
    for (index, item) in src.iter().enumerate() {
        let mut fresh = D::default();
        copy_record(item, &mut fresh, &mut setter)
            .map_err(|source| CopyError::in_element(index, source))?;
        dst.push(fresh);
    }
    Ok(())
}

pub(crate) fn copy_record(
    src: &dyn Record,
    dst: &mut dyn Record,
    setter: &mut Setter<'_>,
) -> CopyResult<()> {
    for def in src.fields() {
        if !def.public {
            continue;
        }
        let Some(value) = src.get(def.name) else {
            continue;
        };
        let Some(target) = resolve_target(def, dst.fields()) else {
            continue;
        };
        if !target.public {
            continue;
        }
        copy_field(&value, dst, target, setter)
            .map_err(|source| CopyError::in_field(def.name, source))?;
    }
    Ok(())
}

fn copy_field(
    value: &Value,
    dst: &mut dyn Record,
    target: &'static FieldDef,
    setter: &mut Setter<'_>,
) -> CopyResult<()> {
    let shape = (target.shape)();
    match coerce::coerce(value, &shape) {
        Coercion::Direct(converted) => return dst.set(target.name, converted),
        Coercion::NilSource => return Ok(()),
        Coercion::Declined => {}
    }

    let mut slot = Slot::new(dst, target);
    if setter(value, &mut slot)? {
        return Ok(());
    }
    if time_fallback(value, &mut slot)? {
        return Ok(());
    }

    recurse_field(value, dst, target, &shape, setter)
}

fn recurse_field(
    value: &Value,
    dst: &mut dyn Record,
    target: &'static FieldDef,
    shape: &Shape,
    setter: &mut Setter<'_>,
) -> CopyResult<()> {
    match value {
        Value::Record(sub) => copy_into_record_slot(sub.as_ref(), dst, target, shape, setter),
        Value::Opt(Some(inner)) => recurse_field(inner, dst, target, shape, setter),
        Value::List(items) => copy_into_list_slot(items, dst, target, shape, setter),
        _ => Ok(()),
    }
}

fn copy_into_record_slot(
    sub: &dyn Record,
    dst: &mut dyn Record,
    target: &'static FieldDef,
    shape: &Shape,
    setter: &mut Setter<'_>,
) -> CopyResult<()> {
    let (record_shape, wrap) = match shape {
        Shape::Record(rs) => (rs, false),
        Shape::Opt(inner) => match inner.as_ref() {
            Shape::Record(rs) => (rs, true),
            _ => return Ok(()),
        },
        _ => return Ok(()),
    };

    let mut fresh = record_shape.instantiate();
    copy_record(sub, fresh.as_mut(), setter)?;

    let value = if wrap {
        Value::Opt(Some(Box::new(Value::Record(fresh))))
    } else {
        Value::Record(fresh)
    };
    dst.set(target.name, value)
}

fn copy_into_list_slot(
    items: &[Value],
    dst: &mut dyn Record,
    target: &'static FieldDef,
    shape: &Shape,
    setter: &mut Setter<'_>,
) -> CopyResult<()> {
    let (elem_shape, wrap) = match shape {
        Shape::List(elem) => (elem.as_ref(), false),
        Shape::Opt(inner) => match inner.as_ref() {
            Shape::List(elem) => (elem.as_ref(), true),
            _ => return Ok(()),
        },
        _ => return Ok(()),
    };

    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let element = copy_list_element(item, elem_shape, setter)
            .map_err(|source| CopyError::in_element(index, source))?;
        out.push(element);
    }

    let value = if wrap {
        Value::Opt(Some(Box::new(Value::List(out))))
    } else {
        Value::List(out)
    };
    dst.set(target.name, value)
}

/// Convert one list element. Elements that no rule converts, and absent
/// optional elements, yield the destination element's zero value.
fn copy_list_element(
    item: &Value,
    elem_shape: &Shape,
    setter: &mut Setter<'_>,
) -> CopyResult<Value> {
    match coerce::coerce(item, elem_shape) {
        Coercion::Direct(converted) => return Ok(converted),
        Coercion::NilSource => return Ok(elem_shape.zero_value()),
        Coercion::Declined => {}
    }

    let sub = match item {
        Value::Record(r) => Some(r.as_ref()),
        Value::Opt(Some(inner)) => match inner.as_ref() {
            Value::Record(r) => Some(r.as_ref()),
            _ => None,
        },
        _ => None,
    };
    let (record_shape, wrap) = match elem_shape {
        Shape::Record(rs) => (Some(rs), false),
        Shape::Opt(inner) => match inner.as_ref() {
            Shape::Record(rs) => (Some(rs), true),
            _ => (None, false),
        },
        _ => (None, false),
    };

    if let (Some(sub), Some(record_shape)) = (sub, record_shape) {
        let mut fresh = record_shape.instantiate();
        copy_record(sub, fresh.as_mut(), setter)?;
        let value = Value::Record(fresh);
        return Ok(if wrap {
            Value::Opt(Some(Box::new(value)))
        } else {
            value
        });
    }

    Ok(elem_shape.zero_value())
}
