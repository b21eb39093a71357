//! Built-in time conversions, consulted after the custom setter declines.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::errors::CopyResult;
use crate::record::Slot;
use crate::shape::Shape;
use crate::value::Value;

/// Bridge times to epoch seconds and RFC 3339 text, through one optional
/// level on either side.
///
/// `Ok(true)` means handled, including the lenient cases that read the
/// source and deliberately write nothing: unparsable text and epoch
/// seconds outside chrono's range.
pub(crate) fn time_fallback(value: &Value, slot: &mut Slot<'_>) -> CopyResult<bool> {
    let value = match value {
        Value::Opt(Some(inner)) => inner.as_ref(),
        other => other,
    };

    let shape = slot.shape();
    let (target, wrap) = match &shape {
        Shape::Opt(inner) => (inner.as_ref(), true),
        other => (other, false),
    };

    let converted = match (value, target) {
        (Value::Time(t), Shape::I64) => Value::I64(t.timestamp()),
        (Value::Time(t), Shape::Str) => {
            Value::Str(t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        }
        (Value::Str(s), Shape::Time) => match DateTime::parse_from_rfc3339(s) {
            Ok(parsed) => Value::Time(parsed.with_timezone(&Utc)),
            Err(_) => return Ok(true),
        },
        (Value::I64(secs), Shape::Time) => match DateTime::from_timestamp(*secs, 0) {
            Some(t) => Value::Time(t),
            None => return Ok(true),
        },
        _ => return Ok(false),
    };

    if wrap {
        slot.set(Value::Opt(Some(Box::new(converted))))?;
    } else {
        slot.set(converted)?;
    }
    Ok(true)
}
