//! # remodel-prost
//!
//! Deep copy pre-wired for the protobuf well-known types. The entry
//! points here behave exactly like remodel-core's, with a setter
//! installed that bridges `chrono` times and durations (and raw epoch
//! seconds and nanosecond counts) to `prost_types::Timestamp` and
//! `prost_types::Duration` in both directions.
//!
//! Zero and pre-epoch sources decline rather than convert, so empty
//! fields stay empty on the wire. Values outside the protobuf validity
//! windows abort the copy with an error.

use chrono::{DateTime, TimeDelta, Utc};
use remodel_core::{Record, Shape, Slot, Value};

pub use remodel_core::{CopyError, CopyResult};

/// Deep-copy `src` into `dst` with the wire-time conversions installed.
pub fn deep_copy<S, D>(src: &S, dst: &mut D) -> CopyResult<()>
where
    S: Record,
    D: Record,
{
    remodel_core::deep_copy_with_setter(src, dst, wire_time_setter)
}

/// Deep-copy a slice with the wire-time conversions installed.
pub fn deep_copy_slice<S, D>(src: &[S], dst: &mut Vec<D>) -> CopyResult<()>
where
    S: Record,
    D: Record + Default,
{
    remodel_core::deep_copy_slice_with_setter(src, dst, wire_time_setter)
}

/// The setter bridging chrono and the wire types, usable directly with
/// [`remodel_core::deep_copy_with_setter`] when composing with other
/// hooks.
pub fn wire_time_setter(value: &Value, slot: &mut Slot<'_>) -> CopyResult<bool> {
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
        (Value::Time(t), Shape::Record(rs)) if rs.is::<prost_types::Timestamp>() => {
            let seconds = t.timestamp();
            if seconds <= 0 {
                return Ok(false);
            }
            let ts = prost_types::Timestamp {
                seconds,
                nanos: t.timestamp_subsec_nanos() as i32,
            };
            check_timestamp(&ts)?;
            wire_value(ts)
        }
        (Value::I64(seconds), Shape::Record(rs)) if rs.is::<prost_types::Timestamp>() => {
            if *seconds <= 0 {
                return Ok(false);
            }
            let ts = prost_types::Timestamp {
                seconds: *seconds,
                nanos: 0,
            };
            check_timestamp(&ts)?;
            wire_value(ts)
        }
        (Value::Duration(d), Shape::Record(rs)) if rs.is::<prost_types::Duration>() => {
            let Some(nanos) = d.num_nanoseconds() else {
                return Ok(false);
            };
            if nanos <= 0 {
                return Ok(false);
            }
            let wire = split_nanos(nanos);
            check_duration(&wire)?;
            wire_value(wire)
        }
        (Value::I64(nanos), Shape::Record(rs)) if rs.is::<prost_types::Duration>() => {
            if *nanos <= 0 {
                return Ok(false);
            }
            wire_value(split_nanos(*nanos))
        }
        (Value::Record(record), _) => {
            if let Some(ts) = record.as_any().downcast_ref::<prost_types::Timestamp>() {
                if !matches!(target, Shape::Time) || ts.seconds <= 0 {
                    return Ok(false);
                }
                check_timestamp(ts)?;
                match DateTime::from_timestamp(ts.seconds, ts.nanos as u32) {
                    Some(t) => Value::Time(t),
                    None => return Ok(false),
                }
            } else if let Some(wire) = record.as_any().downcast_ref::<prost_types::Duration>() {
                if !matches!(target, Shape::Duration) {
                    return Ok(false);
                }
                check_duration(wire)?;
                Value::Duration(
                    TimeDelta::seconds(wire.seconds) + TimeDelta::nanoseconds(i64::from(wire.nanos)),
                )
            } else {
                return Ok(false);
            }
        }
        _ => return Ok(false),
    };

    if wrap {
        slot.set(Value::Opt(Some(Box::new(converted))))?;
    } else {
        slot.set(converted)?;
    }
    Ok(true)
}

fn wire_value<R: Record>(record: R) -> Value {
    Value::Record(Box::new(record))
}

fn split_nanos(nanos: i64) -> prost_types::Duration {
    prost_types::Duration {
        seconds: nanos / 1_000_000_000,
        nanos: (nanos % 1_000_000_000) as i32,
    }
}

/// Validity window for a protobuf `Timestamp`: 0001-01-01T00:00:00Z to
/// 9999-12-31T23:59:59Z, with nanos in `[0, 999_999_999]`.
pub fn check_timestamp(ts: &prost_types::Timestamp) -> CopyResult<()> {
    const MIN_SECONDS: i64 = -62_135_596_800;
    const MAX_SECONDS: i64 = 253_402_300_799;
    if ts.seconds < MIN_SECONDS
        || ts.seconds > MAX_SECONDS
        || ts.nanos < 0
        || ts.nanos > 999_999_999
    {
        return Err(CopyError::InvalidTimestamp {
            seconds: ts.seconds,
            nanos: ts.nanos,
        });
    }
    Ok(())
}

/// Validity window for a protobuf `Duration`: about ten thousand years
/// either way, with nanos under a second and sign-consistent with the
/// seconds.
pub fn check_duration(d: &prost_types::Duration) -> CopyResult<()> {
    const MAX_SECONDS: i64 = 315_576_000_000;
    let invalid = d.seconds < -MAX_SECONDS
        || d.seconds > MAX_SECONDS
        || d.nanos < -999_999_999
        || d.nanos > 999_999_999
        || (d.seconds > 0 && d.nanos < 0)
        || (d.seconds < 0 && d.nanos > 0);
    if invalid {
        return Err(CopyError::InvalidDuration {
            seconds: d.seconds,
            nanos: d.nanos,
        });
    }
    Ok(())
}
