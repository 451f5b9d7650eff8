//! Ready-made data-holder types.
//!
//! Each type is a [`Schema`](crate::schema::Schema) plus a constructor; they
//! differ only in policy, JSON form and the setters and getters they register.

pub mod base;
pub mod format;
pub mod user;

use crate::timestamp::{Timestamp, TimestampKind, check_format};
use crate::value::Value;
use crate::{Error, Result};

/// Member of a map-valued option field, if both are present.
pub(crate) fn option<'a>(options: Option<&'a Value>, name: &str) -> Option<&'a Value> {
    options
        .and_then(Value::as_map)
        .and_then(|m| m.get(name))
        .filter(|v| !v.is_null())
}

/// Read a timestamp out of a timestamp object, Unix seconds or date text.
pub(crate) fn coerce_timestamp(field: &str, value: &Value, kind: TimestampKind) -> Result<Timestamp> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(secs) => Timestamp::from_unix(secs, kind),
            None => Err(invalid(field, value)),
        },
        Value::String(s) => Timestamp::parse(s, kind),
        other => other
            .as_timestamp()
            .map(|ts| ts.with_kind(kind))
            .ok_or_else(|| invalid(field, value)),
    }
}

/// Accept `Null` or a renderable strftime pattern.
pub(crate) fn check_date_format(field: &str, value: &Value) -> Result<()> {
    match value {
        Value::Null => Ok(()),
        Value::String(pattern) => check_format(pattern),
        other => Err(invalid(field, other)),
    }
}

fn invalid(field: &str, value: &Value) -> Error {
    Error::InvalidFieldValue {
        field: field.to_string(),
        type_name: value.type_name(),
    }
}
