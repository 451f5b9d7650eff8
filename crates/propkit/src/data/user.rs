use std::sync::LazyLock;

use chrono_tz::Tz;

use crate::data::{check_date_format, coerce_timestamp};
use crate::json::Json;
use crate::normalize::normalize;
use crate::record::{Record, Slots};
use crate::schema::{Field, JsonForm, Policy, Schema};
use crate::timestamp::{DEFAULT_DATE_FORMAT, Timestamp, TimestampKind, parse_zone};
use crate::value::{Fields, Value};
use crate::{Error, Result};

/// Write-once user whose `createdAt` is an immutable timestamp.
pub static USER: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("User")
        .field("userId")
        .field("userName")
        .field(
            Field::new("createdAt")
                .setter(set_created_at)
                .getter(created_at),
        )
        .field(Field::new("timezone").setter(set_timezone))
        .field(Field::new("dateFormat").setter(set_date_format))
        .accessor("createdAtAsString", created_at_as_string)
        .policy(Policy::Immutable)
        .json(JsonForm::Custom(user_json))
        .build()
});

/// Mutable user whose `createdAt` is stored as Unix seconds and read back as
/// formatted text.
pub static MUTABLE_USER: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("MutableUser")
        .field("userId")
        .field("userName")
        .field(
            Field::new("createdAt")
                .setter(set_created_at_seconds)
                .getter(created_at_as_string),
        )
        .field(Field::new("timezone").setter(set_timezone))
        .field(Field::new("dateFormat").setter(set_date_format))
        .json(JsonForm::Custom(user_json))
        .build()
});

/// Build a [`USER`]. An explicit zone or format wins over a supplied field;
/// the format falls back to `%Y-%m-%d %H:%M:%S`.
pub fn user(fields: Fields, timezone: Option<Tz>, date_format: Option<&str>) -> Result<Record> {
    Record::new(&USER, with_display(fields, timezone, date_format))
}

pub fn mutable_user(
    fields: Fields,
    timezone: Option<Tz>,
    date_format: Option<&str>,
) -> Result<Record> {
    Record::new(&MUTABLE_USER, with_display(fields, timezone, date_format))
}

fn with_display(mut fields: Fields, timezone: Option<Tz>, date_format: Option<&str>) -> Fields {
    if let Some(zone) = timezone {
        fields.insert("timezone", zone.name());
    }
    match date_format {
        Some(pattern) => {
            fields.insert("dateFormat", pattern);
        }
        None if fields.get("dateFormat").is_none_or(Value::is_null) => {
            fields.insert("dateFormat", DEFAULT_DATE_FORMAT);
        }
        None => {}
    }
    fields
}

fn set_created_at(slots: &mut Slots<'_>, value: Value) -> Result<()> {
    if value.is_null() {
        return slots.put("createdAt", Value::Null);
    }
    let ts = coerce_timestamp("createdAt", &value, TimestampKind::Immutable)?;
    slots.put("createdAt", ts)
}

fn set_created_at_seconds(slots: &mut Slots<'_>, value: Value) -> Result<()> {
    if value.is_null() {
        return slots.put("createdAt", Value::Null);
    }
    let ts = coerce_timestamp("createdAt", &value, TimestampKind::Mutable)?;
    slots.put("createdAt", ts.unix())
}

fn set_timezone(slots: &mut Slots<'_>, value: Value) -> Result<()> {
    match &value {
        Value::Null => {}
        Value::String(name) => {
            parse_zone(name)?;
        }
        other => {
            return Err(Error::InvalidFieldValue {
                field: "timezone".into(),
                type_name: other.type_name(),
            });
        }
    }
    slots.put("timezone", value)
}

fn set_date_format(slots: &mut Slots<'_>, value: Value) -> Result<()> {
    check_date_format("dateFormat", &value)?;
    slots.put("dateFormat", value)
}

/// Stored instant, moved to the record's zone when one is set.
fn zoned_created_at(record: &Record) -> Result<Option<Timestamp>> {
    let ts = match record.raw("createdAt") {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(secs) => Timestamp::from_unix(secs, TimestampKind::Mutable)?,
            None => return Ok(None),
        },
        Some(other) => match other.as_timestamp() {
            Some(ts) => *ts,
            None => return Ok(None),
        },
        None => return Ok(None),
    };
    match record.raw("timezone").and_then(Value::as_str) {
        Some(name) => Ok(Some(ts.in_zone(parse_zone(name)?))),
        None => Ok(Some(ts)),
    }
}

fn created_at(record: &Record) -> Result<Value> {
    Ok(Value::from(zoned_created_at(record)?))
}

fn created_at_as_string(record: &Record) -> Result<Value> {
    let Some(ts) = zoned_created_at(record)? else {
        return Ok(Value::Null);
    };
    let pattern = record
        .raw("dateFormat")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_DATE_FORMAT);
    Ok(Value::from(ts.format(pattern)?))
}

fn user_json(record: &Record) -> Result<Json> {
    let field = |name: &str| record.raw(name).map(normalize).unwrap_or(Ok(Json::Null));
    let created = match created_at_as_string(record)? {
        Value::String(s) => Json::String(s),
        _ => Json::Null,
    };
    Ok(Json::Object(vec![
        ("userId".into(), field("userId")?),
        ("userName".into(), field("userName")?),
        ("createdAt".into(), created),
    ]))
}
