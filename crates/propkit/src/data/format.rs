//! Write-once record holding a saved date and its display options.
//!
//! `options` is a map that may carry `timezone` (a zone name such as
//! `Asia/Tokyo`) and `dateTimeFormat` (a strftime pattern). It is declared
//! before `savedDate` so the date setter sees it.

use std::sync::LazyLock;

use crate::data::{check_date_format, coerce_timestamp, option};
use crate::record::{Record, Slots};
use crate::schema::{Field, Policy, Schema};
use crate::timestamp::{DEFAULT_DATE_FORMAT, TimestampKind, parse_zone};
use crate::value::{Fields, Value};
use crate::Result;

pub static FORMAT_IMMUTABLE_DATA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("FormatImmutableData")
        .field(Field::new("options").setter(set_options))
        .field(Field::new("savedDate").setter(set_saved_date))
        .accessor("savedDateAsString", saved_date_as_string)
        .policy(Policy::Immutable)
        .build()
});

pub fn format_immutable_data(fields: Fields) -> Result<Record> {
    Record::new(&FORMAT_IMMUTABLE_DATA, fields)
}

fn set_options(slots: &mut Slots<'_>, value: Value) -> Result<()> {
    if let Some(pattern) = option(Some(&value), "dateTimeFormat") {
        check_date_format("dateTimeFormat", pattern)?;
    }
    if let Some(zone) = option(Some(&value), "timezone").and_then(Value::as_str) {
        parse_zone(zone)?;
    }
    slots.put("options", value)
}

fn set_saved_date(slots: &mut Slots<'_>, value: Value) -> Result<()> {
    let mut saved = coerce_timestamp("savedDate", &value, TimestampKind::Mutable)?;
    if let Some(zone) = option(slots.get("options"), "timezone").and_then(Value::as_str) {
        saved = saved.in_zone(parse_zone(zone)?);
    }
    slots.put("savedDate", saved)
}

fn saved_date_as_string(record: &Record) -> Result<Value> {
    let Some(saved) = record.raw("savedDate").and_then(Value::as_timestamp) else {
        return Ok(Value::Null);
    };
    let pattern = option(record.raw("options"), "dateTimeFormat")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_DATE_FORMAT);
    Ok(Value::from(saved.format(pattern)?))
}
