use std::sync::LazyLock;

use crate::record::Record;
use crate::schema::{JsonForm, Policy, Schema};
use crate::value::Fields;
use crate::Result;

/// Mutable, iterable over `string`, `null`, `boolean`, `datetime`.
pub static BASE_DATA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("BaseData")
        .field("string")
        .field("null")
        .field("boolean")
        .field("datetime")
        .build()
});

/// Same fields as [`BASE_DATA`], convertible field by field.
pub static SERIALIZABLE_DATA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("SerializableData")
        .field("string")
        .field("null")
        .field("boolean")
        .field("datetime")
        .json(JsonForm::Fields)
        .build()
});

/// Write-once variant with an extra `array` field.
pub static IMMUTABLE_DATA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("ImmutableData")
        .field("string")
        .field("null")
        .field("boolean")
        .field("datetime")
        .field("array")
        .policy(Policy::Immutable)
        .build()
});

pub fn base_data(fields: Fields) -> Result<Record> {
    Record::new(&BASE_DATA, fields)
}

pub fn serializable_data(fields: Fields) -> Result<Record> {
    Record::new(&SERIALIZABLE_DATA, fields)
}

pub fn immutable_data(fields: Fields) -> Result<Record> {
    Record::new(&IMMUTABLE_DATA, fields)
}
