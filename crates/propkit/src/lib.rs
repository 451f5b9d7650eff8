#![doc = include_str!("../README.md")]

pub mod error;
pub mod value;
pub mod object;
pub mod timestamp;
pub mod json;
pub mod normalize;
pub mod schema;
pub mod record;
pub mod access;
pub mod data;

pub use crate::access::ArrayAccess;
pub use crate::error::{Error, Result, WriteOp};
pub use crate::json::Json;
pub use crate::normalize::{IterableShape, Normalizer, Options, Serializer, normalize};
pub use crate::object::{ArrayIter, Bag, CallbackIter, JsonConvert, Object, Resource};
pub use crate::record::{Record, Slots};
pub use crate::schema::{Field, JsonForm, Policy, Schema};
pub use crate::timestamp::{Timestamp, TimestampKind};
pub use crate::value::{Fields, Map, Number, Value};

#[cfg(feature = "json")]
use std::io::{Read, Write};

/// Normalize `value` and encode it as compact JSON text.
#[cfg(feature = "json")]
pub fn to_string(value: &Value) -> Result<String> {
    let json = normalize(value)?;
    Ok(serde_json::to_string(&json)?)
}

#[cfg(feature = "json")]
pub fn to_string_pretty(value: &Value) -> Result<String> {
    let json = normalize(value)?;
    Ok(serde_json::to_string_pretty(&json)?)
}

#[cfg(feature = "json")]
pub fn to_writer<W: Write>(mut writer: W, value: &Value) -> Result<()> {
    let s = to_string(value)?;
    writer.write_all(s.as_bytes())?;
    Ok(())
}

/// Decode JSON text into a normalized value.
#[cfg(feature = "json")]
pub fn from_str(s: &str) -> Result<Json> {
    let v: serde_json::Value = serde_json::from_str(s)?;
    Ok(Json::from(v))
}

#[cfg(feature = "json")]
pub fn from_reader<R: Read>(mut reader: R) -> Result<Json> {
    let mut s = String::new();
    reader.read_to_string(&mut s)?;
    from_str(&s)
}
