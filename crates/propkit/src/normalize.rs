//! Conversion of arbitrary values into JSON-safe structures.
//!
//! Dispatch is closed: scalars pass through, containers recurse, objects are
//! tried as convertible, then timestamp, then iterable, then attribute bag.
//! Anything left over is an [`Error::UnsupportedValueKind`].

use std::rc::Rc;

use tracing::trace;

use crate::json::Json;
use crate::object::{JsonConvert, Object};
use crate::value::Value;
use crate::{Error, Result};

/// Shape used for iterable objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IterableShape {
    /// Keyed map of the iteration keys
    #[default]
    Map,
    /// Ordered list of the values; keys are dropped. Only the first iterable
    /// on each path is listed, the values inside it keep the keyed shape.
    List,
}

#[derive(Debug, Clone, Default)]
pub struct Options {
    pub iterable: IterableShape,
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: Options,
}

impl Normalizer {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn convert(&self, value: &Value) -> Result<Json> {
        match value {
            Value::Null => Ok(Json::Null),
            Value::Bool(b) => Ok(Json::Bool(*b)),
            Value::Number(n) => Ok(Json::Number(*n)),
            Value::String(s) => Ok(Json::String(s.clone())),
            Value::List(items) => items
                .iter()
                .map(|v| self.convert(v))
                .collect::<Result<Vec<_>>>()
                .map(Json::Array),
            Value::Map(map) => map
                .iter()
                .map(|(k, v)| Ok((k.to_string(), self.convert(v)?)))
                .collect::<Result<Vec<_>>>()
                .map(Json::Object),
            Value::Object(obj) => self.convert_object(obj.as_ref()),
        }
    }

    fn convert_object(&self, obj: &dyn Object) -> Result<Json> {
        if let Some(convertible) = obj.as_json_convert() {
            trace!(class = obj.class_name(), "delegating to object conversion");
            return convertible.json_convert();
        }
        if let Some(ts) = obj.as_timestamp() {
            return Ok(Json::String(ts.to_rfc3339()));
        }
        if let Some(entries) = obj.entries() {
            return match self.options.iterable {
                IterableShape::Map => self.convert_entries(entries).map(Json::Object),
                IterableShape::List => {
                    let rows = Normalizer::default();
                    entries
                        .iter()
                        .map(|(_, v)| rows.convert(v))
                        .collect::<Result<Vec<_>>>()
                        .map(Json::Array)
                }
            };
        }
        if let Some(properties) = obj.properties() {
            return self.convert_entries(properties).map(Json::Object);
        }
        Err(Error::UnsupportedValueKind {
            type_name: obj.class_name().to_string(),
        })
    }

    fn convert_entries(&self, entries: Vec<(String, Value)>) -> Result<Vec<(String, Json)>> {
        entries
            .into_iter()
            .map(|(k, v)| Ok((k, self.convert(&v)?)))
            .collect()
    }
}

/// Normalize with default options.
pub fn normalize(value: &Value) -> Result<Json> {
    Normalizer::default().convert(value)
}

/// Holds a value and converts it on demand. Being convertible itself, a
/// `Serializer` nested inside other values contributes its held value's
/// normalized form.
#[derive(Debug, Clone, Default)]
pub struct Serializer {
    value: Value,
    normalizer: Normalizer,
}

impl Serializer {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            normalizer: Normalizer::default(),
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.normalizer = Normalizer::new(options);
        self
    }

    /// Convert any value with this serializer's options.
    pub fn convert(&self, value: &Value) -> Result<Json> {
        self.normalizer.convert(value)
    }
}

impl JsonConvert for Serializer {
    fn json_convert(&self) -> Result<Json> {
        self.normalizer.convert(&self.value)
    }
}

impl Object for Serializer {
    fn class_name(&self) -> &str {
        "JsonSerializer"
    }

    fn clone_object(&self) -> Rc<dyn Object> {
        Rc::new(Self {
            value: self.value.deep_copy(),
            normalizer: self.normalizer.clone(),
        })
    }

    fn as_json_convert(&self) -> Option<&dyn JsonConvert> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{ArrayIter, Bag, Resource};
    use crate::timestamp::{Timestamp, TimestampKind};
    use crate::value::Map;

    fn abc() -> Map {
        [("a", "A"), ("b", "B"), ("c", "C")].into_iter().collect()
    }

    fn abc_json() -> Json {
        Json::Object(vec![
            ("a".into(), Json::from("A")),
            ("b".into(), Json::from("B")),
            ("c".into(), Json::from("C")),
        ])
    }

    #[test]
    fn scalars_are_identity() {
        assert_eq!(normalize(&Value::Null).unwrap(), Json::Null);
        assert_eq!(normalize(&Value::from("Foo")).unwrap(), Json::from("Foo"));
        assert_eq!(normalize(&Value::from(1i64)).unwrap(), Json::from(1i64));
        assert_eq!(normalize(&Value::from(false)).unwrap(), Json::Bool(false));
    }

    #[test]
    fn maps_and_lists_keep_shape() {
        assert_eq!(normalize(&Value::from(abc())).unwrap(), abc_json());
        let list = Value::from(vec![Value::from(1i64), Value::List(vec![])]);
        assert_eq!(
            normalize(&list).unwrap(),
            Json::Array(vec![Json::from(1i64), Json::Array(vec![])])
        );
    }

    #[test]
    fn iterable_renders_as_map_by_default() {
        let it = Value::object(ArrayIter::new(abc()));
        assert_eq!(normalize(&it).unwrap(), abc_json());
    }

    #[test]
    fn iterable_renders_as_list_when_configured() {
        let it = Value::object(ArrayIter::new(abc()));
        let normalizer = Normalizer::new(Options {
            iterable: IterableShape::List,
        });
        assert_eq!(
            normalizer.convert(&it).unwrap(),
            Json::Array(vec![Json::from("A"), Json::from("B"), Json::from("C")])
        );
    }

    #[test]
    fn bag_renders_as_map() {
        let bag = Value::object(Bag::from(abc()));
        assert_eq!(normalize(&bag).unwrap(), abc_json());
    }

    #[test]
    fn timestamp_kinds_render_identically() {
        let m = Timestamp::from_unix(1_700_000_000, TimestampKind::Mutable).unwrap();
        let i = m.with_kind(TimestampKind::Immutable);
        let a = normalize(&Value::from(m)).unwrap();
        let b = normalize(&Value::from(i)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, Json::from("2023-11-14T22:13:20+00:00"));
    }

    #[test]
    fn serializer_delegates_to_held_value() {
        let nested = Value::object(Serializer::new(abc()));
        let outer = Serializer::new(nested);
        assert_eq!(outer.json_convert().unwrap(), abc_json());
    }

    #[test]
    fn resource_is_unsupported() {
        let err = normalize(&Value::object(Resource::new("PDO"))).unwrap_err();
        match err {
            Error::UnsupportedValueKind { type_name } => assert_eq!(type_name, "PDO"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unsupported_value_deep_inside_fails_whole_conversion() {
        let mut map = abc();
        map.insert("conn", Value::object(Resource::new("PDO")));
        assert!(normalize(&Value::from(vec![Value::from(map)])).is_err());
    }
}
