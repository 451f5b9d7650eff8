//! Normalized values: the node types of JSON and nothing else.

use crate::value::{Map, Number, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Json {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Json>),
    Object(Vec<(String, Json)>),
}

impl Json {
    /// Member lookup on an object node.
    pub fn get(&self, key: &str) -> Option<&Json> {
        match self {
            Json::Object(members) => members.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Json::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Json]> {
        match self {
            Json::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Json {
    fn from(s: &str) -> Self {
        Json::String(s.to_string())
    }
}

impl From<String> for Json {
    fn from(s: String) -> Self {
        Json::String(s)
    }
}

impl From<bool> for Json {
    fn from(b: bool) -> Self {
        Json::Bool(b)
    }
}

impl From<i64> for Json {
    fn from(i: i64) -> Self {
        Json::Number(Number::I64(i))
    }
}

/// Lift normalized data back into the value model. Objects become maps.
impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => Value::Number(n),
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(members) => Value::Map(
                members
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<Map>(),
            ),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Json {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::{SerializeMap, SerializeSeq};
        match self {
            Json::Null => serializer.serialize_unit(),
            Json::Bool(b) => serializer.serialize_bool(*b),
            Json::Number(Number::I64(i)) => serializer.serialize_i64(*i),
            Json::Number(Number::U64(u)) => serializer.serialize_u64(*u),
            Json::Number(Number::F64(f)) => serializer.serialize_f64(*f),
            Json::String(s) => serializer.serialize_str(s),
            Json::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Json::Object(members) => {
                let mut map = serializer.serialize_map(Some(members.len()))?;
                for (k, v) in members {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(feature = "json")]
mod interop {
    use super::Json;
    use crate::value::{Number, Value};

    impl From<serde_json::Value> for Json {
        fn from(v: serde_json::Value) -> Self {
            match v {
                serde_json::Value::Null => Json::Null,
                serde_json::Value::Bool(b) => Json::Bool(b),
                serde_json::Value::Number(n) => Json::Number(number_from_json(&n)),
                serde_json::Value::String(s) => Json::String(s),
                serde_json::Value::Array(items) => {
                    Json::Array(items.into_iter().map(Json::from).collect())
                }
                serde_json::Value::Object(members) => Json::Object(
                    members
                        .into_iter()
                        .map(|(k, v)| (k, Json::from(v)))
                        .collect(),
                ),
            }
        }
    }

    impl From<Json> for serde_json::Value {
        fn from(j: Json) -> Self {
            match j {
                Json::Null => serde_json::Value::Null,
                Json::Bool(b) => serde_json::Value::Bool(b),
                Json::Number(Number::I64(i)) => serde_json::Value::from(i),
                Json::Number(Number::U64(u)) => serde_json::Value::from(u),
                // Non-finite floats have no JSON form
                Json::Number(Number::F64(f)) => serde_json::Number::from_f64(f)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null),
                Json::String(s) => serde_json::Value::String(s),
                Json::Array(items) => {
                    serde_json::Value::Array(items.into_iter().map(Into::into).collect())
                }
                Json::Object(members) => serde_json::Value::Object(
                    members.into_iter().map(|(k, v)| (k, v.into())).collect(),
                ),
            }
        }
    }

    impl From<serde_json::Value> for Value {
        fn from(v: serde_json::Value) -> Self {
            Value::from(Json::from(v))
        }
    }

    fn number_from_json(n: &serde_json::Number) -> Number {
        if let Some(i) = n.as_i64() {
            Number::I64(i)
        } else if let Some(u) = n.as_u64() {
            Number::U64(u)
        } else {
            Number::F64(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}
