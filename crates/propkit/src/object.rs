//! Runtime objects and the capabilities the normalizer probes for.

use std::fmt;
use std::rc::Rc;

use crate::Result;
use crate::json::Json;
use crate::timestamp::Timestamp;
use crate::value::{Map, Value};

/// Self-describing conversion to a normalized value.
pub trait JsonConvert {
    fn json_convert(&self) -> Result<Json>;
}

/// A non-container runtime value.
///
/// Every capability defaults to absent. An object that reports none of them
/// cannot be normalized.
pub trait Object: fmt::Debug {
    fn class_name(&self) -> &str;

    /// Deep copy used for defensive copies.
    fn clone_object(&self) -> Rc<dyn Object>;

    fn as_json_convert(&self) -> Option<&dyn JsonConvert> {
        None
    }

    fn as_timestamp(&self) -> Option<&Timestamp> {
        None
    }

    /// Key/value pairs yielded by iterating the object.
    fn entries(&self) -> Option<Vec<(String, Value)>> {
        None
    }

    /// Public attributes of a plain attribute bag.
    fn properties(&self) -> Option<Vec<(String, Value)>> {
        None
    }
}

/// Plain attribute bag.
#[derive(Debug, Clone, Default)]
pub struct Bag {
    attributes: Map,
}

impl Bag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}

impl From<Map> for Bag {
    fn from(attributes: Map) -> Self {
        Self { attributes }
    }
}

impl Object for Bag {
    fn class_name(&self) -> &str {
        "stdClass"
    }

    fn clone_object(&self) -> Rc<dyn Object> {
        Rc::new(self.clone())
    }

    fn properties(&self) -> Option<Vec<(String, Value)>> {
        Some(
            self.attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }
}

/// Iterable view over a map.
#[derive(Debug, Clone, Default)]
pub struct ArrayIter {
    items: Map,
}

impl ArrayIter {
    pub fn new(items: Map) -> Self {
        Self { items }
    }

    /// Iterable over a list; keys are the element positions.
    pub fn from_list(items: Vec<Value>) -> Self {
        Self {
            items: items
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
        }
    }
}

impl Object for ArrayIter {
    fn class_name(&self) -> &str {
        "ArrayIterator"
    }

    fn clone_object(&self) -> Rc<dyn Object> {
        Rc::new(self.clone())
    }

    fn entries(&self) -> Option<Vec<(String, Value)>> {
        Some(
            self.items
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }
}

type Callback = Rc<dyn Fn(Value) -> Value>;

/// Iterable that passes every value of an inner iterable through a callback.
#[derive(Clone)]
pub struct CallbackIter {
    inner: Rc<dyn Object>,
    callback: Callback,
}

impl CallbackIter {
    pub fn new(inner: Rc<dyn Object>, callback: impl Fn(Value) -> Value + 'static) -> Self {
        Self {
            inner,
            callback: Rc::new(callback),
        }
    }
}

impl fmt::Debug for CallbackIter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackIter")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl Object for CallbackIter {
    fn class_name(&self) -> &str {
        "CallbackIterator"
    }

    fn clone_object(&self) -> Rc<dyn Object> {
        Rc::new(Self {
            inner: self.inner.clone_object(),
            callback: Rc::clone(&self.callback),
        })
    }

    fn entries(&self) -> Option<Vec<(String, Value)>> {
        let entries = self.inner.entries()?;
        Some(
            entries
                .into_iter()
                .map(|(k, v)| (k, (self.callback)(v)))
                .collect(),
        )
    }
}

/// Opaque live handle such as a database connection. Never normalizes.
#[derive(Debug, Clone)]
pub struct Resource {
    kind: String,
}

impl Resource {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

impl Object for Resource {
    fn class_name(&self) -> &str {
        &self.kind
    }

    fn clone_object(&self) -> Rc<dyn Object> {
        Rc::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_iter_maps_values_and_keeps_keys() {
        let inner: Rc<dyn Object> = Rc::new(ArrayIter::from_list(vec![
            Value::from(1),
            Value::from(2),
        ]));
        let doubled = CallbackIter::new(inner, |v| Value::from(v.as_i64().unwrap_or(0) * 2));
        let entries = doubled.entries().unwrap_or_default();
        let got: Vec<(String, Option<i64>)> =
            entries.into_iter().map(|(k, v)| (k, v.as_i64())).collect();
        assert_eq!(
            got,
            vec![("0".to_string(), Some(2)), ("1".to_string(), Some(4))]
        );
    }

    #[test]
    fn bag_copy_is_a_new_handle() {
        let bag = Value::object(Bag::new().with("a", "A"));
        let copy = bag.deep_copy();
        assert!(!bag.ptr_eq(&copy));
        assert!(bag.ptr_eq(&bag.clone()));
    }

    #[test]
    fn resource_reports_no_capability() {
        let handle = Resource::new("PDO");
        assert!(handle.entries().is_none());
        assert!(handle.properties().is_none());
        assert!(handle.as_json_convert().is_none());
        assert!(handle.as_timestamp().is_none());
    }
}
