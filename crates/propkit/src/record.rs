use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::json::Json;
use crate::normalize::normalize;
use crate::object::{JsonConvert, Object};
use crate::schema::{JsonForm, Policy, Schema};
use crate::value::{Fields, Value};
use crate::{Error, Result, WriteOp};

/// A data-holder instance: one slot per declared field of its schema.
pub struct Record {
    schema: &'static Schema,
    slots: Vec<Value>,
}

/// Write access to a record's slots, handed to setters and unsetters.
///
/// Slots bypass getters, setters and the write policy; they only exist while
/// a record is being constructed or written through its policy.
pub struct Slots<'a> {
    schema: &'static Schema,
    slots: &'a mut [Value],
}

impl Slots<'_> {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema.position(name).map(|idx| &self.slots[idx])
    }

    pub fn put(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let idx = self
            .schema
            .position(name)
            .ok_or_else(|| Error::UnknownProperty {
                name: name.to_string(),
            })?;
        self.slots[idx] = value.into();
        Ok(())
    }
}

impl Record {
    /// Build a record from supplied field values.
    ///
    /// Every declared field starts as `Null`. Supplied objects are copied
    /// before they are stored, and a registered setter takes the value in
    /// place of direct assignment. Names the schema does not declare fail the
    /// whole construction with [`Error::UnknownField`].
    pub fn new(schema: &'static Schema, fields: Fields) -> Result<Self> {
        let mut record = Record {
            schema,
            slots: vec![Value::Null; schema.fields().len()],
        };
        let mut supplied = fields;
        for (idx, field) in schema.fields().iter().enumerate() {
            let Some(value) = supplied.remove(field.name()) else {
                continue;
            };
            let value = if value.is_object() {
                value.deep_copy()
            } else {
                value
            };
            record.store(idx, value)?;
        }
        if !supplied.is_empty() {
            let keys: Vec<String> = supplied.keys().map(str::to_string).collect();
            debug!(record = schema.name(), ?keys, "rejected unknown fields");
            return Err(Error::UnknownField { keys });
        }
        debug!(
            record = schema.name(),
            fields = schema.fields().len(),
            "record initialized"
        );
        Ok(record)
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Stored value of a declared field, bypassing any getter.
    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.schema.position(name).map(|idx| &self.slots[idx])
    }

    /// Getter if one is registered, else the stored value.
    pub fn get(&self, name: &str) -> Result<Value> {
        if let Some(getter) = self.schema.getter(name) {
            return getter(self);
        }
        self.raw(name).cloned().ok_or_else(|| Error::UnknownProperty {
            name: name.to_string(),
        })
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let idx = self.writable(name, WriteOp::Set)?;
        self.store(idx, value.into())
    }

    pub fn unset(&mut self, name: &str) -> Result<()> {
        let idx = self.writable(name, WriteOp::Unset)?;
        match self.schema.fields()[idx].unsetter_fn() {
            Some(unsetter) => unsetter(&mut self.slots_mut()),
            None => {
                self.slots[idx] = Value::Null;
                Ok(())
            }
        }
    }

    /// Declared and holding something other than `Null`.
    pub fn isset(&self, name: &str) -> bool {
        self.raw(name).is_some_and(|v| !v.is_null())
    }

    /// Names written when the record is serialized, in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.schema.field_names()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
        self.schema.field_names().zip(self.slots.iter())
    }

    /// Raw field values, accepted back by [`Record::new`].
    pub fn to_fields(&self) -> Fields {
        self.iter().map(|(k, v)| (k, v.clone())).collect()
    }

    fn writable(&self, name: &str, op: WriteOp) -> Result<usize> {
        let idx = self
            .schema
            .position(name)
            .ok_or_else(|| Error::UnknownProperty {
                name: name.to_string(),
            })?;
        if self.schema.policy() == Policy::Immutable {
            return Err(Error::ImmutableWrite {
                name: name.to_string(),
                op,
            });
        }
        Ok(idx)
    }

    fn store(&mut self, idx: usize, value: Value) -> Result<()> {
        let field = self.schema.fields()[idx];
        match field.setter_fn() {
            Some(setter) => {
                trace!(record = self.schema.name(), field = field.name(), "routing through setter");
                setter(&mut self.slots_mut(), value)
            }
            None => {
                self.slots[idx] = value;
                Ok(())
            }
        }
    }

    fn slots_mut(&mut self) -> Slots<'_> {
        Slots {
            schema: self.schema,
            slots: &mut self.slots,
        }
    }
}

/// Object fields are copied, so clones never share objects with the source.
impl Clone for Record {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema,
            slots: self.slots.iter().map(Value::deep_copy).collect(),
        }
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.schema.name());
        for (name, value) in self.iter() {
            s.field(name, value);
        }
        s.finish()
    }
}

impl JsonConvert for Record {
    fn json_convert(&self) -> Result<Json> {
        match self.schema.json_form() {
            JsonForm::Custom(convert) => convert(self),
            JsonForm::Fields | JsonForm::Iterable => self
                .iter()
                .map(|(k, v)| Ok((k.to_string(), normalize(v)?)))
                .collect::<Result<Vec<_>>>()
                .map(Json::Object),
        }
    }
}

impl Object for Record {
    fn class_name(&self) -> &str {
        self.schema.name()
    }

    fn clone_object(&self) -> Rc<dyn Object> {
        Rc::new(self.clone())
    }

    fn as_json_convert(&self) -> Option<&dyn JsonConvert> {
        match self.schema.json_form() {
            JsonForm::Iterable => None,
            JsonForm::Fields | JsonForm::Custom(_) => Some(self),
        }
    }

    fn entries(&self) -> Option<Vec<(String, Value)>> {
        Some(self.iter().map(|(k, v)| (k.to_string(), v.clone())).collect())
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::object(record)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use super::*;
    use crate::object::Bag;
    use crate::schema::Field;

    static PAIR: LazyLock<Schema> =
        LazyLock::new(|| Schema::builder("Pair").field("string").field("boolean").build());

    static FROZEN: LazyLock<Schema> = LazyLock::new(|| {
        Schema::builder("Frozen")
            .field("string")
            .policy(Policy::Immutable)
            .build()
    });

    fn trim_string(slots: &mut Slots<'_>, value: Value) -> Result<()> {
        let trimmed = value.as_str().map(|s| s.trim().to_string());
        slots.put("name", Value::from(trimmed))
    }

    static TRIMMED: LazyLock<Schema> = LazyLock::new(|| {
        Schema::builder("Trimmed")
            .field(Field::new("name").setter(trim_string))
            .build()
    });

    fn fields(pairs: Vec<(&str, Value)>) -> Fields {
        pairs.into_iter().collect()
    }

    #[test]
    fn unsupplied_fields_start_null() {
        let record = Record::new(&PAIR, Fields::new()).unwrap();
        assert!(record.raw("string").is_some_and(Value::is_null));
        assert!(!record.isset("boolean"));
    }

    #[test]
    fn unknown_keys_are_reported_in_supplied_order() {
        let err = Record::new(
            &PAIR,
            fields(vec![
                ("zeta", Value::from(1)),
                ("string", Value::from("x")),
                ("alpha", Value::from(2)),
            ]),
        )
        .unwrap_err();
        match err {
            Error::UnknownField { keys } => assert_eq!(keys, vec!["zeta", "alpha"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn setter_runs_during_construction() {
        let record = Record::new(&TRIMMED, fields(vec![("name", Value::from("  Foo "))])).unwrap();
        assert_eq!(record.get("name").unwrap().as_str(), Some("Foo"));
    }

    #[test]
    fn objects_are_copied_on_construction() {
        let bag = Value::object(Bag::new().with("a", 1));
        let record = Record::new(&PAIR, fields(vec![("string", bag.clone())])).unwrap();
        let stored = record.raw("string").cloned().unwrap_or_default();
        assert!(stored.is_object());
        assert!(!stored.ptr_eq(&bag));
    }

    #[test]
    fn mutable_records_accept_writes() {
        let mut record = Record::new(&PAIR, Fields::new()).unwrap();
        record.set("boolean", true).unwrap();
        assert_eq!(record.get("boolean").unwrap().as_bool(), Some(true));
        record.unset("boolean").unwrap();
        assert!(!record.isset("boolean"));
    }

    #[test]
    fn immutable_records_reject_writes_but_allow_reads() {
        let mut record = Record::new(&FROZEN, fields(vec![("string", Value::from("Foo"))])).unwrap();
        assert!(matches!(
            record.set("string", "Bar"),
            Err(Error::ImmutableWrite { op: WriteOp::Set, .. })
        ));
        assert!(matches!(
            record.unset("string"),
            Err(Error::ImmutableWrite { op: WriteOp::Unset, .. })
        ));
        assert!(matches!(
            record.set("missing", "Bar"),
            Err(Error::UnknownProperty { .. })
        ));
        assert_eq!(record.get("string").unwrap().as_str(), Some("Foo"));
    }

    #[test]
    fn clone_copies_object_fields() {
        let bag = Value::object(Bag::new());
        let record = Record::new(&PAIR, fields(vec![("string", bag)])).unwrap();
        let copy = record.clone();
        let a = record.raw("string").cloned().unwrap_or_default();
        let b = copy.raw("string").cloned().unwrap_or_default();
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn export_feeds_back_into_construction() {
        let record = Record::new(
            &PAIR,
            fields(vec![("string", Value::from("Foo")), ("boolean", Value::from(true))]),
        )
        .unwrap();
        let again = Record::new(&PAIR, record.to_fields()).unwrap();
        assert_eq!(again.get("string").unwrap().as_str(), Some("Foo"));
        assert_eq!(again.field_names().collect::<Vec<_>>(), vec!["string", "boolean"]);
    }
}
