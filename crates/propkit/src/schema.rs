//! Field-access tables for data-holder types.
//!
//! A [`Schema`] is built once per type and lists the declared fields in
//! declaration order together with the optional getter, setter and unsetter
//! registered for each. Lookups go through this table instead of through
//! name conventions.

use std::fmt;

use crate::json::Json;
use crate::record::{Record, Slots};
use crate::value::Value;
use crate::Result;

pub type Getter = fn(&Record) -> Result<Value>;
pub type Setter = fn(&mut Slots<'_>, Value) -> Result<()>;
pub type Unsetter = fn(&mut Slots<'_>) -> Result<()>;
pub type Converter = fn(&Record) -> Result<Json>;

/// Whether fields may be written after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    #[default]
    Mutable,
    Immutable,
}

/// How a record presents itself to the normalizer.
#[derive(Clone, Copy, Default)]
pub enum JsonForm {
    /// Iterable over its raw fields only
    #[default]
    Iterable,
    /// Convertible: every raw field normalized
    Fields,
    /// Convertible through a type-specific function
    Custom(Converter),
}

impl fmt::Debug for JsonForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonForm::Iterable => f.write_str("Iterable"),
            JsonForm::Fields => f.write_str("Fields"),
            JsonForm::Custom(_) => f.write_str("Custom"),
        }
    }
}

#[derive(Clone, Copy)]
pub struct Field {
    name: &'static str,
    getter: Option<Getter>,
    setter: Option<Setter>,
    unsetter: Option<Unsetter>,
}

impl Field {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            getter: None,
            setter: None,
            unsetter: None,
        }
    }

    pub fn getter(mut self, getter: Getter) -> Self {
        self.getter = Some(getter);
        self
    }

    pub fn setter(mut self, setter: Setter) -> Self {
        self.setter = Some(setter);
        self
    }

    pub fn unsetter(mut self, unsetter: Unsetter) -> Self {
        self.unsetter = Some(unsetter);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn setter_fn(&self) -> Option<Setter> {
        self.setter
    }

    pub(crate) fn unsetter_fn(&self) -> Option<Unsetter> {
        self.unsetter
    }
}

/// Read-only name resolved only through its getter.
#[derive(Clone, Copy)]
struct Accessor {
    name: &'static str,
    getter: Getter,
}

pub struct Schema {
    name: &'static str,
    fields: Vec<Field>,
    accessors: Vec<Accessor>,
    policy: Policy,
    json: JsonForm,
}

impl Schema {
    pub fn builder(name: &'static str) -> SchemaBuilder {
        SchemaBuilder {
            schema: Schema {
                name,
                fields: Vec::new(),
                accessors: Vec::new(),
                policy: Policy::default(),
                json: JsonForm::default(),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn json_form(&self) -> JsonForm {
        self.json
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Getter for a declared field or a virtual accessor.
    pub(crate) fn getter(&self, name: &str) -> Option<Getter> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.getter)
            .or_else(|| {
                self.accessors
                    .iter()
                    .find(|a| a.name == name)
                    .map(|a| a.getter)
            })
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("fields", &self.field_names().collect::<Vec<_>>())
            .field("policy", &self.policy)
            .field("json", &self.json)
            .finish()
    }
}

pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// Declare a field. Declaration order is initialization and iteration order.
    pub fn field(mut self, field: impl Into<Field>) -> Self {
        let field = field.into();
        debug_assert!(
            !self.schema.declares(field.name),
            "field {} declared twice",
            field.name
        );
        self.schema.fields.push(field);
        self
    }

    pub fn accessor(mut self, name: &'static str, getter: Getter) -> Self {
        self.schema.accessors.push(Accessor { name, getter });
        self
    }

    pub fn policy(mut self, policy: Policy) -> Self {
        self.schema.policy = policy;
        self
    }

    pub fn json(mut self, form: JsonForm) -> Self {
        self.schema.json = form;
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}

impl From<&'static str> for Field {
    fn from(name: &'static str) -> Self {
        Field::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shout(record: &Record) -> Result<Value> {
        let name = record.raw("name").and_then(Value::as_str).unwrap_or("");
        Ok(Value::from(name.to_uppercase()))
    }

    #[test]
    fn positions_follow_declaration_order() {
        let schema = Schema::builder("Pair").field("a").field("b").build();
        assert_eq!(schema.position("a"), Some(0));
        assert_eq!(schema.position("b"), Some(1));
        assert_eq!(schema.position("c"), None);
        assert_eq!(schema.field_names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn accessor_getters_are_found_but_not_declared() {
        let schema = Schema::builder("Named")
            .field("name")
            .accessor("loudName", shout)
            .build();
        assert!(schema.getter("loudName").is_some());
        assert!(schema.getter("name").is_none());
        assert!(!schema.declares("loudName"));
    }
}
