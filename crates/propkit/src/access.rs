//! Index-style access over named fields.

use crate::record::Record;
use crate::value::Value;
use crate::Result;

/// Key-based read, write, existence check and delete.
///
/// Implementations resolve through the same getters, setters and write policy
/// as named property access.
pub trait ArrayAccess {
    fn offset_exists(&self, key: &str) -> bool;
    fn offset_get(&self, key: &str) -> Result<Value>;
    fn offset_set(&mut self, key: &str, value: Value) -> Result<()>;
    fn offset_unset(&mut self, key: &str) -> Result<()>;
}

impl ArrayAccess for Record {
    fn offset_exists(&self, key: &str) -> bool {
        self.isset(key)
    }

    fn offset_get(&self, key: &str) -> Result<Value> {
        self.get(key)
    }

    fn offset_set(&mut self, key: &str, value: Value) -> Result<()> {
        self.set(key, value)
    }

    fn offset_unset(&mut self, key: &str) -> Result<()> {
        self.unset(key)
    }
}
