use thiserror::Error;

use std::io;

/// Which mutation an immutable record refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    Set,
    Unset,
}

impl core::fmt::Display for WriteOp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            WriteOp::Set => f.write_str("set"),
            WriteOp::Unset => f.write_str("unset"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[cfg(feature = "json")]
    #[error("serde_json error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// The normalizer reached a value outside its closed set of cases.
    #[error("the value is invalid to convert to JSON. type:{type_name}")]
    UnsupportedValueKind { type_name: String },

    /// Supplied field names that the type does not declare, in supplied order.
    #[error("not supported properties [{}]", .keys.join(","))]
    UnknownField { keys: Vec<String> },

    #[error("the property \"{name}\" does not exist")]
    UnknownProperty { name: String },

    #[error("the property \"{name}\" could not {op}")]
    ImmutableWrite { name: String, op: WriteOp },

    #[error("invalid value for \"{field}\". type:{type_name}")]
    InvalidFieldValue { field: String, type_name: String },

    #[error("invalid date \"{input}\": {message}")]
    InvalidDate { input: String, message: String },

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = core::result::Result<T, Error>;
