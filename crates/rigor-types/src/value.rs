//! Runtime values
//!
//! `Value` is the dynamic value representation passed through call
//! boundaries and stored in instance attribute maps. Objects are opaque
//! shared handles; the engine implements [`ObjectHandle`] for its instances.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque object handle stored inside [`Value::Object`]
pub trait ObjectHandle: fmt::Debug + Send + Sync {
    /// Exact runtime class name
    fn class_name(&self) -> &str;

    /// Check if `class` appears in this object's resolution order
    fn is_instance_of(&self, class: &str) -> bool;

    /// Upcast for downcasting back to the concrete handle type
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// A dynamically-typed runtime value
#[derive(Debug, Clone)]
pub enum Value {
    /// The absent value
    None,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// String
    Str(String),
    /// Byte string
    Bytes(Vec<u8>),
    /// Ordered, growable sequence
    List(Vec<Value>),
    /// Fixed sequence
    Tuple(Vec<Value>),
    /// Unordered collection (insertion order kept)
    Set(Vec<Value>),
    /// Key/value pairs (insertion order kept)
    Dict(Vec<(Value, Value)>),
    /// Shared object handle
    Object(Arc<dyn ObjectHandle>),
}

impl Value {
    /// Create a string value
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// Check if this is the absent value
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Get the integer if this is an int
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the float if this is a float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get the boolean if this is a bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the string slice if this is a str
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the object handle if this is an object
    pub fn as_object(&self) -> Option<&Arc<dyn ObjectHandle>> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::List(a), Value::List(b))
            | (Value::Tuple(a), Value::Tuple(b))
            | (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => a == b,
            // Objects compare by identity
            (Value::Object(a), Value::Object(b)) => {
                std::ptr::eq(Arc::as_ptr(a) as *const u8, Arc::as_ptr(b) as *const u8)
            }
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::None
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::None)
    }
}
