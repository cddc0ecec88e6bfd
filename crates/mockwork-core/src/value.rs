//! Dynamic values passed to and returned from mock methods
//!
//! [`Value::Undef`] is the absent marker: it is what a stored-value setter
//! returns and what a slot declared without a value reads back as.

use crate::mock::Mock;
use std::collections::BTreeMap;

/// Value carried through a mock call
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent / undefined
    #[default]
    Undef,

    /// Boolean
    Bool(bool),

    /// Signed integer
    Int(i64),

    /// Floating point number
    Float(f64),

    /// String
    Str(String),

    /// Ordered sequence
    List(Vec<Value>),

    /// String-keyed map
    Map(BTreeMap<String, Value>),

    /// Another mock (chain links, collaborators)
    Mock(Mock),
}

impl Value {
    /// Returns true for [`Value::Undef`]
    #[inline]
    #[must_use]
    pub fn is_undef(&self) -> bool {
        matches!(self, Self::Undef)
    }

    /// Borrow as string slice
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Float value (integers widen)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Boolean value
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrow as list
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow as mock
    #[must_use]
    pub fn as_mock(&self) -> Option<&Mock> {
        match self {
            Self::Mock(mock) => Some(mock),
            _ => None,
        }
    }

    /// Take the mock out of the value
    #[must_use]
    pub fn into_mock(self) -> Option<Mock> {
        match self {
            Self::Mock(mock) => Some(mock),
            _ => None,
        }
    }

    /// Flatten into a sequence: lists are unpacked, `Undef` is empty,
    /// anything else is a one-element sequence.
    #[must_use]
    pub fn into_list(self) -> Vec<Value> {
        match self {
            Self::Undef => Vec::new(),
            Self::List(items) => items,
            other => vec![other],
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Mock> for Value {
    fn from(mock: Mock) -> Self {
        Self::Mock(mock)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Undef, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Self::Undef,
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float))
                .unwrap_or(Self::Undef),
            Json::String(s) => Self::Str(s),
            Json::Array(items) => Self::List(items.into_iter().map(Into::into).collect()),
            Json::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}
