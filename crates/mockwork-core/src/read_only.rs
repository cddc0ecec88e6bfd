//! Read-only method values

use crate::binder::{self, Handler, MethodValue};
use crate::error::MockError;
use crate::value::Value;

/// A fixed value that rejects writes when bound as a method
#[derive(Debug, Clone, PartialEq)]
pub struct ReadOnly {
    value: Value,
}

impl ReadOnly {
    /// Wrap a value
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The guarded value
    #[inline]
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Guard handler for `method`: reads return the value, any argument is a write.
    pub(crate) fn into_handler(self, method: &str) -> Handler {
        let method = method.to_string();
        let value = self.value;
        binder::handler_fn(move |mock, args| {
            if args.is_empty() {
                Ok(value.clone())
            } else {
                Err(MockError::ImmutableMethod {
                    type_name: mock.original_type_name().to_string(),
                    method: method.clone(),
                })
            }
        })
    }
}

/// Declare a read-only method value
///
/// ```
/// use mockwork_core::{make_read_only, MockBuilder, MockError, MockRegistry, Value};
/// use std::sync::Arc;
///
/// let mock = MockBuilder::new("HTTP::Request")
///     .registry(Arc::new(MockRegistry::new()))
///     .method("uri", make_read_only("/foo/bar"))
///     .build()
///     .unwrap();
///
/// assert_eq!(mock.get("uri").unwrap(), Value::from("/foo/bar"));
/// assert!(matches!(
///     mock.call("uri", &["/x".into()]),
///     Err(MockError::ImmutableMethod { .. })
/// ));
/// ```
#[must_use]
pub fn make_read_only(value: impl Into<Value>) -> MethodValue {
    MethodValue::ReadOnly(ReadOnly::new(value))
}
