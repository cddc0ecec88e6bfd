//! Error types for mock construction and dispatch
//!
//! Every failure is a hard failure: nothing here is retried or swallowed,
//! so a misconfigured test fails loudly at the call site.

/// Main mock error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MockError {
    /// Construction was attempted without an original type name
    #[error("cannot create a mock without an original type name")]
    MissingPackageName,

    /// A method was bound with an empty name
    #[error("cannot bind a method without a name")]
    MissingName,

    /// A method was invoked or inspected that was never bound
    #[error("{type_name} has no method named '{method}'")]
    UnknownMethod {
        /// Original type name of the mock
        type_name: String,
        /// Requested method
        method: String,
    },

    /// A write was attempted on a read-only method
    #[error("method '{method}' of {type_name} is read-only")]
    ImmutableMethod {
        /// Original type name of the mock
        type_name: String,
        /// Method being written
        method: String,
    },

    /// A chain's leading segment collides with an existing non-chain method
    #[error("chain on {type_name} collides with existing method '{method}'")]
    ChainCollision {
        /// Original type name of the mock
        type_name: String,
        /// Colliding method
        method: String,
    },

    /// An identity string is not of the form `<key>#<serial>`
    #[error("malformed mock identity: {0:?}")]
    MalformedIdentity(String),

    /// A link in a walked chain returned something other than a mock
    #[error("method '{method}' did not return a chain link")]
    NotAChainLink {
        /// Method whose return value was not a mock
        method: String,
    },

    /// Failure raised by a caller-supplied handler
    #[error("handler failed: {0}")]
    Handler(String),
}

impl MockError {
    /// Create a handler failure
    #[inline]
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler(message.into())
    }

    /// Method name carried by the error, if any
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        match self {
            Self::UnknownMethod { method, .. }
            | Self::ImmutableMethod { method, .. }
            | Self::ChainCollision { method, .. }
            | Self::NotAChainLink { method } => Some(method),
            _ => None,
        }
    }

    pub(crate) fn unknown_method(type_name: &str, method: &str) -> Self {
        Self::UnknownMethod {
            type_name: type_name.to_string(),
            method: method.to_string(),
        }
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, MockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_method_names_type_and_method() {
        let err = MockError::unknown_method("Foo::Bar", "frobnicate");
        assert_eq!(err.to_string(), "Foo::Bar has no method named 'frobnicate'");
        assert_eq!(err.method(), Some("frobnicate"));
    }

    #[test]
    fn malformed_identity_has_no_method() {
        let err = MockError::MalformedIdentity("nope".into());
        assert!(err.method().is_none());
        assert!(err.to_string().contains("\"nope\""));
    }
}
