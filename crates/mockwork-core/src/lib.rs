//! mockwork Core
//!
//! Mock construction and dispatch engine for tests.
//!
//! # Overview
//!
//! A [`Mock`] answers only the methods it was declared with:
//! - **Stored values**: combined getter/setter over a value
//! - **Handlers**: custom behavior receiving the mock and the arguments
//! - **Read-only values**: [`make_read_only`], rejecting writes
//! - **Chains**: fluent call sequences ending in a terminal value
//!
//! Every call is counted per method ([`CallStats`]) and every mock carries a
//! unique identity issued by a [`MockRegistry`].
//!
//! # Example
//!
//! ```rust
//! use mockwork_core::{make_read_only, MockBuilder, MockRegistry, Value};
//! use std::sync::Arc;
//!
//! let mock = MockBuilder::new("HTTP::Response")
//!     .registry(Arc::new(MockRegistry::new()))
//!     .method("status", Value::Undef)
//!     .method("uri", make_read_only("/foo/bar"))
//!     .chain(["headers", "content_type"], "text/plain")
//!     .build()
//!     .unwrap();
//!
//! mock.call("status", &[Value::Int(404)]).unwrap();
//! assert_eq!(mock.get("status").unwrap(), Value::Int(404));
//! assert_eq!(mock.call_stats("status").unwrap().times_called, 2);
//! assert_eq!(
//!     mock.call_chain(&["headers", "content_type"]).unwrap(),
//!     Value::from("text/plain")
//! );
//! assert_eq!(mock.call("isa", &["HTTP::Response".into()]).unwrap(), Value::Bool(true));
//! ```

#![warn(missing_docs)]

pub mod assertions;
pub mod binder;
pub mod builder;
pub mod chain;
pub mod config;
pub mod error;
mod isa;
pub mod mock;
pub mod read_only;
pub mod registry;
pub mod tracker;
pub mod value;

// Re-exports
pub use binder::{is_reserved, Handler, MethodValue, DISPOSE_METHOD, ORIGINAL_TYPE_METHOD};
pub use builder::{
    add_method, create_mock, get_call_stats, reset_calls, LoadSuppressor, MockBuilder,
};
pub use chain::Chain;
pub use config::MockConfig;
pub use error::{MockError, Result};
pub use mock::Mock;
pub use read_only::{make_read_only, ReadOnly};
pub use registry::{MockIdentity, MockRegistry};
pub use tracker::CallStats;
pub use value::Value;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for writing mocks
    pub use crate::assertions::{
        assert_call_split, assert_called, assert_called_times, assert_not_called,
    };
    pub use crate::{
        add_method, create_mock, get_call_stats, make_read_only, reset_calls, CallStats, Chain,
        MethodValue, Mock, MockBuilder, MockConfig, MockError, MockRegistry, Value,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
