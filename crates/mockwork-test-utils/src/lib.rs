//! Testing utilities for mockwork workspace
//!
//! Shared fixtures and setup helpers.

#![allow(missing_docs)]

use mockwork_core::{make_read_only, MethodValue, Mock, MockBuilder, MockRegistry, Value};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Install a test subscriber honoring `RUST_LOG`; repeated calls are harmless.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn isolated_registry() -> Arc<MockRegistry> {
    Arc::new(MockRegistry::new())
}

pub fn isolated_builder(type_name: &str) -> MockBuilder {
    MockBuilder::new(type_name).registry(isolated_registry())
}

/// A request-like mock: read-only `uri`, settable `status`, `method` = "GET",
/// plus the default `isa` answering for `HTTP::Request`.
pub fn request_mock(registry: Arc<MockRegistry>) -> Mock {
    MockBuilder::new("HTTP::Request")
        .registry(registry)
        .method("uri", make_read_only("/foo/bar"))
        .method("status", Value::Undef)
        .method("method", "GET")
        .build()
        .unwrap()
}

/// Handler recording every argument list it receives, returning `reply`.
pub fn recording_handler(reply: impl Into<Value>) -> (MethodValue, Rc<RefCell<Vec<Vec<Value>>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let reply = reply.into();
    let log = Rc::clone(&seen);
    let handler = MethodValue::handler(move |_mock, args| {
        log.borrow_mut().push(args.to_vec());
        Ok(reply.clone())
    });
    (handler, seen)
}
