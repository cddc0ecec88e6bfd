//! Method binding
//!
//! Converts a declared [`MethodValue`] into a dispatchable [`Slot`] and
//! installs it on a mock. Every slot except the two reserved ones is wrapped
//! by the call tracker.
//!
//! # Stored values
//! A plain value becomes a combined getter/setter: called without arguments
//! it returns the current value, called with arguments it replaces the value
//! with the first one and returns [`Value::Undef`].

use crate::error::{MockError, Result};
use crate::mock::Mock;
use crate::read_only::ReadOnly;
use crate::tracker::{self, CallCounter};
use crate::value::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Name of the reserved accessor returning the original type name
pub const ORIGINAL_TYPE_METHOD: &str = "__original_type_name";

/// Name of the reserved disposal hook
pub const DISPOSE_METHOD: &str = "__dispose";

/// Callable behind a method slot
pub type Handler = Rc<dyn Fn(&Mock, &[Value]) -> Result<Value>>;

/// Box a closure as a [`Handler`]
pub(crate) fn handler_fn<F>(f: F) -> Handler
where
    F: Fn(&Mock, &[Value]) -> Result<Value> + 'static,
{
    Rc::new(f)
}

/// Returns true for the reserved, never-tracked slot names
#[inline]
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    name == ORIGINAL_TYPE_METHOD || name == DISPOSE_METHOD
}

/// Declared method value: a stored value, a read-only value or a handler
#[derive(Clone)]
pub enum MethodValue {
    /// Getter/setter over a stored value
    Stored(Value),

    /// Fixed value rejecting writes
    ReadOnly(ReadOnly),

    /// Custom behavior
    Handler(Handler),
}

impl MethodValue {
    /// Custom handler from a closure
    pub fn handler<F>(f: F) -> Self
    where
        F: Fn(&Mock, &[Value]) -> Result<Value> + 'static,
    {
        Self::Handler(handler_fn(f))
    }

    /// Stored value
    #[inline]
    pub fn stored(value: impl Into<Value>) -> Self {
        Self::Stored(value.into())
    }
}

impl fmt::Debug for MethodValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stored(value) => f.debug_tuple("Stored").field(value).finish(),
            Self::ReadOnly(ro) => f.debug_tuple("ReadOnly").field(ro.value()).finish(),
            Self::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

impl<T: Into<Value>> From<T> for MethodValue {
    fn from(value: T) -> Self {
        Self::Stored(value.into())
    }
}

impl From<ReadOnly> for MethodValue {
    fn from(ro: ReadOnly) -> Self {
        Self::ReadOnly(ro)
    }
}

/// What a slot was built from
#[derive(Clone)]
pub(crate) enum SlotKind {
    Handler,
    Stored,
    ReadOnly,
    /// Identity check installed at construction; chains may replace it
    DefaultIsa,
    /// Link to the next node of a fluent chain
    Chain(Mock),
}

/// Bound method: handler, flags and counters
pub(crate) struct Slot {
    pub(crate) handler: Handler,
    pub(crate) kind: SlotKind,
    pub(crate) tracked: bool,
    pub(crate) counter: Rc<CallCounter>,
}

impl Slot {
    #[inline]
    pub(crate) fn is_read_only(&self) -> bool {
        matches!(self.kind, SlotKind::ReadOnly)
    }
}

/// Bind `value` as method `name` on `mock`
///
/// Rebinding an existing name replaces the slot and starts fresh counters.
///
/// # Errors
/// Returns [`MockError::MissingName`] if `name` is empty
pub(crate) fn bind(mock: &Mock, name: &str, value: MethodValue) -> Result<()> {
    if name.is_empty() {
        return Err(MockError::MissingName);
    }

    let (handler, kind) = match value {
        MethodValue::Handler(handler) => (handler, SlotKind::Handler),
        MethodValue::Stored(initial) => (stored_handler(initial), SlotKind::Stored),
        MethodValue::ReadOnly(ro) => (ro.into_handler(name), SlotKind::ReadOnly),
    };

    install(mock, name, handler, kind)
}

/// Install a prepared handler, wrapping it in the call tracker unless reserved
pub(crate) fn install(mock: &Mock, name: &str, handler: Handler, kind: SlotKind) -> Result<()> {
    if name.is_empty() {
        return Err(MockError::MissingName);
    }

    let tracked = !is_reserved(name);
    let counter = Rc::new(CallCounter::default());
    let handler = if tracked {
        tracker::tracked(handler, Rc::clone(&counter))
    } else {
        handler
    };

    tracing::trace!(identity = %mock.identity(), method = name, tracked, "bound method");
    mock.insert_slot(
        name,
        Slot {
            handler,
            kind,
            tracked,
            counter,
        },
    );
    Ok(())
}

fn stored_handler(initial: Value) -> Handler {
    let cell = RefCell::new(initial);
    handler_fn(move |_mock, args| match args.first() {
        None => Ok(cell.borrow().clone()),
        Some(value) => {
            *cell.borrow_mut() = value.clone();
            Ok(Value::Undef)
        }
    })
}
