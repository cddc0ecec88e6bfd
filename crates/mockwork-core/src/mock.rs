//! The mock object
//!
//! A [`Mock`] is a shared, single-threaded handle to a dispatch table of
//! method slots plus identity metadata. Cloning the handle shares the mock;
//! dropping the last handle releases its identity back to the registry.
//!
//! Handlers run with no borrow of the slot table held, so a handler may call
//! other methods on the same mock or bind new ones.

use crate::binder::{self, MethodValue, Slot, SlotKind, DISPOSE_METHOD, ORIGINAL_TYPE_METHOD};
use crate::chain::{self, Chain};
use crate::error::{MockError, Result};
use crate::isa;
use crate::registry::{MockIdentity, MockRegistry};
use crate::tracker::CallStats;
use crate::value::Value;
use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Handle to a mock object
#[derive(Clone)]
pub struct Mock {
    inner: Rc<MockInner>,
}

struct MockInner {
    identity: MockIdentity,
    original_type_name: String,
    slots: RefCell<IndexMap<String, Slot>>,
    registry: Arc<MockRegistry>,
    suppress_real_load: bool,
    default_isa: Option<String>,
    released: Cell<bool>,
}

impl MockInner {
    fn release(&self) -> bool {
        if self.released.replace(true) {
            return false;
        }
        self.registry.release(&self.identity)
    }
}

impl Drop for MockInner {
    fn drop(&mut self) {
        self.release();
    }
}

impl Mock {
    /// Allocate an identity and install the reserved slots
    ///
    /// `default_isa` names the identity check this mock and its chain nodes
    /// receive; the caller installs it on the top-level mock.
    pub(crate) fn allocate(
        registry: Arc<MockRegistry>,
        original_type_name: &str,
        suppress_real_load: bool,
        default_isa: Option<String>,
    ) -> Self {
        let identity = registry.allocate(original_type_name);
        let mock = Self {
            inner: Rc::new(MockInner {
                identity,
                original_type_name: original_type_name.to_string(),
                slots: RefCell::new(IndexMap::new()),
                registry,
                suppress_real_load,
                default_isa,
                released: Cell::new(false),
            }),
        };
        mock.install_reserved();
        mock
    }

    /// Create the node reached by calling `method` on `parent`
    ///
    /// The node gets the parent's default identity check, if any.
    pub(crate) fn chain_node(parent: &Self, method: &str) -> Result<Self> {
        let type_name = format!("{}::{}", parent.original_type_name(), method);
        let default_isa = parent.inner.default_isa.clone();
        let node = Self::allocate(
            Arc::clone(&parent.inner.registry),
            &type_name,
            false,
            default_isa.clone(),
        );
        if let Some(isa_method) = default_isa {
            isa::install_default(&node, &isa_method)?;
        }
        Ok(node)
    }

    fn install_reserved(&self) {
        let type_accessor = binder::handler_fn(|mock, _args| {
            Ok(Value::from(mock.original_type_name()))
        });
        let dispose_hook = binder::handler_fn(|mock, _args| {
            mock.dispose();
            Ok(Value::Undef)
        });

        for (name, handler) in [
            (ORIGINAL_TYPE_METHOD, type_accessor),
            (DISPOSE_METHOD, dispose_hook),
        ] {
            self.insert_slot(
                name,
                Slot {
                    handler,
                    kind: SlotKind::Handler,
                    tracked: false,
                    counter: Rc::default(),
                },
            );
        }
    }

    /// Unique identity
    #[inline]
    #[must_use]
    pub fn identity(&self) -> &MockIdentity {
        &self.inner.identity
    }

    /// Type name this mock stands in for
    #[inline]
    #[must_use]
    pub fn original_type_name(&self) -> &str {
        &self.inner.original_type_name
    }

    /// Whether construction asked for the real type's loading to be suppressed
    #[inline]
    #[must_use]
    pub fn suppresses_real_load(&self) -> bool {
        self.inner.suppress_real_load
    }

    /// Registry that issued this mock's identity
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Arc<MockRegistry> {
        &self.inner.registry
    }

    /// Invoke method `name` with `args`
    ///
    /// # Errors
    /// - [`MockError::UnknownMethod`] if `name` is not bound
    /// - whatever the bound handler returns
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        let handler = {
            let slots = self.inner.slots.borrow();
            match slots.get(name) {
                Some(slot) => Rc::clone(&slot.handler),
                None => {
                    return Err(MockError::unknown_method(self.original_type_name(), name));
                }
            }
        };

        tracing::trace!(identity = %self.identity(), method = name, args = args.len(), "dispatch");
        handler(self, args)
    }

    /// Invoke method `name` without arguments
    ///
    /// # Errors
    /// See [`Mock::call`]
    #[inline]
    pub fn get(&self, name: &str) -> Result<Value> {
        self.call(name, &[])
    }

    /// Invoke method `name` and return its result as a sequence
    ///
    /// Handlers always return a single [`Value`]; this accessor flattens a
    /// list, maps `Undef` to an empty sequence and wraps anything else.
    ///
    /// # Errors
    /// See [`Mock::call`]
    pub fn call_list(&self, name: &str, args: &[Value]) -> Result<Vec<Value>> {
        self.call(name, args).map(Value::into_list)
    }

    /// Walk a chain of argument-less calls and return the final value
    ///
    /// # Errors
    /// - [`MockError::NotAChainLink`] if an intermediate call returns a non-mock
    /// - any error from the individual calls
    pub fn call_chain<S: AsRef<str>>(&self, path: &[S]) -> Result<Value> {
        let Some((last, links)) = path.split_last() else {
            return Err(MockError::MissingName);
        };

        let mut current = self.clone();
        for link in links {
            let link = link.as_ref();
            current = current
                .get(link)?
                .into_mock()
                .ok_or_else(|| MockError::NotAChainLink {
                    method: link.to_string(),
                })?;
        }
        current.get(last.as_ref())
    }

    /// Bind an additional method
    ///
    /// # Errors
    /// Returns [`MockError::MissingName`] if `name` is empty
    pub fn add_method(&self, name: &str, value: impl Into<MethodValue>) -> Result<()> {
        binder::bind(self, name, value.into())
    }

    /// Bind an additional chain
    ///
    /// # Errors
    /// See [`Chain`]
    pub fn add_chain(&self, chain: Chain) -> Result<()> {
        chain::build(self, chain)
    }

    /// Counters for method `name`
    ///
    /// # Errors
    /// Returns [`MockError::UnknownMethod`] if `name` is not bound
    pub fn call_stats(&self, name: &str) -> Result<CallStats> {
        self.inner
            .slots
            .borrow()
            .get(name)
            .map(|slot| slot.counter.snapshot())
            .ok_or_else(|| MockError::unknown_method(self.original_type_name(), name))
    }

    /// Zero the counters of every slot; handlers and values are untouched
    pub fn reset_calls(&self) {
        for slot in self.inner.slots.borrow().values() {
            slot.counter.reset();
        }
        tracing::trace!(identity = %self.identity(), "reset call counters");
    }

    /// Returns true if `name` is bound
    #[must_use]
    pub fn can(&self, name: &str) -> bool {
        self.inner.slots.borrow().contains_key(name)
    }

    /// Bound method names in binding order, reserved slots included
    #[must_use]
    pub fn method_names(&self) -> Vec<String> {
        self.inner.slots.borrow().keys().cloned().collect()
    }

    /// Whether method `name` is read-only
    ///
    /// # Errors
    /// Returns [`MockError::UnknownMethod`] if `name` is not bound
    pub fn is_read_only(&self, name: &str) -> Result<bool> {
        self.inner
            .slots
            .borrow()
            .get(name)
            .map(Slot::is_read_only)
            .ok_or_else(|| MockError::unknown_method(self.original_type_name(), name))
    }

    /// Whether calls to method `name` are counted
    ///
    /// # Errors
    /// Returns [`MockError::UnknownMethod`] if `name` is not bound
    pub fn is_tracked(&self, name: &str) -> Result<bool> {
        self.inner
            .slots
            .borrow()
            .get(name)
            .map(|slot| slot.tracked)
            .ok_or_else(|| MockError::unknown_method(self.original_type_name(), name))
    }

    /// Returns true if both handles refer to the same mock
    #[inline]
    #[must_use]
    pub fn same_instance(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Release the identity now instead of on drop
    ///
    /// Returns true on the first call only; the later drop does nothing.
    pub fn dispose(&self) -> bool {
        self.inner.release()
    }

    /// Returns true until the identity has been released
    #[inline]
    #[must_use]
    pub fn is_live(&self) -> bool {
        !self.inner.released.get()
    }

    pub(crate) fn insert_slot(&self, name: &str, slot: Slot) {
        self.inner.slots.borrow_mut().insert(name.to_string(), slot);
    }

    pub(crate) fn slot_kind(&self, name: &str) -> Option<SlotKind> {
        self.inner.slots.borrow().get(name).map(|slot| slot.kind.clone())
    }
}

impl PartialEq for Mock {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other)
    }
}

impl fmt::Debug for Mock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Mock");
        s.field("identity", &self.identity().to_string())
            .field("original_type_name", &self.original_type_name());
        if let Ok(slots) = self.inner.slots.try_borrow() {
            s.field("methods", &slots.keys().collect::<Vec<_>>());
        }
        s.finish()
    }
}
