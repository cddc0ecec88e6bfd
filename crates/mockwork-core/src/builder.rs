//! Mock construction entry points
//!
//! Construction order is fixed: identity and reserved slots first, then
//! plain methods, then chains, then the default identity check, then the
//! optional load-suppression notification.

use crate::binder::MethodValue;
use crate::chain::Chain;
use crate::config::MockConfig;
use crate::error::{MockError, Result};
use crate::isa;
use crate::mock::Mock;
use crate::registry::MockRegistry;
use crate::tracker::CallStats;
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Port to the host's module loader
///
/// Implemented outside this crate by whatever can keep the real type behind
/// a mock from being loaded. The builder only calls it.
pub trait LoadSuppressor {
    /// Prevent `type_name` from being loaded from now on
    fn suppress(&self, type_name: &str);
}

/// Fluent mock builder
///
/// # Example
/// ```
/// use mockwork_core::{MockBuilder, MockRegistry, Value};
/// use std::sync::Arc;
///
/// let mock = MockBuilder::new("Some::Package")
///     .registry(Arc::new(MockRegistry::new()))
///     .method("name", "Ovid")
///     .chain(["foo", "bar", "baz"], 42)
///     .build()
///     .unwrap();
///
/// assert_eq!(mock.get("name").unwrap(), Value::from("Ovid"));
/// assert_eq!(mock.call_chain(&["foo", "bar", "baz"]).unwrap(), Value::Int(42));
/// ```
pub struct MockBuilder {
    type_name: String,
    methods: IndexMap<String, MethodValue>,
    chains: Vec<Chain>,
    config: MockConfig,
    registry: Option<Arc<MockRegistry>>,
    suppress_real_load: Option<bool>,
    suppressor: Option<Rc<dyn LoadSuppressor>>,
}

impl MockBuilder {
    /// Start building a mock standing in for `type_name`
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            methods: IndexMap::new(),
            chains: Vec::new(),
            config: MockConfig::default(),
            registry: None,
            suppress_real_load: None,
            suppressor: None,
        }
    }

    /// Declare a method; a later declaration of the same name wins
    #[must_use]
    pub fn method(mut self, name: impl Into<String>, value: impl Into<MethodValue>) -> Self {
        self.methods.insert(name.into(), value.into());
        self
    }

    /// Declare several methods
    #[must_use]
    pub fn methods<I, K, V>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<MethodValue>,
    {
        self.methods
            .extend(methods.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Declare a chain from method names and a terminal value
    #[must_use]
    pub fn chain<I, S>(self, path: I, terminal: impl Into<MethodValue>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_chain(Chain::new(path, terminal))
    }

    /// Declare a prepared chain
    #[must_use]
    pub fn with_chain(mut self, chain: Chain) -> Self {
        self.chains.push(chain);
        self
    }

    /// Replace the configuration
    #[must_use]
    pub fn config(mut self, config: MockConfig) -> Self {
        self.config = config;
        self
    }

    /// Allocate identities from `registry` instead of the global one
    #[must_use]
    pub fn registry(mut self, registry: Arc<MockRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Ask for the real type to be kept from loading
    ///
    /// Takes precedence over the configuration's flag, whichever is set last.
    #[must_use]
    pub fn suppress_real_load(mut self, suppress: bool) -> Self {
        self.suppress_real_load = Some(suppress);
        self
    }

    /// Port notified when real-load suppression is requested
    #[must_use]
    pub fn load_suppressor(mut self, suppressor: impl LoadSuppressor + 'static) -> Self {
        self.suppressor = Some(Rc::new(suppressor));
        self
    }

    /// Build the mock
    ///
    /// # Errors
    /// - [`MockError::MissingPackageName`] if the type name is empty
    /// - [`MockError::MissingName`] for an empty method or chain segment name
    /// - [`MockError::ChainCollision`] if a chain meets a plain method
    pub fn build(self) -> Result<Mock> {
        if self.type_name.is_empty() {
            return Err(MockError::MissingPackageName);
        }

        let suppress = self
            .suppress_real_load
            .unwrap_or(self.config.suppress_real_load);
        let default_isa = self
            .config
            .install_default_isa
            .then(|| self.config.isa_method.clone());
        let registry = self.registry.unwrap_or_else(MockRegistry::global);
        let mock = Mock::allocate(registry, &self.type_name, suppress, default_isa);

        for (name, value) in self.methods {
            mock.add_method(&name, value)?;
        }
        for chain in self.chains {
            mock.add_chain(chain)?;
        }

        if self.config.install_default_isa && !mock.can(&self.config.isa_method) {
            isa::install_default(&mock, &self.config.isa_method)?;
        }

        if suppress {
            match &self.suppressor {
                Some(suppressor) => suppressor.suppress(&self.type_name),
                None => tracing::debug!(
                    type_name = self.type_name.as_str(),
                    "real-load suppression requested without a suppressor"
                ),
            }
        }

        tracing::debug!(
            identity = %mock.identity(),
            methods = mock.method_names().len(),
            "built mock"
        );
        Ok(mock)
    }
}

impl fmt::Debug for MockBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockBuilder")
            .field("type_name", &self.type_name)
            .field("methods", &self.methods)
            .field("chains", &self.chains)
            .field("config", &self.config)
            .field("suppress_real_load", &self.suppress_real_load)
            .field("has_suppressor", &self.suppressor.is_some())
            .finish_non_exhaustive()
    }
}

/// Create a mock from declared methods and chains using the global registry
///
/// # Errors
/// See [`MockBuilder::build`]
pub fn create_mock<M, K, V, C>(type_name: &str, methods: M, chains: C) -> Result<Mock>
where
    M: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<MethodValue>,
    C: IntoIterator<Item = Chain>,
{
    chains
        .into_iter()
        .fold(MockBuilder::new(type_name).methods(methods), MockBuilder::with_chain)
        .build()
}

/// Bind an additional method on `mock`
///
/// # Errors
/// Returns [`MockError::MissingName`] if `name` is empty
pub fn add_method(mock: &Mock, name: &str, value: impl Into<MethodValue>) -> Result<()> {
    mock.add_method(name, value)
}

/// Zero every call counter on `mock`
pub fn reset_calls(mock: &Mock) {
    mock.reset_calls();
}

/// Counters for method `name` on `mock`
///
/// # Errors
/// Returns [`MockError::UnknownMethod`] if `name` was never bound
pub fn get_call_stats(mock: &Mock, name: &str) -> Result<CallStats> {
    mock.call_stats(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use std::cell::RefCell;

    fn isolated(type_name: &str) -> MockBuilder {
        MockBuilder::new(type_name).registry(Arc::new(MockRegistry::new()))
    }

    #[derive(Clone, Default)]
    struct RecordingSuppressor {
        seen: Rc<RefCell<Vec<String>>>,
    }

    impl LoadSuppressor for RecordingSuppressor {
        fn suppress(&self, type_name: &str) {
            self.seen.borrow_mut().push(type_name.to_string());
        }
    }

    #[test]
    fn empty_type_name_is_rejected() {
        assert_eq!(
            MockBuilder::new("").build().unwrap_err(),
            MockError::MissingPackageName
        );
    }

    #[test]
    fn empty_method_name_is_rejected() {
        let err = isolated("Foo").method("", 1).build().unwrap_err();
        assert_eq!(err, MockError::MissingName);
    }

    #[test]
    fn default_isa_installed_last() {
        let mock = isolated("Foo::Bar").build().unwrap();
        assert!(mock.can("isa"));
        assert_eq!(mock.call("isa", &["Foo::Bar".into()]).unwrap(), Value::Bool(true));
    }

    #[test]
    fn custom_isa_method_name() {
        let mock = isolated("Foo")
            .config(MockConfig::new().with_isa_method("is_a"))
            .build()
            .unwrap();
        assert!(mock.can("is_a"));
        assert!(!mock.can("isa"));
    }

    #[test]
    fn default_isa_can_be_disabled() {
        let mock = isolated("Foo")
            .config(MockConfig::new().without_default_isa())
            .build()
            .unwrap();
        assert!(!mock.can("isa"));
    }

    #[test]
    fn suppressor_notified_only_when_requested() {
        let suppressor = RecordingSuppressor::default();

        let quiet = isolated("Quiet")
            .load_suppressor(suppressor.clone())
            .build()
            .unwrap();
        assert!(!quiet.suppresses_real_load());

        let loud = isolated("Loud")
            .suppress_real_load(true)
            .load_suppressor(suppressor.clone())
            .build()
            .unwrap();
        assert!(loud.suppresses_real_load());
        assert_eq!(*suppressor.seen.borrow(), vec!["Loud".to_string()]);
    }

    #[test]
    fn suppression_without_port_still_builds() {
        let mock = isolated("Foo").suppress_real_load(true).build().unwrap();
        assert!(mock.suppresses_real_load());
    }

    #[test]
    fn suppress_flag_survives_later_config() {
        let suppressor = RecordingSuppressor::default();
        let mock = isolated("Foo")
            .suppress_real_load(true)
            .config(MockConfig::new())
            .load_suppressor(suppressor.clone())
            .build()
            .unwrap();

        assert!(mock.suppresses_real_load());
        assert_eq!(*suppressor.seen.borrow(), vec!["Foo".to_string()]);
    }

    #[test]
    fn suppress_flag_overrides_config() {
        let mock = isolated("Foo")
            .config(MockConfig::new().with_suppress_real_load(true))
            .suppress_real_load(false)
            .build()
            .unwrap();
        assert!(!mock.suppresses_real_load());

        let from_config = isolated("Bar")
            .config(MockConfig::new().with_suppress_real_load(true))
            .build()
            .unwrap();
        assert!(from_config.suppresses_real_load());
    }

    #[test]
    fn later_method_declaration_wins() {
        let mock = isolated("Foo").method("a", 1).method("a", 2).build().unwrap();
        assert_eq!(mock.get("a").unwrap(), Value::Int(2));
    }
}
