//! Fluent method chains
//!
//! A [`Chain`] such as `foo → bar → baz = 42` is built as nested chain-node
//! mocks: `foo` on the target returns node 1, `bar` on node 1 returns node 2,
//! and `baz` on node 2 is bound to the terminal value.
//!
//! Chains that share a leading method merge into the existing node instead of
//! colliding. The merge recurses, so shared interior segments compose as
//! well, but only the leading segment is a documented guarantee.

use crate::binder::{self, MethodValue, SlotKind};
use crate::error::{MockError, Result};
use crate::mock::Mock;
use crate::value::Value;

/// Ordered method names ending in a terminal value
#[derive(Debug, Clone)]
pub struct Chain {
    path: Vec<String>,
    terminal: MethodValue,
}

impl Chain {
    /// Create chain from method names and terminal value
    ///
    /// # Example
    /// ```
    /// use mockwork_core::Chain;
    ///
    /// let chain = Chain::new(["foo", "bar", "baz"], 42);
    /// assert_eq!(chain.path(), ["foo", "bar", "baz"]);
    /// ```
    pub fn new<I, S>(path: I, terminal: impl Into<MethodValue>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            terminal: terminal.into(),
        }
    }

    /// Method names, outermost first
    #[inline]
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Terminal value bound on the last node
    #[inline]
    #[must_use]
    pub fn terminal(&self) -> &MethodValue {
        &self.terminal
    }

    /// Number of method names
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Returns true if the chain has no method names
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// Build `chain` onto `mock`
///
/// # Errors
/// - [`MockError::MissingName`] for an empty path or an empty segment
/// - [`MockError::ChainCollision`] if a segment meets a non-chain method
///
/// A default identity check is not a collision: the chain replaces it.
pub(crate) fn build(mock: &Mock, chain: Chain) -> Result<()> {
    build_path(mock, &chain.path, chain.terminal)
}

fn build_path(mock: &Mock, path: &[String], terminal: MethodValue) -> Result<()> {
    let (first, rest) = path.split_first().ok_or(MockError::MissingName)?;
    if first.is_empty() {
        return Err(MockError::MissingName);
    }

    let existing = mock.slot_kind(first);

    if rest.is_empty() {
        return match existing {
            None | Some(SlotKind::DefaultIsa) => binder::bind(mock, first, terminal),
            Some(_) => Err(collision(mock, first)),
        };
    }

    match existing {
        Some(SlotKind::Chain(node)) => {
            tracing::debug!(
                identity = %mock.identity(),
                method = first.as_str(),
                node = %node.identity(),
                "merging chain into existing node"
            );
            build_path(&node, rest, terminal)
        }
        None | Some(SlotKind::DefaultIsa) => {
            let node = Mock::chain_node(mock, first)?;
            build_path(&node, rest, terminal)?;

            tracing::debug!(
                identity = %mock.identity(),
                method = first.as_str(),
                node = %node.identity(),
                "linked chain node"
            );
            let link = node.clone();
            binder::install(
                mock,
                first,
                binder::handler_fn(move |_mock, _args| Ok(Value::Mock(link.clone()))),
                SlotKind::Chain(node),
            )
        }
        Some(_) => Err(collision(mock, first)),
    }
}

fn collision(mock: &Mock, method: &str) -> MockError {
    MockError::ChainCollision {
        type_name: mock.original_type_name().to_string(),
        method: method.to_string(),
    }
}
