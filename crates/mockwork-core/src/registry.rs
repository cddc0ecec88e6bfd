//! Identity registry for mocks
//!
//! Provides [`MockRegistry`], which hands out a [`MockIdentity`] per mock and
//! tracks which identities are still held by a live mock.

use crate::error::{MockError, Result};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

static GLOBAL: Lazy<Arc<MockRegistry>> = Lazy::new(|| Arc::new(MockRegistry::new()));

/// Unique identity of a single mock instance
///
/// # Format
/// `<key>#<serial>`, where `key` is the original type name with every `::`
/// replaced by `_`, e.g. `Foo::Bar` → `Foo_Bar#3`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MockIdentity {
    key: String,
    serial: u64,
}

impl MockIdentity {
    /// Build the identity for a type name and serial
    #[must_use]
    pub fn new(type_name: &str, serial: u64) -> Self {
        Self {
            key: identity_key(type_name),
            serial,
        }
    }

    /// Sanitized type key
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Per-key serial number (starts at 1)
    #[inline]
    #[must_use]
    pub fn serial(&self) -> u64 {
        self.serial
    }
}

impl Display for MockIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.key, self.serial)
    }
}

impl FromStr for MockIdentity {
    type Err = MockError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || MockError::MalformedIdentity(s.to_string());

        let (key, serial) = s.rsplit_once('#').ok_or_else(malformed)?;
        if key.is_empty() || key.contains("::") {
            return Err(malformed());
        }
        let serial: u64 = serial.parse().map_err(|_| malformed())?;
        if serial == 0 {
            return Err(malformed());
        }

        Ok(Self {
            key: key.to_string(),
            serial,
        })
    }
}

fn identity_key(type_name: &str) -> String {
    type_name.replace("::", "_")
}

/// Registry allocating and releasing mock identities
///
/// Counters are kept per sanitized key rather than per raw type name, so
/// `Foo::Bar` and `Foo_Bar` share one sequence and can never produce the
/// same identity. Counters only grow; a released identity is never reissued.
///
/// The registry is `Send + Sync` and may be shared by tests running on
/// several threads. Mocks themselves are single-threaded.
#[derive(Debug, Default)]
pub struct MockRegistry {
    /// key -> last serial handed out
    counters: DashMap<String, u64>,

    /// live identity -> original type name
    live: DashMap<MockIdentity, String>,
}

impl MockRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            counters: DashMap::new(),
            live: DashMap::new(),
        }
    }

    /// Process-wide registry used when a builder is not given one
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// Allocate the next identity for `type_name`
    pub fn allocate(&self, type_name: &str) -> MockIdentity {
        let key = identity_key(type_name);

        // The entry guard holds the shard lock, so increment and read are atomic.
        let serial = {
            let mut counter = self.counters.entry(key).or_insert(0);
            *counter += 1;
            *counter
        };

        let identity = MockIdentity::new(type_name, serial);
        self.live.insert(identity.clone(), type_name.to_string());
        tracing::debug!(%identity, type_name, "allocated mock identity");
        identity
    }

    /// Release an identity
    ///
    /// Returns true if a live entry was removed. Releasing twice, or
    /// releasing an identity this registry never issued, is a no-op.
    pub fn release(&self, identity: &MockIdentity) -> bool {
        let removed = self.live.remove(identity).is_some();
        if removed {
            tracing::debug!(%identity, "released mock identity");
        } else {
            tracing::trace!(%identity, "identity already released");
        }
        removed
    }

    /// Release an identity given in its string form
    ///
    /// # Errors
    /// Returns [`MockError::MalformedIdentity`] if `identity` does not parse
    pub fn release_str(&self, identity: &str) -> Result<bool> {
        let parsed = identity.parse::<MockIdentity>().map_err(|err| {
            tracing::warn!(identity, "refusing to release malformed identity");
            err
        })?;
        Ok(self.release(&parsed))
    }

    /// Check whether an identity is still held by a live mock
    #[inline]
    #[must_use]
    pub fn is_live(&self, identity: &MockIdentity) -> bool {
        self.live.contains_key(identity)
    }

    /// Original type name registered for a live identity
    #[must_use]
    pub fn type_name_of(&self, identity: &MockIdentity) -> Option<String> {
        self.live.get(identity).map(|entry| entry.value().clone())
    }

    /// Number of live identities
    #[inline]
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Number of identities ever allocated for `type_name`
    #[must_use]
    pub fn allocated(&self, type_name: &str) -> u64 {
        self.counters
            .get(&identity_key(type_name))
            .map_or(0, |entry| *entry.value())
    }
}
