//! Per-method call tracking
//!
//! [`tracked`] wraps a handler so every invocation is counted before it is
//! delegated. The wrapper never alters the handler's result.

use crate::binder::{self, Handler};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;

/// Snapshot of a method's invocation counters
///
/// `times_called == times_with_args + times_without_args` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallStats {
    /// Total invocations
    pub times_called: u64,
    /// Invocations with one or more arguments
    pub times_with_args: u64,
    /// Invocations with no arguments
    pub times_without_args: u64,
}

impl CallStats {
    /// Returns true if the method was invoked at least once
    #[inline]
    #[must_use]
    pub fn was_called(&self) -> bool {
        self.times_called > 0
    }
}

/// Mutable counters owned by one method slot
#[derive(Debug, Default)]
pub(crate) struct CallCounter {
    stats: Cell<CallStats>,
}

impl CallCounter {
    pub(crate) fn record(&self, arg_count: usize) {
        let mut stats = self.stats.get();
        stats.times_called += 1;
        if arg_count > 0 {
            stats.times_with_args += 1;
        } else {
            stats.times_without_args += 1;
        }
        self.stats.set(stats);
    }

    pub(crate) fn snapshot(&self) -> CallStats {
        self.stats.get()
    }

    pub(crate) fn reset(&self) {
        self.stats.set(CallStats::default());
    }
}

/// Wrap `handler` so each call is recorded in `counter` first
pub(crate) fn tracked(handler: Handler, counter: Rc<CallCounter>) -> Handler {
    binder::handler_fn(move |mock, args| {
        counter.record(args.len());
        handler(mock, args)
    })
}
