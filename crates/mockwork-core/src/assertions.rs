//! Call-count assertions for test code
//!
//! These panic with the mock's identity and the observed counters, which is
//! what a failing test should show.

use crate::mock::Mock;
use crate::tracker::CallStats;

#[track_caller]
fn stats_or_panic(mock: &Mock, method: &str) -> CallStats {
    match mock.call_stats(method) {
        Ok(stats) => stats,
        Err(err) => panic!("{}: {err}", mock.identity()),
    }
}

/// Assert `method` was called at least once
#[track_caller]
pub fn assert_called(mock: &Mock, method: &str) {
    let stats = stats_or_panic(mock, method);
    assert!(
        stats.was_called(),
        "{}: expected '{method}' to be called, it never was",
        mock.identity()
    );
}

/// Assert `method` was never called
#[track_caller]
pub fn assert_not_called(mock: &Mock, method: &str) {
    let stats = stats_or_panic(mock, method);
    assert!(
        !stats.was_called(),
        "{}: expected '{method}' not to be called, it was called {} time(s)",
        mock.identity(),
        stats.times_called
    );
}

/// Assert `method` was called exactly `times` times
#[track_caller]
pub fn assert_called_times(mock: &Mock, method: &str, times: u64) {
    let stats = stats_or_panic(mock, method);
    assert_eq!(
        stats.times_called,
        times,
        "{}: call count mismatch for '{method}' ({stats:?})",
        mock.identity()
    );
}

/// Assert the with-arguments / without-arguments split for `method`
#[track_caller]
pub fn assert_call_split(mock: &Mock, method: &str, with_args: u64, without_args: u64) {
    let stats = stats_or_panic(mock, method);
    assert_eq!(
        (stats.times_with_args, stats.times_without_args),
        (with_args, without_args),
        "{}: argument split mismatch for '{method}' ({stats:?})",
        mock.identity()
    );
}
