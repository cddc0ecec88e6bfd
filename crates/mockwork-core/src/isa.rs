//! Default identity check

use crate::binder::{self, SlotKind};
use crate::error::Result;
use crate::mock::Mock;
use crate::value::Value;

/// Bind the default identity check as `method` on `mock`
///
/// The check answers true iff its first argument equals the mock's original
/// type name or its identity. It is tracked like any other method.
pub(crate) fn install_default(mock: &Mock, method: &str) -> Result<()> {
    binder::install(
        mock,
        method,
        binder::handler_fn(|mock, args| {
            let matches = args
                .first()
                .and_then(Value::as_str)
                .is_some_and(|query| is_identity_of(mock, query));
            Ok(Value::Bool(matches))
        }),
        SlotKind::DefaultIsa,
    )
}

fn is_identity_of(mock: &Mock, query: &str) -> bool {
    query == mock.original_type_name() || query == mock.identity().to_string()
}
