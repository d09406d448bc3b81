//! Tracing utilities for query observability.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]` boilerplate
//! at every call site.

/// Emit a debug-level tracing event with the SQL text and parameter count.
///
/// ```ignore
/// teamql_trace_query!(&sql, params.len());
/// ```
#[macro_export]
macro_rules! teamql_trace_query {
    ($sql:expr, $param_count:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(sql = %$sql, params = $param_count, "teamql.query");
    };
}

/// Emit a warn-level event when a single-slot clause replaces an earlier value.
///
/// ```ignore
/// teamql_trace_overwrite!("where");
/// ```
#[macro_export]
macro_rules! teamql_trace_overwrite {
    ($slot:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!(slot = $slot, "teamql.clause_overwritten");
    };
}

/// Emit a warn-level event when a bulk mutation left cached entities
/// without an explicit invalidate-or-retain decision.
///
/// ```ignore
/// teamql_trace_stale!("member", evicted);
/// ```
#[macro_export]
macro_rules! teamql_trace_stale {
    ($table:expr, $evicted:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!(table = $table, evicted = $evicted, "teamql.stale_cache_evicted");
    };
}
