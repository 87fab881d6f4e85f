//! Polling query engine.
//!
//! A [`Query`] wraps an async producer and keeps a [`QueryState`] up to date:
//! on creation, on [`Query::refetch`], whenever it is re-enabled and on every
//! interval tick. Producer failures are logged and never reach the caller;
//! the last good data stays visible until the next success.

mod options;
mod query;

pub use options::QueryOptions;
pub use query::{BoxError, Query, QueryState};
