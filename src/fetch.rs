//! The executor seam.
//!
//! The builder compiles SQL but never runs it. Every terminal operation
//! resolves the table name, compiles the accumulated state, and hands the
//! collection name plus the compiled query string to a [`Fetch`]
//! implementation exactly once.

use std::future::Future;

use serde_json::Value;

use crate::error::BoxError;

/// Executes a compiled query against the backing row store.
///
/// Implementations own everything the builder deliberately does not:
/// connections, pooling, retries, and cancellation. Errors are propagated
/// to the terminal operation's caller unmodified.
///
/// # Example
///
/// ```rust
/// use quarry::{BoxError, Fetch};
/// use serde_json::Value;
///
/// struct StaticRows(Vec<Value>);
///
/// impl Fetch for StaticRows {
///     async fn fetch(&self, _collection: &str, _sql: &str) -> Result<Vec<Value>, BoxError> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
pub trait Fetch {
    /// Runs `sql` against the store backing `collection`, returning rows as
    /// JSON objects in result order.
    fn fetch(
        &self,
        collection: &str,
        sql: &str,
    ) -> impl Future<Output = Result<Vec<Value>, BoxError>> + Send;
}

impl<F: Fetch> Fetch for &F {
    fn fetch(
        &self,
        collection: &str,
        sql: &str,
    ) -> impl Future<Output = Result<Vec<Value>, BoxError>> + Send {
        (**self).fetch(collection, sql)
    }
}
