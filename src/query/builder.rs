//! The fluent builder bound to a single collection.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::fetch::Fetch;
use crate::manifest::Manifest;
use crate::query::compile::{compile, CompileOpts, CountSpec, OrderClause, QueryState};
use crate::query::filter::{Condition, Direction, FilterValue, Operator};

/// A fluent query against one collection.
///
/// Chain methods consume the builder and return a new one, so a query value
/// is never shared between two in-flight operations. Terminal operations
/// (`all`, `first`, `count`) borrow the builder, compile the state as it
/// stands, and delegate execution to the injected [`Fetch`] implementation;
/// a builder may issue several terminal calls, each recompiling from the
/// current state.
///
/// # Type parameters
///
/// - `E`: the row type, deserialized from the executor's JSON rows
/// - `F`: the injected executor
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use quarry::{BoxError, CollectionQuery, Direction, Fetch, Manifest, Operator};
/// use serde::Deserialize;
/// use serde_json::{json, Value};
///
/// #[derive(Debug, Deserialize)]
/// struct Post {
///     path: String,
///     title: String,
/// }
///
/// struct StaticRows;
///
/// impl Fetch for StaticRows {
///     async fn fetch(&self, _collection: &str, _sql: &str) -> Result<Vec<Value>, BoxError> {
///         Ok(vec![json!({"path": "/blog/hello", "title": "Hello"})])
///     }
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> quarry::Result<()> {
/// let manifest: Arc<Manifest> = Arc::new([("posts", "_content_posts")].into_iter().collect());
/// let posts: Vec<Post> = CollectionQuery::from("posts", manifest, StaticRows)
///     .filter("draft", Operator::Eq, false)?
///     .order("date", Direction::Desc)
///     .limit(10)
///     .all()
///     .await?;
/// assert_eq!(posts[0].title, "Hello");
/// # Ok(())
/// # }
/// ```
pub struct CollectionQuery<E, F> {
    collection: String,
    manifest: Arc<Manifest>,
    fetch: F,
    state: QueryState,
    _row: PhantomData<E>,
}

impl<E, F> CollectionQuery<E, F> {
    /// Starts a new query against `collection`.
    ///
    /// The builder stays bound to this collection for its whole lifetime;
    /// the physical table is resolved through `manifest` when a terminal
    /// operation compiles the query.
    pub fn from(collection: impl Into<String>, manifest: Arc<Manifest>, fetch: F) -> Self {
        Self {
            collection: collection.into(),
            manifest,
            fetch,
            state: QueryState::default(),
            _row: PhantomData,
        }
    }

    /// Filters on the row's `path` field; sugar for an equality filter.
    #[must_use]
    pub fn path(mut self, value: impl Into<String>) -> Self {
        self.state
            .conditions
            .push(Condition::equals("path", value.into()));
        self
    }

    /// Appends one WHERE predicate.
    ///
    /// The operator/value pairing is validated here, before any I/O: set
    /// membership needs a list, ranges need a two-element list, null checks
    /// ignore the value, everything else needs a scalar.
    pub fn filter(
        mut self,
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<FilterValue>,
    ) -> Result<Self> {
        self.state
            .conditions
            .push(Condition::new(field, operator, value)?);
        Ok(self)
    }

    /// Appends fields to the projection, keeping insertion order. An empty
    /// iterator is a no-op, never a reset; no `select` call at all means
    /// "all fields".
    #[must_use]
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .selected_fields
            .extend(fields.into_iter().map(Into::into));
        self
    }

    /// Appends an ORDER BY clause. With no `order` calls the compiled query
    /// falls back to the default document order.
    #[must_use]
    pub fn order(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.state.order_by.push(OrderClause {
            field: field.into(),
            direction,
        });
        self
    }

    /// Sets the row offset. Takes effect only when a limit is also in
    /// force; an offset without a limit is dropped at compile time.
    #[must_use]
    pub fn skip(mut self, n: u64) -> Self {
        self.state.offset = n;
        self
    }

    /// Caps the number of returned rows. Zero means unlimited.
    #[must_use]
    pub fn limit(mut self, n: u64) -> Self {
        self.state.limit = n;
        self
    }
}

impl<E, F: Fetch> CollectionQuery<E, F> {
    /// Counts all matching rows.
    pub async fn count(&self) -> Result<u64> {
        self.count_field("*", false).await
    }

    /// Counts `field` across matching rows, optionally distinct.
    pub async fn count_field(&self, field: &str, distinct: bool) -> Result<u64> {
        let opts = CompileOpts {
            count: Some(CountSpec {
                field: field.to_string(),
                distinct,
            }),
            ..Default::default()
        };
        let rows = self.run(&opts).await?;
        rows.first()
            .and_then(|row| row.get("count"))
            .and_then(Value::as_u64)
            .ok_or(Error::MalformedCountRow)
    }

    /// Resolves the table, compiles, and performs the single fetch.
    async fn run(&self, opts: &CompileOpts) -> Result<Vec<Value>> {
        let table = self
            .manifest
            .table(&self.collection)
            .ok_or_else(|| Error::UnknownCollection(self.collection.clone()))?;
        let sql = compile(&self.state, table, opts);
        debug!(collection = %self.collection, %sql, "compiled query");
        self.fetch
            .fetch(&self.collection, &sql)
            .await
            .map_err(Error::Fetch)
    }
}

impl<E: DeserializeOwned, F: Fetch> CollectionQuery<E, F> {
    /// Fetches every row matching the accumulated state.
    pub async fn all(&self) -> Result<Vec<E>> {
        let rows = self.run(&CompileOpts::default()).await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(Error::from))
            .collect()
    }

    /// Fetches the first matching row, forcing `LIMIT 1` for this call
    /// only; the stored limit and offset are left untouched.
    pub async fn first(&self) -> Result<Option<E>> {
        let opts = CompileOpts {
            limit: Some(1),
            ..Default::default()
        };
        let mut rows = self.run(&opts).await?;
        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(rows.swap_remove(0))?))
    }
}
