//! The query builder.
//!
//! Start with [`CollectionQuery::from`] and chain filters, projection,
//! ordering, and pagination before finishing with a terminal operation
//! (`all`, `first`, `count`). The terminal call compiles the accumulated
//! state into a single SQL string and hands it to the injected
//! [`Fetch`](crate::Fetch) executor exactly once.
//!
//! # Submodules
//!
//! - [`builder`] — the chainable [`CollectionQuery`] surface.
//! - [`filter`] — operators, literal values, and condition rendering.
//! - [`compile`] — the pure state-to-SQL assembler.

pub mod builder;
pub mod compile;
pub mod filter;

pub use builder::CollectionQuery;
pub use filter::{Direction, FilterValue, Literal, Operator};
