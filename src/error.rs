//! Error types for quarry.

use miette::Diagnostic;
use thiserror::Error;

use crate::query::filter::Operator;

/// Boxed error produced by an injected [`Fetch`](crate::Fetch) implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for query construction and terminal operations.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("value for {0} must be a list")]
    #[diagnostic(
        code(quarry::filter::set),
        help("pass the candidate values as a Vec or slice")
    )]
    InvalidInValue(Operator),

    #[error("value for {0} must be a list with two elements")]
    #[diagnostic(
        code(quarry::filter::range),
        help("pass exactly [low, high]")
    )]
    InvalidRangeValue(Operator),

    #[error("value for {0} must be a single scalar")]
    #[diagnostic(
        code(quarry::filter::scalar),
        help("this operator compares against one value, not a list")
    )]
    InvalidScalarValue(Operator),

    #[error("unknown operator: {0}")]
    #[diagnostic(
        code(quarry::filter::operator),
        help("supported operators: =, !=, >, <, >=, <=, LIKE, NOT LIKE, IN, NOT IN, BETWEEN, NOT BETWEEN, IS NULL, IS NOT NULL")
    )]
    UnknownOperator(String),

    #[error("unknown collection: {0}")]
    #[diagnostic(
        code(quarry::manifest::collection),
        help("check the manifest the builder was constructed with")
    )]
    UnknownCollection(String),

    #[error("row decode failed: {0}")]
    #[diagnostic(
        code(quarry::row::decode),
        help("the fetched row does not match the requested row type")
    )]
    Decode(#[from] serde_json::Error),

    #[error("count query returned no usable count column")]
    #[diagnostic(
        code(quarry::row::count),
        help("the executor must return a single row with an integer `count` field")
    )]
    MalformedCountRow,

    #[error("fetch failed: {0}")]
    #[diagnostic(code(quarry::fetch))]
    Fetch(#[source] BoxError),
}

/// Result type alias for quarry operations.
pub type Result<T> = std::result::Result<T, Error>;
