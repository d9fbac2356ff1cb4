//! Filter vocabulary: operators, literal values, and condition rendering.
//!
//! A filter triple `(field, operator, value)` is validated when the
//! condition is constructed and stored in tagged form; string rendering
//! only happens at compile time.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// The closed set of predicate operators accepted by
/// [`filter`](crate::CollectionQuery::filter).
///
/// Parsing via [`FromStr`] is case-insensitive on the SQL token; rendering
/// always emits the canonical upper-cased form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    Like,
    NotLike,
    In,
    NotIn,
    Between,
    NotBetween,
    IsNull,
    IsNotNull,
}

impl Operator {
    /// The SQL token this operator renders as.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Between => "BETWEEN",
            Self::NotBetween => "NOT BETWEEN",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim().to_uppercase().as_str() {
            "=" => Self::Eq,
            "!=" | "<>" => Self::Ne,
            ">" => Self::Gt,
            "<" => Self::Lt,
            ">=" => Self::Ge,
            "<=" => Self::Le,
            "LIKE" => Self::Like,
            "NOT LIKE" => Self::NotLike,
            "IN" => Self::In,
            "NOT IN" => Self::NotIn,
            "BETWEEN" => Self::Between,
            "NOT BETWEEN" => Self::NotBetween,
            "IS NULL" => Self::IsNull,
            "IS NOT NULL" => Self::IsNotNull,
            _ => return Err(Error::UnknownOperator(s.to_string())),
        })
    }
}

/// Sort direction for [`order`](crate::CollectionQuery::order).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        })
    }
}

/// A scalar literal interpolated into the compiled query.
///
/// Rendering single-quotes the value and performs no further escaping: the
/// builder trusts its call sites, which are typed application code rather
/// than raw user input. Executors that cannot extend that trust must quote
/// at their own boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl Literal {
    pub(crate) fn render(&self) -> String {
        match self {
            Self::Text(s) => format!("'{s}'"),
            Self::Integer(n) => format!("'{n}'"),
            Self::Float(x) => format!("'{x}'"),
            Self::Bool(b) => format!("'{b}'"),
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u32> for Literal {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// The value side of a filter triple: nothing, one scalar, or a list.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    None,
    Scalar(Literal),
    List(Vec<Literal>),
}

impl From<()> for FilterValue {
    fn from((): ()) -> Self {
        Self::None
    }
}

impl From<Literal> for FilterValue {
    fn from(value: Literal) -> Self {
        Self::Scalar(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<u32> for FilterValue {
    fn from(value: u32) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Scalar(value.into())
    }
}

impl<T: Into<Literal>> From<Vec<T>> for FilterValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Literal> + Clone> From<&[T]> for FilterValue {
    fn from(values: &[T]) -> Self {
        Self::List(values.iter().cloned().map(Into::into).collect())
    }
}

/// Validated predicate shape: the operator/value pairing has already been
/// checked, so rendering is total.
#[derive(Debug, Clone, PartialEq)]
enum Predicate {
    Compare { op: Operator, value: Literal },
    Set { negated: bool, values: Vec<Literal> },
    Range { negated: bool, low: Literal, high: Literal },
    Null { negated: bool },
}

/// One structured WHERE predicate contributed by a `filter` call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Condition {
    field: String,
    predicate: Predicate,
}

impl Condition {
    /// Validates the operator/value pairing and builds the tagged form.
    ///
    /// Set membership requires a list, ranges require a two-element list,
    /// null checks ignore the value, and everything else requires a scalar.
    pub(crate) fn new(
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<FilterValue>,
    ) -> Result<Self> {
        let predicate = match (operator, value.into()) {
            (Operator::In | Operator::NotIn, FilterValue::List(values)) => Predicate::Set {
                negated: operator == Operator::NotIn,
                values,
            },
            (Operator::In | Operator::NotIn, _) => {
                return Err(Error::InvalidInValue(operator));
            }
            (Operator::Between | Operator::NotBetween, FilterValue::List(values))
                if values.len() == 2 =>
            {
                let mut values = values.into_iter();
                let (Some(low), Some(high)) = (values.next(), values.next()) else {
                    return Err(Error::InvalidRangeValue(operator));
                };
                Predicate::Range {
                    negated: operator == Operator::NotBetween,
                    low,
                    high,
                }
            }
            (Operator::Between | Operator::NotBetween, _) => {
                return Err(Error::InvalidRangeValue(operator));
            }
            (Operator::IsNull | Operator::IsNotNull, _) => Predicate::Null {
                negated: operator == Operator::IsNotNull,
            },
            (_, FilterValue::Scalar(value)) => Predicate::Compare {
                op: operator,
                value,
            },
            _ => return Err(Error::InvalidScalarValue(operator)),
        };

        Ok(Self {
            field: field.into(),
            predicate,
        })
    }

    /// Builds an equality condition directly; cannot fail validation.
    pub(crate) fn equals(field: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self {
            field: field.into(),
            predicate: Predicate::Compare {
                op: Operator::Eq,
                value: value.into(),
            },
        }
    }

    /// Renders the predicate wrapped in one pair of parentheses; the
    /// assembler adds the outer pair when joining clauses with AND.
    pub(crate) fn render(&self) -> String {
        let inner = match &self.predicate {
            Predicate::Compare { op, value } => {
                format!("\"{}\" {} {}", self.field, op, value.render())
            }
            Predicate::Set { negated, values } => {
                let op = if *negated { Operator::NotIn } else { Operator::In };
                let values = values
                    .iter()
                    .map(Literal::render)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("\"{}\" {} ({})", self.field, op, values)
            }
            Predicate::Range { negated, low, high } => {
                let op = if *negated {
                    Operator::NotBetween
                } else {
                    Operator::Between
                };
                format!(
                    "\"{}\" {} {} AND {}",
                    self.field,
                    op,
                    low.render(),
                    high.render()
                )
            }
            Predicate::Null { negated } => {
                let op = if *negated {
                    Operator::IsNotNull
                } else {
                    Operator::IsNull
                };
                format!("\"{}\" {}", self.field, op)
            }
        };
        format!("({inner})")
    }
}
