//! The pure compile step: accumulated state to a single SQL string.

use crate::query::filter::{Condition, Direction};

/// Ordering applied when no `order` call was made. Content rows carry a
/// `stem` column identifying their source document, which gives a stable
/// document order.
const DEFAULT_ORDER: &str = "stem ASC";

/// One ORDER BY entry.
#[derive(Debug, Clone)]
pub(crate) struct OrderClause {
    pub field: String,
    pub direction: Direction,
}

/// The accumulated query specification.
///
/// Append-only: chain methods only ever add conditions, fields, and order
/// clauses; there is no removal surface. A limit or offset of zero means
/// "unset".
#[derive(Debug, Default, Clone)]
pub(crate) struct QueryState {
    pub conditions: Vec<Condition>,
    pub selected_fields: Vec<String>,
    pub offset: u64,
    pub limit: u64,
    pub order_by: Vec<OrderClause>,
}

/// Count aggregate requested by a count terminal.
#[derive(Debug, Clone)]
pub(crate) struct CountSpec {
    pub field: String,
    pub distinct: bool,
}

/// Per-terminal overrides. `first` forces a one-off limit and the count
/// terminals substitute an aggregate; neither touches the stored state.
#[derive(Debug, Default, Clone)]
pub(crate) struct CompileOpts {
    pub limit: Option<u64>,
    pub count: Option<CountSpec>,
}

/// Renders the state into one SQL string. Total for any state; clause order
/// is fixed: projection, FROM, WHERE, ORDER BY, LIMIT/OFFSET.
pub(crate) fn compile(state: &QueryState, table: &str, opts: &CompileOpts) -> String {
    let mut sql = String::from("SELECT ");

    if let Some(count) = &opts.count {
        // The count projection wins outright; selected fields are ignored.
        if count.distinct {
            sql.push_str(&format!("COUNT(DISTINCT {}) as count", count.field));
        } else {
            sql.push_str(&format!("COUNT({}) as count", count.field));
        }
    } else if state.selected_fields.is_empty() {
        sql.push('*');
    } else {
        let fields = state
            .selected_fields
            .iter()
            .map(|f| format!("\"{f}\""))
            .collect::<Vec<_>>()
            .join(", ");
        sql.push_str(&fields);
    }

    sql.push_str(&format!(" FROM {table}"));

    if !state.conditions.is_empty() {
        let conditions = state
            .conditions
            .iter()
            .map(|c| format!("({})", c.render()))
            .collect::<Vec<_>>()
            .join(" AND ");
        sql.push_str(&format!(" WHERE {conditions}"));
    }

    if state.order_by.is_empty() {
        sql.push_str(&format!(" ORDER BY {DEFAULT_ORDER}"));
    } else {
        let orders = state
            .order_by
            .iter()
            .map(|o| format!("\"{}\" {}", o.field, o.direction))
            .collect::<Vec<_>>()
            .join(", ");
        sql.push_str(&format!(" ORDER BY {orders}"));
    }

    // An offset without an effective limit is dropped.
    let limit = opts.limit.unwrap_or(state.limit);
    if limit > 0 {
        sql.push_str(&format!(" LIMIT {limit}"));
        if state.offset > 0 {
            sql.push_str(&format!(" OFFSET {}", state.offset));
        }
    }

    sql
}
