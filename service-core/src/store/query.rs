//! Query description shared by every table store implementation.

use std::fmt;

/// Comparison applied by a [`Filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    /// SQL `LIKE` with `%` as the wildcard.
    Like,
    In,
}

impl FilterOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Neq => "neq",
            FilterOp::Lt => "lt",
            FilterOp::Lte => "lte",
            FilterOp::Gt => "gt",
            FilterOp::Gte => "gte",
            FilterOp::Like => "like",
            FilterOp::In => "in",
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Single(String),
    List(Vec<String>),
}

/// One `column <op> value` predicate. Filters on a query are ANDed.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: FilterValue,
}

impl Filter {
    fn single(column: &str, op: FilterOp, value: impl ToString) -> Self {
        Self {
            column: column.to_string(),
            op,
            value: FilterValue::Single(value.to_string()),
        }
    }

    pub fn eq(column: &str, value: impl ToString) -> Self {
        Self::single(column, FilterOp::Eq, value)
    }

    pub fn neq(column: &str, value: impl ToString) -> Self {
        Self::single(column, FilterOp::Neq, value)
    }

    pub fn lt(column: &str, value: impl ToString) -> Self {
        Self::single(column, FilterOp::Lt, value)
    }

    pub fn lte(column: &str, value: impl ToString) -> Self {
        Self::single(column, FilterOp::Lte, value)
    }

    pub fn gt(column: &str, value: impl ToString) -> Self {
        Self::single(column, FilterOp::Gt, value)
    }

    pub fn gte(column: &str, value: impl ToString) -> Self {
        Self::single(column, FilterOp::Gte, value)
    }

    pub fn like(column: &str, pattern: impl ToString) -> Self {
        Self::single(column, FilterOp::Like, pattern)
    }

    pub fn in_list<I, S>(column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self {
            column: column.to_string(),
            op: FilterOp::In,
            value: FilterValue::List(values.into_iter().map(|v| v.to_string()).collect()),
        }
    }

    /// PostgREST right-hand side, e.g. `eq.USD` or `in.("a","b")`.
    pub fn to_query_value(&self) -> String {
        match &self.value {
            FilterValue::Single(value) => format!("{}.{}", self.op, value),
            FilterValue::List(values) => {
                let quoted: Vec<String> = values
                    .iter()
                    .map(|v| format!("\"{}\"", v.replace('"', "\\\"")))
                    .collect();
                format!("{}.({})", self.op, quoted.join(","))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

/// A projected, filtered, ordered read of one table.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub table: String,
    pub columns: Vec<String>,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl SelectQuery {
    pub fn from(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: Vec::new(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Restrict the returned columns. No call means every column.
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query-string pairs in PostgREST form.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let select = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(",")
        };

        let mut pairs = vec![("select".to_string(), select)];
        pairs.extend(filter_pairs(&self.filters));

        if let Some(order) = &self.order {
            let direction = match order.direction {
                Direction::Asc => "asc",
                Direction::Desc => "desc",
            };
            pairs.push(("order".to_string(), format!("{}.{}", order.column, direction)));
        }

        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }

        pairs
    }
}

pub fn filter_pairs(filters: &[Filter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|f| (f.column.clone(), f.to_query_value()))
        .collect()
}
