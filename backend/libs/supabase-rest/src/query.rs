//! Row filters and select queries in the PostgREST query-string dialect.

/// A horizontal filter on one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// `column=eq.value`
    Eq { column: String, value: String },
    /// `column=in.(a,b,c)`
    In { column: String, values: Vec<String> },
    /// `column=ilike.pattern` where `*` is the wildcard
    ILike { column: String, pattern: String },
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl ToString) -> Self {
        Filter::Eq {
            column: column.into(),
            value: value.to_string(),
        }
    }

    pub fn in_list<I, V>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        Filter::In {
            column: column.into(),
            values: values.into_iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Case-insensitive substring match
    pub fn ilike_contains(column: impl Into<String>, needle: &str) -> Self {
        Filter::ILike {
            column: column.into(),
            pattern: format!("*{}*", needle),
        }
    }

    pub fn column(&self) -> &str {
        match self {
            Filter::Eq { column, .. } | Filter::In { column, .. } | Filter::ILike { column, .. } => {
                column
            }
        }
    }

    /// Render as a single query-string pair
    pub fn to_param(&self) -> (String, String) {
        match self {
            Filter::Eq { column, value } => (column.clone(), format!("eq.{}", value)),
            Filter::In { column, values } => {
                let list = values
                    .iter()
                    .map(|v| quote_list_value(v))
                    .collect::<Vec<_>>()
                    .join(",");
                (column.clone(), format!("in.({})", list))
            }
            Filter::ILike { column, pattern } => (column.clone(), format!("ilike.{}", pattern)),
        }
    }
}

// Values inside `in.(...)` must be double-quoted when they contain list syntax.
fn quote_list_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| matches!(c, ',' | '(' | ')' | '"' | '\\' | ' ' | '.' | ':'));
    if !needs_quotes {
        return value.to_string();
    }
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

/// Sort key for a select
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// A `GET /rest/v1/<table>` request description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    columns: String,
    filters: Vec<Filter>,
    order: Vec<Order>,
    limit: Option<usize>,
}

impl Default for SelectQuery {
    fn default() -> Self {
        Self::new("*")
    }
}

impl SelectQuery {
    /// `columns` may embed joins, e.g. `*,profiles(username),likes(user_id)`
    pub fn new(columns: impl Into<String>) -> Self {
        Self {
            columns: columns.into(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    pub fn in_list<I, V>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        self.filters.push(Filter::in_list(column, values));
        self
    }

    pub fn ilike_contains(mut self, column: impl Into<String>, needle: &str) -> Self {
        self.filters.push(Filter::ilike_contains(column, needle));
        self
    }

    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order.push(Order {
            column: column.into(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.columns.clone())];
        params.extend(self.filters.iter().map(Filter::to_param));

        if !self.order.is_empty() {
            let order = self
                .order
                .iter()
                .map(|o| {
                    format!(
                        "{}.{}",
                        o.column,
                        if o.ascending { "asc" } else { "desc" }
                    )
                })
                .collect::<Vec<_>>()
                .join(",");
            params.push(("order".to_string(), order));
        }

        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        params
    }
}

/// Parse the total out of a `Content-Range` header (`0-4/17`, `*/0`).
pub fn parse_content_range_total(header: &str) -> Option<i64> {
    let (_, total) = header.rsplit_once('/')?;
    total.trim().parse().ok()
}
