use serde::Serialize;

use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{SqlResult, SqlValue};

/// Clamped page/limit pair. Construction never fails: bad input falls back
/// to defaults and out-of-range input is pulled into range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn from_request(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: u32,
        max_limit: u32,
    ) -> Self {
        let max_limit = max_limit.max(1);
        let page = parse_positive(page).unwrap_or(1);
        let limit = parse_positive(limit)
            .unwrap_or(default_limit as i64)
            .clamp(1, max_limit as i64);

        Self {
            page: page.min(u32::MAX as i64) as u32,
            limit: limit as u32,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }

    /// `ceil(total / limit)`
    pub fn pages(&self, total: i64) -> i64 {
        let limit = self.limit as i64;
        (total.max(0) + limit - 1) / limit
    }

    pub fn info(&self, total: i64) -> PageInfo {
        PageInfo {
            page: self.page,
            limit: self.limit,
            total,
            pages: self.pages(total),
        }
    }
}

/// Leading integer of the input, floored at 1. Non-numeric input is `None`.
fn parse_positive(raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim();
    let digits_end = raw
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(raw.len());

    raw[..digits_end].parse::<i64>().ok().map(|n| n.max(1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub pages: i64,
}

/// A listing over one table: predicate, order and window.
///
/// [`Filter::to_sql`] and [`Filter::to_count_sql`] render the predicate
/// through the same call, so the two queries cannot disagree on the filter
/// or its bound parameters.
#[derive(Debug, Clone)]
pub struct Filter {
    table_name: &'static str,
    where_data: FilterWhere,
    order: Option<FilterOrder>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Filter {
    pub fn new(table_name: &'static str) -> Self {
        Self {
            table_name,
            where_data: FilterWhere::new(),
            order: None,
            limit: None,
            offset: None,
        }
    }

    pub fn table_name(&self) -> &'static str {
        self.table_name
    }

    pub fn where_clause(mut self, where_data: FilterWhere) -> Self {
        self.where_data = where_data;
        self
    }

    pub fn order(mut self, order: FilterOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit.max(0));
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.limit = Some(pagination.limit as i64);
        self.offset = Some(pagination.offset());
        self
    }

    pub fn to_where_sql(&self) -> SqlResult {
        let (query, params) = self.where_data.generate(0);
        SqlResult { query, params }
    }

    pub fn to_sql(&self) -> SqlResult {
        let SqlResult { query: where_sql, mut params } = self.to_where_sql();

        let mut parts = vec![
            format!("SELECT * FROM \"{}\"", self.table_name),
            format!("WHERE {}", where_sql),
        ];
        if let Some(order) = &self.order {
            parts.push(order.generate());
        }
        if let Some(limit) = self.limit {
            params.push(SqlValue::Int(limit));
            parts.push(format!("LIMIT ${}", params.len()));
        }
        if let Some(offset) = self.offset {
            params.push(SqlValue::Int(offset));
            parts.push(format!("OFFSET ${}", params.len()));
        }

        SqlResult {
            query: parts.join(" "),
            params,
        }
    }

    pub fn to_count_sql(&self) -> SqlResult {
        let SqlResult { query: where_sql, params } = self.to_where_sql();
        SqlResult {
            query: format!(
                "SELECT COUNT(*) AS count FROM \"{}\" WHERE {}",
                self.table_name, where_sql
            ),
            params,
        }
    }
}
