use super::types::SortDirection;

/// Validated ORDER BY: the column always comes from an allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOrder {
    column: &'static str,
    direction: SortDirection,
}

impl FilterOrder {
    pub fn new(column: &'static str, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Unknown or missing `sort_by` falls back to `default` without error.
    pub fn from_request(
        sort_by: Option<&str>,
        sort_order: Option<&str>,
        allowed: &[&'static str],
        default: &'static str,
    ) -> Self {
        let column = sort_by
            .map(str::trim)
            .and_then(|requested| allowed.iter().copied().find(|c| *c == requested))
            .unwrap_or(default);

        Self {
            column,
            direction: SortDirection::parse(sort_order),
        }
    }

    pub fn column(&self) -> &'static str {
        self.column
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// `id` breaks ties so OFFSET paging is stable across the listing query.
    pub fn generate(&self) -> String {
        let dir = self.direction.to_sql();
        if self.column == "id" {
            format!("ORDER BY \"id\" {}", dir)
        } else {
            format!("ORDER BY \"{}\" {}, \"id\" {}", self.column, dir, dir)
        }
    }
}
