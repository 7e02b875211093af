use crate::config::QueryConfig;
use crate::database::models::ContactMessage;
use crate::database::{DatabaseError, Repository, Table};
use crate::filter::{contains_pattern, Filter, FilterOp, FilterOrder, FilterWhere, PageInfo, Pagination};

pub const SORTABLE_COLUMNS: [&str; 3] = ["created_at", "name", "status"];
pub const SEARCH_COLUMNS: [&str; 3] = ["name", "email", "message"];

/// Raw query string of `GET /api/messages`. Everything stays text so that
/// malformed values fall back to defaults instead of rejecting the request.
#[derive(Debug, Clone, Default)]
pub struct MessageListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl MessageListQuery {
    /// Build from decoded query pairs. The first occurrence of a key wins;
    /// unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                "status" => &mut query.status,
                "search" => &mut query.search,
                "sortBy" => &mut query.sort_by,
                "sortOrder" => &mut query.sort_order,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub pagination: PageInfo,
}

/// A resolved listing request: one filter shared by the page query and the
/// count query.
#[derive(Debug, Clone)]
pub struct MessageListing {
    filter: Filter,
    pagination: Pagination,
}

impl MessageListing {
    pub fn from_query(query: &MessageListQuery, config: &QueryConfig) -> Self {
        let pagination = Pagination::from_request(
            query.page.as_deref(),
            query.limit.as_deref(),
            config.default_limit,
            config.max_limit,
        );

        let mut predicate = FilterWhere::new();

        // An unknown status is bound as-is and simply matches nothing.
        if let Some(status) = query.status.as_deref().map(str::trim) {
            if !status.is_empty() && status != "all" {
                predicate = predicate.eq("status", status);
            }
        }

        if let Some(search) = query.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                predicate = predicate.any_of(&SEARCH_COLUMNS, FilterOp::ILike, contains_pattern(search));
            }
        }

        let order = FilterOrder::from_request(
            query.sort_by.as_deref(),
            query.sort_order.as_deref(),
            &SORTABLE_COLUMNS,
            "created_at",
        );

        let filter = Filter::new(ContactMessage::TABLE)
            .where_clause(predicate)
            .order(order)
            .paginate(pagination);

        Self { filter, pagination }
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub async fn fetch(
        &self,
        repo: &Repository<ContactMessage>,
    ) -> Result<Page<ContactMessage>, DatabaseError> {
        let (rows, total) = tokio::try_join!(repo.select_any(&self.filter), repo.count(&self.filter))?;
        Ok(Page {
            rows,
            pagination: self.pagination.info(total),
        })
    }
}
