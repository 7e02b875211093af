pub mod filter;
pub mod filter_order;
pub mod filter_where;
pub mod types;

pub use filter::{Filter, PageInfo, Pagination};
pub use filter_order::FilterOrder;
pub use filter_where::{contains_pattern, escape_like, Clause, FilterWhere};
pub use types::*;
