//! Generic filtering and pagination over entity collections.
//!
//! Every list endpoint funnels through this module: raw query parameters
//! are parsed into [`Filter`]s against a per-endpoint allow-list, an
//! optional free-text term expands into OR-combined `ilike` filters, both
//! sets compile onto a SeaORM select through a per-entity capability
//! table, and the result is fetched as one uniform page envelope.

pub mod apply;
pub mod filter;
pub mod pagination;
pub mod parser;
pub mod search;

pub use apply::{apply_filters, resolve_column, Combine};
pub use filter::{Filter, FilterOperator, FilterValue, ScalarValue};
pub use pagination::{paginate, PageParams, PageParamsError, PaginatedResponse, SortOrder};
pub use parser::{parse_filters, ParseError, ParsePolicy, QueryParser};
pub use search::build_search_filters;

/// Errors surfaced by the predicate compiler and the pagination engine.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// A filter referenced a field missing from the capability table.
    /// The endpoint allow-list should have rejected it long before this
    /// point, so this is a programming error rather than a client error.
    #[error("field `{0}` has no registered column")]
    UnknownField(String),
    /// Operator and value shape don't line up (e.g. `between` without a
    /// range). Unreachable for parser-built filters.
    #[error("operator `{operator}` cannot be applied to `{field}` with that value")]
    InvalidFilter {
        field: String,
        operator: FilterOperator,
    },
    /// `sort_by` failed validation against the capability table.
    #[error("cannot sort by unknown field `{0}`")]
    UnknownSortField(String),
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}
