//! Offset pagination with a uniform page envelope.

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, Order, PaginatorTrait, QueryOrder,
    QuerySelect, Select,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::apply::resolve_column;
use super::QueryError;

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Pagination and sorting parameters shared by every list endpoint.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PageParams {
    /// Page number (1-based). Default: 1
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page. Default: 100
    #[serde(default = "default_size")]
    pub size: u64,
    /// Field to order by; validated against the endpoint's field
    /// allow-list. Default: `created_at`
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    /// `asc` or `desc`. Default: `desc`
    #[serde(default)]
    pub sort_order: SortOrder,
}

fn default_page() -> u64 {
    1
}

fn default_size() -> u64 {
    100
}

fn default_sort_by() -> String {
    "created_at".to_string()
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            size: default_size(),
            sort_by: default_sort_by(),
            sort_order: SortOrder::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageParamsError {
    #[error("page must be >= 1")]
    PageOutOfRange,
    #[error("size must be between 1 and {max}")]
    SizeOutOfRange { max: u64 },
}

impl PageParams {
    /// Boundary validation. The engine itself assumes validated input.
    pub fn validate(&self, max_size: u64) -> Result<(), PageParamsError> {
        if self.page < 1 {
            return Err(PageParamsError::PageOutOfRange);
        }
        if self.size < 1 || self.size > max_size {
            return Err(PageParamsError::SizeOutOfRange { max: max_size });
        }
        Ok(())
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.size
    }
}

/// The uniform envelope returned by every list endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    /// Rows matching the filters, ignoring pagination.
    pub total: u64,
    pub page: u64,
    pub size: u64,
    /// Total page count, never below 1 even for an empty result.
    pub pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> PaginatedResponse<T> {
    /// Build the envelope. `size` must already be validated (>= 1).
    pub fn new(items: Vec<T>, total: u64, page: u64, size: u64) -> Self {
        let pages = total.div_ceil(size).max(1);
        Self {
            has_next: page < pages,
            has_prev: page > 1,
            items,
            total,
            page,
            size,
            pages,
        }
    }

    /// Convert the items while keeping the page metadata intact.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            size: self.size,
            pages: self.pages,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}

/// Execute `query` as one page: count, order, offset/limit, fetch.
///
/// `sort_by` resolves through the same capability table the filters use;
/// an unknown field is rejected instead of being passed to the backend.
/// Count and fetch run sequentially on the same connection, so the pair
/// can be transiently inconsistent under concurrent writes.
pub async fn paginate<Db, E, C>(
    db: &Db,
    query: Select<E>,
    columns: &[(&str, C)],
    params: &PageParams,
) -> Result<PaginatedResponse<E::Model>, QueryError>
where
    Db: ConnectionTrait,
    E: EntityTrait,
    E::Model: FromQueryResult + Sized + Send + Sync,
    C: ColumnTrait + Copy,
{
    let sort_column = resolve_column(&params.sort_by, columns)
        .map_err(|_| QueryError::UnknownSortField(params.sort_by.clone()))?;

    let total = query.clone().count(db).await?;

    let order = match params.sort_order {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    };
    let items = query
        .order_by(sort_column, order)
        .offset(params.offset())
        .limit(params.size)
        .all(db)
        .await?;

    Ok(PaginatedResponse::new(
        items,
        total,
        params.page,
        params.size,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_math() {
        let resp = PaginatedResponse::new(vec![0u8; 20], 105, 6, 20);
        assert_eq!(resp.pages, 6);
        assert!(!resp.has_next);
        assert!(resp.has_prev);

        let first = PaginatedResponse::new(vec![0u8; 20], 105, 1, 20);
        assert!(first.has_next);
        assert!(!first.has_prev);
    }

    #[test]
    fn empty_result_still_has_one_page() {
        let resp: PaginatedResponse<u8> = PaginatedResponse::new(Vec::new(), 0, 1, 20);
        assert_eq!(resp.pages, 1);
        assert!(resp.items.is_empty());
        assert!(!resp.has_next);
        assert!(!resp.has_prev);
    }

    #[test]
    fn exact_multiple_does_not_round_up() {
        let resp = PaginatedResponse::new(vec![0u8; 20], 100, 5, 20);
        assert_eq!(resp.pages, 5);
        assert!(!resp.has_next);
    }

    #[test]
    fn offset_is_zero_based() {
        let params = PageParams {
            page: 3,
            size: 25,
            ..PageParams::default()
        };
        assert_eq!(params.offset(), 50);
    }

    #[test]
    fn validate_bounds() {
        let mut params = PageParams::default();
        assert!(params.validate(1000).is_ok());

        params.page = 0;
        assert_eq!(params.validate(1000), Err(PageParamsError::PageOutOfRange));

        params.page = 1;
        params.size = 0;
        assert!(matches!(
            params.validate(1000),
            Err(PageParamsError::SizeOutOfRange { .. })
        ));

        params.size = 1001;
        assert!(matches!(
            params.validate(1000),
            Err(PageParamsError::SizeOutOfRange { .. })
        ));
    }
}
