//! Predicate compiler: binds [`Filter`]s to entity columns.
//!
//! Field names are resolved through a per-entity capability table (a
//! `&[(&str, Column)]` slice declared next to the entity), never through
//! reflective lookup. A field missing from the table at this stage means
//! the endpoint's allow-list was bypassed and is reported as an internal
//! error, not a client error.

use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, Select};

use super::filter::{Filter, FilterOperator, FilterValue, ScalarValue};
use super::QueryError;

/// How a set of filters combines into one condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combine {
    /// Every filter must match (primary query filters).
    And,
    /// At least one filter must match (search filters).
    Or,
}

/// Look up a column in a capability table by its query-exposed name.
pub fn resolve_column<C>(field: &str, columns: &[(&str, C)]) -> Result<C, QueryError>
where
    C: ColumnTrait + Copy,
{
    columns
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, column)| *column)
        .ok_or_else(|| QueryError::UnknownField(field.to_string()))
}

/// Compile `filters` onto `query` as one AND- or OR-combined condition.
///
/// Calling this twice on the same select conjoins the two blocks, which
/// is how primary filters (AND) and search filters (OR) compose into
/// "match all filters AND match at least one searched field".
pub fn apply_filters<E, C>(
    query: Select<E>,
    filters: &[Filter],
    columns: &[(&str, C)],
    combine: Combine,
) -> Result<Select<E>, QueryError>
where
    E: EntityTrait,
    C: ColumnTrait + Copy,
{
    if filters.is_empty() {
        return Ok(query);
    }

    let mut condition = match combine {
        Combine::And => Condition::all(),
        Combine::Or => Condition::any(),
    };
    for filter in filters {
        let column = resolve_column(&filter.field, columns)?;
        condition = condition.add(compile_predicate(column, filter)?);
    }

    Ok(query.filter(condition))
}

/// Translate a single filter into a SQL predicate on `column`.
fn compile_predicate<C>(column: C, filter: &Filter) -> Result<SimpleExpr, QueryError>
where
    C: ColumnTrait + Copy,
{
    use FilterOperator::*;
    use FilterValue::{List, Range, Scalar};

    let expr = match (filter.operator, &filter.value) {
        (Eq, Scalar(v)) => column.eq(v),
        (Ne, Scalar(v)) => column.ne(v),
        (Gt, Scalar(v)) => column.gt(v),
        (Gte, Scalar(v)) => column.gte(v),
        (Lt, Scalar(v)) => column.lt(v),
        (Lte, Scalar(v)) => column.lte(v),
        (In, List(items)) => column.is_in(items.iter().map(sea_orm::Value::from)),
        (NotIn, List(items)) => column.is_not_in(items.iter().map(sea_orm::Value::from)),
        (Is, Scalar(ScalarValue::Null)) => column.is_null(),
        (IsNot, Scalar(ScalarValue::Null)) => column.is_not_null(),
        // Over non-NULL scalars the identity operators collapse to
        // plain (in)equality.
        (Is, Scalar(v)) => column.eq(v),
        (IsNot, Scalar(v)) => column.ne(v),
        (Like, Scalar(ScalarValue::Text(pattern))) => column.like(pattern.as_str()),
        (ILike, Scalar(ScalarValue::Text(pattern))) => case_insensitive_like(column, pattern),
        (Between, Range(lo, hi)) => column.between(lo, hi),
        (NotBetween, Range(lo, hi)) => column.not_between(lo, hi),
        (operator, _) => {
            return Err(QueryError::InvalidFilter {
                field: filter.field.clone(),
                operator,
            })
        }
    };

    Ok(expr)
}

/// Backend-portable ILIKE: `UPPER(col) LIKE UPPER(pattern)` behaves the
/// same on SQLite and PostgreSQL.
fn case_insensitive_like<C>(column: C, pattern: &str) -> SimpleExpr
where
    C: ColumnTrait + Copy,
{
    SimpleExpr::FunctionCall(Func::upper(Expr::col(column))).like(pattern.to_uppercase())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::{
        ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema, Set,
    };

    use super::*;
    use crate::infrastructure::database::entities::alert::{self, AlertStatus};
    use crate::query::pagination::{paginate, PageParams, SortOrder};
    use crate::query::parser::parse_filters;
    use crate::query::search::build_search_filters;

    async fn setup() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let backend = db.get_database_backend();
        let schema = Schema::new(backend);
        db.execute(backend.build(&schema.create_table_from_entity(alert::Entity)))
            .await
            .unwrap();
        db
    }

    async fn seed(db: &DatabaseConnection, title: &str, message: &str, status: AlertStatus) {
        let now = Utc::now();
        alert::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            title: Set(title.to_string()),
            message: Set(message.to_string()),
            status: Set(status),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .unwrap();
    }

    fn page(page: u64, size: u64) -> PageParams {
        PageParams {
            page,
            size,
            sort_by: "created_at".to_string(),
            sort_order: SortOrder::Desc,
        }
    }

    fn raw(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn equality_filter_restricts_the_result_set() {
        let db = setup().await;
        seed(&db, "a", "m", AlertStatus::Info).await;
        seed(&db, "b", "m", AlertStatus::Warning).await;
        seed(&db, "c", "m", AlertStatus::Info).await;

        let filters = parse_filters(&raw(&[("status", "info")]), alert::ALLOWED_FIELDS);
        let query = apply_filters(
            alert::Entity::find(),
            &filters,
            alert::QUERYABLE,
            Combine::And,
        )
        .unwrap();
        let result = paginate(&db, query, alert::QUERYABLE, &page(1, 10))
            .await
            .unwrap();

        assert_eq!(result.total, 2);
        assert_eq!(result.items.len(), 2);
        assert!(result
            .items
            .iter()
            .all(|a| a.status == AlertStatus::Info));
        assert_eq!(result.pages, 1);
        assert!(!result.has_next);
        assert!(!result.has_prev);
    }

    #[tokio::test]
    async fn search_filters_match_any_field() {
        let db = setup().await;
        seed(&db, "john's feeder", "ok", AlertStatus::Info).await;
        seed(&db, "feeder", "reported by John", AlertStatus::Info).await;
        seed(&db, "feeder", "ok", AlertStatus::Info).await;

        let search = build_search_filters("john", &["title", "message"]);
        let query = apply_filters(
            alert::Entity::find(),
            &search,
            alert::QUERYABLE,
            Combine::Or,
        )
        .unwrap();
        let result = paginate(&db, query, alert::QUERYABLE, &page(1, 10))
            .await
            .unwrap();

        assert_eq!(result.total, 2);
    }

    #[tokio::test]
    async fn primary_and_search_blocks_conjoin() {
        let db = setup().await;
        seed(&db, "x in title", "m", AlertStatus::Info).await;
        seed(&db, "t", "x in message", AlertStatus::Info).await;
        seed(&db, "t", "m", AlertStatus::Info).await;
        seed(&db, "x in title", "m", AlertStatus::Warning).await;

        let filters = parse_filters(&raw(&[("status", "info")]), alert::ALLOWED_FIELDS);
        let search = build_search_filters("x", &["title", "message"]);

        let mut query = apply_filters(
            alert::Entity::find(),
            &filters,
            alert::QUERYABLE,
            Combine::And,
        )
        .unwrap();
        query = apply_filters(query, &search, alert::QUERYABLE, Combine::Or).unwrap();
        let result = paginate(&db, query, alert::QUERYABLE, &page(1, 10))
            .await
            .unwrap();

        assert_eq!(result.total, 2);
    }

    #[tokio::test]
    async fn in_operator_matches_multiple_values() {
        let db = setup().await;
        seed(&db, "a", "m", AlertStatus::Info).await;
        seed(&db, "b", "m", AlertStatus::Warning).await;
        seed(&db, "c", "m", AlertStatus::Critical).await;

        let filters = parse_filters(&raw(&[("status__in", "info,warning")]), alert::ALLOWED_FIELDS);
        let query = apply_filters(
            alert::Entity::find(),
            &filters,
            alert::QUERYABLE,
            Combine::And,
        )
        .unwrap();
        let result = paginate(&db, query, alert::QUERYABLE, &page(1, 10))
            .await
            .unwrap();

        assert_eq!(result.total, 2);
    }

    #[tokio::test]
    async fn pagination_envelope_tracks_pages() {
        let db = setup().await;
        for i in 0..5 {
            seed(&db, &format!("t{i}"), "m", AlertStatus::Info).await;
        }

        let result = paginate(&db, alert::Entity::find(), alert::QUERYABLE, &page(3, 2))
            .await
            .unwrap();

        assert_eq!(result.total, 5);
        assert_eq!(result.pages, 3);
        assert_eq!(result.items.len(), 1);
        assert!(result.has_prev);
        assert!(!result.has_next);
    }

    #[tokio::test]
    async fn unknown_sort_field_is_rejected() {
        let db = setup().await;
        let mut params = page(1, 10);
        params.sort_by = "evil; DROP TABLE alerts".to_string();

        let err = paginate(&db, alert::Entity::find(), alert::QUERYABLE, &params)
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::UnknownSortField(_)));
    }

    #[test]
    fn unresolvable_field_is_an_internal_error() {
        let filter = Filter::eq("no_such_field", "x");
        let err = apply_filters(
            alert::Entity::find(),
            std::slice::from_ref(&filter),
            alert::QUERYABLE,
            Combine::And,
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::UnknownField(_)));
    }

    #[test]
    fn operator_value_shape_mismatch_is_rejected() {
        let filter = Filter::new(
            "title",
            FilterOperator::Between,
            FilterValue::Scalar(ScalarValue::Int(10)),
        );
        let err = compile_predicate(alert::Column::Title, &filter).unwrap_err();
        assert!(matches!(err, QueryError::InvalidFilter { .. }));
    }
}
