//! Free-text search expansion.

use super::filter::{Filter, FilterOperator, FilterValue, ScalarValue};

/// Build one case-insensitive substring filter per searchable field.
///
/// The resulting filters express "term appears in ANY of these fields"
/// and must be OR-combined by the caller, unlike parsed query filters
/// which are AND-combined. Wildcards in the term itself are not escaped.
pub fn build_search_filters(term: &str, fields: &[&str]) -> Vec<Filter> {
    if term.is_empty() || fields.is_empty() {
        return Vec::new();
    }

    let pattern = format!("%{term}%");
    fields
        .iter()
        .map(|field| {
            Filter::new(
                *field,
                FilterOperator::ILike,
                FilterValue::Scalar(ScalarValue::Text(pattern.clone())),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_ilike_filter_per_field() {
        let filters = build_search_filters("john", &["title", "message"]);
        assert_eq!(filters.len(), 2);
        for (filter, field) in filters.iter().zip(["title", "message"]) {
            assert_eq!(filter.field, field);
            assert_eq!(filter.operator, FilterOperator::ILike);
            assert_eq!(
                filter.value,
                FilterValue::Scalar(ScalarValue::Text("%john%".into()))
            );
        }
    }

    #[test]
    fn empty_term_or_fields_yield_nothing() {
        assert!(build_search_filters("", &["title"]).is_empty());
        assert!(build_search_filters("john", &[]).is_empty());
    }
}
