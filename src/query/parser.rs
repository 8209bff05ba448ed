//! Query-string filter parsing.
//!
//! Turns raw `?field=value` / `?field__operator=value` pairs into typed
//! [`Filter`]s, enforcing a caller-supplied allow-list of field names and
//! the closed operator vocabulary. Supported formats:
//!
//! - Simple: `?field=value`
//! - With operator: `?field__operator=value`
//! - Multiple values: `?field__in=value1,value2,value3`
//! - Range: `?field__between=10,20`

use super::filter::{Filter, FilterOperator, FilterValue, ScalarValue};

/// Keys consumed by pagination/search extraction, never treated as filters.
const RESERVED_KEYS: &[&str] = &["filters", "page", "size", "sort_by", "sort_order", "search"];

/// What to do with a parameter whose field or operator fails validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParsePolicy {
    /// Drop the offending parameter and keep the rest (the default).
    #[default]
    DropInvalid,
    /// Fail the whole parse with a [`ParseError`].
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("field `{0}` is not filterable")]
    UnknownField(String),
    #[error("operator `{0}` is not supported")]
    UnknownOperator(String),
}

/// Parser for the `field__operator=value` query mini-language.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParser {
    policy: ParsePolicy,
}

impl QueryParser {
    pub fn new(policy: ParsePolicy) -> Self {
        Self { policy }
    }

    /// Parse ordered query pairs into filters.
    ///
    /// Reserved keys and empty values are skipped. A field outside
    /// `allowed_fields` or an unknown operator is dropped (or rejected,
    /// depending on the policy); the allow-list is the security boundary
    /// that keeps clients from probing arbitrary columns.
    pub fn parse(
        &self,
        query_params: &[(String, String)],
        allowed_fields: &[&str],
    ) -> Result<Vec<Filter>, ParseError> {
        let mut filters = Vec::new();

        for (key, value) in query_params {
            if RESERVED_KEYS.contains(&key.as_str()) || value.is_empty() {
                continue;
            }

            match Self::parse_single(key, value, allowed_fields) {
                Ok(Some(filter)) => filters.push(filter),
                // Unparseable values (bad `between` arity, null literals)
                // always drop, under either policy.
                Ok(None) => {}
                Err(e) => match self.policy {
                    ParsePolicy::DropInvalid => {}
                    ParsePolicy::Reject => return Err(e),
                },
            }
        }

        Ok(filters)
    }

    fn parse_single(
        key: &str,
        value: &str,
        allowed_fields: &[&str],
    ) -> Result<Option<Filter>, ParseError> {
        let (field, operator_str) = match key.split_once("__") {
            Some((field, op)) => (field, op),
            None => (key, "=="),
        };

        if !allowed_fields.contains(&field) {
            return Err(ParseError::UnknownField(field.to_string()));
        }

        let Some(operator) = FilterOperator::parse(operator_str) else {
            return Err(ParseError::UnknownOperator(operator_str.to_string()));
        };

        Ok(parse_value(value, operator).map(|parsed| Filter::new(field, operator, parsed)))
    }
}

/// Coerce a raw value according to the operator's expected shape.
///
/// Returns `None` when the parameter cannot yield a usable filter
/// (wrong `between` arity, or a bare `null`/`none` literal).
fn parse_value(raw: &str, operator: FilterOperator) -> Option<FilterValue> {
    match operator {
        FilterOperator::In | FilterOperator::NotIn => {
            let items: Vec<ScalarValue> = raw
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(|t| ScalarValue::Text(t.to_string()))
                .collect();
            Some(FilterValue::List(items))
        }
        FilterOperator::Between | FilterOperator::NotBetween => {
            let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
            if parts.len() != 2 {
                return None;
            }
            let (lo, hi) = parse_range_bounds(parts[0], parts[1]);
            Some(FilterValue::Range(lo, hi))
        }
        _ => coerce_scalar(raw).map(FilterValue::Scalar),
    }
}

/// Numeric coercion for range bounds: floats if either bound carries a
/// decimal point, ints otherwise, raw strings when parsing fails.
fn parse_range_bounds(lo: &str, hi: &str) -> (ScalarValue, ScalarValue) {
    if lo.contains('.') || hi.contains('.') {
        if let (Ok(a), Ok(b)) = (lo.parse::<f64>(), hi.parse::<f64>()) {
            return (ScalarValue::Float(a), ScalarValue::Float(b));
        }
    } else if let (Ok(a), Ok(b)) = (lo.parse::<i64>(), hi.parse::<i64>()) {
        return (ScalarValue::Int(a), ScalarValue::Int(b));
    }
    (
        ScalarValue::Text(lo.to_string()),
        ScalarValue::Text(hi.to_string()),
    )
}

fn coerce_scalar(raw: &str) -> Option<ScalarValue> {
    if raw.eq_ignore_ascii_case("true") {
        return Some(ScalarValue::Bool(true));
    }
    if raw.eq_ignore_ascii_case("false") {
        return Some(ScalarValue::Bool(false));
    }
    // A bare null literal drops the parameter instead of producing an
    // IS NULL check; reaching NULL semantics requires the `is` / `is not`
    // operators programmatically.
    if raw.eq_ignore_ascii_case("null") || raw.eq_ignore_ascii_case("none") {
        return None;
    }

    let coerced = if raw.contains('.') {
        raw.parse::<f64>()
            .map(ScalarValue::Float)
            .unwrap_or_else(|_| ScalarValue::Text(raw.to_string()))
    } else {
        raw.parse::<i64>()
            .map(ScalarValue::Int)
            .unwrap_or_else(|_| ScalarValue::Text(raw.to_string()))
    };
    Some(coerced)
}

/// Parse query parameters with the default drop-invalid policy.
pub fn parse_filters(query_params: &[(String, String)], allowed_fields: &[&str]) -> Vec<Filter> {
    QueryParser::default()
        .parse(query_params, allowed_fields)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    const ALLOWED: &[&str] = &["id", "status", "value", "is_estimated", "name"];

    #[test]
    fn default_operator_is_equality() {
        let filters = parse_filters(&params(&[("status", "info")]), ALLOWED);
        assert_eq!(
            filters,
            vec![Filter::new(
                "status",
                FilterOperator::Eq,
                FilterValue::Scalar(ScalarValue::Text("info".into())),
            )]
        );
    }

    #[test]
    fn disallowed_field_produces_no_filter() {
        let filters = parse_filters(&params(&[("secret", "1"), ("secret__in", "a,b")]), ALLOWED);
        assert!(filters.is_empty());
    }

    #[test]
    fn unknown_operator_produces_no_filter() {
        let filters = parse_filters(&params(&[("status__bogus", "info")]), ALLOWED);
        assert!(filters.is_empty());
    }

    #[test]
    fn reject_policy_fails_on_unknown_operator() {
        let parser = QueryParser::new(ParsePolicy::Reject);
        let err = parser
            .parse(&params(&[("status__bogus", "info")]), ALLOWED)
            .unwrap_err();
        assert_eq!(err, ParseError::UnknownOperator("bogus".into()));
    }

    #[test]
    fn reject_policy_fails_on_unknown_field() {
        let parser = QueryParser::new(ParsePolicy::Reject);
        let err = parser
            .parse(&params(&[("secret", "1")]), ALLOWED)
            .unwrap_err();
        assert_eq!(err, ParseError::UnknownField("secret".into()));
    }

    #[test]
    fn reserved_keys_and_empty_values_are_skipped() {
        let filters = parse_filters(
            &params(&[
                ("page", "2"),
                ("size", "50"),
                ("sort_by", "created_at"),
                ("sort_order", "asc"),
                ("search", "foo"),
                ("filters", "x"),
                ("status", ""),
            ]),
            ALLOWED,
        );
        assert!(filters.is_empty());
    }

    #[test]
    fn in_list_trims_and_drops_empty_tokens() {
        let filters = parse_filters(&params(&[("id__in", "a,b, ,c")]), ALLOWED);
        assert_eq!(
            filters[0].value,
            FilterValue::List(vec![
                ScalarValue::Text("a".into()),
                ScalarValue::Text("b".into()),
                ScalarValue::Text("c".into()),
            ])
        );
    }

    #[test]
    fn between_coerces_integer_bounds() {
        let filters = parse_filters(&params(&[("value__between", "10,20")]), ALLOWED);
        assert_eq!(
            filters[0].value,
            FilterValue::Range(ScalarValue::Int(10), ScalarValue::Int(20))
        );
    }

    #[test]
    fn between_promotes_both_bounds_to_float() {
        let filters = parse_filters(&params(&[("value__between", "10.5,20")]), ALLOWED);
        assert_eq!(
            filters[0].value,
            FilterValue::Range(ScalarValue::Float(10.5), ScalarValue::Float(20.0))
        );
    }

    #[test]
    fn between_falls_back_to_raw_strings() {
        let filters = parse_filters(&params(&[("name__between", "alpha,omega")]), ALLOWED);
        assert_eq!(
            filters[0].value,
            FilterValue::Range(
                ScalarValue::Text("alpha".into()),
                ScalarValue::Text("omega".into()),
            )
        );
    }

    #[test]
    fn between_with_wrong_arity_is_dropped() {
        let filters = parse_filters(
            &params(&[("value__between", "10"), ("value__between", "1,2,3")]),
            ALLOWED,
        );
        assert!(filters.is_empty());
    }

    #[test]
    fn boolean_literals_coerce() {
        let filters = parse_filters(&params(&[("is_estimated", "False")]), ALLOWED);
        assert_eq!(
            filters[0].value,
            FilterValue::Scalar(ScalarValue::Bool(false))
        );
    }

    #[test]
    fn null_literal_drops_the_filter() {
        let filters = parse_filters(
            &params(&[("status", "null"), ("status__is", "None")]),
            ALLOWED,
        );
        assert!(filters.is_empty());
    }

    #[test]
    fn numeric_values_coerce_by_shape() {
        let filters = parse_filters(
            &params(&[("value", "42"), ("value__gte", "3.5"), ("name", "1.2.3")]),
            ALLOWED,
        );
        assert_eq!(filters[0].value, FilterValue::Scalar(ScalarValue::Int(42)));
        assert_eq!(
            filters[1].value,
            FilterValue::Scalar(ScalarValue::Float(3.5))
        );
        assert_eq!(
            filters[2].value,
            FilterValue::Scalar(ScalarValue::Text("1.2.3".into()))
        );
    }

    #[test]
    fn filters_follow_parameter_order() {
        let filters = parse_filters(
            &params(&[("status", "info"), ("value__gt", "5"), ("id__in", "a,b")]),
            ALLOWED,
        );
        let fields: Vec<&str> = filters.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["status", "value", "id"]);
    }
}
