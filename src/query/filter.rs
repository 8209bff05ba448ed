//! Filter model shared by the query parser and the predicate compiler.

use sea_orm::Value;

/// Comparison operators accepted in `field__operator` query keys.
///
/// The set is closed: anything else in the operator position is rejected
/// by the parser before a [`Filter`] is ever built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NotIn,
    Is,
    IsNot,
    Like,
    ILike,
    Between,
    NotBetween,
}

impl FilterOperator {
    /// Parse the operator suffix of a query key (`status__in` -> `In`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "==" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Gte),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Lte),
            "in" => Some(Self::In),
            "not in" => Some(Self::NotIn),
            "is" => Some(Self::Is),
            "is not" => Some(Self::IsNot),
            "like" => Some(Self::Like),
            "ilike" => Some(Self::ILike),
            "between" => Some(Self::Between),
            "not between" => Some(Self::NotBetween),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::Is => "is",
            Self::IsNot => "is not",
            Self::Like => "like",
            Self::ILike => "ilike",
            Self::Between => "between",
            Self::NotBetween => "not between",
        }
    }
}

impl std::fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single typed value inside a filter.
///
/// `Null` is never produced by the query parser (a literal `null`/`none`
/// drops the whole parameter there); it exists so programmatic callers
/// can express `is` / `is not` NULL checks.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Null,
}

impl From<ScalarValue> for Value {
    fn from(v: ScalarValue) -> Self {
        match v {
            ScalarValue::Bool(b) => Value::Bool(Some(b)),
            ScalarValue::Int(i) => Value::BigInt(Some(i)),
            ScalarValue::Float(f) => Value::Double(Some(f)),
            ScalarValue::Text(s) => Value::String(Some(Box::new(s))),
            ScalarValue::Null => Value::String(None),
        }
    }
}

impl From<&ScalarValue> for Value {
    fn from(v: &ScalarValue) -> Self {
        v.clone().into()
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for ScalarValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// The shape a filter value can take, fixed at parse time so the
/// predicate compiler can match on it exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Scalar(ScalarValue),
    List(Vec<ScalarValue>),
    Range(ScalarValue, ScalarValue),
}

/// An immutable `(field, operator, value)` predicate specification.
///
/// A filter carries no reference to the entity it will be applied to;
/// binding to a concrete column happens in the predicate compiler.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub operator: FilterOperator,
    pub value: FilterValue,
}

impl Filter {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Shorthand for the common `field == value` case used by handlers.
    pub fn eq(field: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        Self::new(field, FilterOperator::Eq, FilterValue::Scalar(value.into()))
    }

    /// Shorthand for `field != value`.
    pub fn ne(field: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        Self::new(field, FilterOperator::Ne, FilterValue::Scalar(value.into()))
    }

    /// Shorthand for `field IN (values)`.
    pub fn is_in<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ScalarValue>,
    {
        Self::new(
            field,
            FilterOperator::In,
            FilterValue::List(values.into_iter().map(Into::into).collect()),
        )
    }
}
