//! Filter predicates: operators, operands, and evaluation.
//!
//! A [`Filter`] names a field, an operator, and a comparison operand. Field
//! values that resolve to null never match, regardless of operator; the
//! guard fires before operator dispatch. Malformed operands (a `between`
//! range that is not a two-element numeric list, an `in` operand that is
//! not a list) degrade to "does not match" so the pipeline stays total.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::value::FieldValue;

/// Comparison operator for a filter predicate.
///
/// Wire names follow the UI's filter configuration (`"startsWith"`,
/// `"between"`, ...). Unrecognized names are rejected at deserialization
/// time; there is deliberately no catch-all pass-through variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOp {
    /// Strict equality.
    Eq,
    /// Strict inequality.
    Ne,
    /// Numeric greater-than.
    Gt,
    /// Numeric greater-than-or-equal.
    Gte,
    /// Numeric less-than.
    Lt,
    /// Numeric less-than-or-equal.
    Lte,
    /// Case-insensitive substring containment.
    Contains,
    /// Case-insensitive prefix.
    StartsWith,
    /// Case-insensitive suffix.
    EndsWith,
    /// Membership in a list operand.
    In,
    /// Inclusive numeric range, `[min, max]` list operand.
    Between,
}

impl FilterOp {
    /// Returns the wire name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Ne => "ne",
            FilterOp::Gt => "gt",
            FilterOp::Gte => "gte",
            FilterOp::Lt => "lt",
            FilterOp::Lte => "lte",
            FilterOp::Contains => "contains",
            FilterOp::StartsWith => "startsWith",
            FilterOp::EndsWith => "endsWith",
            FilterOp::In => "in",
            FilterOp::Between => "between",
        }
    }

    /// Evaluates an ordering-based operator against a comparison result.
    fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            FilterOp::Gt => ordering == Ordering::Greater,
            FilterOp::Gte => ordering != Ordering::Less,
            FilterOp::Lt => ordering == Ordering::Less,
            FilterOp::Lte => ordering != Ordering::Greater,
            _ => false,
        }
    }
}

impl std::fmt::Display for FilterOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FilterOp {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(FilterOp::Eq),
            "ne" => Ok(FilterOp::Ne),
            "gt" => Ok(FilterOp::Gt),
            "gte" => Ok(FilterOp::Gte),
            "lt" => Ok(FilterOp::Lt),
            "lte" => Ok(FilterOp::Lte),
            "contains" => Ok(FilterOp::Contains),
            "startsWith" => Ok(FilterOp::StartsWith),
            "endsWith" => Ok(FilterOp::EndsWith),
            "in" => Ok(FilterOp::In),
            "between" => Ok(FilterOp::Between),
            other => Err(ParseError::UnknownOperator(other.to_string())),
        }
    }
}

/// Owned comparison operand supplied by the caller.
///
/// Unlike [`FieldValue`], which borrows from the record, an operand owns its
/// data so filters can be stored, cloned, and round-tripped through JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterOperand {
    /// Absent value; matches nothing.
    Null,
    /// Boolean operand.
    Bool(bool),
    /// Numeric operand.
    Number(f64),
    /// Text operand.
    Text(String),
    /// List operand, used by `in` and `between`.
    List(Vec<FilterOperand>),
}

impl FilterOperand {
    /// Builds the `[min, max]` list operand for [`FilterOp::Between`].
    pub fn range(min: f64, max: f64) -> Self {
        FilterOperand::List(vec![FilterOperand::Number(min), FilterOperand::Number(max)])
    }

    /// Numeric coercion mirroring [`FieldValue::as_number`].
    fn as_number(&self) -> Option<f64> {
        match self {
            FilterOperand::Number(n) => Some(*n),
            FilterOperand::Text(s) => s.trim().parse::<f64>().ok(),
            FilterOperand::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            FilterOperand::List(_) | FilterOperand::Null => None,
        }
    }

    /// String coercion mirroring [`FieldValue::to_text`].
    fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            FilterOperand::Text(s) => Some(Cow::Borrowed(s.as_str())),
            FilterOperand::Number(n) => Some(Cow::Owned(n.to_string())),
            FilterOperand::Bool(b) => Some(Cow::Owned(b.to_string())),
            FilterOperand::List(_) | FilterOperand::Null => None,
        }
    }
}

impl From<&str> for FilterOperand {
    fn from(s: &str) -> Self {
        FilterOperand::Text(s.to_string())
    }
}

impl From<String> for FilterOperand {
    fn from(s: String) -> Self {
        FilterOperand::Text(s)
    }
}

impl From<bool> for FilterOperand {
    fn from(b: bool) -> Self {
        FilterOperand::Bool(b)
    }
}

impl From<f64> for FilterOperand {
    fn from(n: f64) -> Self {
        FilterOperand::Number(n)
    }
}

impl From<f32> for FilterOperand {
    fn from(n: f32) -> Self {
        FilterOperand::Number(n as f64)
    }
}

impl From<i32> for FilterOperand {
    fn from(n: i32) -> Self {
        FilterOperand::Number(n as f64)
    }
}

impl From<i64> for FilterOperand {
    fn from(n: i64) -> Self {
        FilterOperand::Number(n as f64)
    }
}

impl From<u32> for FilterOperand {
    fn from(n: u32) -> Self {
        FilterOperand::Number(n as f64)
    }
}

impl From<u64> for FilterOperand {
    fn from(n: u64) -> Self {
        FilterOperand::Number(n as f64)
    }
}

impl From<usize> for FilterOperand {
    fn from(n: usize) -> Self {
        FilterOperand::Number(n as f64)
    }
}

impl<V: Into<FilterOperand>> From<Vec<V>> for FilterOperand {
    fn from(items: Vec<V>) -> Self {
        FilterOperand::List(items.into_iter().map(Into::into).collect())
    }
}

/// A single filter predicate: field, operator, operand.
///
/// # Example
///
/// ```
/// use arama::{FieldValue, Filter, FilterOp, FilterOperand};
///
/// let filter = Filter::new("amount", FilterOp::Between, FilterOperand::range(100.0, 500.0));
/// assert!(filter.matches(&FieldValue::Number(250.0)));
/// assert!(!filter.matches(&FieldValue::Number(50.0)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Dot path of the field to compare.
    pub field: String,
    /// The comparison operator.
    #[serde(rename = "operator")]
    pub op: FilterOp,
    /// The value to compare against.
    #[serde(rename = "value")]
    pub operand: FilterOperand,
}

impl Filter {
    /// Creates a new filter.
    pub fn new(field: impl Into<String>, op: FilterOp, operand: impl Into<FilterOperand>) -> Self {
        Filter {
            field: field.into(),
            op,
            operand: operand.into(),
        }
    }

    /// Evaluates this filter against a resolved field value.
    ///
    /// Null field values never match; the guard fires before operator
    /// dispatch, so `eq` against a null operand is still false.
    pub fn matches(&self, value: &FieldValue<'_>) -> bool {
        if value.is_null() {
            return false;
        }

        match self.op {
            FilterOp::Eq => strict_eq(&self.operand, value),
            FilterOp::Ne => !strict_eq(&self.operand, value),
            FilterOp::Gt | FilterOp::Gte | FilterOp::Lt | FilterOp::Lte => self.match_ordered(value),
            FilterOp::Contains | FilterOp::StartsWith | FilterOp::EndsWith => {
                self.match_textual(value)
            }
            FilterOp::In => match &self.operand {
                FilterOperand::List(items) => items.iter().any(|item| strict_eq(item, value)),
                _ => false,
            },
            FilterOp::Between => self.match_between(value),
        }
    }

    fn match_ordered(&self, value: &FieldValue<'_>) -> bool {
        let (Some(lhs), Some(rhs)) = (value.as_number(), self.operand.as_number()) else {
            return false;
        };
        match lhs.partial_cmp(&rhs) {
            Some(ordering) => self.op.eval_ordering(ordering),
            None => false,
        }
    }

    fn match_textual(&self, value: &FieldValue<'_>) -> bool {
        let (Some(lhs), Some(rhs)) = (value.to_text(), self.operand.as_text()) else {
            return false;
        };
        let lhs = lhs.to_lowercase();
        let rhs = rhs.to_lowercase();
        match self.op {
            FilterOp::Contains => lhs.contains(&rhs),
            FilterOp::StartsWith => lhs.starts_with(&rhs),
            FilterOp::EndsWith => lhs.ends_with(&rhs),
            _ => false,
        }
    }

    fn match_between(&self, value: &FieldValue<'_>) -> bool {
        let FilterOperand::List(bounds) = &self.operand else {
            return false;
        };
        let [min, max] = bounds.as_slice() else {
            return false;
        };
        let (Some(v), Some(min), Some(max)) = (value.as_number(), min.as_number(), max.as_number())
        else {
            return false;
        };
        v >= min && v <= max
    }
}

/// Strict, type-matched equality between an operand and a field value.
fn strict_eq(operand: &FilterOperand, value: &FieldValue<'_>) -> bool {
    match (operand, value) {
        (FilterOperand::Text(a), FieldValue::Text(b)) => a == b,
        (FilterOperand::Number(a), FieldValue::Number(b)) => a == b,
        (FilterOperand::Bool(a), FieldValue::Bool(b)) => a == b,
        _ => false,
    }
}
